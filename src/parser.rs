/// The parser dispatcher.
///
/// A rule table maps rule names to [`Rule`] records carrying precedence,
/// match, parse, quality and output behavior. [`parser_for`] sorts the
/// parseable entries into a total precedence order and returns a dispatcher
/// that repeatedly picks the best-matching rule and consumes its capture
/// until the source is exhausted.
use crate::ast::{self, Node};
use crate::capture::Capture;
use crate::error::{EngineError, Result};
use crate::matchers::Matcher;
use crate::output::{ArrayFn, OutputFn};
use crate::sanitize::preprocess;
use crate::state::State;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::warn;

static WHITESPACE_RUN_R: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// What a parse function hands back: one node, or a fragment spliced into
/// the surrounding sibling list.
#[derive(Debug)]
pub enum Parsed {
    Node(Node),
    Fragment(Vec<Node>),
}

/// Nested-parse hook passed to rule parse functions. Rules recurse through
/// this rather than owning a parser, so the same closure works for any
/// dispatcher built over a table that contains it.
pub trait Nested {
    fn parse(&self, source: &str, state: &mut State) -> Result<Vec<Node>>;
}

pub type ParseFn = Box<dyn Fn(&Capture, &dyn Nested, &mut State) -> Result<Parsed> + Send + Sync>;
pub type QualityFn = Box<dyn Fn(&Capture, &State, &str) -> f64 + Send + Sync>;

/// One entry of a rule table.
pub struct Rule<O> {
    order: f64,
    matcher: Option<Matcher>,
    quality: Option<QualityFn>,
    parse: Option<ParseFn>,
    output: HashMap<String, OutputFn<O>>,
}

impl<O> Rule<O> {
    /// A rule at the given precedence; lower orders run first.
    pub fn new(order: f64) -> Self {
        Rule {
            order,
            matcher: None,
            quality: None,
            parse: None,
            output: HashMap::new(),
        }
    }

    pub fn with_match(mut self, matcher: Matcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Tiebreaker among equal-order rules that both matched; higher wins.
    pub fn with_quality(
        mut self,
        quality: impl Fn(&Capture, &State, &str) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.quality = Some(Box::new(quality));
        self
    }

    pub fn with_parse(
        mut self,
        parse: impl Fn(&Capture, &dyn Nested, &mut State) -> Result<Parsed> + Send + Sync + 'static,
    ) -> Self {
        self.parse = Some(Box::new(parse));
        self
    }

    /// Registers the output function for a named property.
    pub fn with_output(
        mut self,
        property: impl Into<String>,
        output: impl Fn(&Node, &dyn crate::output::Render<O>, &mut State) -> Result<O>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.output.insert(property.into(), Box::new(output));
        self
    }

    /// Shorthand for registering the `"html"` output property.
    pub fn with_html(
        self,
        output: impl Fn(&Node, &dyn crate::output::Render<O>, &mut State) -> Result<O>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.with_output("html", output)
    }

    pub fn order(&self) -> f64 {
        self.order
    }

    pub fn matcher(&self) -> Option<&Matcher> {
        self.matcher.as_ref()
    }

    pub fn output_fn(&self, property: &str) -> Option<&OutputFn<O>> {
        self.output.get(property)
    }
}

/// A rule table: named rules plus per-property `Array` joiners for sibling
/// sequences. Generic over the output artifact type `O`; HTML tables use
/// `Rules<String>`.
pub struct Rules<O> {
    rules: HashMap<String, Rule<O>>,
    array: HashMap<String, ArrayFn<O>>,
}

impl<O> Rules<O> {
    pub fn new() -> Self {
        Rules {
            rules: HashMap::new(),
            array: HashMap::new(),
        }
    }

    /// Adds or replaces a rule. Returns the previous rule under that name,
    /// which lets extension tables wrap defaults.
    pub fn insert(&mut self, name: impl Into<String>, rule: Rule<O>) -> Option<Rule<O>> {
        self.rules.insert(name.into(), rule)
    }

    pub fn remove(&mut self, name: &str) -> Option<Rule<O>> {
        self.rules.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Rule<O>> {
        self.rules.get(name)
    }

    /// Registers the `Array` joiner for an output property.
    pub fn set_array_output(&mut self, property: impl Into<String>, joiner: ArrayFn<O>) {
        self.array.insert(property.into(), joiner);
    }

    pub fn array_output(&self, property: &str) -> Option<&ArrayFn<O>> {
        self.array.get(property)
    }
}

impl<O> Default for Rules<O> {
    fn default() -> Self {
        Rules::new()
    }
}

/// Builds a dispatcher over a rule table.
///
/// Entries without a match function are ignored. Rules with a non-finite
/// order are kept but logged, since they sort unpredictably. The remaining
/// names are ordered by ascending `order`, then rules with a quality
/// function before those without, then rule name.
pub fn parser_for<O>(rules: &Rules<O>, defaults: State) -> Parser<'_, O> {
    let mut order: Vec<&str> = rules
        .rules
        .iter()
        .filter(|(_, rule)| rule.matcher.is_some())
        .map(|(name, _)| name.as_str())
        .collect();
    for name in &order {
        let rule = &rules.rules[*name];
        if !rule.order.is_finite() {
            warn!("rule {:?} has a non-finite order ({})", name, rule.order);
        }
    }
    order.sort_by(|a, b| {
        let rule_a = &rules.rules[*a];
        let rule_b = &rules.rules[*b];
        rule_a
            .order
            .total_cmp(&rule_b.order)
            .then_with(|| rule_b.quality.is_some().cmp(&rule_a.quality.is_some()))
            .then_with(|| a.cmp(b))
    });
    Parser {
        rules,
        order,
        defaults,
    }
}

/// The dispatcher returned by [`parser_for`].
pub struct Parser<'r, O> {
    rules: &'r Rules<O>,
    order: Vec<&'r str>,
    defaults: State,
}

impl<O> Parser<'_, O> {
    /// Top-level parse with a fresh state cloned from the defaults template.
    pub fn parse(&self, source: &str) -> Result<Vec<Node>> {
        let mut state = self.defaults.clone();
        self.parse_with(source, &mut state)
    }

    /// Top-level parse threading a caller-owned state. The state's
    /// `prev_capture` is reset, the block terminator is appended unless the
    /// scope is inline or suppressed, and reference links are patched from
    /// the definitions collected during the parse.
    pub fn parse_with(&self, source: &str, state: &mut State) -> Result<Vec<Node>> {
        state.prev_capture = None;
        let padded = if !state.inline && !state.disable_auto_block_newlines {
            format!("{source}\n\n")
        } else {
            source.to_owned()
        };
        let mut nodes = self.nested(&preprocess(&padded), state)?;
        ast::patch_references(&mut nodes, &state.defs);
        Ok(nodes)
    }

    // The dispatcher loop. Walks the precedence order for each remaining
    // prefix, tracks the best candidate, and keeps probing while rules of
    // the same order as the best still carry a quality function.
    fn nested(&self, source: &str, state: &mut State) -> Result<Vec<Node>> {
        let mut nodes: Vec<Node> = Vec::new();
        let mut rest = source;
        while !rest.is_empty() {
            if self.order.is_empty() {
                return Err(EngineError::NoMatchingRule {
                    fallback: String::new(),
                    remaining: rest.to_owned(),
                });
            }
            let prev_text = state
                .prev_capture
                .as_ref()
                .map(|capture| capture.full())
                .unwrap_or("");

            let mut best: Option<(&str, &Rule<O>, &ParseFn, Capture)> = None;
            // NaN compares false against everything, so the first successful
            // match always becomes the candidate.
            let mut best_quality = f64::NAN;
            let mut index = 0;
            loop {
                let name = self.order[index];
                let rule = &self.rules.rules[name];
                if let (Some(matcher), Some(parse)) = (&rule.matcher, &rule.parse) {
                    if let Some(capture) = matcher.probe(rest, state, prev_text) {
                        let quality = match &rule.quality {
                            Some(quality) => quality(&capture, state, prev_text),
                            None => 0.0,
                        };
                        if !(quality <= best_quality) {
                            best = Some((name, rule, parse, capture));
                            best_quality = quality;
                        }
                    }
                }
                index += 1;
                if index >= self.order.len() {
                    break;
                }
                if let Some((_, current, _, _)) = &best {
                    let next = &self.rules.rules[self.order[index]];
                    if !(next.order == current.order && next.quality.is_some()) {
                        break;
                    }
                }
            }

            let Some((name, _, parse, capture)) = best else {
                return Err(EngineError::NoMatchingRule {
                    fallback: self.order.last().copied().unwrap_or("").to_owned(),
                    remaining: rest.to_owned(),
                });
            };
            if capture.start() != 0 {
                return Err(EngineError::UnanchoredMatch {
                    rule: name.to_owned(),
                });
            }

            match parse(&capture, self, state)? {
                Parsed::Fragment(children) => nodes.extend(children),
                Parsed::Node(mut node) => {
                    if let Node::Custom(custom) = &mut node {
                        if custom.kind.is_empty() {
                            custom.kind = name.to_owned();
                        }
                    }
                    nodes.push(node);
                }
            }

            let consumed = advance_len(rest, capture.full().len());
            state.prev_capture = Some(capture);
            rest = &rest[consumed..];
        }
        Ok(nodes)
    }
}

impl<O> Nested for Parser<'_, O> {
    fn parse(&self, source: &str, state: &mut State) -> Result<Vec<Node>> {
        self.nested(source, state)
    }
}

// Capture lengths can overshoot the source when a matcher re-prepends
// context (the list rule); clamp to the source and round up to a char
// boundary so consumption always moves forward.
fn advance_len(source: &str, len: usize) -> usize {
    if len >= source.len() {
        return source.len();
    }
    let mut len = len;
    while !source.is_char_boundary(len) {
        len += 1;
    }
    len
}

/// Runs a nested parse in inline scope, restoring the caller's scope after.
pub fn parse_inline(parser: &dyn Nested, content: &str, state: &mut State) -> Result<Vec<Node>> {
    let was_inline = state.inline;
    state.inline = true;
    let result = parser.parse(content, state);
    state.inline = was_inline;
    result
}

/// Runs a nested parse in block scope; the content gets the block
/// terminator appended so block rules can close.
pub fn parse_block(parser: &dyn Nested, content: &str, state: &mut State) -> Result<Vec<Node>> {
    let was_inline = state.inline;
    state.inline = false;
    let result = parser.parse(&format!("{content}\n\n"), state);
    state.inline = was_inline;
    result
}

/// Inline-parses the first capture group; the body shared by the simple
/// wrapper rules.
pub fn parse_capture_inline(
    capture: &Capture,
    parser: &dyn Nested,
    state: &mut State,
) -> Result<Vec<Node>> {
    parse_inline(parser, capture.text(1), state)
}

/// A parse function that ignores its capture and yields a fixed node.
pub fn ignore_capture(node: Node) -> ParseFn {
    Box::new(move |_, _, _| Ok(Parsed::Node(node.clone())))
}

/// Canonical form of a reference key: whitespace runs collapse to a single
/// space, then lowercase. Definitions and references must agree on this
/// before lookup.
pub fn reference_key(raw: &str) -> String {
    WHITESPACE_RUN_R.replace_all(raw, " ").to_lowercase()
}

/// Resolves a reference link or image against the definitions seen so far
/// and records its canonical key for the post-parse patch walk. The key is
/// `capture[2]`, falling back to `capture[1]` for collapsed references.
pub fn parse_ref(capture: &Capture, state: &State, node: Node) -> Node {
    let raw = if capture.text(2).is_empty() {
        capture.text(1)
    } else {
        capture.text(2)
    };
    let key = reference_key(raw);
    let mut node = node;
    match &mut node {
        Node::Link {
            target,
            title,
            reference,
            ..
        }
        | Node::Image {
            target,
            title,
            reference,
            ..
        } => {
            if let Some(def) = state.defs.get(&key) {
                *target = Some(def.target.clone());
                *title = def.title.clone();
            }
            *reference = Some(key);
        }
        _ => {}
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::{any_scope_regex, block_regex};

    fn text_rule() -> Rule<String> {
        Rule::new(10.0)
            .with_match(any_scope_regex(Regex::new(r"^[\s\S]").expect("regex")))
            .with_parse(|capture, _, _| Ok(Parsed::Node(Node::text(capture.full()))))
    }

    fn table_with_text() -> Rules<String> {
        let mut rules = Rules::new();
        rules.insert("text", text_rule());
        rules
    }

    #[test]
    fn test_every_prefix_is_consumed() {
        let rules = table_with_text();
        let parser = parser_for(&rules, State::inline());
        let nodes = parser.parse("abc").unwrap();
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn test_no_matching_rule_names_the_fallback() {
        let mut rules: Rules<String> = Rules::new();
        rules.insert(
            "never",
            Rule::new(1.0)
                .with_match(block_regex(Regex::new(r"^@").expect("regex")))
                .with_parse(|_, _, _| Ok(Parsed::Node(Node::Hr))),
        );
        let parser = parser_for(&rules, State::block());
        let error = parser.parse("plain").unwrap_err();
        match error {
            EngineError::NoMatchingRule { fallback, .. } => assert_eq!(fallback, "never"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unanchored_match_is_fatal() {
        let mut rules = table_with_text();
        rules.insert(
            "sloppy",
            Rule::new(1.0)
                // missing ^ anchor: matches at offset 1
                .with_match(any_scope_regex(Regex::new(r"b").expect("regex")))
                .with_parse(|capture, _, _| Ok(Parsed::Node(Node::text(capture.full())))),
        );
        let parser = parser_for(&rules, State::inline());
        let error = parser.parse("abc").unwrap_err();
        assert!(matches!(error, EngineError::UnanchoredMatch { rule } if rule == "sloppy"));
    }

    #[test]
    fn test_quality_tiebreak_prefers_higher() {
        let mut rules: Rules<String> = Rules::new();
        rules.insert(
            "low",
            Rule::new(1.0)
                .with_match(any_scope_regex(Regex::new(r"^ab").expect("regex")))
                .with_quality(|_, _, _| 1.0)
                .with_parse(|_, _, _| Ok(Parsed::Node(Node::text("low")))),
        );
        rules.insert(
            "high",
            Rule::new(1.0)
                .with_match(any_scope_regex(Regex::new(r"^ab").expect("regex")))
                .with_quality(|_, _, _| 2.0)
                .with_parse(|_, _, _| Ok(Parsed::Node(Node::text("high")))),
        );
        rules.insert("text", text_rule());
        let parser = parser_for(&rules, State::inline());
        let nodes = parser.parse("ab").unwrap();
        assert_eq!(nodes, vec![Node::text("high")]);
    }

    #[test]
    fn test_equal_quality_keeps_first_in_name_order() {
        let mut rules: Rules<String> = Rules::new();
        for name in ["beta", "alpha"] {
            let label = name.to_owned();
            rules.insert(
                name,
                Rule::new(1.0)
                    .with_match(any_scope_regex(Regex::new(r"^x").expect("regex")))
                    .with_quality(|_, _, _| 5.0)
                    .with_parse(move |_, _, _| Ok(Parsed::Node(Node::text(label.clone())))),
            );
        }
        rules.insert("text", text_rule());
        let parser = parser_for(&rules, State::inline());
        // replacement requires strictly greater quality, so the
        // lexicographically first rule wins the tie
        assert_eq!(parser.parse("x").unwrap(), vec![Node::text("alpha")]);
    }

    #[test]
    fn test_custom_nodes_get_the_rule_name_as_kind() {
        let mut rules = table_with_text();
        rules.insert(
            "marker",
            Rule::new(1.0)
                .with_match(any_scope_regex(Regex::new(r"^@").expect("regex")))
                .with_parse(|_, _, _| Ok(Parsed::Node(Node::Custom(Default::default())))),
        );
        let parser = parser_for(&rules, State::inline());
        let nodes = parser.parse("@").unwrap();
        assert_eq!(nodes[0].kind(), "marker");
    }

    #[test]
    fn test_fragment_results_are_spliced() {
        let mut rules = table_with_text();
        rules.insert(
            "pair",
            Rule::new(1.0)
                .with_match(any_scope_regex(Regex::new(r"^@").expect("regex")))
                .with_parse(|_, _, _| {
                    Ok(Parsed::Fragment(vec![Node::text("a"), Node::text("b")]))
                }),
        );
        let parser = parser_for(&rules, State::inline());
        let nodes = parser.parse("@").unwrap();
        assert_eq!(nodes, vec![Node::text("a"), Node::text("b")]);
    }

    #[test]
    fn test_reference_key_canonicalization() {
        assert_eq!(reference_key("A  B\tC"), "a b c");
        assert_eq!(reference_key("Already plain"), "already plain");
    }

    #[test]
    fn test_prev_capture_resets_per_top_level_parse() {
        let rules = table_with_text();
        let parser = parser_for(&rules, State::inline());
        let mut state = State::inline();
        parser.parse_with("ab", &mut state).unwrap();
        assert!(state.prev_capture.is_some());
        parser.parse_with("", &mut state).unwrap();
        assert!(state.prev_capture.is_none());
    }
}
