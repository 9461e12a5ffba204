/// Inline rules: escapes, the link family, emphasis, code spans, hard
/// breaks and the universal `text` fallback.
///
/// The emphasis, link and code-span grammars lean on lookaround and
/// backreferences, so their matchers are hand-written scanners that
/// reproduce the lazy-match semantics: try to close before extending the
/// body by one token.
use super::{order, re};
use crate::ast::Node;
use crate::capture::Capture;
use crate::html::html_tag;
use crate::matchers::{any_scope_custom, any_scope_regex, inline_custom, inline_regex};
use crate::parser::{ignore_capture, parse_capture_inline, parse_ref, Parsed, Rule, Rules};
use crate::sanitize::{sanitize_text, sanitize_url, unescape_url};
use regex::Regex;
use std::sync::LazyLock;

static ESCAPE_R: LazyLock<Regex> = LazyLock::new(|| re(r"^\\([^0-9A-Za-z\s])"));
static AUTOLINK_R: LazyLock<Regex> = LazyLock::new(|| re(r"^<([^: >]+:/[^ >]+)>"));
static MAILTO_R: LazyLock<Regex> = LazyLock::new(|| re(r"^<([^ >]+@[^ >]+)>"));
static URL_R: LazyLock<Regex> =
    LazyLock::new(|| re(r#"^(https?://[^\s<]+[^<.,:;"')\]\s])"#));
static LINK_TARGET_TAIL_R: LazyLock<Regex> =
    LazyLock::new(|| re(r#"^>?(?:\s+['"]([\s\S]*?)['"])?\s*\)"#));
static REF_TAIL_R: LazyLock<Regex> = LazyLock::new(|| re(r"^\]\s*\[([^\]]*)\]"));
static BR_R: LazyLock<Regex> = LazyLock::new(|| re(r"^ {2,}\n"));
static TEXT_BREAK_R: LazyLock<Regex> = LazyLock::new(|| re(r"^ {2,}\n"));
static WORD_COLON_R: LazyLock<Regex> = LazyLock::new(|| re(r"^[0-9A-Za-z_]+:\S"));

pub(super) fn install(rules: &mut Rules<String>) {
    rules.insert(
        "escape",
        Rule::new(order::ESCAPE)
            .with_match(inline_regex(ESCAPE_R.clone()))
            .with_parse(|capture, _, _| Ok(Parsed::Node(Node::text(capture.text(1))))),
    );

    rules.insert(
        "autolink",
        Rule::new(order::AUTOLINK)
            .with_match(inline_regex(AUTOLINK_R.clone()))
            .with_parse(|capture, _, _| {
                Ok(Parsed::Node(Node::Link {
                    content: vec![Node::text(capture.text(1))],
                    target: Some(capture.text(1).to_owned()),
                    title: None,
                    reference: None,
                }))
            }),
    );

    rules.insert(
        "mailto",
        Rule::new(order::MAILTO)
            .with_match(inline_regex(MAILTO_R.clone()))
            .with_parse(|capture, _, _| {
                let address = capture.text(1);
                let target = if address.to_ascii_lowercase().contains("mailto:") {
                    address.to_owned()
                } else {
                    format!("mailto:{address}")
                };
                Ok(Parsed::Node(Node::Link {
                    content: vec![Node::text(address)],
                    target: Some(target),
                    title: None,
                    reference: None,
                }))
            }),
    );

    rules.insert(
        "url",
        Rule::new(order::URL)
            .with_match(inline_regex(URL_R.clone()))
            .with_parse(|capture, _, _| {
                Ok(Parsed::Node(Node::Link {
                    content: vec![Node::text(capture.text(1))],
                    target: Some(capture.text(1).to_owned()),
                    title: None,
                    reference: None,
                }))
            }),
    );

    rules.insert(
        "link",
        Rule::new(order::LINK)
            .with_match(inline_custom(match_link))
            .with_parse(|capture, parser, state| {
                Ok(Parsed::Node(Node::Link {
                    content: parser.parse(capture.text(1), state)?,
                    target: Some(unescape_url(capture.text(2))),
                    title: capture.group(3).map(str::to_owned),
                    reference: None,
                }))
            })
            .with_html(|node, render: &dyn crate::output::Render<String>, state| match node {
                Node::Link {
                    content,
                    target,
                    title,
                    ..
                } => Ok(html_tag(
                    "a",
                    &render.nodes(content, state)?,
                    &[
                        ("href", sanitize_url(target.as_deref())),
                        ("title", title.clone()),
                    ],
                    true,
                )),
                _ => Ok(String::new()),
            }),
    );

    rules.insert(
        "image",
        Rule::new(order::IMAGE)
            .with_match(inline_custom(match_image))
            .with_parse(|capture, _, _| {
                Ok(Parsed::Node(Node::Image {
                    alt: capture.text(1).to_owned(),
                    target: Some(unescape_url(capture.text(2))),
                    title: capture.group(3).map(str::to_owned),
                    reference: None,
                }))
            })
            .with_html(|node, _, _| match node {
                Node::Image {
                    alt, target, title, ..
                } => Ok(html_tag(
                    "img",
                    "",
                    &[
                        ("src", sanitize_url(target.as_deref())),
                        ("alt", Some(alt.clone())),
                        ("title", title.clone()),
                    ],
                    false,
                )),
                _ => Ok(String::new()),
            }),
    );

    rules.insert(
        "reflink",
        Rule::new(order::REFLINK)
            .with_match(inline_custom(match_reflink))
            .with_parse(|capture, parser, state| {
                let content = parser.parse(capture.text(1), state)?;
                let node = Node::Link {
                    content,
                    target: None,
                    title: None,
                    reference: None,
                };
                Ok(Parsed::Node(parse_ref(capture, state, node)))
            }),
    );

    rules.insert(
        "refimage",
        Rule::new(order::REFIMAGE)
            .with_match(inline_custom(match_refimage))
            .with_parse(|capture, _, state| {
                let node = Node::Image {
                    alt: capture.text(1).to_owned(),
                    target: None,
                    title: None,
                    reference: None,
                };
                Ok(Parsed::Node(parse_ref(capture, state, node)))
            }),
    );

    // em, strong and u share an order; precedence falls out of the quality
    // functions, where longer captures win and the fixed biases break ties
    rules.insert(
        "em",
        Rule::new(order::EMPHASIS)
            .with_match(inline_custom(match_em))
            .with_quality(|capture, _, _| capture.full().chars().count() as f64 + 0.2)
            .with_parse(|capture, parser, state| {
                let body = if capture.text(2).is_empty() {
                    capture.text(1)
                } else {
                    capture.text(2)
                };
                Ok(Parsed::Node(Node::Em {
                    content: parser.parse(body, state)?,
                }))
            })
            .with_html(|node, render: &dyn crate::output::Render<String>, state| match node {
                Node::Em { content } => {
                    Ok(html_tag("em", &render.nodes(content, state)?, &[], true))
                }
                _ => Ok(String::new()),
            }),
    );

    rules.insert(
        "strong",
        Rule::new(order::EMPHASIS)
            .with_match(inline_custom(match_strong))
            .with_quality(|capture, _, _| capture.full().chars().count() as f64 + 0.1)
            .with_parse(|capture, parser, state| {
                Ok(Parsed::Node(Node::Strong {
                    content: parse_capture_inline(capture, parser, state)?,
                }))
            })
            .with_html(|node, render: &dyn crate::output::Render<String>, state| match node {
                Node::Strong { content } => {
                    Ok(html_tag("strong", &render.nodes(content, state)?, &[], true))
                }
                _ => Ok(String::new()),
            }),
    );

    rules.insert(
        "u",
        Rule::new(order::EMPHASIS)
            .with_match(inline_custom(match_u))
            .with_quality(|capture, _, _| capture.full().chars().count() as f64)
            .with_parse(|capture, parser, state| {
                Ok(Parsed::Node(Node::U {
                    content: parse_capture_inline(capture, parser, state)?,
                }))
            })
            .with_html(|node, render: &dyn crate::output::Render<String>, state| match node {
                Node::U { content } => Ok(html_tag("u", &render.nodes(content, state)?, &[], true)),
                _ => Ok(String::new()),
            }),
    );

    rules.insert(
        "del",
        Rule::new(order::DEL)
            .with_match(inline_custom(match_del))
            .with_parse(|capture, parser, state| {
                Ok(Parsed::Node(Node::Del {
                    content: parse_capture_inline(capture, parser, state)?,
                }))
            })
            .with_html(|node, render: &dyn crate::output::Render<String>, state| match node {
                Node::Del { content } => {
                    Ok(html_tag("del", &render.nodes(content, state)?, &[], true))
                }
                _ => Ok(String::new()),
            }),
    );

    rules.insert(
        "inlineCode",
        Rule::new(order::INLINE_CODE)
            .with_match(inline_custom(match_inline_code))
            .with_parse(|capture, _, _| {
                Ok(Parsed::Node(Node::InlineCode {
                    content: trim_code_padding(capture.text(2)),
                }))
            })
            .with_html(|node, _, _| match node {
                Node::InlineCode { content } => {
                    Ok(html_tag("code", &sanitize_text(content), &[], true))
                }
                _ => Ok(String::new()),
            }),
    );

    rules.insert(
        "br",
        Rule::new(order::BR)
            .with_match(any_scope_regex(BR_R.clone()))
            .with_parse(ignore_capture(Node::Br))
            .with_html(|_, _, _| Ok(html_tag("br", "", &[], false))),
    );

    rules.insert(
        "text",
        Rule::new(order::TEXT)
            .with_match(any_scope_custom(match_text))
            .with_parse(|capture, _, _| Ok(Parsed::Node(Node::text(capture.full()))))
            .with_html(|node, _, _| match node {
                Node::Text { content } => Ok(sanitize_text(content)),
                _ => Ok(String::new()),
            }),
    );
}

// ---------------------------------------------------------------------------
// Link-family scanners
// ---------------------------------------------------------------------------

// The "inside" of a link label. Complete bracket pairs and ordinary
// characters are consumed freely; a bare `]` is consumed only when another
// closer follows with no opener in between, so the final `]` stays
// available to close the label.
fn scan_link_inside(source: &str) -> usize {
    let bytes = source.as_bytes();
    let mut at = 0;
    while at < bytes.len() {
        match bytes[at] {
            b'[' => match source[at + 1..].find(']') {
                Some(close) => at += close + 2,
                None => break,
            },
            b']' => {
                let rest = &source[at + 1..];
                let next_close = rest.find(']');
                let next_open = rest.find('[');
                let consumable = match (next_close, next_open) {
                    (Some(close), Some(open)) => close < open,
                    (Some(_), None) => true,
                    _ => false,
                };
                if consumable {
                    at += 1;
                } else {
                    break;
                }
            }
            _ => at += 1,
        }
    }
    at
}

// The `(target "title")` section. The target is matched lazily: before each
// token the scanner tries to finish with the optional `>`, the optional
// quoted title, and the closing paren. Target tokens are one-level paren
// groups, escape pairs, or single non-space characters.
fn scan_link_target(source: &str) -> Option<(usize, String, Option<String>)> {
    let mut at = source.len() - source.trim_start().len();
    if source[at..].starts_with('<') {
        at += 1;
    }
    let target_start = at;
    loop {
        if let Some(tail) = LINK_TARGET_TAIL_R.captures(&source[at..]) {
            let target = source[target_start..at].to_owned();
            let title = tail.get(1).map(|title| title.as_str().to_owned());
            let end = at + tail.get(0)?.end();
            return Some((end, target, title));
        }
        let rest = &source[at..];
        let mut chars = rest.chars();
        match chars.next()? {
            '(' => match rest.find(')') {
                Some(close) => at += close + 1,
                None => at += 1,
            },
            '\\' => at += 1 + chars.next()?.len_utf8(),
            c if c.is_whitespace() => return None,
            c => at += c.len_utf8(),
        }
    }
}

fn match_link_like(source: &str, image: bool) -> Option<Capture> {
    let rest = source.strip_prefix(if image { "![" } else { "[" })?;
    let inside_len = scan_link_inside(rest);
    let after = rest[inside_len..].strip_prefix("](")?;
    let (consumed, target, title) = scan_link_target(after)?;
    let prefix_len = if image { 2 } else { 1 };
    let full_len = prefix_len + inside_len + 2 + consumed;
    Some(Capture::from_groups(vec![
        Some(source[..full_len].to_owned()),
        Some(rest[..inside_len].to_owned()),
        Some(target),
        title,
    ]))
}

fn match_link(source: &str) -> Option<Capture> {
    match_link_like(source, false)
}

fn match_image(source: &str) -> Option<Capture> {
    match_link_like(source, true)
}

fn match_ref_like(source: &str, image: bool) -> Option<Capture> {
    let rest = source.strip_prefix(if image { "![" } else { "[" })?;
    let inside_len = scan_link_inside(rest);
    let tail = REF_TAIL_R.captures(&rest[inside_len..])?;
    let prefix_len = if image { 2 } else { 1 };
    let full_len = prefix_len + inside_len + tail.get(0)?.end();
    Some(Capture::from_groups(vec![
        Some(source[..full_len].to_owned()),
        Some(rest[..inside_len].to_owned()),
        tail.get(1).map(|reference| reference.as_str().to_owned()),
    ]))
}

fn match_reflink(source: &str) -> Option<Capture> {
    match_ref_like(source, false)
}

fn match_refimage(source: &str) -> Option<Capture> {
    match_ref_like(source, true)
}

// ---------------------------------------------------------------------------
// Emphasis scanners
// ---------------------------------------------------------------------------

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// `_body_` with a word boundary after the closer; `__` pairs ride along
// inside the body, bare underscores end the attempt.
fn match_em_underscore(source: &str) -> Option<Capture> {
    let rest = source.strip_prefix('_')?;
    let mut at = 0;
    let mut consumed = false;
    while at < rest.len() {
        if consumed && rest[at..].starts_with('_') {
            let boundary = rest[at + 1..].chars().next().map_or(true, |c| !is_word(c));
            if boundary {
                return Some(Capture::from_groups(vec![
                    Some(source[..at + 2].to_owned()),
                    Some(rest[..at].to_owned()),
                    None,
                ]));
            }
        }
        let tail = &rest[at..];
        if tail.starts_with("__") {
            at += 2;
        } else if tail.starts_with('\\') {
            at += 1 + tail[1..].chars().next()?.len_utf8();
        } else {
            let c = tail.chars().next()?;
            if c == '_' {
                return None;
            }
            at += c.len_utf8();
        }
        consumed = true;
    }
    None
}

// `*body*` where the body starts with a non-space, whitespace may not
// directly precede a star, and the closer is a single star.
fn match_em_star(source: &str) -> Option<Capture> {
    let rest = source.strip_prefix('*')?;
    if rest.chars().next()?.is_whitespace() {
        return None;
    }
    let mut at = 0;
    let mut consumed = false;
    while at < rest.len() {
        if consumed && rest[at..].starts_with('*') && !rest[at + 1..].starts_with('*') {
            return Some(Capture::from_groups(vec![
                Some(source[..at + 2].to_owned()),
                None,
                Some(rest[..at].to_owned()),
            ]));
        }
        let tail = &rest[at..];
        if tail.starts_with("**") {
            at += 2;
        } else if tail.starts_with('\\') {
            at += 1 + tail[1..].chars().next()?.len_utf8();
        } else {
            let c = tail.chars().next()?;
            if c == '*' {
                return None;
            }
            if c.is_whitespace() && tail[c.len_utf8()..].starts_with('*') {
                return None;
            }
            at += c.len_utf8();
        }
        consumed = true;
    }
    None
}

fn match_em(source: &str) -> Option<Capture> {
    match_em_underscore(source).or_else(|| match_em_star(source))
}

fn match_double_delimited(
    source: &str,
    delimiter: &str,
    forbid_after_close: char,
) -> Option<(usize, usize)> {
    // returns (body length, full length) on the source minus the opener
    let rest = source.strip_prefix(delimiter)?;
    let mut at = 0;
    let mut consumed = false;
    while at < rest.len() {
        if consumed
            && rest[at..].starts_with(delimiter)
            && !rest[at + delimiter.len()..].starts_with(forbid_after_close)
        {
            return Some((at, delimiter.len() * 2 + at));
        }
        let tail = &rest[at..];
        if tail.starts_with('\\') {
            at += 1 + tail[1..].chars().next()?.len_utf8();
        } else {
            at += tail.chars().next()?.len_utf8();
        }
        consumed = true;
    }
    None
}

fn match_strong(source: &str) -> Option<Capture> {
    let (body_len, full_len) = match_double_delimited(source, "**", '*')?;
    Some(Capture::from_groups(vec![
        Some(source[..full_len].to_owned()),
        Some(source[2..2 + body_len].to_owned()),
    ]))
}

fn match_u(source: &str) -> Option<Capture> {
    let (body_len, full_len) = match_double_delimited(source, "__", '_')?;
    Some(Capture::from_groups(vec![
        Some(source[..full_len].to_owned()),
        Some(source[2..2 + body_len].to_owned()),
    ]))
}

// `~~body~~` with a non-space opener; single tildes and whitespace directly
// before the closer end the attempt.
fn match_del(source: &str) -> Option<Capture> {
    let rest = source.strip_prefix("~~")?;
    if rest.chars().next()?.is_whitespace() {
        return None;
    }
    let mut at = 0;
    let mut consumed = false;
    while at < rest.len() {
        if consumed && rest[at..].starts_with("~~") {
            return Some(Capture::from_groups(vec![
                Some(source[..at + 4].to_owned()),
                Some(rest[..at].to_owned()),
            ]));
        }
        let tail = &rest[at..];
        let c = tail.chars().next()?;
        if c == '\\' {
            at += 1 + tail[1..].chars().next()?.len_utf8();
        } else if c == '~' {
            if tail[1..].starts_with('~') {
                return None;
            }
            at += 1;
        } else if c.is_whitespace() {
            if tail[c.len_utf8()..].starts_with("~~") {
                return None;
            }
            at += c.len_utf8();
        } else {
            at += c.len_utf8();
        }
        consumed = true;
    }
    None
}

// ---------------------------------------------------------------------------
// Code spans and text
// ---------------------------------------------------------------------------

// A backtick fence closes only on a maximal run of exactly its own length,
// which also guarantees the body ends on a non-backtick.
fn match_inline_code(source: &str) -> Option<Capture> {
    let fence_len = source.bytes().take_while(|byte| *byte == b'`').count();
    if fence_len == 0 {
        return None;
    }
    let bytes = source.as_bytes();
    let mut at = fence_len;
    while at < bytes.len() {
        if bytes[at] != b'`' {
            at += 1;
            continue;
        }
        let run = bytes[at..].iter().take_while(|byte| **byte == b'`').count();
        if run == fence_len && at > fence_len {
            return Some(Capture::from_groups(vec![
                Some(source[..at + run].to_owned()),
                Some("`".repeat(fence_len)),
                Some(source[fence_len..at].to_owned()),
            ]));
        }
        at += run;
    }
    None
}

// Strips one leading space when spaces lead up to a backtick, and one
// trailing space when it follows a backtick; the padding convention for
// spans that start or end with a backtick.
fn trim_code_padding(content: &str) -> String {
    let mut out = content;
    if let Some(rest) = out.strip_prefix(' ') {
        if rest.trim_start_matches(' ').starts_with('`') {
            out = rest;
        }
    }
    if let Some(rest) = out.strip_suffix(' ') {
        if rest.trim_end_matches(' ').ends_with('`') {
            out = rest;
        }
    }
    out.to_owned()
}

// The boundary set after which a symbol rule might fire: punctuation,
// a blank line, a two-space hard break, or a word directly followed by a
// colon and more (the shape of a bare URL).
fn is_symbol(c: char) -> bool {
    !c.is_ascii_alphanumeric() && !c.is_whitespace() && (c as u32) < 0xC0
}

fn match_text(source: &str) -> Option<Capture> {
    let mut indices = source.char_indices();
    indices.next()?;
    let mut end = source.len();
    for (index, c) in indices {
        let rest = &source[index..];
        if is_symbol(c)
            || rest.starts_with("\n\n")
            || TEXT_BREAK_R.is_match(rest)
            || WORD_COLON_R.is_match(rest)
        {
            end = index;
            break;
        }
    }
    Some(Capture::from_groups(vec![Some(source[..end].to_owned())]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_em_star() {
        let capture = match_em("*em* rest").unwrap();
        assert_eq!(capture.full(), "*em*");
        assert_eq!(capture.text(2), "em");
    }

    #[test]
    fn test_em_star_rejects_space_padding() {
        assert!(match_em("* nope*").is_none());
        assert!(match_em("*nope *").is_none());
    }

    #[test]
    fn test_em_underscore_needs_word_boundary() {
        assert!(match_em("_snake_case").is_none());
        let capture = match_em("_em_ rest").unwrap();
        assert_eq!(capture.text(1), "em");
    }

    #[test]
    fn test_em_declines_double_markers() {
        assert!(match_em("**strong**").is_none());
        assert!(match_em("__u__").is_none());
    }

    #[test]
    fn test_em_swallows_nested_double_markers() {
        let capture = match_em("*a**b**c* rest").unwrap();
        assert_eq!(capture.text(2), "a**b**c");
        // whitespace directly before a star ends the attempt
        assert!(match_em("*a **b** c*").is_none());
    }

    #[test]
    fn test_strong() {
        let capture = match_strong("**strong** rest").unwrap();
        assert_eq!(capture.full(), "**strong**");
        assert_eq!(capture.text(1), "strong");
    }

    #[test]
    fn test_strong_extends_past_extra_star() {
        // the closer may not be followed by another star
        let capture = match_strong("**a***").unwrap();
        assert_eq!(capture.text(1), "a*");
    }

    #[test]
    fn test_u() {
        let capture = match_u("__u__ rest").unwrap();
        assert_eq!(capture.text(1), "u");
    }

    #[test]
    fn test_del() {
        let capture = match_del("~~gone~~ rest").unwrap();
        assert_eq!(capture.text(1), "gone");
        assert!(match_del("~~ nope~~").is_none());
        assert!(match_del("~~a ~~").is_none());
    }

    #[test]
    fn test_link_scanner() {
        let capture = match_link(r#"[text](http://e.com "T") rest"#).unwrap();
        assert_eq!(capture.full(), r#"[text](http://e.com "T")"#);
        assert_eq!(capture.text(1), "text");
        assert_eq!(capture.text(2), "http://e.com");
        assert_eq!(capture.text(3), "T");
    }

    #[test]
    fn test_link_scanner_without_title() {
        let capture = match_link("[a](/b) rest").unwrap();
        assert_eq!(capture.text(2), "/b");
        assert_eq!(capture.group(3), None);
    }

    #[test]
    fn test_link_scanner_balanced_brackets() {
        let capture = match_link("[a[b]c](x)").unwrap();
        assert_eq!(capture.text(1), "a[b]c");
    }

    #[test]
    fn test_link_scanner_paren_target() {
        let capture = match_link("[a](javascript:alert(1))").unwrap();
        assert_eq!(capture.text(2), "javascript:alert(1)");
    }

    #[test]
    fn test_link_scanner_angle_target() {
        let capture = match_link("[a](<http://e.com>)").unwrap();
        assert_eq!(capture.text(2), "http://e.com");
    }

    #[test]
    fn test_reflink_scanner() {
        let capture = match_reflink("[x][y] rest").unwrap();
        assert_eq!(capture.text(1), "x");
        assert_eq!(capture.text(2), "y");
    }

    #[test]
    fn test_reflink_collapsed() {
        let capture = match_reflink("[x][] rest").unwrap();
        assert_eq!(capture.text(1), "x");
        assert_eq!(capture.text(2), "");
    }

    #[test]
    fn test_inline_code_fences() {
        let capture = match_inline_code("`a` rest").unwrap();
        assert_eq!(capture.text(2), "a");
        let capture = match_inline_code("``a ` b`` rest").unwrap();
        assert_eq!(capture.text(2), "a ` b");
        assert!(match_inline_code("`unclosed").is_none());
    }

    #[test]
    fn test_code_padding_trim() {
        assert_eq!(trim_code_padding(" `` "), "``");
        assert_eq!(trim_code_padding(" plain "), " plain ");
        assert_eq!(trim_code_padding("x"), "x");
    }

    #[test]
    fn test_text_stops_at_symbols() {
        let capture = match_text("and *em*").unwrap();
        assert_eq!(capture.full(), "and ");
        // the first character is always consumed; the run then extends to
        // the next boundary
        let capture = match_text("*em*").unwrap();
        assert_eq!(capture.full(), "*em");
    }

    #[test]
    fn test_text_stops_before_blank_line_and_break() {
        assert_eq!(match_text("a\nb\n\nc").unwrap().full(), "a\nb");
        assert_eq!(match_text("ab  \ncd").unwrap().full(), "ab");
    }

    #[test]
    fn test_text_stops_before_bare_url() {
        assert_eq!(match_text("see http://e.com").unwrap().full(), "see ");
    }

    #[test]
    fn test_text_spans_accented_words() {
        assert_eq!(match_text("héllo there").unwrap().full(), "héllo there");
    }
}
