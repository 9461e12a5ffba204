/// Block-level rules: headings, horizontal rules, code, quotes, reference
/// definitions, blank lines and paragraphs.
use super::{order, re};
use crate::capture::Capture;
use crate::html::html_tag;
use crate::matchers::{block_custom, block_regex};
use crate::parser::{ignore_capture, parse_inline, reference_key, Parsed, Rule, Rules};
use crate::sanitize::sanitize_text;
use crate::state::RefDef;
use crate::ast::Node;
use regex::Regex;
use std::sync::LazyLock;

static HEADING_R: LazyLock<Regex> =
    LazyLock::new(|| re(r"^ *(#{1,6})([^\n]+?)#* *(?:\n *)+\n"));
static LHEADING_R: LazyLock<Regex> =
    LazyLock::new(|| re(r"^([^\n]+)\n *(=|-){3,} *(?:\n *)+\n"));
static HR_R: LazyLock<Regex> = LazyLock::new(|| re(r"^( *[-*_]){3,} *(?:\n *)+\n"));
static CODE_BLOCK_R: LazyLock<Regex> =
    LazyLock::new(|| re(r"^(?:    [^\n]+\n*)+(?:\n *)+\n"));
static CODE_BLOCK_INDENT_R: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^    "));
static TRAILING_NEWLINES_R: LazyLock<Regex> = LazyLock::new(|| re(r"\n+$"));
static FENCE_OPEN_R: LazyLock<Regex> =
    LazyLock::new(|| re(r"^ *(`{3,}|~{3,}) *(?:(\S+) *)?\n"));
static FENCE_CLOSE_TAIL_R: LazyLock<Regex> = LazyLock::new(|| re(r"^ *(?:\n *)+\n"));
static BLOCK_QUOTE_R: LazyLock<Regex> =
    LazyLock::new(|| re(r"^( *>[^\n]+(\n[^\n]+)*\n*)+"));
static BLOCK_QUOTE_TRIM_R: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^ *> ?"));
static DEF_R: LazyLock<Regex> =
    LazyLock::new(|| re(r#"^ *\[([^\]]+)\]: *<?([^\s>]*)>?(?: +["(]([^\n]+)[")])? *\n(?: *\n)*"#));
static NEWLINE_R: LazyLock<Regex> = LazyLock::new(|| re(r"^(?:\n *)*\n"));
static PARAGRAPH_TAIL_R: LazyLock<Regex> = LazyLock::new(|| re(r"^(?:\n *)+\n"));

pub(super) fn install(rules: &mut Rules<String>) {
    rules.insert(
        "heading",
        Rule::new(order::HEADING)
            .with_match(block_regex(HEADING_R.clone()))
            .with_parse(|capture, parser, state| {
                Ok(Parsed::Node(Node::Heading {
                    level: capture.text(1).len(),
                    content: parse_inline(parser, capture.text(2).trim(), state)?,
                }))
            })
            .with_html(|node, render: &dyn crate::output::Render<String>, state| match node {
                Node::Heading { level, content } => Ok(html_tag(
                    &format!("h{level}"),
                    &render.nodes(content, state)?,
                    &[],
                    true,
                )),
                _ => Ok(String::new()),
            }),
    );

    // setext headings rewrite themselves to `heading`
    rules.insert(
        "lheading",
        Rule::new(order::LHEADING)
            .with_match(block_regex(LHEADING_R.clone()))
            .with_parse(|capture, parser, state| {
                Ok(Parsed::Node(Node::Heading {
                    level: if capture.text(2) == "=" { 1 } else { 2 },
                    content: parse_inline(parser, capture.text(1), state)?,
                }))
            }),
    );

    rules.insert(
        "hr",
        Rule::new(order::HR)
            .with_match(block_regex(HR_R.clone()))
            .with_parse(ignore_capture(Node::Hr))
            .with_html(|_, _, _| Ok(html_tag("hr", "", &[], false))),
    );

    rules.insert(
        "codeBlock",
        Rule::new(order::CODE_BLOCK)
            .with_match(block_regex(CODE_BLOCK_R.clone()))
            .with_parse(|capture, _, _| {
                let unindented = CODE_BLOCK_INDENT_R.replace_all(capture.full(), "");
                Ok(Parsed::Node(Node::CodeBlock {
                    lang: None,
                    content: TRAILING_NEWLINES_R.replace(&unindented, "").into_owned(),
                }))
            })
            .with_html(|node, _, _| match node {
                Node::CodeBlock { lang, content } => {
                    let class = lang
                        .as_ref()
                        .map(|lang| format!("markdown-code-{}", sanitize_text(lang)));
                    let code = html_tag("code", &sanitize_text(content), &[("class", class)], true);
                    Ok(html_tag("pre", &code, &[], true))
                }
                _ => Ok(String::new()),
            }),
    );

    // fenced blocks rewrite themselves to `codeBlock`, keeping the info
    // string as the language
    rules.insert(
        "fence",
        Rule::new(order::FENCE)
            .with_match(block_custom(match_fence))
            .with_parse(|capture, _, _| {
                Ok(Parsed::Node(Node::CodeBlock {
                    lang: capture.group(2).map(str::to_owned),
                    content: capture.text(3).to_owned(),
                }))
            }),
    );

    rules.insert(
        "blockQuote",
        Rule::new(order::BLOCK_QUOTE)
            .with_match(block_regex(BLOCK_QUOTE_R.clone()))
            .with_parse(|capture, parser, state| {
                let content = BLOCK_QUOTE_TRIM_R.replace_all(capture.full(), "");
                Ok(Parsed::Node(Node::BlockQuote {
                    content: parser.parse(&content, state)?,
                }))
            })
            .with_html(|node, render: &dyn crate::output::Render<String>, state| match node {
                Node::BlockQuote { content } => Ok(html_tag(
                    "blockquote",
                    &render.nodes(content, state)?,
                    &[],
                    true,
                )),
                _ => Ok(String::new()),
            }),
    );

    rules.insert(
        "def",
        Rule::new(order::DEF)
            .with_match(block_regex(DEF_R.clone()))
            .with_parse(|capture, _, state| {
                let def = reference_key(capture.text(1));
                let target = capture.text(2).to_owned();
                let title = capture.group(3).map(str::to_owned);
                state.defs.insert(
                    def.clone(),
                    RefDef {
                        target: target.clone(),
                        title: title.clone(),
                    },
                );
                Ok(Parsed::Node(Node::Def { def, target, title }))
            })
            .with_html(|_, _, _| Ok(String::new())),
    );

    rules.insert(
        "newline",
        Rule::new(order::NEWLINE)
            .with_match(block_regex(NEWLINE_R.clone()))
            .with_parse(ignore_capture(Node::Newline))
            .with_html(|_, _, _| Ok("\n".to_string())),
    );

    rules.insert(
        "paragraph",
        Rule::new(order::PARAGRAPH)
            .with_match(block_custom(match_paragraph))
            .with_parse(|capture, parser, state| {
                Ok(Parsed::Node(Node::Paragraph {
                    content: parse_inline(parser, capture.text(1), state)?,
                }))
            })
            .with_html(|node, render: &dyn crate::output::Render<String>, state| match node {
                Node::Paragraph { content } => Ok(html_tag(
                    "div",
                    &render.nodes(content, state)?,
                    &[("class", Some("paragraph".to_string()))],
                    true,
                )),
                _ => Ok(String::new()),
            }),
    );
}

// A fenced code block: an opening fence with an optional info word, a body,
// and a closing fence of exactly the same characters followed by blank
// lines. The close may sit directly after the body text.
fn match_fence(source: &str) -> Option<Capture> {
    let open = FENCE_OPEN_R.captures(source)?;
    let fence = open.get(1)?.as_str();
    let fence_bytes = fence.as_bytes();
    let body_start = open.get(0)?.end();
    let bytes = source.as_bytes();
    // the body needs at least one character
    let mut at = body_start + 1;
    while at + fence_bytes.len() <= bytes.len() {
        if &bytes[at..at + fence_bytes.len()] != fence_bytes {
            at += 1;
            continue;
        }
        let close_end = at + fence_bytes.len();
        // a longer run than the fence cannot close it
        if bytes.get(close_end) == Some(&fence_bytes[0]) {
            at += 1;
            continue;
        }
        if let Some(tail) = FENCE_CLOSE_TAIL_R.find(&source[close_end..]) {
            let body = &source[body_start..at];
            let content = match body.strip_suffix('\n') {
                Some(stripped) if body.len() >= 2 => stripped,
                _ => body,
            };
            let full_len = close_end + tail.end();
            return Some(Capture::from_groups(vec![
                Some(source[..full_len].to_owned()),
                Some(fence.to_owned()),
                open.get(2).map(|lang| lang.as_str().to_owned()),
                Some(content.to_owned()),
            ]));
        }
        at += 1;
    }
    None
}

// A paragraph runs to the first newline that is followed by a blank line;
// the blank-line run is consumed with the match.
fn match_paragraph(source: &str) -> Option<Capture> {
    let bytes = source.as_bytes();
    let mut boundary = None;
    for (index, byte) in bytes.iter().enumerate() {
        if *byte != b'\n' {
            continue;
        }
        let mut next = index + 1;
        while next < bytes.len() && bytes[next] == b' ' {
            next += 1;
        }
        if next < bytes.len() && bytes[next] == b'\n' {
            boundary = Some(index);
            break;
        }
    }
    let end = boundary?;
    if end == 0 {
        return None;
    }
    let tail = PARAGRAPH_TAIL_R.find(&source[end..])?;
    Some(Capture::from_groups(vec![
        Some(source[..end + tail.end()].to_owned()),
        Some(source[..end].to_owned()),
    ]))
}
