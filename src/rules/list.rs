/// The list rule.
///
/// Lists need lookbehind (the rule only fires at the start of a line, which
/// the dispatcher tracks through `state.prev_capture`) and a span grammar
/// with backreferences, so the matcher is hand-written. Items are tight
/// (inline content) or loose (block paragraphs), decided per item with the
/// paragraph property inherited into the tail.
use super::{order, re};
use crate::ast::Node;
use crate::capture::Capture;
use crate::html::html_tag;
use crate::matchers::custom;
use crate::parser::{Nested, Parsed, Rule, Rules};
use crate::state::State;
use regex::Regex;
use std::sync::LazyLock;

static LIST_HEAD_R: LazyLock<Regex> = LazyLock::new(|| re(r"^( *)((?:[*+-]|\d+\.)) "));
static BULLET_START_R: LazyLock<Regex> = LazyLock::new(|| re(r"^(?:[*+-]|\d+\.) "));
static LIST_ITEM_PREFIX_R: LazyLock<Regex> = LazyLock::new(|| re(r"^ *(?:[*+-]|\d+\.) +"));
static LIST_BLOCK_END_R: LazyLock<Regex> = LazyLock::new(|| re(r"\n{2,}$"));
static LIST_ITEM_END_R: LazyLock<Regex> = LazyLock::new(|| re(r" *\n+$"));

pub(super) fn install(rules: &mut Rules<String>) {
    rules.insert(
        "list",
        Rule::new(order::LIST)
            .with_match(custom(match_list))
            .with_parse(parse_list)
            .with_html(|node, render: &dyn crate::output::Render<String>, state| match node {
                Node::List {
                    ordered,
                    start,
                    items,
                } => {
                    let mut body = String::new();
                    for item in items {
                        body.push_str(&html_tag("li", &render.nodes(item, state)?, &[], true));
                    }
                    let tag = if *ordered { "ol" } else { "ul" };
                    let start = start.filter(|start| *start != 0).map(|s| s.to_string());
                    Ok(html_tag(tag, &body, &[("start", start)], true))
                }
                _ => Ok(String::new()),
            }),
    );
}

fn match_list(source: &str, state: &State, prev_capture_text: &str) -> Option<Capture> {
    // lists open either in block scope or inside another list item
    if state.inline && !state.in_list {
        return None;
    }
    // start-of-line check: the previous capture must end with a newline and
    // optional indentation (or be the very start of the parse)
    let indent = trailing_line_indent(prev_capture_text)?;
    // the indentation was consumed by the previous capture; put it back so
    // the span grammar sees the bullet's true column
    let padded = format!("{indent}{source}");
    let head = LIST_HEAD_R.captures(&padded)?;
    let head_indent = head.get(1)?.as_str();
    let end = find_list_end(&padded, head_indent, head.get(0)?.end())?;
    Some(Capture::from_groups(vec![
        Some(padded[..end].to_owned()),
        Some(head_indent.to_owned()),
        Some(head.get(2)?.as_str().to_owned()),
    ]))
}

// `(?:^|\n)( *)$` — the spaces after the last newline, or the whole string
// when it is nothing but spaces.
fn trailing_line_indent(prev: &str) -> Option<&str> {
    let tail_start = prev.rfind('\n').map_or(0, |index| index + 1);
    let tail = &prev[tail_start..];
    if tail.bytes().all(|byte| byte == b' ') {
        Some(tail)
    } else {
        None
    }
}

// The list span runs from the bullet to the first blank-line run that is
// not followed by indentation or a sibling bullet (three or more newlines
// always end it), or to the end of the source when only whitespace remains.
fn find_list_end(source: &str, indent: &str, body_start: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let trailing_ws_start = source
        .rfind(|c: char| !c.is_whitespace())
        .map_or(0, |index| index + source[index..].chars().next().map_or(1, char::len_utf8));
    let mut at = body_start + 1;
    while at <= source.len() {
        if !source.is_char_boundary(at) {
            at += 1;
            continue;
        }
        let mut newlines = 0;
        while at + newlines < bytes.len() && bytes[at + newlines] == b'\n' {
            newlines += 1;
        }
        if newlines >= 2 {
            let after = at + newlines;
            if newlines >= 3 || !continues_list(&source[after..], indent) {
                return Some(after);
            }
        }
        if at >= trailing_ws_start {
            return Some(source.len());
        }
        at += 1;
    }
    None
}

fn continues_list(rest: &str, indent: &str) -> bool {
    if rest.starts_with(' ') {
        return true;
    }
    rest.strip_prefix(indent)
        .is_some_and(|after| BULLET_START_R.is_match(after))
}

fn parse_list(capture: &Capture, parser: &dyn Nested, state: &mut State) -> crate::error::Result<Parsed> {
    let bullet = capture.text(2);
    let ordered = bullet.len() > 1;
    let start = if ordered {
        bullet[..bullet.len() - 1].parse::<u32>().ok()
    } else {
        None
    };

    let block = LIST_BLOCK_END_R.replace(capture.full(), "\n");
    let items = split_items(&block);

    let was_inline = state.inline;
    let was_in_list = state.in_list;
    state.in_list = true;

    let mut parsed_items = Vec::with_capacity(items.len());
    let mut failure = None;
    let mut last_was_paragraph = false;
    let count = items.len();
    for (index, item) in items.iter().enumerate() {
        let prefix_len = LIST_ITEM_PREFIX_R
            .find(item)
            .map(|prefix| prefix.end())
            .unwrap_or(0);
        let unindented = unindent(item, prefix_len);
        let content = LIST_ITEM_PREFIX_R.replace(&unindented, "");

        let is_last = index + 1 == count;
        let is_paragraph = content.contains("\n\n") || (is_last && last_was_paragraph);
        last_was_paragraph = is_paragraph;

        let result = if is_paragraph {
            state.inline = false;
            parser.parse(&LIST_ITEM_END_R.replace(&content, "\n\n"), state)
        } else {
            state.inline = true;
            parser.parse(&LIST_ITEM_END_R.replace(&content, ""), state)
        };
        match result {
            Ok(nodes) => parsed_items.push(nodes),
            Err(error) => {
                failure = Some(error);
                break;
            }
        }
    }

    state.inline = was_inline;
    state.in_list = was_in_list;
    if let Some(error) = failure {
        return Err(error);
    }

    Ok(Parsed::Node(Node::List {
        ordered,
        start,
        items: parsed_items,
    }))
}

// Splits the list block into item strings. An item opens at a bullet line
// and runs until a line carrying the same indentation and another bullet;
// anything else, including blank lines and differently-indented bullets,
// continues the current item.
fn split_items(block: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    let mut current: Option<(String, String)> = None;
    for line in block.split_inclusive('\n') {
        match &mut current {
            None => {
                let indent = LIST_HEAD_R
                    .captures(line)
                    .map(|head| head[1].to_owned())
                    .unwrap_or_default();
                current = Some((indent, line.to_owned()));
            }
            Some((indent, text)) => {
                let sibling = line
                    .strip_prefix(indent.as_str())
                    .is_some_and(|after| BULLET_START_R.is_match(after));
                if sibling {
                    items.push(std::mem::take(text));
                    let indent = LIST_HEAD_R
                        .captures(line)
                        .map(|head| head[1].to_owned())
                        .unwrap_or_default();
                    current = Some((indent, line.to_owned()));
                } else {
                    text.push_str(line);
                }
            }
        }
    }
    if let Some((_, text)) = current {
        items.push(text);
    }
    items
}

// Strips up to `width` leading spaces from every line of an item.
fn unindent(item: &str, width: usize) -> String {
    item.split_inclusive('\n')
        .map(|line| {
            let spaces = line
                .bytes()
                .take_while(|byte| *byte == b' ')
                .count()
                .min(width);
            &line[spaces..]
        })
        .collect()
}
