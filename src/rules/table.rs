/// Table rules: pipe tables, pipe-less "np" tables, and the transient
/// `tableSeparator` rule that row parsing leans on.
///
/// Rows are re-parsed in inline scope with `state.in_table` set, which lets
/// the separator rule fire; the resulting sibling list is then split into
/// cells at the separator nodes.
use super::{order, re};
use crate::ast::{Align, Node};
use crate::capture::Capture;
use crate::error::Result;
use crate::html::html_tag;
use crate::matchers::{block_regex, custom};
use crate::parser::{ignore_capture, Nested, Parsed, Rule, Rules};
use crate::state::State;
use regex::Regex;
use std::sync::LazyLock;

static TABLE_R: LazyLock<Regex> =
    LazyLock::new(|| re(r"^ *(\|.+)\n *\|( *[-:]+[-| :]*)\n((?: *\|.*(?:\n|$))*)\n*"));
static NPTABLE_R: LazyLock<Regex> =
    LazyLock::new(|| re(r"^ *(\S.*\|.*)\n *([-:]+ *\|[-| :]*)\n((?:.*\|.*(?:\n|$))*)\n*"));
static TABLE_SEPARATOR_R: LazyLock<Regex> = LazyLock::new(|| re(r"^ *\| *"));
static TABLE_RIGHT_ALIGN_R: LazyLock<Regex> = LazyLock::new(|| re(r"^ *-+: *$"));
static TABLE_CENTER_ALIGN_R: LazyLock<Regex> = LazyLock::new(|| re(r"^ *:-+: *$"));
static TABLE_LEFT_ALIGN_R: LazyLock<Regex> = LazyLock::new(|| re(r"^ *:-+ *$"));
static ROW_TRIM_LEADING_R: LazyLock<Regex> = LazyLock::new(|| re(r"^ *\| *"));
static ROW_TRIM_TRAILING_R: LazyLock<Regex> = LazyLock::new(|| re(r" *\| *$"));
static CELL_END_TRIM_R: LazyLock<Regex> = LazyLock::new(|| re(r" *$"));

pub(super) fn install(rules: &mut Rules<String>) {
    rules.insert(
        "table",
        Rule::new(order::TABLE)
            .with_match(block_regex(TABLE_R.clone()))
            .with_parse(|capture, parser, state| parse_table(capture, parser, state, true))
            .with_html(table_html),
    );

    // the same shape without leading pipes; parses into a `table` node
    rules.insert(
        "nptable",
        Rule::new(order::NPTABLE)
            .with_match(block_regex(NPTABLE_R.clone()))
            .with_parse(|capture, parser, state| parse_table(capture, parser, state, false)),
    );

    rules.insert(
        "tableSeparator",
        Rule::new(order::TABLE_SEPARATOR)
            .with_match(custom(|source, state, _| {
                if !state.in_table {
                    return None;
                }
                TABLE_SEPARATOR_R
                    .captures(source)
                    .map(|captures| Capture::from_regex(&captures))
            }))
            .with_parse(ignore_capture(Node::TableSeparator)),
    );
}

fn parse_align_cell(cell: &str) -> Option<Align> {
    if TABLE_RIGHT_ALIGN_R.is_match(cell) {
        Some(Align::Right)
    } else if TABLE_CENTER_ALIGN_R.is_match(cell) {
        Some(Align::Center)
    } else if TABLE_LEFT_ALIGN_R.is_match(cell) {
        Some(Align::Left)
    } else {
        None
    }
}

fn parse_align_row(source: &str, trim_end_separators: bool) -> Vec<Option<Align>> {
    let mut row = source.to_owned();
    if trim_end_separators {
        row = ROW_TRIM_LEADING_R.replace(&row, "").into_owned();
        row = ROW_TRIM_TRAILING_R.replace(&row, "").into_owned();
    }
    row.trim().split('|').map(parse_align_cell).collect()
}

// Parses one row in inline scope with the separator rule active, then
// splits the sibling list into cells. With `trim_end_separators`, a
// separator at either end of the row opens no cell; the text node closing
// each cell loses its trailing spaces.
fn parse_row(
    parser: &dyn Nested,
    source: &str,
    state: &mut State,
    trim_end_separators: bool,
) -> Result<Vec<Vec<Node>>> {
    let was_in_table = state.in_table;
    state.in_table = true;
    let row = parser.parse(source.trim(), state);
    state.in_table = was_in_table;
    let row = row?;

    let mut cells: Vec<Vec<Node>> = vec![Vec::new()];
    for index in 0..row.len() {
        match &row[index] {
            Node::TableSeparator => {
                if !trim_end_separators || (index != 0 && index + 1 != row.len()) {
                    cells.push(Vec::new());
                }
            }
            node => {
                let mut node = node.clone();
                let closes_cell = row
                    .get(index + 1)
                    .map_or(true, |next| matches!(next, Node::TableSeparator));
                if closes_cell {
                    if let Node::Text { content } = &mut node {
                        *content = CELL_END_TRIM_R.replace(content, "").into_owned();
                    }
                }
                if let Some(cell) = cells.last_mut() {
                    cell.push(node);
                }
            }
        }
    }
    Ok(cells)
}

fn parse_cells(
    parser: &dyn Nested,
    source: &str,
    state: &mut State,
    trim_end_separators: bool,
) -> Result<Vec<Vec<Vec<Node>>>> {
    source
        .trim()
        .split('\n')
        .map(|row| parse_row(parser, row, state, trim_end_separators))
        .collect()
}

fn parse_table(
    capture: &Capture,
    parser: &dyn Nested,
    state: &mut State,
    trim_end_separators: bool,
) -> Result<Parsed> {
    state.inline = true;
    let header = parse_row(parser, capture.text(1), state, trim_end_separators);
    let align = parse_align_row(capture.text(2), trim_end_separators);
    let cells = header
        .and_then(|header| {
            parse_cells(parser, capture.text(3), state, trim_end_separators)
                .map(|cells| (header, cells))
        });
    state.inline = false;
    let (header, cells) = cells?;
    Ok(Parsed::Node(Node::Table {
        header,
        align,
        cells,
    }))
}

fn table_html(
    node: &Node,
    render: &dyn crate::output::Render<String>,
    state: &mut State,
) -> Result<String> {
    let Node::Table {
        header,
        align,
        cells,
    } = node
    else {
        return Ok(String::new());
    };
    let style = |column: usize| {
        align
            .get(column)
            .copied()
            .flatten()
            .map(|align| format!("text-align:{};", align.as_str()))
    };

    let mut header_cells = String::new();
    for (column, cell) in header.iter().enumerate() {
        header_cells.push_str(&html_tag(
            "th",
            &render.nodes(cell, state)?,
            &[("style", style(column)), ("scope", Some("col".to_string()))],
            true,
        ));
    }
    let mut body = String::new();
    for row in cells {
        let mut row_cells = String::new();
        for (column, cell) in row.iter().enumerate() {
            row_cells.push_str(&html_tag(
                "td",
                &render.nodes(cell, state)?,
                &[("style", style(column))],
                true,
            ));
        }
        body.push_str(&html_tag("tr", &row_cells, &[], true));
    }

    let head = html_tag("thead", &html_tag("tr", &header_cells, &[], true), &[], true);
    let body = html_tag("tbody", &body, &[], true);
    Ok(html_tag("table", &format!("{head}{body}"), &[], true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_classification() {
        assert_eq!(parse_align_cell("---"), None);
        assert_eq!(parse_align_cell(" --: "), Some(Align::Right));
        assert_eq!(parse_align_cell(":-:"), Some(Align::Center));
        assert_eq!(parse_align_cell(" :-- "), Some(Align::Left));
    }

    #[test]
    fn test_align_row_trims_end_separators() {
        assert_eq!(
            parse_align_row("---|--:|", true),
            vec![None, Some(Align::Right)]
        );
        assert_eq!(
            parse_align_row("---|--:", false),
            vec![None, Some(Align::Right)]
        );
    }

    #[test]
    fn test_table_regex_captures_sections() {
        let capture = TABLE_R.captures("| a | b |\n|---|--:|\n| 1 | 2 |\n\n").unwrap();
        assert_eq!(&capture[1], "| a | b |");
        assert_eq!(&capture[2], "---|--:|");
        assert_eq!(&capture[3], "| 1 | 2 |\n");
    }

    #[test]
    fn test_nptable_regex_captures_sections() {
        let capture = NPTABLE_R.captures("a | b\n--- | --:\n1 | 2\n\n").unwrap();
        assert_eq!(&capture[1], "a | b");
        assert_eq!(&capture[2], "--- | --:");
        assert_eq!(&capture[3], "1 | 2\n");
    }

    #[test]
    fn test_separator_rule_needs_table_state() {
        let rules = super::super::default_rules();
        let rule = rules.get("tableSeparator").unwrap();
        let mut state = State::inline();
        assert!(rule.matcher().unwrap().probe("| x", &state, "").is_none());
        state.in_table = true;
        let capture = rule.matcher().unwrap().probe("| x", &state, "").unwrap();
        assert_eq!(capture.full(), "| ");
    }
}
