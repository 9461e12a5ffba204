use pretty_assertions::assert_eq;

use runemark::{
    default_block_parse, default_block_parse_with, default_html_output, default_inline_parse,
    markdown_to_html, Node, State,
};

// -----------------------------------------------------------------------------
// End-to-end HTML scenarios
// -----------------------------------------------------------------------------

#[test]
fn heading_to_html() {
    assert_eq!(markdown_to_html("# Hello\n\n").unwrap(), "<h1>Hello</h1>");
}

#[test]
fn emphasis_family_to_html() {
    let mut state = State::inline();
    let nodes = default_inline_parse("*em* and **strong** and __u__").unwrap();
    let html = default_html_output(&nodes, &mut state).unwrap();
    assert_eq!(
        html,
        "<em>em</em> and <strong>strong</strong> and <u>u</u>"
    );
}

#[test]
fn javascript_links_lose_their_href() {
    let html = markdown_to_html("[a](javascript:alert(1))\n\n").unwrap();
    assert!(html.contains("<a>a</a>"));
    assert!(!html.contains("javascript"));
}

#[test]
fn tight_list_to_html() {
    assert_eq!(
        markdown_to_html("- one\n- two\n\n").unwrap(),
        "<ul><li>one</li><li>two</li></ul>"
    );
}

#[test]
fn reference_link_is_backpatched() {
    let html = markdown_to_html("[x][y]\n\n[y]: http://e.com \"T\"\n\n").unwrap();
    assert!(html.contains("<a href=\"http://e.com\" title=\"T\">x</a>"));
}

#[test]
fn fenced_code_to_html() {
    assert_eq!(
        markdown_to_html("```js\nfoo\n``` \n\n").unwrap(),
        "<pre><code class=\"markdown-code-js\">foo</code></pre>"
    );
}

#[test]
fn pipe_table_to_html() {
    let html = markdown_to_html("| a | b |\n|---|--:|\n| 1 | 2 |\n\n").unwrap();
    assert_eq!(
        html,
        "<table><thead><tr><th scope=\"col\">a</th>\
         <th style=\"text-align:right;\" scope=\"col\">b</th></tr></thead>\
         <tbody><tr><td>1</td><td style=\"text-align:right;\">2</td></tr></tbody></table>"
    );
}

#[test]
fn nptable_to_html() {
    let html = markdown_to_html("a | b\n--- | --:\n1 | 2\n\n").unwrap();
    assert!(html.contains("<table>"));
    assert!(html.contains("<th scope=\"col\">a</th>"));
    assert!(html.contains("<th style=\"text-align:right;\" scope=\"col\">b</th>"));
}

#[test]
fn ordered_list_keeps_its_start() {
    let html = markdown_to_html("3. three\n4. four\n\n").unwrap();
    assert_eq!(html, "<ol start=\"3\"><li>three</li><li>four</li></ol>");
}

#[test]
fn loose_list_items_become_paragraphs() {
    let html = markdown_to_html("- one\n\n- two\n\n").unwrap();
    assert_eq!(
        html,
        "<ul><li><div class=\"paragraph\">one</div></li>\
         <li><div class=\"paragraph\">two</div></li></ul>"
    );
}

#[test]
fn nested_list_renders_nested() {
    let html = markdown_to_html("- a\n  - b\n\n").unwrap();
    assert_eq!(html, "<ul><li>a\n<ul><li>b</li></ul></li></ul>");
}

#[test]
fn block_quote_to_html() {
    let html = markdown_to_html("> quoted\n\n").unwrap();
    assert_eq!(
        html,
        "<blockquote><div class=\"paragraph\">quoted</div></blockquote>"
    );
}

#[test]
fn setext_heading_becomes_heading() {
    assert_eq!(markdown_to_html("Title\n=====\n\n").unwrap(), "<h1>Title</h1>");
    assert_eq!(markdown_to_html("Title\n-----\n\n").unwrap(), "<h2>Title</h2>");
}

#[test]
fn hr_and_br_are_void_tags() {
    assert_eq!(markdown_to_html("---\n\n").unwrap(), "<hr>");
    let mut state = State::inline();
    let nodes = default_inline_parse("a  \nb").unwrap();
    let html = default_html_output(&nodes, &mut state).unwrap();
    assert_eq!(html, "a<br>b");
}

#[test]
fn autolink_mailto_and_bare_url() {
    // href attributes keep their slashes; text content escapes them
    let mut state = State::inline();
    let nodes = default_inline_parse("<http://e.com>").unwrap();
    let html = default_html_output(&nodes, &mut state).unwrap();
    assert_eq!(html, "<a href=\"http://e.com\">http:&#x2F;&#x2F;e.com</a>");

    let mut state = State::inline();
    let nodes = default_inline_parse("<someone@e.com>").unwrap();
    let html = default_html_output(&nodes, &mut state).unwrap();
    assert_eq!(html, "<a href=\"mailto:someone@e.com\">someone@e.com</a>");

    let mut state = State::inline();
    let nodes = default_inline_parse("see http://e.com/x now").unwrap();
    let html = default_html_output(&nodes, &mut state).unwrap();
    assert_eq!(
        html,
        "see <a href=\"http://e.com/x\">http:&#x2F;&#x2F;e.com&#x2F;x</a> now"
    );
}

#[test]
fn image_to_html() {
    let mut state = State::inline();
    let nodes = default_inline_parse("![alt](http://e.com/i.png \"T\")").unwrap();
    let html = default_html_output(&nodes, &mut state).unwrap();
    assert_eq!(
        html,
        "<img src=\"http://e.com/i.png\" alt=\"alt\" title=\"T\">"
    );
}

#[test]
fn escapes_render_as_plain_text() {
    let mut state = State::inline();
    let nodes = default_inline_parse(r"\*not em\*").unwrap();
    let html = default_html_output(&nodes, &mut state).unwrap();
    assert_eq!(html, "*not em*");
}

#[test]
fn indented_code_block_to_html() {
    let html = markdown_to_html("    let x = 1;\n\n").unwrap();
    assert_eq!(html, "<pre><code>let x = 1;</code></pre>");
}

#[test]
fn del_to_html() {
    let mut state = State::inline();
    let nodes = default_inline_parse("~~gone~~").unwrap();
    let html = default_html_output(&nodes, &mut state).unwrap();
    assert_eq!(html, "<del>gone</del>");
}

// -----------------------------------------------------------------------------
// Universal invariants
// -----------------------------------------------------------------------------

fn every_node_has_a_kind(nodes: &[Node]) {
    for node in nodes {
        assert!(!node.kind().is_empty());
        match node {
            Node::Heading { content, .. }
            | Node::Paragraph { content }
            | Node::BlockQuote { content }
            | Node::Em { content }
            | Node::Strong { content }
            | Node::U { content }
            | Node::Del { content }
            | Node::Link { content, .. } => every_node_has_a_kind(content),
            Node::List { items, .. } => items.iter().for_each(|item| every_node_has_a_kind(item)),
            _ => {}
        }
    }
}

#[test]
fn all_nodes_carry_kinds() {
    let source = "# H\n\n- a\n- b\n\n> q\n\npara with *em*, [l](http://e.com) and `c`\n\n";
    let nodes = default_block_parse(source).unwrap();
    every_node_has_a_kind(&nodes);
}

#[test]
fn emphasis_tiebreak_on_equal_length() {
    // equal-length captures: em beats strong beats u
    let em = default_inline_parse("*aa*").unwrap();
    assert_eq!(em[0].kind(), "em");
    let strong = default_inline_parse("**a**").unwrap();
    assert_eq!(strong[0].kind(), "strong");
    let u = default_inline_parse("__a__").unwrap();
    assert_eq!(u[0].kind(), "u");
}

#[test]
fn backpatching_works_in_both_directions() {
    for source in [
        "[x][y]\n\n[y]: http://e.com\n\n",
        "[y]: http://e.com\n\n[x][y]\n\n",
    ] {
        let mut state = State::block();
        let nodes = default_block_parse_with(source, &mut state).unwrap();
        let html = default_html_output(&nodes, &mut state).unwrap();
        assert!(html.contains("href=\"http://e.com\""), "failed for {source:?}");
    }
}

#[test]
fn undefined_refs_render_without_href() {
    let html = markdown_to_html("[x][missing]\n\n").unwrap();
    assert!(html.contains("<a>x</a>"));
}

#[test]
fn ref_keys_are_canonicalized() {
    let html = markdown_to_html("[x][A  B]\n\n[a b]: http://e.com\n\n").unwrap();
    assert!(html.contains("href=\"http://e.com\""));
}

#[test]
fn collapsed_ref_uses_label_as_key() {
    let html = markdown_to_html("[y][]\n\n[y]: http://e.com\n\n").unwrap();
    assert!(html.contains("<a href=\"http://e.com\">y</a>"));
}

#[test]
fn text_runs_are_folded_before_rendering() {
    // escapes produce separate text nodes; folding makes rendering see one
    let mut state = State::inline();
    let nodes = default_inline_parse(r"a\-b\-c").unwrap();
    assert!(nodes.len() > 1);
    let html = default_html_output(&nodes, &mut state).unwrap();
    assert_eq!(html, "a-b-c");
}

#[test]
fn code_spans_escape_their_content() {
    let mut state = State::inline();
    let nodes = default_inline_parse("`<x> & \"y\"`").unwrap();
    let html = default_html_output(&nodes, &mut state).unwrap();
    assert_eq!(html, "<code>&lt;x&gt; &amp; &quot;y&quot;</code>");
}

#[test]
fn mixed_document_round_trips_through_serde() {
    let source = "# H\n\n| a |\n|---|\n| 1 |\n\n- item\n\n";
    let nodes = default_block_parse(source).unwrap();
    let json = serde_json::to_string(&nodes).unwrap();
    let back: Vec<Node> = serde_json::from_str(&json).unwrap();
    assert_eq!(nodes, back);
}
