// Core modules
pub mod ast;
pub mod capture;
pub mod error;
pub mod html;
pub mod matchers;
pub mod output;
pub mod parser;
pub mod rules;
pub mod sanitize;
pub mod state;

// Re-export key types for the public API
pub use ast::{Align, CustomNode, Node};
pub use capture::Capture;
pub use error::{EngineError, Result};
pub use html::html_tag;
pub use matchers::{
    any_scope_custom, any_scope_regex, block_custom, block_regex, custom, inline_custom,
    inline_regex, MatchFn, Matcher,
};
pub use output::{
    fold_text_nodes, html_array_output, keyed_array_output, output_for, ArrayFn, OutputFn,
    Render, Renderer,
};
pub use parser::{
    ignore_capture, parse_block, parse_capture_inline, parse_inline, parse_ref, parser_for,
    reference_key, Nested, Parsed, ParseFn, Parser, QualityFn, Rule, Rules,
};
pub use rules::default_rules;
pub use sanitize::{preprocess, sanitize_text, sanitize_url, unescape_url};
pub use state::{RefDef, State};

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static BLOCK_TERMINATED_R: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}$").expect("block end regex"));

/// Parses a source string in block scope with the default rule set.
pub fn default_block_parse(source: &str) -> Result<Vec<Node>> {
    let mut state = State::block();
    default_block_parse_with(source, &mut state)
}

/// Block-scope parse threading a caller-owned state, so reference
/// definitions and client fields survive into a later render.
pub fn default_block_parse_with(source: &str, state: &mut State) -> Result<Vec<Node>> {
    state.inline = false;
    let rules = default_rules();
    parser_for(&rules, State::block()).parse_with(source, state)
}

/// Parses a source string in inline scope with the default rule set.
pub fn default_inline_parse(source: &str) -> Result<Vec<Node>> {
    let mut state = State::inline();
    default_inline_parse_with(source, &mut state)
}

/// Inline-scope parse threading a caller-owned state.
pub fn default_inline_parse_with(source: &str, state: &mut State) -> Result<Vec<Node>> {
    state.inline = true;
    let rules = default_rules();
    parser_for(&rules, State::inline()).parse_with(source, state)
}

/// Picks the scope from the source: block when it ends with a blank line,
/// inline otherwise.
pub fn default_implicit_parse(source: &str) -> Result<Vec<Node>> {
    let mut state = State::block();
    default_implicit_parse_with(source, &mut state)
}

/// Implicit-scope parse threading a caller-owned state.
pub fn default_implicit_parse_with(source: &str, state: &mut State) -> Result<Vec<Node>> {
    state.inline = !BLOCK_TERMINATED_R.is_match(source);
    let rules = default_rules();
    parser_for(&rules, State::block()).parse_with(source, state)
}

/// Renders a parsed AST to HTML with the default rule set. Pass the state
/// from the parse so reference patches and client fields carry over.
pub fn default_html_output(nodes: &[Node], state: &mut State) -> Result<String> {
    let rules = default_rules();
    let renderer = output_for(&rules, "html")?;
    renderer.render(nodes, state)
}

/// Converts a Markdown string to an HTML string.
///
/// This is the main convenience entry point: a block-scope parse with the
/// default rule set followed by the default HTML render, sharing one state.
///
/// # Examples
///
/// ```
/// let html = runemark::markdown_to_html("# Hello\n\n").unwrap();
/// assert_eq!(html, "<h1>Hello</h1>");
/// ```
pub fn markdown_to_html(source: &str) -> Result<String> {
    let rules = default_rules();
    let parser = parser_for(&rules, State::block());
    let mut state = State::block();
    let nodes = parser.parse_with(source, &mut state)?;
    let renderer = output_for(&rules, "html")?;
    renderer.render(&nodes, &mut state)
}

/// Legacy entry point kept for callers of the old API surface.
#[deprecated(note = "use default_implicit_parse")]
pub fn default_parse(source: &str) -> Result<Vec<Node>> {
    warn!("default_parse is deprecated; use default_implicit_parse");
    default_implicit_parse(source)
}

/// Legacy entry point kept for callers of the old API surface.
#[deprecated(note = "use default_html_output")]
pub fn default_output(nodes: &[Node], state: &mut State) -> Result<String> {
    warn!("default_output is deprecated; use default_html_output");
    default_html_output(nodes, state)
}
