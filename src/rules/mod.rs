/// The default Markdown grammar as a rule table.
///
/// Rules live in four submodules by concern; [`default_rules`] assembles a
/// fresh table with the `html` output property wired up. Extend a grammar by
/// taking the default table and inserting or replacing entries.
mod block;
mod inline;
mod list;
mod table;

use crate::output::html_array_output;
use crate::parser::Rules;
use regex::Regex;

/// Rule precedence, lowest runs first. `em`, `strong` and `u` share an
/// order and compete through their quality functions.
pub mod order {
    pub const HEADING: f64 = 0.0;
    pub const NPTABLE: f64 = 1.0;
    pub const LHEADING: f64 = 2.0;
    pub const HR: f64 = 3.0;
    pub const CODE_BLOCK: f64 = 4.0;
    pub const FENCE: f64 = 5.0;
    pub const BLOCK_QUOTE: f64 = 6.0;
    pub const LIST: f64 = 7.0;
    pub const DEF: f64 = 8.0;
    pub const TABLE: f64 = 9.0;
    pub const NEWLINE: f64 = 10.0;
    pub const PARAGRAPH: f64 = 11.0;
    pub const ESCAPE: f64 = 12.0;
    pub const TABLE_SEPARATOR: f64 = 13.0;
    pub const AUTOLINK: f64 = 14.0;
    pub const MAILTO: f64 = 15.0;
    pub const URL: f64 = 16.0;
    pub const LINK: f64 = 17.0;
    pub const IMAGE: f64 = 18.0;
    pub const REFLINK: f64 = 19.0;
    pub const REFIMAGE: f64 = 20.0;
    pub const EMPHASIS: f64 = 21.0;
    pub const DEL: f64 = 22.0;
    pub const INLINE_CODE: f64 = 23.0;
    pub const BR: f64 = 24.0;
    pub const TEXT: f64 = 25.0;
}

pub(crate) fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("default rule regex")
}

/// Builds a fresh copy of the default rule set, including the `html` output
/// property and its `Array` joiner.
pub fn default_rules() -> Rules<String> {
    let mut rules = Rules::new();
    block::install(&mut rules);
    list::install(&mut rules);
    table::install(&mut rules);
    inline::install(&mut rules);
    rules.set_array_output("html", html_array_output());
    rules
}
