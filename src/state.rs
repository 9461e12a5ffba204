use crate::capture::Capture;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A reference definition collected by the `def` rule, keyed by its
/// canonical reference key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefDef {
    pub target: String,
    pub title: Option<String>,
}

/// Mutable record threaded through every nested parse and output call of a
/// single invocation.
///
/// Scope fields (`inline`, `in_table`, `in_list`, `key`) are mutated in
/// place as parsing descends; every site that flips one must restore the
/// previous value before returning. A state instance must never be shared
/// between concurrent invocations.
#[derive(Clone, Default)]
pub struct State {
    /// Current scope; inline rules match only when true, block rules only
    /// when false.
    pub inline: bool,
    /// Suppresses the automatic `"\n\n"` suffix of top-level block parses.
    pub disable_auto_block_newlines: bool,
    /// True while parsing table rows; enables the `tableSeparator` rule.
    pub in_table: bool,
    /// True inside a list item body; re-enables the `list` rule under
    /// inline scope.
    pub in_list: bool,
    /// The most recent successful capture, for limited lookbehind.
    pub prev_capture: Option<Capture>,
    /// Reference definitions accumulated so far.
    pub defs: HashMap<String, RefDef>,
    /// Stable sibling index for tree outputs that need identity.
    pub key: String,
    /// Client fields, passed through untouched.
    pub extra: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl State {
    /// A fresh state in block scope.
    pub fn block() -> Self {
        State::default()
    }

    /// A fresh state in inline scope.
    pub fn inline() -> Self {
        State {
            inline: true,
            ..State::default()
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("inline", &self.inline)
            .field("disable_auto_block_newlines", &self.disable_auto_block_newlines)
            .field("in_table", &self.in_table)
            .field("in_list", &self.in_list)
            .field("prev_capture", &self.prev_capture)
            .field("defs", &self.defs)
            .field("key", &self.key)
            .field("extra_keys", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_constructors() {
        assert!(!State::block().inline);
        assert!(State::inline().inline);
    }

    #[test]
    fn test_extra_fields_pass_through_clone() {
        let mut state = State::block();
        state
            .extra
            .insert("theme".to_string(), Arc::new("dark".to_string()));
        let copy = state.clone();
        let theme = copy.extra["theme"].downcast_ref::<String>().unwrap();
        assert_eq!(theme, "dark");
    }
}
