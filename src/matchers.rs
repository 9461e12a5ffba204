/// Match adapters: the glue between rules and the source prefix.
///
/// A matcher probes the front of the remaining source and yields a
/// [`Capture`] or declines. Regex-backed matchers are scoped to inline-only,
/// block-only, or any scope, and expose their regex for introspection.
/// Grammar that a regex cannot express is wrapped as a custom matcher with
/// the same interface.
use crate::capture::Capture;
use crate::state::State;
use regex::Regex;

/// Signature shared by every matcher: `(source, state, prev_capture_text)`.
pub type MatchFn = Box<dyn Fn(&str, &State, &str) -> Option<Capture> + Send + Sync>;

pub enum Matcher {
    /// Regex applied only in inline scope.
    Inline(Regex),
    /// Regex applied only in block scope.
    Block(Regex),
    /// Regex applied in either scope.
    AnyScope(Regex),
    /// A hand-written matcher; scoping is its own business.
    Custom(MatchFn),
}

impl Matcher {
    /// Probes the source prefix, honoring the scope carried by the adapter.
    pub fn probe(&self, source: &str, state: &State, prev_capture_text: &str) -> Option<Capture> {
        match self {
            Matcher::Inline(regex) => {
                if state.inline {
                    capture_with(regex, source)
                } else {
                    None
                }
            }
            Matcher::Block(regex) => {
                if state.inline {
                    None
                } else {
                    capture_with(regex, source)
                }
            }
            Matcher::AnyScope(regex) => capture_with(regex, source),
            Matcher::Custom(matcher) => matcher(source, state, prev_capture_text),
        }
    }

    /// The underlying regex, for inspection. Custom matchers have none.
    pub fn regex(&self) -> Option<&Regex> {
        match self {
            Matcher::Inline(regex) | Matcher::Block(regex) | Matcher::AnyScope(regex) => Some(regex),
            Matcher::Custom(_) => None,
        }
    }
}

fn capture_with(regex: &Regex, source: &str) -> Option<Capture> {
    regex.captures(source).map(|c| Capture::from_regex(&c))
}

/// Wraps a regex into a matcher active only in inline scope.
pub fn inline_regex(regex: Regex) -> Matcher {
    Matcher::Inline(regex)
}

/// Wraps a regex into a matcher active only in block scope.
pub fn block_regex(regex: Regex) -> Matcher {
    Matcher::Block(regex)
}

/// Wraps a regex into a matcher active in either scope.
pub fn any_scope_regex(regex: Regex) -> Matcher {
    Matcher::AnyScope(regex)
}

/// A custom matcher with the full `(source, state, prev_capture_text)`
/// signature.
pub fn custom(
    matcher: impl Fn(&str, &State, &str) -> Option<Capture> + Send + Sync + 'static,
) -> Matcher {
    Matcher::Custom(Box::new(matcher))
}

/// A source-only custom matcher active in inline scope.
pub fn inline_custom(
    matcher: impl Fn(&str) -> Option<Capture> + Send + Sync + 'static,
) -> Matcher {
    Matcher::Custom(Box::new(move |source, state, _| {
        if state.inline {
            matcher(source)
        } else {
            None
        }
    }))
}

/// A source-only custom matcher active in block scope.
pub fn block_custom(
    matcher: impl Fn(&str) -> Option<Capture> + Send + Sync + 'static,
) -> Matcher {
    Matcher::Custom(Box::new(move |source, state, _| {
        if state.inline {
            None
        } else {
            matcher(source)
        }
    }))
}

/// A source-only custom matcher active in either scope.
pub fn any_scope_custom(
    matcher: impl Fn(&str) -> Option<Capture> + Send + Sync + 'static,
) -> Matcher {
    Matcher::Custom(Box::new(move |source, _, _| matcher(source)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_adapter_scoping() {
        let matcher = inline_regex(Regex::new(r"^\*").unwrap());
        assert!(matcher.probe("*em*", &State::inline(), "").is_some());
        assert!(matcher.probe("*em*", &State::block(), "").is_none());
    }

    #[test]
    fn test_block_adapter_scoping() {
        let matcher = block_regex(Regex::new(r"^#").unwrap());
        assert!(matcher.probe("# hi", &State::block(), "").is_some());
        assert!(matcher.probe("# hi", &State::inline(), "").is_none());
    }

    #[test]
    fn test_any_scope_adapter() {
        let matcher = any_scope_regex(Regex::new(r"^ {2,}\n").unwrap());
        assert!(matcher.probe("  \nrest", &State::inline(), "").is_some());
        assert!(matcher.probe("  \nrest", &State::block(), "").is_some());
    }

    #[test]
    fn test_regex_introspection() {
        let matcher = inline_regex(Regex::new(r"^abc").unwrap());
        assert_eq!(matcher.regex().unwrap().as_str(), "^abc");
        let hand_written = any_scope_custom(|_| None);
        assert!(hand_written.regex().is_none());
    }
}
