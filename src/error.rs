/// Error handling for the rule-table engine.
///
/// This module defines the error type shared by the parser and output
/// dispatchers. A parse either completes or fails with one of these; no
/// recovery is attempted mid-parse.
use std::fmt;

/// Main error type for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The dispatcher found no rule matching a non-empty source prefix.
    ///
    /// The named rule is the lowest-precedence entry of the table, which is
    /// contractually the universal fallback; a table whose fallback can
    /// decline input is misconfigured.
    NoMatchingRule { fallback: String, remaining: String },

    /// A selected capture did not begin at the start of the probed source.
    UnanchoredMatch { rule: String },

    /// An output property was requested with no `Array` joiner registered
    /// for it.
    MissingArrayJoiner { property: String },

    /// A node reached the output dispatcher without an output function for
    /// the requested property.
    MissingOutputRule { kind: String, property: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NoMatchingRule { fallback, remaining } => {
                write!(
                    f,
                    "could not find a matching rule; the lowest-precedence rule {:?} \
                     declined the remaining source: {:?}",
                    fallback, remaining
                )
            }
            EngineError::UnanchoredMatch { rule } => {
                write!(
                    f,
                    "rule {:?} returned a capture that does not start at the current \
                     position; match regexes must be anchored with `^`",
                    rule
                )
            }
            EngineError::MissingArrayJoiner { property } => {
                write!(f, "no Array joiner registered for output property {:?}", property)
            }
            EngineError::MissingOutputRule { kind, property } => {
                write!(f, "no {:?} output function for node type {:?}", property, kind)
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Convenience type alias for Results in the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
