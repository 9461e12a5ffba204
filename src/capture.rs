/// The positional result of probing a source prefix.
///
/// Index 0 is the full matched text; higher indices are subgroup captures.
/// Captures come either from a scoped regex adapter or from a hand-written
/// matcher, and the dispatcher requires them to begin at offset 0 of the
/// probed source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capture {
    start: usize,
    groups: Vec<Option<String>>,
}

impl Capture {
    /// Builds a capture from a regex match, preserving the match offset so
    /// the dispatcher can reject unanchored patterns.
    pub fn from_regex(captures: &regex::Captures<'_>) -> Self {
        let start = captures.get(0).map(|m| m.start()).unwrap_or(0);
        let groups = captures
            .iter()
            .map(|group| group.map(|m| m.as_str().to_owned()))
            .collect();
        Capture { start, groups }
    }

    /// Builds a capture directly from owned groups. Hand-written matchers
    /// always produce anchored captures, so the offset is 0.
    pub fn from_groups(groups: Vec<Option<String>>) -> Self {
        Capture { start: 0, groups }
    }

    /// Offset of the match within the probed source.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The full matched text.
    pub fn full(&self) -> &str {
        self.text(0)
    }

    /// The capture group at `index`, if it participated in the match.
    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|g| g.as_deref())
    }

    /// The capture group at `index`, or the empty string when absent.
    pub fn text(&self, index: usize) -> &str {
        self.group(index).unwrap_or("")
    }
}
