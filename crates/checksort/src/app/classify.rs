//! Line classification against the configured status prefixes.

/// Membership classes of a single raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClass {
    /// The untrimmed line starts with a status prefix.
    pub root: bool,
    /// The trimmed line starts with a status prefix, so indented sub-items
    /// count as checklist lines too.
    pub anywhere: bool,
}

impl LineClass {
    /// A sub-item is a checklist line that is not a root item.
    pub fn is_sub_item(&self) -> bool {
        self.anywhere && !self.root
    }
}

/// Classify one raw line against the membership prefixes, table order,
/// first match wins.
pub fn classify(line: &str, statuses: &[String]) -> LineClass {
    LineClass {
        root: starts_with_any(line, statuses),
        anywhere: starts_with_any(line.trim(), statuses),
    }
}

fn starts_with_any(line: &str, prefixes: &[String]) -> bool {
    prefixes
        .iter()
        .filter(|prefix| is_valid_matcher(prefix))
        .any(|prefix| line.starts_with(prefix.as_str()))
}

/// Empty or whitespace-only entries come from malformed comma-split config
/// input and must never match every line.
pub fn is_valid_matcher(entry: &str) -> bool {
    !entry.trim().is_empty()
}
