//! Domain models for carets, line nodes, blocks, and reorder results.

/// Caret position as reported by the host editor: zero-based line, plus a
/// column that the engine passes through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caret {
    pub line: usize,
    pub ch: usize,
}

impl Caret {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// One root-level line during a reorder pass, together with the sub-items
/// attached to it. Built fresh per invocation, discarded after reassembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNode {
    pub text: String,
    /// Child items in source order. They travel with their parent and are
    /// never reordered among themselves.
    pub sub_lines: Vec<LineNode>,
    pub has_caret: bool,
    pub status_rank: usize,
    pub priority_rank: usize,
}

impl LineNode {
    pub fn new(text: impl Into<String>, has_caret: bool) -> Self {
        Self {
            text: text.into(),
            sub_lines: Vec::new(),
            has_caret,
            status_rank: 0,
            priority_rank: 0,
        }
    }
}

/// A maximal contiguous run of lines sharing the same checklist-membership
/// class. Sorting permutes `nodes` only; sub-lines stay inside their node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub nodes: Vec<LineNode>,
    /// True iff at least one root checklist item was recorded in this block.
    pub has_checklists: bool,
    /// True iff an ignore marker was observed since the previous checklist
    /// block closed; such a block is exempt from sorting.
    pub ignored: bool,
}

/// Result of one reorder pass. When `changed` is false the caller must not
/// touch buffer or caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderOutcome {
    pub changed: bool,
    pub text: String,
    pub caret: Caret,
}
