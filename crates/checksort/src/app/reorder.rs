//! The reorder pass: segment, sort, reassemble, remap the caret.

use tracing::debug;

use crate::app::segment::segment;
use crate::app::sort::sort_block;
use crate::domain::model::{Caret, ReorderOutcome};
use crate::infra::config::SortRules;

/// Run one reorder pass over `text`.
///
/// Pure function of its inputs: no shared state, safe to call from any
/// host callback. Splitting on `'\n'` keeps empty segments, so joining the
/// flattened lines reproduces the input byte for byte when nothing moves.
/// Running the pass on its own output never changes it again.
pub fn reorder(text: &str, caret: Caret, rules: &SortRules) -> ReorderOutcome {
    let lines: Vec<&str> = text.split('\n').collect();
    // An out-of-bounds caret line is clamped before tagging; split always
    // yields at least one line.
    let caret_line = caret.line.min(lines.len() - 1);

    let mut blocks = segment(&lines, caret_line, rules);

    if !blocks.iter().any(|block| block.has_checklists) {
        return unchanged(text, caret);
    }

    for block in &mut blocks {
        sort_block(block, rules);
    }

    // Reassemble in a single pass, capturing the flat index of the one
    // element tagged with the caret.
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut caret_out = caret.line;
    for block in &blocks {
        for node in &block.nodes {
            if node.has_caret {
                caret_out = out.len();
            }
            out.push(node.text.as_str());
            for sub in &node.sub_lines {
                if sub.has_caret {
                    caret_out = out.len();
                }
                out.push(sub.text.as_str());
            }
        }
    }

    let new_text = out.join("\n");
    if new_text == text {
        return unchanged(text, caret);
    }

    debug!(
        old_caret = caret.line,
        new_caret = caret_out,
        "checklist blocks reordered"
    );
    ReorderOutcome {
        changed: true,
        text: new_text,
        caret: Caret::new(caret_out, caret.ch),
    }
}

fn unchanged(text: &str, caret: Caret) -> ReorderOutcome {
    ReorderOutcome {
        changed: false,
        text: text.to_owned(),
        caret,
    }
}
