//! Grouping raw lines into contiguous blocks of checklist vs. plain text.

use crate::app::classify::{classify, is_valid_matcher};
use crate::domain::model::{Block, LineNode};
use crate::infra::config::SortRules;

/// Partition `lines` into blocks, attaching each sub-item to the nearest
/// preceding root item within its block and tagging the line that holds
/// the caret.
///
/// Block boundaries fall where checklist membership (of the trimmed line)
/// flips between one line and the next, and at end of input. An ignore
/// marker anywhere since the previous checklist block closed marks the
/// next checklist block as exempt from sorting.
///
/// A sub-item with no preceding root item in its block is dropped from the
/// output entirely. This is long-standing, deliberate behavior; see the
/// `sub_item_without_root_is_dropped` test.
pub fn segment(lines: &[&str], caret_line: usize, rules: &SortRules) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut nodes: Vec<LineNode> = Vec::new();
    let mut last_root: Option<usize> = None;
    let mut ignore_pending = false;

    for (i, &line) in lines.iter().enumerate() {
        let class = classify(line, &rules.statuses);
        let has_caret = i == caret_line;

        if !ignore_pending && has_ignore_marker(line, &rules.ignore_substrings) {
            ignore_pending = true;
        }

        if class.is_sub_item() {
            if let Some(root) = last_root {
                nodes[root].sub_lines.push(LineNode::new(line, has_caret));
            }
        } else {
            nodes.push(LineNode::new(line, has_caret));
            if class.root {
                last_root = Some(nodes.len() - 1);
            }
        }

        let at_boundary = match lines.get(i + 1) {
            None => true,
            Some(next) => classify(next, &rules.statuses).anywhere != class.anywhere,
        };

        if at_boundary {
            let has_checklists = last_root.is_some();
            // The carried ignore flag belongs to the next checklist block
            // and survives intervening plain blocks.
            let ignored = if has_checklists {
                std::mem::take(&mut ignore_pending)
            } else {
                false
            };
            blocks.push(Block {
                nodes: std::mem::take(&mut nodes),
                has_checklists,
                ignored,
            });
            last_root = None;
        }
    }

    blocks
}

fn has_ignore_marker(line: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .filter(|marker| is_valid_matcher(marker))
        .any(|marker| line.contains(marker.as_str()))
}

/// Flatten blocks back into their line sequence, in block order, each node
/// followed by its sub-lines.
pub fn flatten(blocks: &[Block]) -> Vec<&str> {
    let mut out = Vec::new();
    for block in blocks {
        for node in &block.nodes {
            out.push(node.text.as_str());
            for sub in &node.sub_lines {
                out.push(sub.text.as_str());
            }
        }
    }
    out
}
