//! Two-key stable sorting of checklist blocks.

use crate::app::classify::is_valid_matcher;
use crate::domain::model::Block;
use crate::infra::config::SortRules;

/// Sort key 1: `1 + index` of the first `sorted_statuses` entry the line
/// starts with, else 0. Compared ascending, so unmatched statuses sort to
/// the front.
pub fn status_rank(line: &str, sorted_statuses: &[String]) -> usize {
    first_match(line, sorted_statuses, MatchMode::Prefix).map_or(0, |index| index + 1)
}

/// Sort key 2: `len - (1 + index)` of the first `sorted_substrings` entry
/// found anywhere in the line, else 0. Earlier table entries yield a
/// larger rank; the comparator puts larger ranks first within a status
/// group, so table order is priority order.
pub fn priority_rank(line: &str, sorted_substrings: &[String]) -> usize {
    first_match(line, sorted_substrings, MatchMode::Anywhere)
        .map_or(0, |index| sorted_substrings.len() - (index + 1))
}

#[derive(Clone, Copy)]
enum MatchMode {
    Prefix,
    Anywhere,
}

fn first_match(line: &str, table: &[String], mode: MatchMode) -> Option<usize> {
    table.iter().enumerate().find_map(|(index, entry)| {
        if !is_valid_matcher(entry) {
            return None;
        }
        let hit = match mode {
            MatchMode::Prefix => line.starts_with(entry.as_str()),
            MatchMode::Anywhere => line.contains(entry.as_str()),
        };
        hit.then_some(index)
    })
}

/// Reorder the block's root nodes by (status rank asc, priority rank desc),
/// stable, leaving non-checklist and ignored blocks untouched. Sub-lines
/// never participate; they travel with their parent.
pub fn sort_block(block: &mut Block, rules: &SortRules) {
    if !block.has_checklists || block.ignored {
        return;
    }

    for node in &mut block.nodes {
        node.status_rank = status_rank(&node.text, &rules.sorted_statuses);
        node.priority_rank = priority_rank(&node.text, &rules.sorted_substrings);
    }

    // sort_by is stable: equal keys keep their source order.
    block.nodes.sort_by(|a, b| {
        a.status_rank
            .cmp(&b.status_rank)
            .then(b.priority_rank.cmp(&a.priority_rank))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::segment::{flatten, segment};

    fn rules() -> SortRules {
        SortRules::default()
    }

    fn sorted_lines(text: &str) -> Vec<String> {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut blocks = segment(&lines, 0, &rules());
        for block in &mut blocks {
            sort_block(block, &rules());
        }
        flatten(&blocks).into_iter().map(str::to_owned).collect()
    }

    #[test]
    fn unmatched_statuses_sort_before_matched_ones() {
        // `sorted_statuses` defaults to ["- [x]", "- [-]"]; open items are
        // unmatched (rank 0) and stay on top.
        let out = sorted_lines("- [x] done\n- [ ] open\n- [-] dropped");
        assert_eq!(out, vec!["- [ ] open", "- [x] done", "- [-] dropped"]);
    }

    #[test]
    fn ties_keep_source_order() {
        let out = sorted_lines("- [ ] a\n- [x] b\n- [ ] c");
        assert_eq!(out, vec!["- [ ] a", "- [ ] c", "- [x] b"]);
    }

    #[test]
    fn earlier_priority_markers_sort_first_within_a_status_group() {
        let out = sorted_lines("- [ ] low 🔽\n- [ ] high 🔺");
        assert_eq!(out, vec!["- [ ] high 🔺", "- [ ] low 🔽"]);
    }

    #[test]
    fn priority_rank_uses_inverted_table_arithmetic() {
        let table: Vec<String> = vec!["🔺".into(), "⏫".into(), "🔽".into(), "⏬".into()];
        assert_eq!(priority_rank("x 🔺", &table), 3);
        assert_eq!(priority_rank("x ⏫", &table), 2);
        assert_eq!(priority_rank("x 🔽", &table), 1);
        assert_eq!(priority_rank("x ⏬", &table), 0);
        assert_eq!(priority_rank("x", &table), 0);
    }

    #[test]
    fn status_rank_is_one_based_table_position() {
        let table: Vec<String> = vec!["- [x]".into(), "- [-]".into()];
        assert_eq!(status_rank("- [x] done", &table), 1);
        assert_eq!(status_rank("- [-] dropped", &table), 2);
        assert_eq!(status_rank("- [ ] open", &table), 0);
    }

    #[test]
    fn ignored_blocks_are_left_untouched() {
        let out = sorted_lines("#donotsort\n- [x] done\n- [ ] open");
        assert_eq!(out, vec!["#donotsort", "- [x] done", "- [ ] open"]);
    }

    #[test]
    fn empty_sorted_status_entries_are_skipped_but_keep_table_positions() {
        let table: Vec<String> = vec![String::new(), "- [x]".into()];
        assert_eq!(status_rank("- [x] done", &table), 2);
        assert_eq!(status_rank("- [ ] open", &table), 0);
    }
}
