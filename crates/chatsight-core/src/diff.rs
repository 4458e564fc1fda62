//! Line-level diff between two text blobs
//!
//! Edit blocks come from `similar`'s Myers implementation over the split
//! lines; this module only assigns the display classification and the two
//! line counters.

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffTag};

use crate::types::{DiffKind, DiffLine};

/// Per-kind line totals for a computed diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffStats {
    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

/// Split text into lines, dropping the single empty entry a trailing newline
/// would produce. Interior empty lines are kept.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

/// Compute a classified line diff from `old` to `new`.
///
/// `line` tracks the position in the new text and is not advanced by removed
/// lines; `original_line` tracks the old text and is absent for added lines.
pub fn compute_diff(old: &str, new: &str) -> Vec<DiffLine> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let ops = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines);

    let mut diff = Vec::with_capacity(old_lines.len().max(new_lines.len()));
    let mut old_line_num = 1;
    let mut new_line_num = 1;

    for op in &ops {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                for content in &new_lines[new_range] {
                    diff.push(DiffLine {
                        kind: DiffKind::Unchanged,
                        line: new_line_num,
                        original_line: Some(old_line_num),
                        content: content.to_string(),
                    });
                    new_line_num += 1;
                    old_line_num += 1;
                }
            }
            DiffTag::Delete | DiffTag::Insert | DiffTag::Replace => {
                // Removals of a replaced block come before its additions
                for content in &old_lines[old_range] {
                    diff.push(DiffLine {
                        kind: DiffKind::Removed,
                        line: new_line_num,
                        original_line: Some(old_line_num),
                        content: content.to_string(),
                    });
                    old_line_num += 1;
                }
                for content in &new_lines[new_range] {
                    diff.push(DiffLine {
                        kind: DiffKind::Added,
                        line: new_line_num,
                        original_line: None,
                        content: content.to_string(),
                    });
                    new_line_num += 1;
                }
            }
        }
    }

    diff
}

/// Count lines per classification
pub fn diff_stats(diff: &[DiffLine]) -> DiffStats {
    diff.iter().fold(DiffStats::default(), |mut stats, line| {
        match line.kind {
            DiffKind::Added => stats.added += 1,
            DiffKind::Removed => stats.removed += 1,
            DiffKind::Unchanged => stats.unchanged += 1,
        }
        stats
    })
}
