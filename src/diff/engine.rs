use similar::{capture_diff_slices, Algorithm, DiffOp};

use crate::highlight::{Highlight, Markup};

use super::model::{
    AlignmentPoint, BlockKind, ChangeBlock, DiffAlgorithm, DiffModel, DiffStats, Line, LineKind,
};

/// Default cap on the LCS table, in cells. 25M `u32` cells is 100 MB.
pub const DEFAULT_MAX_TABLE_CELLS: usize = 25_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Largest `(m+1)·(n+1)` the LCS table may reach before the engine trims
    /// common prefix/suffix and, if still too large, switches to Myers.
    pub max_table_cells: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            max_table_cells: DEFAULT_MAX_TABLE_CELLS,
        }
    }
}

/// One step of the edit script. Indices point into the original / modified
/// line arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal(usize, usize),
    Delete(usize),
    Insert(usize),
}

/// Split a document on `\n`. Lines keep every other byte, including a
/// trailing `\r`, so a line-ending change is a real change. A final newline
/// leaves an empty last line; the empty document has no lines.
pub fn split_lines(content: &str) -> Vec<&str> {
    if content.is_empty() {
        return Vec::new();
    }
    content.split('\n').collect()
}

/// Compute the full diff model for two documents.
pub fn compute_diff(
    original: &str,
    modified: &str,
    grammar: &str,
    highlighter: &dyn Highlight,
    options: &DiffOptions,
) -> DiffModel {
    let a = split_lines(original);
    let b = split_lines(modified);

    let (ops, algorithm) = edit_script(&a, &b, options);

    let left_markup = highlighter.highlight_document(&a, grammar);
    let right_markup = highlighter.highlight_document(&b, grammar);

    let model = build_model(&a, &b, &ops, &left_markup, &right_markup, algorithm);
    tracing::debug!(
        left = model.left_lines.len(),
        right = model.right_lines.len(),
        blocks = model.blocks.len(),
        algorithm = algorithm.label(),
        "diff computed"
    );
    model
}

fn table_cells(m: usize, n: usize) -> usize {
    (m + 1).saturating_mul(n + 1)
}

fn edit_script(a: &[&str], b: &[&str], options: &DiffOptions) -> (Vec<Op>, DiffAlgorithm) {
    if table_cells(a.len(), b.len()) <= options.max_table_cells {
        return (lcs_ops(a, b), DiffAlgorithm::Lcs);
    }

    // Too large for a full table: peel off the shared prefix and suffix,
    // which can only ever be matched lines, and diff the core.
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let core_a = &a[prefix..a.len() - suffix];
    let core_b = &b[prefix..b.len() - suffix];

    let (core_ops, algorithm) =
        if table_cells(core_a.len(), core_b.len()) <= options.max_table_cells {
            (lcs_ops(core_a, core_b), DiffAlgorithm::Lcs)
        } else {
            tracing::info!(
                left = a.len(),
                right = b.len(),
                cap = options.max_table_cells,
                "input exceeds LCS table cap, using Myers"
            );
            (myers_ops(core_a, core_b), DiffAlgorithm::Myers)
        };

    let mut ops = Vec::with_capacity(prefix + core_ops.len() + suffix);
    ops.extend((0..prefix).map(|i| Op::Equal(i, i)));
    ops.extend(core_ops.into_iter().map(|op| match op {
        Op::Equal(i, j) => Op::Equal(i + prefix, j + prefix),
        Op::Delete(i) => Op::Delete(i + prefix),
        Op::Insert(j) => Op::Insert(j + prefix),
    }));
    let a_tail = a.len() - suffix;
    let b_tail = b.len() - suffix;
    ops.extend((0..suffix).map(|k| Op::Equal(a_tail + k, b_tail + k)));
    (ops, algorithm)
}

/// Classic O(m·n) LCS table followed by a backtrack.
///
/// When the two neighbours tie, the backtrack takes the insertion first.
/// Because the op list is reversed afterwards, a block's deletions always
/// come out before its insertions.
fn lcs_ops(a: &[&str], b: &[&str]) -> Vec<Op> {
    let (m, n) = (a.len(), b.len());
    let width = n + 1;
    let mut dp = vec![0u32; (m + 1) * width];

    for i in 1..=m {
        for j in 1..=n {
            dp[i * width + j] = if a[i - 1] == b[j - 1] {
                dp[(i - 1) * width + (j - 1)] + 1
            } else {
                dp[(i - 1) * width + j].max(dp[i * width + (j - 1)])
            };
        }
    }

    let mut ops = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
            ops.push(Op::Equal(i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i * width + (j - 1)] >= dp[(i - 1) * width + j]) {
            ops.push(Op::Insert(j - 1));
            j -= 1;
        } else {
            ops.push(Op::Delete(i - 1));
            i -= 1;
        }
    }
    ops.reverse();
    ops
}

/// Linear-space edit script from `similar`. Replacements are emitted as
/// deletions followed by insertions, matching the LCS ordering.
fn myers_ops(a: &[&str], b: &[&str]) -> Vec<Op> {
    let mut ops = Vec::with_capacity(a.len() + b.len());
    for op in capture_diff_slices(Algorithm::Myers, a, b) {
        match op {
            DiffOp::Equal {
                old_index,
                new_index,
                len,
            } => ops.extend((0..len).map(|k| Op::Equal(old_index + k, new_index + k))),
            DiffOp::Delete {
                old_index, old_len, ..
            } => ops.extend((old_index..old_index + old_len).map(Op::Delete)),
            DiffOp::Insert {
                new_index, new_len, ..
            } => ops.extend((new_index..new_index + new_len).map(Op::Insert)),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                ops.extend((old_index..old_index + old_len).map(Op::Delete));
                ops.extend((new_index..new_index + new_len).map(Op::Insert));
            }
        }
    }
    ops
}

/// Change block being accumulated between two unchanged lines.
#[derive(Debug, Clone, Copy)]
struct PendingBlock {
    left_start: usize,
    left_count: usize,
    right_start: usize,
    right_count: usize,
}

impl PendingBlock {
    fn into_block(self) -> ChangeBlock {
        let kind = match (self.left_count > 0, self.right_count > 0) {
            (true, true) => BlockKind::Modified,
            (true, false) => BlockKind::Removed,
            _ => BlockKind::Added,
        };
        ChangeBlock {
            left_start: self.left_start,
            left_count: self.left_count,
            right_start: self.right_start,
            right_count: self.right_count,
            kind,
        }
    }
}

fn make_line(lines: &[&str], markup: &[Markup], idx: usize, kind: LineKind) -> Line {
    let text = lines[idx];
    Line {
        num: idx + 1,
        text: text.to_string(),
        markup: markup
            .get(idx)
            .cloned()
            .unwrap_or_else(|| Markup::plain(text)),
        kind,
    }
}

fn build_model(
    a: &[&str],
    b: &[&str],
    ops: &[Op],
    left_markup: &[Markup],
    right_markup: &[Markup],
    algorithm: DiffAlgorithm,
) -> DiffModel {
    let mut left_lines = Vec::with_capacity(a.len());
    let mut right_lines = Vec::with_capacity(b.len());
    let mut alignment = vec![AlignmentPoint::new(0, 0)];
    let mut blocks = Vec::new();
    let mut pending: Option<PendingBlock> = None;
    let mut stats = DiffStats::default();

    for op in ops {
        match *op {
            Op::Equal(i, j) => {
                if let Some(block) = pending.take() {
                    blocks.push(block.into_block());
                }
                left_lines.push(make_line(a, left_markup, i, LineKind::Unchanged));
                right_lines.push(make_line(b, right_markup, j, LineKind::Unchanged));
                alignment.push(AlignmentPoint::new(left_lines.len(), right_lines.len()));
                stats.unchanged += 1;
            }
            Op::Delete(i) => {
                let block = pending.get_or_insert(PendingBlock {
                    left_start: left_lines.len(),
                    left_count: 0,
                    right_start: right_lines.len(),
                    right_count: 0,
                });
                block.left_count += 1;
                left_lines.push(make_line(a, left_markup, i, LineKind::Removed));
                stats.removed += 1;
            }
            Op::Insert(j) => {
                let block = pending.get_or_insert(PendingBlock {
                    left_start: left_lines.len(),
                    left_count: 0,
                    right_start: right_lines.len(),
                    right_count: 0,
                });
                block.right_count += 1;
                right_lines.push(make_line(b, right_markup, j, LineKind::Added));
                stats.added += 1;
            }
        }
    }
    if let Some(block) = pending.take() {
        blocks.push(block.into_block());
    }

    let end = AlignmentPoint::new(left_lines.len(), right_lines.len());
    if alignment.last() != Some(&end) {
        alignment.push(end);
    }

    DiffModel {
        left_lines,
        right_lines,
        alignment,
        blocks,
        stats,
        algorithm,
    }
}
