use crate::highlight::Markup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Unchanged,
    Added,
    Removed,
}

/// One line of either pane. `num` is the 1-based line number in the
/// document the line came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub num: usize,
    pub text: String,
    pub markup: Markup,
    pub kind: LineKind,
}

/// Pairs a position in `left_lines` with the equivalent position in
/// `right_lines`. Points sit right after each unchanged line and at the two
/// document boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentPoint {
    pub left_index: usize,
    pub right_index: usize,
}

impl AlignmentPoint {
    pub const fn new(left_index: usize, right_index: usize) -> Self {
        Self {
            left_index,
            right_index,
        }
    }

    /// Coordinate on the requested side.
    pub fn coord(&self, left: bool) -> usize {
        if left {
            self.left_index
        } else {
            self.right_index
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Modified,
    Added,
    Removed,
}

/// A maximal run of non-unchanged lines, with its extent on both sides.
/// A side with zero count still carries the index where the run would sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeBlock {
    pub left_start: usize,
    pub left_count: usize,
    pub right_start: usize,
    pub right_count: usize,
    pub kind: BlockKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

/// Which edit-script algorithm produced a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffAlgorithm {
    Lcs,
    /// Linear-space fallback used when the DP table would exceed the cap.
    Myers,
}

impl DiffAlgorithm {
    pub fn label(&self) -> &'static str {
        match self {
            DiffAlgorithm::Lcs => "lcs",
            DiffAlgorithm::Myers => "myers",
        }
    }
}

/// Everything derived from one `(original, modified, language)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffModel {
    pub left_lines: Vec<Line>,
    pub right_lines: Vec<Line>,
    pub alignment: Vec<AlignmentPoint>,
    pub blocks: Vec<ChangeBlock>,
    pub stats: DiffStats,
    pub algorithm: DiffAlgorithm,
}

impl DiffModel {
    pub fn is_identical(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Lines of one side.
    pub fn lines(&self, left: bool) -> &[Line] {
        if left {
            &self.left_lines
        } else {
            &self.right_lines
        }
    }
}
