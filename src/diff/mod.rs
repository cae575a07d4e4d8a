mod cache;
mod engine;
pub mod model;

pub use cache::DiffCache;
pub use engine::{compute_diff, split_lines, DiffOptions, DEFAULT_MAX_TABLE_CELLS};
pub use model::{
    AlignmentPoint, BlockKind, ChangeBlock, DiffAlgorithm, DiffModel, DiffStats, Line, LineKind,
};
