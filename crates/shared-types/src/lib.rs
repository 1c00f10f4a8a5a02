pub mod geometry;
pub mod types;

pub use geometry::{Point, Rect, Rgb};
pub use types::{
    AnnotationResult, Change, ChangeKind, ComparisonReport, ComparisonStats, DeletionSummary,
    DocumentAffinity, EditOp, LineRange, TaggedLine,
};
