//! Comparison, alignment and merging of position frequency matrices.
//!
//! Motifs are compared column by column with one of eleven metrics over every
//! register allowed by the minimum overlap, optionally including the reverse
//! complement. The same search drives merging of motifs and the conversion of
//! scores to p-values through a pre-fit distribution table.

pub mod aggregate;
pub mod align;
pub mod batch;
pub mod ic;
pub mod merge;
pub mod metrics;
pub mod motif;
pub mod params;
pub mod pvalue;
pub mod utils;

pub use aggregate::ScoreStrategy;
pub use align::{best_alignment, compare_motif_pair, Alignment, PreparedMotif, Register};
pub use batch::{compare_all, compare_many, to_square_matrix};
pub use ic::IcType;
pub use merge::{align_motifs, merge_many, AlignedMotifs};
pub use metrics::{compare_columns, Metric};
pub use motif::Motif;
pub use params::CompareParams;
pub use pvalue::{pvalues, CdfEvaluator, Distribution, PvalueRow, PvalueTable, StatrsCdf};
pub use utils::Result;
