//! Report renderers for analysis results.
//!
//! - [`terminal`]: colored verdict banner, probability table, and per-source
//!   evidence sections with manual-verification tips when a source has nothing.
//!
//! JSON output is a direct `serde_json` dump of [`AnalysisReport`](crate::models::AnalysisReport).

pub mod terminal;
