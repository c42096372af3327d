//! pubrecon-core — the record-reconciliation engine: identifier and date
//! normalization, title similarity, source-priority merging, two-pass
//! deduplication, and per-researcher metrics.

pub mod dates;
pub mod dedup;
pub mod error;
pub mod identifiers;
pub mod merge;
pub mod metrics;
pub mod models;
pub mod similarity;

pub use error::{CoreError, Result};
pub use models::{Researcher, ResearcherMetrics, ResearcherSummary, Work};
