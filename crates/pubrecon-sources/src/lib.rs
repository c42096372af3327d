//! pubrecon-sources — ORCID, Crossref, and OpenAlex clients, identifier
//! backfill, and the per-researcher reconciliation pipeline.

pub mod backfill;
pub mod config;
pub mod crossref;
pub mod error;
pub mod http;
pub mod openalex;
pub mod orcid;
pub mod pipeline;

pub use config::SourcesConfig;
pub use error::{Result, SourceError};
pub use pipeline::ReconcilePipeline;
