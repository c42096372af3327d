pub mod doi;
pub mod orcid;

pub use orcid::OrcidId;
