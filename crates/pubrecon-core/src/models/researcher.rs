use chrono::NaiveDate;

use crate::identifiers::OrcidId;

/// One roster entry: the stable identifier plus a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Researcher {
    pub orcid: OrcidId,
    pub name: String,
}

impl Researcher {
    pub fn new(orcid: OrcidId, name: impl Into<String>) -> Self {
        Self {
            orcid,
            name: name.into(),
        }
    }

    /// Family name used as a soft tie-breaker when searching for missing
    /// identifiers: the last whitespace-separated token of the display
    /// name.
    pub fn family_name(&self) -> Option<&str> {
        self.name.split_whitespace().last()
    }
}

/// Claim and coverage counts for one researcher's reconciled record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearcherSummary {
    pub orcid: String,
    pub name: String,
    pub claimed_count: usize,
    pub with_doi_count: usize,
    pub enriched_count: usize,
    pub backfilled_count: usize,
    pub likely_incomplete: bool,
}

/// Derived activity statistics for one researcher.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearcherMetrics {
    pub orcid: String,
    pub name: String,
    pub pubs_last_12m: usize,
    pub pubs_last_24m: usize,
    pub most_recent_pub: Option<NaiveDate>,
    pub total_citations: u64,
    pub oa_share_last_24m: f64,
}
