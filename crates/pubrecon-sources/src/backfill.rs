//! DOI backfill for title-only claims.
//!
//! Crossref is asked first, with exact-year and author-family-name
//! tie-breaks on top of the title similarity; OpenAlex is the fallback
//! with title and year only. A best candidate below the acceptance
//! threshold leaves the work untouched — that is a normal outcome, not
//! an error, and so is a failed search call.

use std::sync::Arc;

use tracing::{debug, warn};

use pubrecon_core::models::{RecordSource, Work};
use pubrecon_core::similarity::token_sort_ratio;

use crate::crossref::{CrossrefSource, SearchCandidate};
use crate::openalex::OpenAlexSource;

/// Minimum combined score for a search candidate to be adopted.
pub const ACCEPT_THRESHOLD: u32 = 85;
/// Bonus for an exact publication-year match.
const YEAR_BONUS: u32 = 5;
/// Bonus for an exact author family-name match (Crossref only; the
/// citation index search does not expose authors for scoring).
const FAMILY_NAME_BONUS: u32 = 5;

pub struct BackfillResolver {
    crossref: Arc<CrossrefSource>,
    openalex: Arc<OpenAlexSource>,
}

impl BackfillResolver {
    pub fn new(crossref: Arc<CrossrefSource>, openalex: Arc<OpenAlexSource>) -> Self {
        Self { crossref, openalex }
    }

    /// Try to recover a missing identifier for `work`. Returns whether
    /// one was adopted.
    pub async fn resolve(&self, work: &mut Work, family_name: Option<&str>) -> bool {
        if work.doi.is_some() {
            return false;
        }
        let Some(title) = work
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
        else {
            return false;
        };

        if let Some((doi, score)) = self.best_crossref(&title, work.year, family_name).await {
            debug!(%doi, score, "identifier recovered via bibliographic search");
            return adopt(work, &doi, RecordSource::Crossref);
        }
        if let Some((doi, score)) = self.best_openalex(&title, work.year).await {
            debug!(%doi, score, "identifier recovered via citation-index search");
            return adopt(work, &doi, RecordSource::OpenAlex);
        }
        false
    }

    async fn best_crossref(
        &self,
        title: &str,
        year: Option<i32>,
        family_name: Option<&str>,
    ) -> Option<(String, u32)> {
        let candidates = match self.crossref.search_by_title(title).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(%err, "bibliographic title search failed");
                return None;
            }
        };

        best_scoring(candidates.iter().filter_map(|candidate| {
            let doi = candidate.doi.clone()?;
            Some((doi, score_candidate(title, year, family_name, candidate)))
        }))
    }

    async fn best_openalex(&self, title: &str, year: Option<i32>) -> Option<(String, u32)> {
        let hits = match self.openalex.search_by_title(title).await {
            Ok(hits) => hits,
            Err(err) => {
                warn!(%err, "citation-index title search failed");
                return None;
            }
        };

        best_scoring(hits.iter().filter_map(|hit| {
            let doi = hit.doi.clone()?;
            let mut score = token_sort_ratio(title, hit.title.as_deref().unwrap_or(""));
            if let (Some(wanted), Some(found)) = (year, hit.year)
                && wanted == found
            {
                score += YEAR_BONUS;
            }
            Some((doi, score))
        }))
    }
}

fn best_scoring<I>(scored: I) -> Option<(String, u32)>
where
    I: Iterator<Item = (String, u32)>,
{
    scored
        .max_by_key(|(_, score)| *score)
        .filter(|(_, score)| *score >= ACCEPT_THRESHOLD)
}

fn score_candidate(
    title: &str,
    year: Option<i32>,
    family_name: Option<&str>,
    candidate: &SearchCandidate,
) -> u32 {
    let mut score = token_sort_ratio(title, candidate.title.as_deref().unwrap_or(""));
    if let (Some(wanted), Some(found)) = (year, candidate.year)
        && wanted == found
    {
        score += YEAR_BONUS;
    }
    if let Some(name) = family_name
        && candidate
            .family_names
            .iter()
            .any(|family| family.eq_ignore_ascii_case(name))
    {
        score += FAMILY_NAME_BONUS;
    }
    score
}

fn adopt(work: &mut Work, doi: &str, source: RecordSource) -> bool {
    if work.adopt_doi(doi, source) {
        work.doi_backfilled = true;
        true
    } else {
        false
    }
}
