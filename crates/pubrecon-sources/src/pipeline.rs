//! Per-researcher reconciliation: claims, identifier backfill, ordered
//! enrichment merges, deduplication.
//!
//! Researchers are processed one at a time and every collaborator call
//! is awaited before the next starts. A source that answers with
//! nothing — or fails outright after its retry budget — degrades to an
//! absent payload and is logged, never propagated.

use std::sync::Arc;

use tracing::{info, warn};

use pubrecon_core::dedup::dedupe_works;
use pubrecon_core::merge;
use pubrecon_core::models::{RecordSource, Researcher, Work};

use crate::backfill::BackfillResolver;
use crate::config::SourcesConfig;
use crate::crossref::CrossrefSource;
use crate::error::Result;
use crate::openalex::OpenAlexSource;
use crate::orcid::OrcidClient;

pub struct ReconcilePipeline {
    orcid: Arc<OrcidClient>,
    crossref: Arc<CrossrefSource>,
    openalex: Arc<OpenAlexSource>,
    backfill: BackfillResolver,
    backfill_enabled: bool,
}

impl ReconcilePipeline {
    pub fn new(
        orcid: Arc<OrcidClient>,
        crossref: Arc<CrossrefSource>,
        openalex: Arc<OpenAlexSource>,
    ) -> Self {
        let backfill = BackfillResolver::new(crossref.clone(), openalex.clone());
        Self {
            orcid,
            crossref,
            openalex,
            backfill,
            backfill_enabled: true,
        }
    }

    /// Build a production pipeline from environment configuration. Fails
    /// when the claims-registry credentials are missing.
    pub fn from_config(config: &SourcesConfig) -> Result<Self> {
        let (client_id, client_secret) = config.orcid_credentials()?;
        Ok(Self::new(
            Arc::new(OrcidClient::new(client_id, client_secret)),
            Arc::new(CrossrefSource::new(config.polite_email.as_deref())),
            Arc::new(OpenAlexSource::new(config.polite_email.as_deref())),
        ))
    }

    pub fn with_backfill(mut self, enabled: bool) -> Self {
        self.backfill_enabled = enabled;
        self
    }

    /// One-time claims-registry token exchange; must succeed before any
    /// researcher is processed.
    pub async fn authenticate(&self) -> Result<()> {
        self.orcid.authenticate().await
    }

    /// Reconcile one researcher's record set end to end.
    pub async fn process_researcher(&self, researcher: &Researcher) -> Result<Vec<Work>> {
        let claims = match self.orcid.fetch_claimed_works(&researcher.orcid).await {
            Ok(claims) => claims,
            Err(err) => {
                warn!(orcid = %researcher.orcid, %err, "claims fetch failed, treating as empty");
                Vec::new()
            }
        };
        info!(orcid = %researcher.orcid, claims = claims.len(), "fetched claimed works");

        let mut works: Vec<Work> = claims
            .into_iter()
            .map(|claim| claim.into_work(researcher.orcid.as_str()))
            .collect();

        for work in &mut works {
            if self.backfill_enabled && work.doi.is_none() {
                self.backfill
                    .resolve(work, researcher.family_name())
                    .await;
            }
            self.enrich(work).await;
        }

        Ok(dedupe_works(works))
    }

    // Ordered enrichment: the bibliographic registry first, the citation
    // index second, both feeding the same survivor.
    async fn enrich(&self, work: &mut Work) {
        let Some(doi) = work.doi.clone() else {
            return;
        };

        match self.crossref.fetch_by_doi(&doi).await {
            Ok(Some(record)) => merge::apply(work, record.into_partial(), RecordSource::Crossref),
            Ok(None) => {}
            Err(err) => warn!(%doi, %err, "bibliographic enrichment failed"),
        }

        match self.openalex.fetch_by_doi(&doi).await {
            Ok(Some(record)) => merge::apply(work, record.into_partial(), RecordSource::OpenAlex),
            Ok(None) => {}
            Err(err) => warn!(%doi, %err, "citation-index enrichment failed"),
        }
    }
}
