//! Source-priority record merging.
//!
//! Two distinct folds live here. [`apply`] merges an external source's
//! partial payload into a work under the Crossref > OpenAlex > ORCID
//! precedence, with the citation index owning the analytics fields
//! outright. [`fold_missing`] is the deduplicator's gap-filler: by the
//! time two works are folded, precedence has already been applied to
//! each, so the survivor only takes fields it lacks.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::work::{MAX_CONCEPTS, RecordSource, Work, is_blank};

/// A source document reduced to the fields the merge contract covers.
#[derive(Debug, Clone, Default)]
pub struct PartialRecord {
    pub title: Option<String>,
    pub journal: Option<String>,
    pub publisher: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub work_type: Option<String>,
    pub year: Option<i32>,
    pub published_date: Option<NaiveDate>,
    pub doi: Option<String>,
    pub citations: Option<u32>,
    pub oa_status: Option<bool>,
    pub oa_url: Option<String>,
    pub concepts: Vec<String>,
}

impl PartialRecord {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.journal.is_none()
            && self.publisher.is_none()
            && self.volume.is_none()
            && self.issue.is_none()
            && self.pages.is_none()
            && self.work_type.is_none()
            && self.year.is_none()
            && self.published_date.is_none()
            && self.doi.is_none()
            && self.citations.is_none()
            && self.oa_status.is_none()
            && self.oa_url.is_none()
            && self.concepts.is_empty()
    }
}

/// Merge a source payload into `work`.
///
/// Bibliographic fields follow the field-source ledger: a non-blank
/// incoming value lands when the field is blank or the incoming source's
/// priority is at least the recorded one. The identifier is set-once;
/// analytics fields are overwritten whenever the citation index supplies
/// them; provenance flags are monotonic. An entirely empty payload is a
/// no-op and records no provenance.
pub fn apply(work: &mut Work, incoming: PartialRecord, source: RecordSource) {
    if incoming.is_empty() {
        return;
    }

    set_text(&mut work.title, &mut work.field_sources, "title", incoming.title, source);
    set_text(&mut work.journal, &mut work.field_sources, "journal", incoming.journal, source);
    set_text(&mut work.publisher, &mut work.field_sources, "publisher", incoming.publisher, source);
    set_text(&mut work.volume, &mut work.field_sources, "volume", incoming.volume, source);
    set_text(&mut work.issue, &mut work.field_sources, "issue", incoming.issue, source);
    set_text(&mut work.pages, &mut work.field_sources, "pages", incoming.pages, source);
    set_text(&mut work.work_type, &mut work.field_sources, "work_type", incoming.work_type, source);
    set_value(&mut work.year, &mut work.field_sources, "year", incoming.year, source);
    set_value(
        &mut work.published_date,
        &mut work.field_sources,
        "published_date",
        incoming.published_date,
        source,
    );

    if let Some(doi) = incoming.doi.as_deref() {
        work.adopt_doi(doi, source);
    }

    if source == RecordSource::OpenAlex {
        if let Some(citations) = incoming.citations {
            work.citations = Some(citations);
        }
        if let Some(oa_status) = incoming.oa_status {
            work.oa_status = Some(oa_status);
        }
        if incoming.oa_url.as_deref().is_some_and(|u| !u.trim().is_empty()) {
            work.oa_url = incoming.oa_url.map(|u| u.trim().to_string());
        }
        if !incoming.concepts.is_empty() {
            let mut concepts = incoming.concepts;
            concepts.truncate(MAX_CONCEPTS);
            work.concepts = concepts;
        }
    }

    match source {
        RecordSource::Orcid => work.in_orcid = true,
        RecordSource::Crossref => work.in_crossref = true,
        RecordSource::OpenAlex => work.in_openalex = true,
    }

    work.ensure_url();
}

/// Fill the survivor's gaps from another record describing the same
/// publication. Populated fields are never replaced; provenance is the
/// union of both records'.
pub fn fold_missing(survivor: &mut Work, other: &Work) {
    fill_text(&mut survivor.title, &other.title);
    fill_text(&mut survivor.journal, &other.journal);
    fill_text(&mut survivor.work_type, &other.work_type);
    fill_text(&mut survivor.put_code, &other.put_code);
    fill_text(&mut survivor.url, &other.url);
    fill_text(&mut survivor.publisher, &other.publisher);
    fill_text(&mut survivor.volume, &other.volume);
    fill_text(&mut survivor.issue, &other.issue);
    fill_text(&mut survivor.pages, &other.pages);
    fill_text(&mut survivor.oa_url, &other.oa_url);

    if survivor.doi.is_none() {
        survivor.doi = other.doi.clone();
    }
    if survivor.year.is_none() {
        survivor.year = other.year;
    }
    if survivor.published_date.is_none() {
        survivor.published_date = other.published_date;
    }
    if survivor.citations.is_none() {
        survivor.citations = other.citations;
    }
    if survivor.oa_status.is_none() {
        survivor.oa_status = other.oa_status;
    }
    if survivor.concepts.is_empty() {
        survivor.concepts = other.concepts.clone();
    }

    survivor.in_orcid |= other.in_orcid;
    survivor.in_crossref |= other.in_crossref;
    survivor.in_openalex |= other.in_openalex;
    survivor.doi_backfilled |= other.doi_backfilled;

    for (field, source) in &other.field_sources {
        survivor.field_sources.entry(field).or_insert(*source);
    }

    survivor.ensure_url();
}

fn set_text(
    slot: &mut Option<String>,
    ledger: &mut HashMap<&'static str, RecordSource>,
    field: &'static str,
    incoming: Option<String>,
    source: RecordSource,
) {
    let Some(value) = incoming
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
    else {
        return;
    };

    if is_blank(slot) || outranks(ledger, field, source) {
        *slot = Some(value);
        ledger.insert(field, source);
    }
}

fn set_value<T: Copy>(
    slot: &mut Option<T>,
    ledger: &mut HashMap<&'static str, RecordSource>,
    field: &'static str,
    incoming: Option<T>,
    source: RecordSource,
) {
    let Some(value) = incoming else {
        return;
    };

    if slot.is_none() || outranks(ledger, field, source) {
        *slot = Some(value);
        ledger.insert(field, source);
    }
}

fn outranks(
    ledger: &HashMap<&'static str, RecordSource>,
    field: &'static str,
    source: RecordSource,
) -> bool {
    let held = ledger.get(field).copied().unwrap_or(RecordSource::Orcid);
    source.priority() >= held.priority()
}

fn fill_text(slot: &mut Option<String>, other: &Option<String>) {
    if is_blank(slot) && !is_blank(other) {
        *slot = other.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claimed() -> Work {
        let mut work = Work::claimed("0000-0002-1825-0097");
        work.title = Some("A Claimed Title".to_string());
        work.journal = Some("Claimed Journal".to_string());
        work
    }

    fn crossref_payload() -> PartialRecord {
        PartialRecord {
            title: Some("The Canonical Title".to_string()),
            publisher: Some("Springer".to_string()),
            year: Some(2021),
            doi: Some("10.1000/merge".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn crossref_overwrites_claimed_bibliography() {
        let mut work = claimed();
        apply(&mut work, crossref_payload(), RecordSource::Crossref);

        assert_eq!(work.title.as_deref(), Some("The Canonical Title"));
        assert_eq!(work.publisher.as_deref(), Some("Springer"));
        assert_eq!(work.year, Some(2021));
        assert!(work.in_crossref);
        assert_eq!(work.url.as_deref(), Some("https://doi.org/10.1000/merge"));
    }

    #[test]
    fn openalex_fills_gaps_but_does_not_displace_crossref() {
        let mut work = claimed();
        apply(&mut work, crossref_payload(), RecordSource::Crossref);
        apply(
            &mut work,
            PartialRecord {
                title: Some("A Lesser Title".to_string()),
                journal: Some("Indexed Journal".to_string()),
                volume: Some("12".to_string()),
                ..Default::default()
            },
            RecordSource::OpenAlex,
        );

        // Crossref set the title; the claim set the journal, which the
        // citation index outranks; the volume was a pure gap.
        assert_eq!(work.title.as_deref(), Some("The Canonical Title"));
        assert_eq!(work.journal.as_deref(), Some("Indexed Journal"));
        assert_eq!(work.volume.as_deref(), Some("12"));
        assert!(work.in_openalex);
    }

    #[test]
    fn blank_values_never_overwrite() {
        let mut work = claimed();
        apply(
            &mut work,
            PartialRecord {
                title: Some("   ".to_string()),
                ..Default::default()
            },
            RecordSource::Crossref,
        );
        assert_eq!(work.title.as_deref(), Some("A Claimed Title"));
    }

    #[test]
    fn applying_the_same_payload_twice_is_idempotent() {
        let mut once = claimed();
        apply(&mut once, crossref_payload(), RecordSource::Crossref);

        let mut twice = claimed();
        apply(&mut twice, crossref_payload(), RecordSource::Crossref);
        apply(&mut twice, crossref_payload(), RecordSource::Crossref);

        assert_eq!(once, twice);
    }

    #[test]
    fn identifier_is_set_once() {
        let mut work = claimed();
        apply(&mut work, crossref_payload(), RecordSource::Crossref);
        apply(
            &mut work,
            PartialRecord {
                doi: Some("10.9999/other".to_string()),
                citations: Some(3),
                ..Default::default()
            },
            RecordSource::OpenAlex,
        );
        assert_eq!(work.doi.as_deref(), Some("10.1000/merge"));
    }

    #[test]
    fn analytics_belong_to_the_citation_index() {
        let mut work = claimed();
        // A bibliographic source supplying analytics is ignored.
        apply(
            &mut work,
            PartialRecord {
                citations: Some(5),
                oa_status: Some(true),
                publisher: Some("Elsevier".to_string()),
                ..Default::default()
            },
            RecordSource::Crossref,
        );
        assert_eq!(work.citations, None);
        assert_eq!(work.oa_status, None);

        apply(
            &mut work,
            PartialRecord {
                citations: Some(5),
                oa_status: Some(true),
                oa_url: Some("https://repo.example.org/p.pdf".to_string()),
                concepts: vec!["Genomics".to_string(), "Machine learning".to_string()],
                ..Default::default()
            },
            RecordSource::OpenAlex,
        );
        assert_eq!(work.citations, Some(5));
        assert_eq!(work.oa_status, Some(true));

        // Refreshed analytics always win, even over themselves.
        apply(
            &mut work,
            PartialRecord {
                citations: Some(9),
                oa_status: Some(false),
                ..Default::default()
            },
            RecordSource::OpenAlex,
        );
        assert_eq!(work.citations, Some(9));
        assert_eq!(work.oa_status, Some(false));
        assert_eq!(work.concepts.len(), 2);
    }

    #[test]
    fn concepts_are_bounded() {
        let mut work = claimed();
        let concepts: Vec<String> = (0..8).map(|i| format!("concept-{i}")).collect();
        apply(
            &mut work,
            PartialRecord {
                concepts,
                ..Default::default()
            },
            RecordSource::OpenAlex,
        );
        assert_eq!(work.concepts.len(), MAX_CONCEPTS);
    }

    #[test]
    fn empty_payload_is_a_noop() {
        let mut work = claimed();
        let before = work.clone();
        apply(&mut work, PartialRecord::default(), RecordSource::Crossref);
        assert_eq!(work, before);
        assert!(!work.in_crossref);
    }

    #[test]
    fn fold_missing_only_fills_gaps() {
        let mut survivor = Work::claimed("0000-0002-1825-0097");
        survivor.title = Some("Survivor Title".to_string());
        survivor.adopt_doi("10.1000/keep", RecordSource::Orcid);

        let mut other = Work::claimed("0000-0002-1825-0097");
        other.title = Some("Other Title".to_string());
        other.journal = Some("Other Journal".to_string());
        other.year = Some(2019);
        other.citations = Some(11);
        other.in_openalex = true;

        fold_missing(&mut survivor, &other);

        assert_eq!(survivor.title.as_deref(), Some("Survivor Title"));
        assert_eq!(survivor.journal.as_deref(), Some("Other Journal"));
        assert_eq!(survivor.year, Some(2019));
        assert_eq!(survivor.citations, Some(11));
        assert_eq!(survivor.doi.as_deref(), Some("10.1000/keep"));
        assert!(survivor.in_openalex);
    }
}
