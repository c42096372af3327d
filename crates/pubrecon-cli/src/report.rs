//! CSV report writers.
//!
//! Column names are a compatibility contract for downstream consumers;
//! do not rename them.

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;

use pubrecon_core::models::{ResearcherMetrics, ResearcherSummary, Work};

const WORK_COLUMNS: [&str; 21] = [
    "orcid",
    "title",
    "journal",
    "year",
    "work_type",
    "put_code",
    "doi",
    "url",
    "publisher",
    "volume",
    "issue",
    "pages",
    "published_date",
    "citations",
    "oa_status",
    "oa_url",
    "concepts",
    "in_orcid",
    "in_crossref",
    "in_openalex",
    "doi_backfilled",
];

const SUMMARY_COLUMNS: [&str; 7] = [
    "orcid",
    "name",
    "claimed_count",
    "with_doi_count",
    "enriched_count",
    "backfilled_count",
    "likely_incomplete",
];

const METRICS_COLUMNS: [&str; 7] = [
    "orcid",
    "name",
    "pubs_last_12m",
    "pubs_last_24m",
    "most_recent_pub",
    "total_citations",
    "oa_share_last_24m",
];

pub fn write_works(path: &Path, works: &[Work]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(WORK_COLUMNS)?;
    for work in works {
        writer.write_record(work_record(work))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_summaries(path: &Path, summaries: &[ResearcherSummary]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(SUMMARY_COLUMNS)?;
    for summary in summaries {
        writer.write_record([
            summary.orcid.clone(),
            summary.name.clone(),
            summary.claimed_count.to_string(),
            summary.with_doi_count.to_string(),
            summary.enriched_count.to_string(),
            summary.backfilled_count.to_string(),
            summary.likely_incomplete.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_metrics(path: &Path, metrics: &[ResearcherMetrics]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(METRICS_COLUMNS)?;
    for row in metrics {
        writer.write_record([
            row.orcid.clone(),
            row.name.clone(),
            row.pubs_last_12m.to_string(),
            row.pubs_last_24m.to_string(),
            date(row.most_recent_pub),
            row.total_citations.to_string(),
            format!("{:.3}", row.oa_share_last_24m),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn work_record(work: &Work) -> Vec<String> {
    vec![
        work.orcid.clone(),
        text(&work.title),
        text(&work.journal),
        work.year.map(|y| y.to_string()).unwrap_or_default(),
        text(&work.work_type),
        text(&work.put_code),
        text(&work.doi),
        text(&work.url),
        text(&work.publisher),
        text(&work.volume),
        text(&work.issue),
        text(&work.pages),
        date(work.published_date),
        work.citations.map(|c| c.to_string()).unwrap_or_default(),
        work.oa_status.map(|o| o.to_string()).unwrap_or_default(),
        text(&work.oa_url),
        work.concepts.join("; "),
        work.in_orcid.to_string(),
        work.in_crossref.to_string(),
        work.in_openalex.to_string(),
        work.doi_backfilled.to_string(),
    ]
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.to_string()).unwrap_or_default()
}
