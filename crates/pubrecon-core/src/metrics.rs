//! Per-researcher activity metrics and coverage summary.

use chrono::{Months, NaiveDate};

use crate::dates;
use crate::models::{Researcher, ResearcherMetrics, ResearcherSummary, Work};

/// Best available date for windowing: the resolved publication date,
/// else January 1 of the publication year. Works without either are
/// excluded from window and recency calculations; their citations still
/// count toward the total.
fn best_date(work: &Work) -> Option<NaiveDate> {
    work.published_date
        .or_else(|| work.year.and_then(dates::year_start))
}

/// Activity statistics over a reconciled work set. Window boundaries
/// fall on the same calendar day one and two years before `today`, and
/// a work dated exactly on a boundary counts as inside the window.
pub fn compute_metrics(
    researcher: &Researcher,
    works: &[Work],
    today: NaiveDate,
) -> ResearcherMetrics {
    let boundary_12m = today.checked_sub_months(Months::new(12)).unwrap_or(today);
    let boundary_24m = today.checked_sub_months(Months::new(24)).unwrap_or(today);

    let mut pubs_last_12m = 0;
    let mut pubs_last_24m = 0;
    let mut in_window_24m = 0usize;
    let mut open_in_window_24m = 0usize;
    let mut most_recent_pub: Option<NaiveDate> = None;

    for work in works {
        let Some(date) = best_date(work) else {
            continue;
        };
        if date >= boundary_12m {
            pubs_last_12m += 1;
        }
        if date >= boundary_24m {
            pubs_last_24m += 1;
            in_window_24m += 1;
            if work.oa_status == Some(true) {
                open_in_window_24m += 1;
            }
        }
        if most_recent_pub.is_none_or(|current| date > current) {
            most_recent_pub = Some(date);
        }
    }

    let total_citations = works
        .iter()
        .map(|work| u64::from(work.citations.unwrap_or(0)))
        .sum();

    let oa_share_last_24m = if in_window_24m == 0 {
        0.0
    } else {
        round3(open_in_window_24m as f64 / in_window_24m as f64)
    };

    ResearcherMetrics {
        orcid: researcher.orcid.to_string(),
        name: researcher.name.clone(),
        pubs_last_12m,
        pubs_last_24m,
        most_recent_pub,
        total_citations,
        oa_share_last_24m,
    }
}

/// Claim and coverage counts, including the "likely incomplete" signal:
/// fewer claims-sourced works than identifier-bearing works means
/// enrichment surfaced records the claims registry had not captured.
pub fn summarize_coverage(researcher: &Researcher, works: &[Work]) -> ResearcherSummary {
    let claimed_count = works.iter().filter(|w| w.in_orcid).count();
    let with_doi_count = works.iter().filter(|w| w.has_doi()).count();
    let enriched_count = works
        .iter()
        .filter(|w| w.in_crossref || w.in_openalex)
        .count();
    let backfilled_count = works.iter().filter(|w| w.doi_backfilled).count();

    ResearcherSummary {
        orcid: researcher.orcid.to_string(),
        name: researcher.name.clone(),
        claimed_count,
        with_doi_count,
        enriched_count,
        backfilled_count,
        likely_incomplete: claimed_count < with_doi_count,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    use crate::identifiers::OrcidId;
    use crate::models::RecordSource;

    fn researcher() -> Researcher {
        Researcher::new(
            OrcidId::parse("0000-0002-1825-0097").unwrap(),
            "Ada Lovelace",
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 4).unwrap()
    }

    fn dated_work(days_ago: u64, open: bool) -> Work {
        let mut work = Work::claimed("0000-0002-1825-0097");
        work.published_date = today().checked_sub_days(Days::new(days_ago));
        work.oa_status = Some(open);
        work
    }

    #[test]
    fn windows_and_open_access_share() {
        let works = vec![dated_work(370, true), dated_work(700, false)];
        let metrics = compute_metrics(&researcher(), &works, today());

        assert_eq!(metrics.pubs_last_12m, 0);
        assert_eq!(metrics.pubs_last_24m, 2);
        assert_eq!(metrics.oa_share_last_24m, 0.5);
        assert_eq!(
            metrics.most_recent_pub,
            today().checked_sub_days(Days::new(370))
        );
    }

    #[test]
    fn boundary_day_counts_as_inside() {
        let mut work = Work::claimed("0000-0002-1825-0097");
        work.published_date = today().checked_sub_months(Months::new(12));
        let metrics = compute_metrics(&researcher(), &[work], today());
        assert_eq!(metrics.pubs_last_12m, 1);
    }

    #[test]
    fn year_only_works_fall_back_to_january_first() {
        let mut work = Work::claimed("0000-0002-1825-0097");
        work.year = Some(2026);
        let metrics = compute_metrics(&researcher(), &[work], today());

        assert_eq!(metrics.pubs_last_12m, 1);
        assert_eq!(
            metrics.most_recent_pub,
            NaiveDate::from_ymd_opt(2026, 1, 1)
        );
    }

    #[test]
    fn undated_works_still_contribute_citations() {
        let mut work = Work::claimed("0000-0002-1825-0097");
        work.citations = Some(17);
        let metrics = compute_metrics(&researcher(), &[work], today());

        assert_eq!(metrics.pubs_last_24m, 0);
        assert_eq!(metrics.most_recent_pub, None);
        assert_eq!(metrics.total_citations, 17);
        assert_eq!(metrics.oa_share_last_24m, 0.0);
    }

    #[test]
    fn share_is_rounded_to_three_decimals() {
        let works = vec![
            dated_work(10, true),
            dated_work(20, false),
            dated_work(30, false),
        ];
        let metrics = compute_metrics(&researcher(), &works, today());
        assert_eq!(metrics.oa_share_last_24m, 0.333);
    }

    #[test]
    fn coverage_counts_and_incomplete_flag() {
        let mut claimed_with_doi = Work::claimed("0000-0002-1825-0097");
        claimed_with_doi.adopt_doi("10.1000/a", RecordSource::Orcid);
        claimed_with_doi.in_crossref = true;

        let mut unclaimed = Work::claimed("0000-0002-1825-0097");
        unclaimed.in_orcid = false;
        unclaimed.adopt_doi("10.1000/b", RecordSource::Crossref);
        unclaimed.in_openalex = true;
        unclaimed.doi_backfilled = true;

        let summary = summarize_coverage(&researcher(), &[claimed_with_doi, unclaimed]);
        assert_eq!(summary.claimed_count, 1);
        assert_eq!(summary.with_doi_count, 2);
        assert_eq!(summary.enriched_count, 2);
        assert_eq!(summary.backfilled_count, 1);
        assert!(summary.likely_incomplete);
    }

    #[test]
    fn full_claim_coverage_is_not_flagged() {
        let mut work = Work::claimed("0000-0002-1825-0097");
        work.adopt_doi("10.1000/a", RecordSource::Orcid);
        let summary = summarize_coverage(&researcher(), &[work]);
        assert!(!summary.likely_incomplete);
    }
}
