//! Crossref REST client: the bibliographic-metadata registry.

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;

use pubrecon_core::dates;
use pubrecon_core::merge::PartialRecord;

use crate::error::{Result, SourceError};
use crate::http::RateLimitedClient;

const SEARCH_ROWS: u32 = 5;

pub struct CrossrefSource {
    client: RateLimitedClient,
    base_url: String,
}

impl CrossrefSource {
    pub fn new(polite_email: Option<&str>) -> Self {
        Self::with_params("https://api.crossref.org", Duration::from_millis(100), polite_email)
    }

    pub fn with_params(base_url: &str, min_interval: Duration, polite_email: Option<&str>) -> Self {
        let user_agent = match polite_email {
            Some(email) => format!("pubrecon/0.1 (mailto:{email})"),
            None => "pubrecon/0.1".to_string(),
        };
        Self {
            client: RateLimitedClient::new(min_interval, 3, &user_agent),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Registry document for a canonical DOI; `Ok(None)` when the
    /// registry has no record of it.
    pub async fn fetch_by_doi(&self, doi: &str) -> Result<Option<CrossrefWork>> {
        let url = format!("{}/works/{}", self.base_url, doi);
        let value = match self.client.get_json(&url).await {
            Ok(value) => value,
            Err(SourceError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        CrossrefWork::from_json(&value["message"]).map(Some)
    }

    /// Ranked candidates for a bibliographic title search. An absent or
    /// empty result set is an empty list.
    pub async fn search_by_title(&self, title: &str) -> Result<Vec<SearchCandidate>> {
        let url = format!(
            "{}/works?query.bibliographic={}&rows={SEARCH_ROWS}",
            self.base_url,
            urlencoding::encode(title)
        );
        let value = match self.client.get_json(&url).await {
            Ok(value) => value,
            Err(SourceError::NotFound(_)) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let items = value
            .pointer("/message/items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(items.iter().map(candidate_from_json).collect())
    }
}

#[derive(Debug, Clone)]
pub struct CrossrefWork {
    pub doi: String,
    pub title: Option<String>,
    pub journal: Option<String>,
    pub publisher: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub work_type: Option<String>,
    pub year: Option<i32>,
    pub published_date: Option<NaiveDate>,
}

impl CrossrefWork {
    pub fn from_json(v: &Value) -> Result<Self> {
        let doi = v["DOI"]
            .as_str()
            .ok_or_else(|| SourceError::Parse("missing DOI in Crossref response".to_string()))?
            .to_string();

        Ok(Self {
            doi,
            title: v["title"][0].as_str().map(str::to_string),
            journal: v["container-title"][0].as_str().map(str::to_string),
            publisher: v["publisher"].as_str().map(str::to_string),
            volume: v["volume"].as_str().map(str::to_string),
            issue: v["issue"].as_str().map(str::to_string),
            pages: v["page"].as_str().map(str::to_string),
            work_type: v["type"].as_str().map(str::to_string),
            year: parse_year(v),
            published_date: earliest_published_date(v),
        })
    }

    pub fn into_partial(self) -> PartialRecord {
        PartialRecord {
            title: self.title,
            journal: self.journal,
            publisher: self.publisher,
            volume: self.volume,
            issue: self.issue,
            pages: self.pages,
            work_type: self.work_type,
            year: self.year,
            published_date: self.published_date,
            doi: Some(self.doi),
            ..Default::default()
        }
    }
}

/// One bibliographic search hit, reduced to what candidate scoring
/// needs.
#[derive(Debug, Clone, Default)]
pub struct SearchCandidate {
    pub doi: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub family_names: Vec<String>,
}

fn candidate_from_json(item: &Value) -> SearchCandidate {
    let family_names = item["author"]
        .as_array()
        .map(|authors| {
            authors
                .iter()
                .filter_map(|a| a["family"].as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    SearchCandidate {
        doi: item["DOI"].as_str().map(str::to_string),
        title: item["title"][0].as_str().map(str::to_string),
        year: parse_year(item),
        family_names,
    }
}

// Date parts look like {"date-parts": [[2017, 6, 12]]}, trimmed to the
// precision the depositor provided.
fn parse_year(v: &Value) -> Option<i32> {
    v["published-print"]["date-parts"][0][0]
        .as_i64()
        .or_else(|| v["published-online"]["date-parts"][0][0].as_i64())
        .or_else(|| v["issued"]["date-parts"][0][0].as_i64())
        .or_else(|| v["created"]["date-parts"][0][0].as_i64())
        .map(|n| n as i32)
}

fn date_parts_string(v: &Value, field: &str) -> Option<String> {
    let parts = v[field]["date-parts"][0].as_array()?;
    let nums: Vec<i64> = parts.iter().filter_map(Value::as_i64).collect();
    match nums[..] {
        [y] => Some(format!("{y}")),
        [y, m] => Some(format!("{y}-{m}")),
        [y, m, d, ..] => Some(format!("{y}-{m}-{d}")),
        _ => None,
    }
}

fn earliest_published_date(v: &Value) -> Option<NaiveDate> {
    let candidates = [
        date_parts_string(v, "published-print"),
        date_parts_string(v, "published-online"),
        date_parts_string(v, "issued"),
    ];
    dates::earliest(candidates.iter().map(|c| c.as_deref()))
}
