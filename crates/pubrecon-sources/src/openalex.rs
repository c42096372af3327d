//! OpenAlex client: the citation and open-access index.

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;

use pubrecon_core::dates;
use pubrecon_core::merge::PartialRecord;
use pubrecon_core::models::MAX_CONCEPTS;

use crate::error::{Result, SourceError};
use crate::http::RateLimitedClient;

const SEARCH_ROWS: u32 = 5;

pub struct OpenAlexSource {
    client: RateLimitedClient,
    base_url: String,
}

impl OpenAlexSource {
    pub fn new(polite_email: Option<&str>) -> Self {
        Self::with_params("https://api.openalex.org", Duration::from_millis(100), polite_email)
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

    /// Index document for a canonical DOI; `Ok(None)` when the index has
    /// not seen it.
    pub async fn fetch_by_doi(&self, doi: &str) -> Result<Option<OpenAlexWork>> {
        let url = format!("{}/works/https://doi.org/{}", self.base_url, doi);
        let value = match self.client.get_json(&url).await {
            Ok(value) => value,
            Err(SourceError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        Ok(Some(OpenAlexWork::from_json(&value)))
    }

    /// Title-search hits, best-ranked first.
    pub async fn search_by_title(&self, title: &str) -> Result<Vec<OpenAlexWork>> {
        let url = format!(
            "{}/works?filter=title.search:{}&per-page={SEARCH_ROWS}",
            self.base_url,
            urlencoding::encode(title)
        );
        let value = match self.client.get_json(&url).await {
            Ok(value) => value,
            Err(SourceError::NotFound(_)) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        Ok(value
            .get("results")
            .and_then(Value::as_array)
            .map(|results| results.iter().map(OpenAlexWork::from_json).collect())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct OpenAlexWork {
    pub doi: Option<String>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub published_date: Option<NaiveDate>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub citations: Option<u32>,
    pub oa_status: Option<bool>,
    pub oa_url: Option<String>,
    pub concepts: Vec<String>,
}

impl OpenAlexWork {
    // Index documents are best-effort: any field may be null, so this
    // never fails.
    pub fn from_json(v: &Value) -> Self {
        let title = v
            .get("title")
            .or_else(|| v.get("display_name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let first_page = v.pointer("/biblio/first_page").and_then(Value::as_str);
        let last_page = v.pointer("/biblio/last_page").and_then(Value::as_str);
        let pages = match (first_page, last_page) {
            (Some(first), Some(last)) => Some(format!("{first}-{last}")),
            (Some(first), None) => Some(first.to_string()),
            _ => None,
        };

        let concepts = v
            .get("concepts")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|c| c.get("display_name").and_then(Value::as_str))
                    .map(str::to_string)
                    .take(MAX_CONCEPTS)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            doi: v.get("doi").and_then(Value::as_str).map(str::to_string),
            title,
            year: v
                .get("publication_year")
                .and_then(Value::as_i64)
                .and_then(|n| i32::try_from(n).ok()),
            published_date: v
                .get("publication_date")
                .and_then(Value::as_str)
                .and_then(dates::parse_partial),
            journal: v
                .pointer("/primary_location/source/display_name")
                .or_else(|| v.pointer("/host_venue/display_name"))
                .and_then(Value::as_str)
                .map(str::to_string),
            volume: v.pointer("/biblio/volume").and_then(Value::as_str).map(str::to_string),
            issue: v.pointer("/biblio/issue").and_then(Value::as_str).map(str::to_string),
            pages,
            citations: v
                .get("cited_by_count")
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok()),
            oa_status: v.pointer("/open_access/is_oa").and_then(Value::as_bool),
            oa_url: v
                .pointer("/open_access/oa_url")
                .and_then(Value::as_str)
                .map(str::to_string),
            concepts,
        }
    }

    pub fn into_partial(self) -> PartialRecord {
        PartialRecord {
            title: self.title,
            journal: self.journal,
            volume: self.volume,
            issue: self.issue,
            pages: self.pages,
            year: self.year,
            published_date: self.published_date,
            doi: self.doi,
            citations: self.citations,
            oa_status: self.oa_status,
            oa_url: self.oa_url,
            concepts: self.concepts,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const WORK_BODY: &str = r#"{
        "id": "https://openalex.org/W2100837269",
        "doi": "https://doi.org/10.1038/nature14539",
        "title": "Deep learning",
        "publication_year": 2015,
        "publication_date": "2015-05-27",
        "primary_location": {"source": {"display_name": "Nature"}},
        "biblio": {"volume": "521", "issue": "7553", "first_page": "436", "last_page": "444"},
        "cited_by_count": 65432,
        "open_access": {"is_oa": true, "oa_status": "bronze", "oa_url": "https://repo.example.org/deep-learning.pdf"},
        "concepts": [
            {"display_name": "Deep learning", "score": 0.97},
            {"display_name": "Artificial neural network", "score": 0.91},
            {"display_name": "Machine learning", "score": 0.88},
            {"display_name": "Artificial intelligence", "score": 0.80},
            {"display_name": "Computer science", "score": 0.75},
            {"display_name": "Feature learning", "score": 0.62}
        ]
    }"#;

    #[tokio::test]
    async fn fetch_by_doi_parses_analytics() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/works/https://doi.org/10.1038/nature14539")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(WORK_BODY)
            .create_async()
            .await;

        let source = OpenAlexSource::with_params(&server.url(), Duration::ZERO, None);
        let work = source
            .fetch_by_doi("10.1038/nature14539")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(work.citations, Some(65432));
        assert_eq!(work.oa_status, Some(true));
        assert_eq!(
            work.oa_url.as_deref(),
            Some("https://repo.example.org/deep-learning.pdf")
        );
        assert_eq!(work.pages.as_deref(), Some("436-444"));
        assert_eq!(work.journal.as_deref(), Some("Nature"));
        assert_eq!(work.published_date, NaiveDate::from_ymd_opt(2015, 5, 27));
        assert_eq!(work.concepts.len(), MAX_CONCEPTS);
        assert_eq!(work.concepts[0], "Deep learning");
    }

    #[tokio::test]
    async fn unknown_doi_is_none() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/works/https://doi.org/10.1/missing")
            .with_status(404)
            .create_async()
            .await;

        let source = OpenAlexSource::with_params(&server.url(), Duration::ZERO, None);
        assert!(source.fetch_by_doi("10.1/missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_returns_ranked_hits() {
        let mut server = Server::new_async().await;
        let body = format!(r#"{{"results": [{WORK_BODY}]}}"#);
        let _m = server
            .mock("GET", "/works?filter=title.search:Deep%20learning&per-page=5")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let source = OpenAlexSource::with_params(&server.url(), Duration::ZERO, None);
        let hits = source.search_by_title("Deep learning").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].doi.as_deref(),
            Some("https://doi.org/10.1038/nature14539")
        );
    }

    #[test]
    fn partial_keeps_resolver_url_doi_for_later_normalization() {
        let work = OpenAlexWork {
            doi: Some("https://doi.org/10.1038/NATURE14539".to_string()),
            citations: Some(12),
            ..Default::default()
        };
        let partial = work.into_partial();
        assert_eq!(
            partial.doi.as_deref(),
            Some("https://doi.org/10.1038/NATURE14539")
        );
    }
}
