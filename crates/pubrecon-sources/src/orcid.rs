//! ORCID public-API client: the claims registry.
//!
//! A client-credentials token (read-public scope) is exchanged once
//! before any researcher is processed; a missing or rejected credential
//! aborts the run. A researcher with no works record yields an empty
//! list, never an error.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tokio::sync::Mutex;

use pubrecon_core::dates;
use pubrecon_core::identifiers::OrcidId;
use pubrecon_core::models::{RecordSource, Work};

use crate::error::{Result, SourceError};
use crate::http::RateLimitedClient;

pub struct OrcidClient {
    client: RateLimitedClient,
    api_base: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<String>>,
}

impl OrcidClient {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_params(
            "https://pub.orcid.org/v3.0",
            "https://orcid.org/oauth/token",
            Duration::from_millis(250),
            client_id,
            client_secret,
        )
    }

    pub fn with_params(
        api_base: &str,
        token_url: &str,
        min_interval: Duration,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            client: RateLimitedClient::new(min_interval, 3, "pubrecon/0.1"),
            api_base: api_base.trim_end_matches('/').to_string(),
            token_url: token_url.to_string(),
            client_id,
            client_secret,
            token: Mutex::new(None),
        }
    }

    /// Exchange client credentials for a read-public token.
    pub async fn authenticate(&self) -> Result<()> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", "/read-public"),
        ];
        let value = self.client.post_form(&self.token_url, &params).await?;
        let Some(token) = value.get("access_token").and_then(Value::as_str) else {
            return Err(SourceError::Auth(
                "orcid".to_string(),
                "token response carried no access_token".to_string(),
            ));
        };
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }

    /// All works the researcher has claimed, one record per registry
    /// group (the group's preferred summary).
    pub async fn fetch_claimed_works(&self, id: &OrcidId) -> Result<Vec<ClaimedWork>> {
        let token = self.token.lock().await.clone().ok_or_else(|| {
            SourceError::Auth(
                "orcid".to_string(),
                "authenticate() has not been called".to_string(),
            )
        })?;

        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {token}");
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&bearer).map_err(|e| SourceError::Parse(e.to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let url = format!("{}/{}/works", self.api_base, id.as_str());
        let value = match self.client.get_json_with_headers(&url, headers).await {
            Ok(value) => value,
            Err(SourceError::NotFound(_)) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let groups = value
            .get("group")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(groups.iter().filter_map(parse_group).collect())
    }
}

/// One claimed record as the registry reports it.
#[derive(Debug, Clone, Default)]
pub struct ClaimedWork {
    pub put_code: Option<String>,
    pub title: Option<String>,
    pub journal: Option<String>,
    pub year: Option<i32>,
    pub work_type: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub published_date: Option<NaiveDate>,
}

impl ClaimedWork {
    pub fn into_work(self, orcid: &str) -> Work {
        let mut work = Work::claimed(orcid);
        work.title = non_blank(self.title);
        work.journal = non_blank(self.journal);
        work.year = self.year;
        work.work_type = non_blank(self.work_type);
        work.put_code = non_blank(self.put_code);
        work.url = non_blank(self.url);
        work.published_date = self.published_date;
        if let Some(doi) = self.doi.as_deref() {
            work.adopt_doi(doi, RecordSource::Orcid);
        }
        work.ensure_url();
        work
    }
}

fn parse_group(group: &Value) -> Option<ClaimedWork> {
    let summary = group.get("work-summary")?.as_array()?.first()?;

    let put_code = match summary.get("put-code") {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    };
    let title = summary
        .pointer("/title/title/value")
        .and_then(Value::as_str)
        .map(str::to_string);
    let journal = summary
        .pointer("/journal-title/value")
        .and_then(Value::as_str)
        .map(str::to_string);
    let work_type = summary
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string);
    let url = summary
        .pointer("/url/value")
        .and_then(Value::as_str)
        .map(str::to_string);
    let (year, published_date) = parse_publication_date(summary.get("publication-date"));
    let doi = summary
        .pointer("/external-ids/external-id")
        .and_then(Value::as_array)
        .and_then(|ids| {
            ids.iter().find_map(|id| {
                let kind = id.get("external-id-type").and_then(Value::as_str)?;
                if !kind.eq_ignore_ascii_case("doi") {
                    return None;
                }
                id.get("external-id-value")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
        });

    Some(ClaimedWork {
        put_code,
        title,
        journal,
        year,
        work_type,
        doi,
        url,
        published_date,
    })
}

// Publication dates arrive as {"year": {"value": "2020"}, "month": …},
// any part possibly null. The parts present compose a partial date; the
// year is also kept on its own for the metrics fallback.
fn parse_publication_date(value: Option<&Value>) -> (Option<i32>, Option<NaiveDate>) {
    let Some(value) = value else {
        return (None, None);
    };

    let part = |name: &str| {
        value
            .pointer(&format!("/{name}/value"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let year_raw = part("year");
    let month = part("month");
    let day = part("day");

    let year = year_raw.as_deref().and_then(|y| y.parse::<i32>().ok());
    let composed = year_raw.map(|y| {
        let mut out = y;
        if let Some(m) = month {
            out.push('-');
            out.push_str(&m);
            if let Some(d) = day {
                out.push('-');
                out.push_str(&d);
            }
        }
        out
    });
    let date = composed.as_deref().and_then(dates::parse_partial);

    (year, date)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
