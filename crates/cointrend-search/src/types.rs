//! Response shapes for the Brave web search endpoint.
//!
//! Only the fields the discovery step reads are modelled; everything else in
//! the payload is ignored.

use chrono::{DateTime, NaiveDateTime, Utc};
use cointrend_core::Candidate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct BraveSearchResponse {
    #[serde(default)]
    pub web: Option<BraveWebSection>,
}

#[derive(Debug, Deserialize)]
pub struct BraveWebSection {
    #[serde(default)]
    pub results: Vec<BraveWebResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BraveWebResult {
    pub url: Option<String>,
    pub title: Option<String>,
    pub page_age: Option<String>,
}

impl BraveSearchResponse {
    /// Flatten into candidates, dropping results without a usable URL.
    #[must_use]
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .filter_map(BraveWebResult::into_candidate)
            .collect()
    }
}

impl BraveWebResult {
    fn into_candidate(self) -> Option<Candidate> {
        let url = self.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())?;
        Some(Candidate {
            url,
            title: self.title.map(|t| t.trim().to_string()).unwrap_or_default(),
            published_at: self.page_age.as_deref().and_then(parse_page_age),
        })
    }
}

/// Brave reports `page_age` either as RFC 3339 or as a naive
/// `YYYY-MM-DDTHH:MM:SS` timestamp, which is read as UTC.
fn parse_page_age(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
