//! Pure HTML-to-article extraction.
//!
//! Kept free of I/O so the heuristics can be tested against fixture markup.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use cointrend_core::ExtractedArticle;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Title used when the document carries none.
pub const NO_TITLE: &str = "No title found";

/// A paragraph counts as body text only if it is strictly longer than this.
pub const MIN_PARAGRAPH_CHARS: usize = 50;

/// Upper bound on returned body text, in characters.
pub const MAX_CONTENT_CHARS: usize = 10_000;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static OG_TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("valid selector"));
static PARAGRAPH_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid selector"));
static PUBLISHED_TIME_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="article:published_time"]"#).expect("valid selector")
});
static PUBDATE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="pubdate"]"#).expect("valid selector"));
static TIME_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time[datetime]").expect("valid selector"));

/// Derive title, body text, and publication time from an HTML document.
///
/// Returns `None` when no paragraph is long enough to count as body text.
#[must_use]
pub fn extract_from_html(html: &str) -> Option<ExtractedArticle> {
    let document = Html::parse_document(html);

    let content = extract_content(&document);
    if content.is_empty() {
        return None;
    }

    Some(ExtractedArticle {
        title: extract_title(&document),
        content,
        published_at: extract_published_at(&document),
    })
}

fn extract_title(document: &Html) -> String {
    let from_title_tag = document
        .select(&TITLE_SEL)
        .next()
        .map(|el| collapse_whitespace(&element_text(el)))
        .filter(|t| !t.is_empty());

    from_title_tag
        .or_else(|| {
            document
                .select(&OG_TITLE_SEL)
                .filter_map(|el| el.value().attr("content"))
                .map(collapse_whitespace)
                .find(|t| !t.is_empty())
        })
        .unwrap_or_else(|| NO_TITLE.to_string())
}

fn extract_content(document: &Html) -> String {
    let joined = document
        .select(&PARAGRAPH_SEL)
        .map(|el| collapse_whitespace(&element_text(el)))
        .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect::<Vec<_>>()
        .join("\n\n");

    truncate_chars(joined, MAX_CONTENT_CHARS)
}

fn extract_published_at(document: &Html) -> Option<DateTime<Utc>> {
    let meta_values = [&*PUBLISHED_TIME_SEL, &*PUBDATE_SEL]
        .into_iter()
        .flat_map(|sel| document.select(sel))
        .filter_map(|el| el.value().attr("content"));
    let time_values = document
        .select(&TIME_SEL)
        .filter_map(|el| el.value().attr("datetime"));

    meta_values.chain(time_values).find_map(parse_timestamp)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Truncate to at most `max` characters without splitting a code point.
pub(crate) fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
    text
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
