//! Article fetching and body-text extraction.

pub mod client;
pub mod extract;

pub use client::{ArticleFetcher, DEFAULT_USER_AGENT};
pub use extract::{extract_from_html, MAX_CONTENT_CHARS, MIN_PARAGRAPH_CHARS, NO_TITLE};
