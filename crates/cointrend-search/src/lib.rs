//! Discovery source backed by the Brave web search API.

pub mod client;
pub mod types;

pub use client::BraveSearchClient;
pub use types::{BraveSearchResponse, BraveWebResult};
