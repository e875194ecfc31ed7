//! # Quote-of-the-Day Enrichment
//!
//! Optional outbound call made when a note is created. The production
//! client reads `quote.body` from a favqs-style endpoint:
//!
//! ```json
//! { "quote": { "body": "Simplicity is prerequisite for reliability." } }
//! ```
//!
//! Callers treat every error as non-fatal.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

/// Errors from fetching a quote.
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    /// Transport failure or client-side timeout.
    #[error("quote request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("quote service returned status {0}")]
    Status(u16),

    /// Upstream answered 2xx with no usable quote.
    #[error("quote service returned an empty quote")]
    Empty,
}

/// Source of text appended to new notes.
#[async_trait]
pub trait ContentEnricher: Send + Sync {
    /// Fetch the current quote.
    async fn fetch_quote(&self) -> Result<String, EnrichmentError>;
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    quote: Quote,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    body: String,
}

/// HTTP client for a quote-of-the-day endpoint.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    http: reqwest::Client,
    url: Url,
}

impl QuoteClient {
    /// Build a client that GETs `url`, giving up after `timeout`.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, EnrichmentError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }
}

#[async_trait]
impl ContentEnricher for QuoteClient {
    async fn fetch_quote(&self) -> Result<String, EnrichmentError> {
        let resp = self.http.get(self.url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }
        let parsed: QuoteResponse = resp.json().await?;
        let body = parsed.quote.body.trim();
        if body.is_empty() {
            return Err(EnrichmentError::Empty);
        }
        Ok(body.to_string())
    }
}
