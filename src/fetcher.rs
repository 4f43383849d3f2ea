use crate::types::{AggregatorConfig, AggregatorError, FeedCacheEntry, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Result of one conditional feed request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The server reported the feed unchanged since the cached validators.
    NotModified,
    /// A fresh body, together with any validator headers the response
    /// carried for the next poll.
    Fetched {
        body: String,
        etag: Option<String>,
        last_modified: Option<String>,
    },
}

/// Validator-aware HTTP fetcher shared by all feed tasks.
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    pub fn new(config: &AggregatorConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self { client })
    }

    /// Perform one conditional GET for a feed URL. A request timeout or a
    /// non-success status surfaces as an error; 304 is a success path.
    pub async fn fetch(&self, url: &str, cached: Option<&FeedCacheEntry>) -> Result<FetchOutcome> {
        let mut request = self.client.get(url);
        if let Some(cached) = cached {
            if let Some(etag) = &cached.etag {
                request = request.header("If-None-Match", etag);
            }
            if let Some(last_modified) = &cached.last_modified {
                request = request.header("If-Modified-Since", last_modified);
            }
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_MODIFIED {
            debug!("Feed not modified: {}", url);
            return Ok(FetchOutcome::NotModified);
        }

        if !status.is_success() {
            return Err(AggregatorError::General(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let etag = response
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let last_modified = response
            .headers()
            .get("last-modified")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await?;
        debug!("Fetched feed {} ({} bytes)", url, body.len());

        Ok(FetchOutcome::Fetched {
            body,
            etag,
            last_modified,
        })
    }
}
