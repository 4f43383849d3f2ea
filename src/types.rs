use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Descriptor for one syndicated feed, supplied by the static catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDescriptor {
    pub url: String,
    pub category: String,
    pub subcategory: String,
    pub source: String,
    /// Minutes between polls. The catalog keeps this in [2, 5]; the
    /// scheduler trusts whatever value the descriptor carries.
    pub poll_interval_minutes: u64,
    pub source_locale: String,
}

impl FeedDescriptor {
    pub fn new(
        url: impl Into<String>,
        category: impl Into<String>,
        subcategory: impl Into<String>,
        source: impl Into<String>,
        poll_interval_minutes: u64,
        source_locale: impl Into<String>,
    ) -> Result<Self> {
        let url = url.into();
        let parsed = url::Url::parse(&url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AggregatorError::General(format!(
                "unsupported feed URL scheme: {}",
                parsed.scheme()
            )));
        }
        Ok(Self {
            url,
            category: category.into(),
            subcategory: subcategory.into(),
            source: source.into(),
            poll_interval_minutes,
            source_locale: source_locale.into(),
        })
    }
}

/// One stored translation of an article's title and description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub title: String,
    pub description: String,
    pub translated_at: DateTime<Utc>,
}

/// Canonical article record. Core fields never change after the first
/// insert; only `translations` accumulates entries over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub guid: Option<String>,
    pub title: String,
    pub description: String,
    pub link: String,
    /// Raw upstream date text, not necessarily parseable.
    pub pub_date: String,
    pub category: String,
    pub subcategory: String,
    pub source: String,
    pub source_locale: String,
    pub ingested_at: DateTime<Utc>,
    /// Target locale code -> translation.
    pub translations: HashMap<String, Translation>,
}

/// Validator headers remembered per feed URL for conditional requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedCacheEntry {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

/// Outcome of a single fetch attempt, immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchMetric {
    pub feed_url: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub articles_added: usize,
    pub items_in_feed: usize,
    pub not_modified: bool,
    pub error: Option<String>,
}

/// Summary derived from the retained fetch history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_fetches: usize,
    pub total_articles_added: usize,
    pub total_failures: usize,
    pub total_not_modified: usize,
    pub avg_duration_ms: f64,
}

/// Tunables shared across the fetcher, queue, and scheduler.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_redirects: usize,
    /// Articles per translation-provider call.
    pub translation_batch_size: usize,
    /// Pause between successive provider calls within one locale.
    pub batch_delay_ms: u64,
    /// Coalescing delay on the ingestion-side wake signal.
    pub wake_debounce_ms: u64,
    /// Period of the queue's own timer.
    pub queue_interval_secs: u64,
    pub target_locales: Vec<String>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            user_agent: "news-aggregator/0.1".to_string(),
            request_timeout_secs: 15,
            max_redirects: 5,
            translation_batch_size: 20,
            batch_delay_ms: 1_000,
            wake_debounce_ms: 1_000,
            queue_interval_secs: 30,
            target_locales: vec!["en".to_string(), "es".to_string(), "ar".to_string()],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Translation provider error: {0}")]
    Translation(String),

    #[error("Translation is not configured (no credential supplied)")]
    TranslatorDisabled,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
