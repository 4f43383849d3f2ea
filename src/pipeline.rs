use crate::fetcher::{FeedFetcher, FetchOutcome};
use crate::metrics::MetricsLog;
use crate::parser::parse_items;
use crate::queue::TranslationQueue;
use crate::store::{derive_article_id, ArticleStore};
use crate::types::{Article, FeedCacheEntry, FeedDescriptor, FetchMetric};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One full fetch-and-store pass for a single feed: conditional fetch,
/// parse, dedup insert, translation wake, metric. Every failure mode is
/// absorbed here and lands in the metric; nothing propagates to the
/// scheduler.
pub async fn poll_feed(
    descriptor: FeedDescriptor,
    fetcher: Arc<FeedFetcher>,
    store: Arc<ArticleStore>,
    metrics: Arc<MetricsLog>,
    queue: Arc<TranslationQueue>,
) {
    let started = Instant::now();
    let timestamp = Utc::now();
    let cached = store.get_feed_cache(&descriptor.url);

    let mut metric = FetchMetric {
        feed_url: descriptor.url.clone(),
        source: descriptor.source.clone(),
        timestamp,
        duration_ms: 0,
        articles_added: 0,
        items_in_feed: 0,
        not_modified: false,
        error: None,
    };

    match fetcher.fetch(&descriptor.url, cached.as_ref()).await {
        Ok(FetchOutcome::NotModified) => {
            metric.not_modified = true;
        }
        Ok(FetchOutcome::Fetched {
            body,
            etag,
            last_modified,
        }) => {
            if etag.is_some() || last_modified.is_some() {
                store.set_feed_cache(
                    &descriptor.url,
                    FeedCacheEntry {
                        etag,
                        last_modified,
                    },
                );
            }

            let items = parse_items(&body);
            metric.items_in_feed = items.len();

            let mut added = 0;
            for item in items {
                let id = derive_article_id(item.guid.as_deref(), &item.link);
                let article = Article {
                    id,
                    guid: item.guid,
                    title: item.title,
                    description: item.description,
                    link: item.link,
                    pub_date: item.pub_date,
                    category: descriptor.category.clone(),
                    subcategory: descriptor.subcategory.clone(),
                    source: descriptor.source.clone(),
                    source_locale: descriptor.source_locale.clone(),
                    ingested_at: Utc::now(),
                    translations: HashMap::new(),
                };
                if store.upsert(article) {
                    added += 1;
                }
            }
            metric.articles_added = added;

            if added > 0 {
                info!(
                    "Feed {}: {} new of {} items",
                    descriptor.source, added, metric.items_in_feed
                );
                queue.notify_new_articles();
            } else {
                debug!("Feed {}: no new items", descriptor.source);
            }
        }
        Err(e) => {
            warn!("Fetch failed for {}: {}", descriptor.url, e);
            metric.error = Some(e.to_string());
        }
    }

    metric.duration_ms = started.elapsed().as_millis() as u64;
    metrics.record(metric);
}
