use crate::fetcher::FeedFetcher;
use crate::metrics::MetricsLog;
use crate::pipeline::poll_feed;
use crate::queue::TranslationQueue;
use crate::store::ArticleStore;
use crate::types::{AggregatorError, FeedDescriptor, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

/// Owns one independent periodic trigger per feed descriptor. Feeds never
/// share a task, so a slow or failing feed cannot delay any other.
pub struct Scheduler {
    catalog: Vec<FeedDescriptor>,
    fetcher: Arc<FeedFetcher>,
    store: Arc<ArticleStore>,
    metrics: Arc<MetricsLog>,
    queue: Arc<TranslationQueue>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(
        catalog: Vec<FeedDescriptor>,
        fetcher: Arc<FeedFetcher>,
        store: Arc<ArticleStore>,
        metrics: Arc<MetricsLog>,
        queue: Arc<TranslationQueue>,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            store,
            metrics,
            queue,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Register one periodic task per feed. The first tick fires
    /// immediately, giving the unconditional startup pass across all feeds.
    /// Each tick detaches its fetch, so a response outlasting the poll
    /// interval can overlap the next tick for the same feed; the idempotent
    /// store makes that duplicate in-flight work harmless.
    pub fn start(&self) -> Result<()> {
        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            return Err(AggregatorError::General(
                "Scheduler is already running".to_string(),
            ));
        }

        info!("Starting scheduler with {} feeds", self.catalog.len());
        for descriptor in &self.catalog {
            let descriptor = descriptor.clone();
            let fetcher = self.fetcher.clone();
            let store = self.store.clone();
            let metrics = self.metrics.clone();
            let queue = self.queue.clone();

            tasks.push(tokio::spawn(async move {
                let period = Duration::from_secs(descriptor.poll_interval_minutes * 60);
                let mut ticker = interval(period);
                loop {
                    ticker.tick().await;
                    debug!("Polling feed {}", descriptor.url);
                    tokio::spawn(poll_feed(
                        descriptor.clone(),
                        fetcher.clone(),
                        store.clone(),
                        metrics.clone(),
                        queue.clone(),
                    ));
                }
            }));
        }
        Ok(())
    }

    /// Cancel all periodic triggers without waiting for in-flight fetches,
    /// which complete or time out on their own. Idempotent; callable even
    /// if the scheduler never started.
    pub fn stop(&self) {
        let mut tasks = self.tasks.lock();
        if tasks.is_empty() {
            return;
        }
        info!("Stopping scheduler");
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
