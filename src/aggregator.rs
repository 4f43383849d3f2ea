use crate::fetcher::FeedFetcher;
use crate::metrics::MetricsLog;
use crate::queue::TranslationQueue;
use crate::store::ArticleStore;
use crate::translator::{TranslationEngine, Translator};
use crate::types::{
    AggregatorConfig, Article, FeedDescriptor, FetchMetric, MetricsSummary, Result,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Process-wide facade wiring the store, metrics, fetcher, scheduler, and
/// translation queue together. This is the surface the HTTP API layer
/// consumes; everything behind it is owned here and shared by handle.
pub struct NewsAggregator {
    store: Arc<ArticleStore>,
    metrics: Arc<MetricsLog>,
    queue: Arc<TranslationQueue>,
    scheduler: crate::scheduler::Scheduler,
}

impl NewsAggregator {
    pub fn new(catalog: Vec<FeedDescriptor>, config: AggregatorConfig) -> Result<Self> {
        let config = Arc::new(config);
        let store = Arc::new(ArticleStore::new());
        let metrics = Arc::new(MetricsLog::new());
        let queue = Arc::new(TranslationQueue::new(store.clone(), config.clone()));
        let fetcher = Arc::new(FeedFetcher::new(&config)?);
        let scheduler = crate::scheduler::Scheduler::new(
            catalog,
            fetcher,
            store.clone(),
            metrics.clone(),
            queue.clone(),
        );
        Ok(Self {
            store,
            metrics,
            queue,
            scheduler,
        })
    }

    pub fn start_scheduler(&self) -> Result<()> {
        self.scheduler.start()
    }

    pub fn stop_scheduler(&self) {
        self.scheduler.stop();
    }

    /// Build the translation client from the credential and start the
    /// queue's background tasks. A `None` credential leaves translation
    /// disabled for the process lifetime without affecting ingestion.
    pub fn init_translation_queue(&self, credential: Option<&str>) {
        self.queue.clone().init(Translator::from_credential(credential));
    }

    /// Start the queue against a caller-supplied engine.
    pub fn init_translation_queue_with_engine(&self, engine: Arc<dyn TranslationEngine>) {
        self.queue.clone().init(Translator::from_engine(engine));
    }

    pub fn stop_translation_queue(&self) {
        self.queue.stop();
    }

    /// Explicit attempt to run a translation cycle now. Collapses into an
    /// in-flight cycle if one is running; returns whether this call ran it.
    pub async fn trigger_queue_processing(&self) -> bool {
        self.queue.try_process().await
    }

    pub fn all_articles(&self) -> Vec<Article> {
        self.store.all_articles()
    }

    pub fn article_count(&self) -> usize {
        self.store.article_count()
    }

    pub fn untranslated_articles(&self, locale: &str) -> Vec<Article> {
        self.store.get_untranslated(locale)
    }

    pub fn store_translation(&self, id: &str, locale: &str, title: String, description: String) {
        self.store.store_translation(id, locale, title, description);
    }

    pub fn metrics(&self) -> MetricsSummary {
        self.metrics.summary()
    }

    pub fn recent_fetches(&self) -> Vec<FetchMetric> {
        self.metrics.recent_fetches()
    }

    pub async fn translate_on_demand(
        &self,
        texts: HashMap<String, String>,
        source_locale: &str,
        target_locale: &str,
    ) -> Result<HashMap<String, String>> {
        self.queue
            .translate_on_demand(texts, source_locale, target_locale)
            .await
    }

    pub fn is_translation_enabled(&self) -> bool {
        self.queue.is_translation_enabled()
    }
}
