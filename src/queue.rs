use crate::store::ArticleStore;
use crate::translator::Translator;
use crate::types::{AggregatorConfig, Article, Result};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep};
use tracing::{debug, info, warn};

/// Background translation cycle over the article store.
///
/// Two triggers attempt to enter the Processing state: a periodic timer and
/// a debounced wake signal fired by the ingestion pipeline after new
/// insertions. Entry is single-flight; while a cycle runs, further triggers
/// are no-ops. Ingestion never blocks on any of this: the wake signal is a
/// single-slot channel written with `try_send`.
pub struct TranslationQueue {
    store: Arc<ArticleStore>,
    config: Arc<AggregatorConfig>,
    translator: RwLock<Translator>,
    processing: AtomicBool,
    wake_tx: mpsc::Sender<()>,
    wake_rx: Mutex<Option<mpsc::Receiver<()>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl TranslationQueue {
    pub fn new(store: Arc<ArticleStore>, config: Arc<AggregatorConfig>) -> Self {
        let (wake_tx, wake_rx) = mpsc::channel(1);
        Self {
            store,
            config,
            translator: RwLock::new(Translator::Disabled),
            processing: AtomicBool::new(false),
            wake_tx,
            wake_rx: Mutex::new(Some(wake_rx)),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Swap in the translation capability. Split out of `init` so callers
    /// driving cycles by hand can install an engine without the background
    /// tasks.
    pub fn set_translator(&self, translator: Translator) {
        if !translator.is_enabled() {
            info!("Translation queue configured without a credential; translation stays disabled");
        }
        *self.translator.write() = translator;
    }

    /// Install the translation capability and start the background tasks.
    /// Called once at startup; with a disabled translator the cycle tasks
    /// still run but find nothing to do.
    pub fn init(self: Arc<Self>, translator: Translator) {
        self.set_translator(translator);

        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            warn!("Translation queue already started");
            return;
        }
        let Some(mut rx) = self.wake_rx.lock().take() else {
            warn!("Translation queue already started");
            return;
        };

        let queue = self.clone();
        let period = Duration::from_secs(self.config.queue_interval_secs);
        tasks.push(tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                ticker.tick().await;
                queue.try_process().await;
            }
        }));

        let queue = self.clone();
        let debounce = Duration::from_millis(self.config.wake_debounce_ms);
        tasks.push(tokio::spawn(async move {
            while rx.recv().await.is_some() {
                // Coalesce bursts of insertions into one cycle.
                sleep(debounce).await;
                while rx.try_recv().is_ok() {}
                queue.try_process().await;
            }
        }));
    }

    /// Fire-and-forget wake from the ingestion path. A full slot means a
    /// wake is already pending and the signal coalesces.
    pub fn notify_new_articles(&self) {
        let _ = self.wake_tx.try_send(());
    }

    /// Cancel the periodic and wake tasks. Idempotent; callable even if
    /// `init` never ran.
    pub fn stop(&self) {
        let mut tasks = self.tasks.lock();
        for task in tasks.drain(..) {
            task.abort();
        }
    }

    /// Attempt to enter Processing. Returns false when a cycle is already
    /// in flight and this attempt collapsed into it.
    pub async fn try_process(&self) -> bool {
        if self.processing.swap(true, Ordering::SeqCst) {
            debug!("Translation cycle already in flight, skipping trigger");
            return false;
        }
        self.process_cycle().await;
        self.processing.store(false, Ordering::SeqCst);
        true
    }

    async fn process_cycle(&self) {
        let translator = self.translator.read().clone();
        if !translator.is_enabled() {
            return;
        }

        for locale in &self.config.target_locales {
            self.process_locale(&translator, locale).await;
        }
    }

    async fn process_locale(&self, translator: &Translator, locale: &str) {
        let candidates: Vec<Article> = self
            .store
            .get_untranslated(locale)
            .into_iter()
            .filter(|a| a.source_locale != locale)
            .collect();

        if candidates.is_empty() {
            return;
        }
        debug!(
            "Translating {} articles into '{}'",
            candidates.len(),
            locale
        );

        for (index, batch) in candidates.chunks(self.config.translation_batch_size).enumerate() {
            if index > 0 {
                // Provider rate-limit courtesy between successive calls.
                sleep(Duration::from_millis(self.config.batch_delay_ms)).await;
            }

            let mut texts = HashMap::new();
            for article in batch {
                texts.insert(title_key(&article.id), article.title.clone());
                texts.insert(description_key(&article.id), article.description.clone());
            }

            // A mixed-source batch deliberately uses the first article's
            // source locale for the whole call.
            let source_locale = batch[0].source_locale.clone();
            match translator.translate(texts, &source_locale, locale).await {
                Ok(translated) => {
                    for article in batch {
                        let title = translated
                            .get(&title_key(&article.id))
                            .cloned()
                            .unwrap_or_else(|| article.title.clone());
                        let description = translated
                            .get(&description_key(&article.id))
                            .cloned()
                            .unwrap_or_else(|| article.description.clone());
                        self.store
                            .store_translation(&article.id, locale, title, description);
                    }
                    info!("Translated batch of {} articles into '{}'", batch.len(), locale);
                }
                Err(e) => {
                    // Whole batch skipped; the articles stay untranslated
                    // and are retried on the next cycle.
                    warn!("Translation batch for '{}' failed: {}", locale, e);
                }
            }
        }
    }

    /// Direct pass-through to the provider for arbitrary text, bypassing
    /// the store and batching. Fails fast when translation was never
    /// configured.
    pub async fn translate_on_demand(
        &self,
        texts: HashMap<String, String>,
        source_locale: &str,
        target_locale: &str,
    ) -> Result<HashMap<String, String>> {
        let translator = self.translator.read().clone();
        translator
            .translate(texts, source_locale, target_locale)
            .await
    }

    pub fn is_translation_enabled(&self) -> bool {
        self.translator.read().is_enabled()
    }
}

fn title_key(id: &str) -> String {
    format!("{}::title", id)
}

fn description_key(id: &str) -> String {
    format!("{}::description", id)
}
