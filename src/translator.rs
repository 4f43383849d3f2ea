use crate::types::{AggregatorError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The capability contract of the external translation provider: one call
/// translates a flat key -> text map between two locales. The provider may
/// omit keys it could not translate, or fail the call as a whole.
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    async fn batch_translate(
        &self,
        texts: HashMap<String, String>,
        source_locale: &str,
        target_locale: &str,
    ) -> Result<HashMap<String, String>>;
}

/// Shared handle to the translation capability. Absence of a credential at
/// startup is modeled as an explicit `Disabled` variant instead of a null
/// check at every call site.
#[derive(Clone)]
pub enum Translator {
    Disabled,
    Ready(Arc<dyn TranslationEngine>),
}

impl Translator {
    /// Build the handle once at startup. A missing credential disables
    /// translation for the process lifetime; ingestion is unaffected.
    pub fn from_credential(credential: Option<&str>) -> Self {
        match credential {
            Some(key) if !key.trim().is_empty() => {
                Translator::Ready(Arc::new(HttpTranslationEngine::new(key.trim())))
            }
            _ => Translator::Disabled,
        }
    }

    pub fn from_engine(engine: Arc<dyn TranslationEngine>) -> Self {
        Translator::Ready(engine)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Translator::Ready(_))
    }

    pub async fn translate(
        &self,
        texts: HashMap<String, String>,
        source_locale: &str,
        target_locale: &str,
    ) -> Result<HashMap<String, String>> {
        match self {
            Translator::Disabled => Err(AggregatorError::TranslatorDisabled),
            Translator::Ready(engine) => {
                engine
                    .batch_translate(texts, source_locale, target_locale)
                    .await
            }
        }
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    texts: &'a HashMap<String, String>,
    source_locale: &'a str,
    target_locale: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: HashMap<String, String>,
}

const DEFAULT_ENDPOINT: &str = "https://api.translation.example/v1/batch";

/// Thin client for the provider's batch endpoint. Provider failures map to
/// the `Translation` error variant so the queue can skip the batch.
pub struct HttpTranslationEngine {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl HttpTranslationEngine {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }
}

#[async_trait]
impl TranslationEngine for HttpTranslationEngine {
    async fn batch_translate(
        &self,
        texts: HashMap<String, String>,
        source_locale: &str,
        target_locale: &str,
    ) -> Result<HashMap<String, String>> {
        debug!(
            "Requesting translation of {} keys {} -> {}",
            texts.len(),
            source_locale,
            target_locale
        );
        let request = TranslateRequest {
            texts: &texts,
            source_locale,
            target_locale,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AggregatorError::Translation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AggregatorError::Translation(format!(
                "provider returned HTTP {}",
                status
            )));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| AggregatorError::Translation(format!("malformed response: {}", e)))?;
        Ok(parsed.translations)
    }
}

/// One recorded provider call made through the mock engine.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub keys: Vec<String>,
    pub source_locale: String,
    pub target_locale: String,
    pub at: std::time::Instant,
}

/// In-process stand-in for the provider, used by tests and local runs.
/// Translates by tagging each text with the target locale, and can be told
/// to fail specific calls or drop specific keys from the response.
pub struct MockTranslationEngine {
    calls: Mutex<Vec<MockCall>>,
    fail_calls: Mutex<Vec<usize>>,
    drop_keys: Mutex<Vec<String>>,
    delay_ms: u64,
}

impl MockTranslationEngine {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_calls: Mutex::new(Vec::new()),
            drop_keys: Mutex::new(Vec::new()),
            delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Fail the nth call (zero-based) with a provider error.
    pub fn fail_call(&self, index: usize) {
        self.fail_calls.lock().push(index);
    }

    /// Omit the given key from every response.
    pub fn drop_key(&self, key: &str) {
        self.drop_keys.lock().push(key.to_string());
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Default for MockTranslationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationEngine for MockTranslationEngine {
    async fn batch_translate(
        &self,
        texts: HashMap<String, String>,
        source_locale: &str,
        target_locale: &str,
    ) -> Result<HashMap<String, String>> {
        let call_index = {
            let mut calls = self.calls.lock();
            let mut keys: Vec<String> = texts.keys().cloned().collect();
            keys.sort();
            calls.push(MockCall {
                keys,
                source_locale: source_locale.to_string(),
                target_locale: target_locale.to_string(),
                at: std::time::Instant::now(),
            });
            calls.len() - 1
        };

        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }

        if self.fail_calls.lock().contains(&call_index) {
            return Err(AggregatorError::Translation("mock provider failure".to_string()));
        }

        let dropped = self.drop_keys.lock().clone();
        Ok(texts
            .into_iter()
            .filter(|(key, _)| !dropped.contains(key))
            .map(|(key, text)| (key, format!("[{}] {}", target_locale, text)))
            .collect())
    }
}
