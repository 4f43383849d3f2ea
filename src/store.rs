use crate::types::{Article, FeedCacheEntry, Translation};
use chrono::Utc;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

/// Derive the canonical dedup key for an item: a non-empty guid is used
/// verbatim (trimmed), otherwise the key is a content hash of the link.
pub fn derive_article_id(guid: Option<&str>, link: &str) -> String {
    if let Some(guid) = guid {
        let trimmed = guid.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let mut hasher = Sha256::new();
    hasher.update(link.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// In-memory canonical article store plus the per-feed conditional-request
/// cache. All operations are synchronous; each takes the relevant lock for
/// the duration of the call and never across an await point, so they appear
/// atomic to every task touching them.
pub struct ArticleStore {
    articles: RwLock<HashMap<String, Article>>,
    feed_cache: RwLock<HashMap<String, FeedCacheEntry>>,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self {
            articles: RwLock::new(HashMap::new()),
            feed_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Insert an article if its id is not yet present. Returns true when the
    /// article was newly inserted; an existing article is never overwritten.
    pub fn upsert(&self, article: Article) -> bool {
        let mut articles = self.articles.write();
        if articles.contains_key(&article.id) {
            return false;
        }
        debug!("Storing new article {} ({})", article.id, article.source);
        articles.insert(article.id.clone(), article);
        true
    }

    pub fn article_count(&self) -> usize {
        self.articles.read().len()
    }

    pub fn all_articles(&self) -> Vec<Article> {
        self.articles.read().values().cloned().collect()
    }

    /// Every article with no translation entry for `locale`. Order is not
    /// significant.
    pub fn get_untranslated(&self, locale: &str) -> Vec<Article> {
        self.articles
            .read()
            .values()
            .filter(|a| !a.translations.contains_key(locale))
            .cloned()
            .collect()
    }

    /// Set or overwrite the translation entry for `locale` with a fresh
    /// timestamp. Unknown article ids are ignored rather than creating a
    /// dangling entry.
    pub fn store_translation(&self, id: &str, locale: &str, title: String, description: String) {
        let mut articles = self.articles.write();
        if let Some(article) = articles.get_mut(id) {
            article.translations.insert(
                locale.to_string(),
                Translation {
                    title,
                    description,
                    translated_at: Utc::now(),
                },
            );
        } else {
            debug!("Dropping translation for unknown article id {}", id);
        }
    }

    pub fn get_feed_cache(&self, url: &str) -> Option<FeedCacheEntry> {
        self.feed_cache.read().get(url).cloned()
    }

    /// Last write wins.
    pub fn set_feed_cache(&self, url: &str, entry: FeedCacheEntry) {
        self.feed_cache.write().insert(url.to_string(), entry);
    }
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::new()
    }
}
