pub mod aggregator;
pub mod catalog;
pub mod fetcher;
pub mod metrics;
pub mod parser;
pub mod pipeline;
pub mod queue;
pub mod sanitize;
pub mod scheduler;
pub mod store;
pub mod translator;
pub mod types;

pub use aggregator::NewsAggregator;
pub use catalog::default_catalog;
pub use fetcher::{FeedFetcher, FetchOutcome};
pub use metrics::MetricsLog;
pub use queue::TranslationQueue;
pub use scheduler::Scheduler;
pub use store::{derive_article_id, ArticleStore};
pub use translator::{HttpTranslationEngine, MockTranslationEngine, TranslationEngine, Translator};
pub use types::*;
