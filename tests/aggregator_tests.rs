use news_aggregator::{
    AggregatorConfig, AggregatorError, MockTranslationEngine, NewsAggregator,
};
use std::collections::HashMap;
use std::sync::Arc;

fn config() -> AggregatorConfig {
    AggregatorConfig {
        target_locales: vec!["es".to_string()],
        ..AggregatorConfig::default()
    }
}

#[tokio::test]
async fn translation_stays_disabled_without_a_credential() {
    let aggregator = NewsAggregator::new(Vec::new(), config()).expect("aggregator builds");
    aggregator.init_translation_queue(None);

    assert!(!aggregator.is_translation_enabled());
    let result = aggregator
        .translate_on_demand(
            HashMap::from([("k".to_string(), "text".to_string())]),
            "en",
            "es",
        )
        .await;
    assert!(matches!(result, Err(AggregatorError::TranslatorDisabled)));

    // Ingestion-side surfaces still work.
    assert_eq!(aggregator.article_count(), 0);
    assert_eq!(aggregator.metrics().total_fetches, 0);
    aggregator.stop_translation_queue();
}

#[tokio::test]
async fn blank_credential_counts_as_absent() {
    let aggregator = NewsAggregator::new(Vec::new(), config()).expect("aggregator builds");
    aggregator.init_translation_queue(Some("   "));
    assert!(!aggregator.is_translation_enabled());
    aggregator.stop_translation_queue();
}

#[tokio::test]
async fn on_demand_translation_flows_through_the_facade() {
    let aggregator = NewsAggregator::new(Vec::new(), config()).expect("aggregator builds");
    let engine = Arc::new(MockTranslationEngine::new());
    aggregator.init_translation_queue_with_engine(engine.clone());
    assert!(aggregator.is_translation_enabled());

    let translated = aggregator
        .translate_on_demand(
            HashMap::from([("headline".to_string(), "Hello world".to_string())]),
            "en",
            "es",
        )
        .await
        .expect("translation succeeds");
    assert_eq!(translated["headline"], "[es] Hello world");

    // An explicit trigger with an empty store is a clean no-op cycle.
    assert!(aggregator.trigger_queue_processing().await);

    aggregator.stop_translation_queue();
    aggregator.stop_scheduler();
}

#[tokio::test]
async fn manual_translations_land_on_stored_articles() {
    let aggregator = NewsAggregator::new(Vec::new(), config()).expect("aggregator builds");

    // Unknown ids are ignored rather than creating dangling entries.
    aggregator.store_translation("ghost", "es", "T".to_string(), "D".to_string());
    assert!(aggregator.all_articles().is_empty());
    assert!(aggregator.untranslated_articles("es").is_empty());
}
