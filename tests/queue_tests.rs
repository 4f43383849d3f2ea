use chrono::Utc;
use news_aggregator::{
    AggregatorConfig, AggregatorError, Article, ArticleStore, MockTranslationEngine,
    TranslationQueue, Translator,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn article(seq: usize, source_locale: &str) -> Article {
    let id = format!("a-{}", seq);
    Article {
        guid: Some(id.clone()),
        title: format!("Title {}", id),
        description: format!("Description {}", id),
        link: format!("https://example.com/{}", id),
        pub_date: String::new(),
        category: "news".to_string(),
        subcategory: "world".to_string(),
        source: "Test Wire".to_string(),
        source_locale: source_locale.to_string(),
        ingested_at: Utc::now(),
        translations: HashMap::new(),
        id,
    }
}

fn test_config() -> AggregatorConfig {
    AggregatorConfig {
        translation_batch_size: 20,
        batch_delay_ms: 150,
        wake_debounce_ms: 20,
        target_locales: vec!["es".to_string()],
        ..AggregatorConfig::default()
    }
}

fn setup(
    articles: usize,
    config: AggregatorConfig,
) -> (Arc<ArticleStore>, Arc<TranslationQueue>, Arc<MockTranslationEngine>) {
    let store = Arc::new(ArticleStore::new());
    for seq in 0..articles {
        store.upsert(article(seq, "en"));
    }
    let queue = Arc::new(TranslationQueue::new(store.clone(), Arc::new(config)));
    let engine = Arc::new(MockTranslationEngine::new());
    queue.set_translator(Translator::from_engine(engine.clone()));
    (store, queue, engine)
}

#[tokio::test]
async fn cycle_translates_every_untranslated_article() {
    let (store, queue, engine) = setup(3, test_config());

    assert!(queue.try_process().await);

    assert_eq!(engine.call_count(), 1);
    assert!(store.get_untranslated("es").is_empty());
    for stored in store.all_articles() {
        let translation = &stored.translations["es"];
        assert_eq!(translation.title, format!("[es] {}", stored.title));
        assert_eq!(translation.description, format!("[es] {}", stored.description));
    }
}

#[tokio::test]
async fn articles_are_never_translated_into_their_source_locale() {
    let (store, queue, engine) = setup(0, test_config());
    store.upsert(article(0, "es"));

    queue.try_process().await;

    assert_eq!(engine.call_count(), 0);
    assert!(store.all_articles()[0].translations.is_empty());
}

#[tokio::test]
async fn twenty_five_articles_make_two_delayed_provider_calls() {
    let (store, queue, engine) = setup(25, test_config());

    queue.try_process().await;

    let calls = engine.calls();
    assert_eq!(calls.len(), 2);
    // Two keys per article: 20 articles then the remaining 5.
    assert_eq!(calls[0].keys.len(), 40);
    assert_eq!(calls[1].keys.len(), 10);
    assert!(
        calls[1].at.duration_since(calls[0].at) >= Duration::from_millis(150),
        "inter-batch delay was not enforced"
    );
    assert!(store.get_untranslated("es").is_empty());
}

#[tokio::test]
async fn failed_batch_writes_nothing_but_later_batches_proceed() {
    let (store, queue, engine) = setup(25, test_config());
    engine.fail_call(0);

    queue.try_process().await;

    assert_eq!(engine.call_count(), 2);
    // The failed batch of 20 stays untranslated; the batch of 5 landed.
    assert_eq!(store.get_untranslated("es").len(), 20);

    // The next cycle picks the leftovers back up.
    queue.try_process().await;
    assert!(store.get_untranslated("es").is_empty());
}

#[tokio::test]
async fn missing_response_keys_fall_back_to_original_text() {
    let (store, queue, engine) = setup(1, test_config());
    engine.drop_key("a-0::title");

    queue.try_process().await;

    let stored = &store.all_articles()[0];
    let translation = &stored.translations["es"];
    assert_eq!(translation.title, stored.title);
    assert_eq!(translation.description, format!("[es] {}", stored.description));
}

#[tokio::test]
async fn concurrent_triggers_collapse_into_one_cycle() {
    let store = Arc::new(ArticleStore::new());
    store.upsert(article(0, "en"));
    let queue = Arc::new(TranslationQueue::new(store.clone(), Arc::new(test_config())));
    let engine = Arc::new(MockTranslationEngine::new().with_delay(200));
    queue.set_translator(Translator::from_engine(engine.clone()));

    let (first, second) = tokio::join!(queue.try_process(), queue.try_process());

    assert!(first);
    assert!(!second);
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn on_demand_fails_fast_when_translation_is_disabled() {
    let store = Arc::new(ArticleStore::new());
    let queue = TranslationQueue::new(store, Arc::new(test_config()));

    let result = queue
        .translate_on_demand(
            HashMap::from([("greeting".to_string(), "Hello".to_string())]),
            "en",
            "fr",
        )
        .await;

    assert!(matches!(result, Err(AggregatorError::TranslatorDisabled)));
}

#[tokio::test]
async fn on_demand_bypasses_store_and_batching() {
    let (store, queue, engine) = setup(0, test_config());

    let translated = queue
        .translate_on_demand(
            HashMap::from([("greeting".to_string(), "Hello".to_string())]),
            "en",
            "fr",
        )
        .await
        .expect("translation succeeds");

    assert_eq!(translated["greeting"], "[fr] Hello");
    assert_eq!(engine.call_count(), 1);
    assert_eq!(engine.calls()[0].target_locale, "fr");
    assert_eq!(store.article_count(), 0);
}

#[tokio::test]
async fn wake_signal_drives_a_background_cycle() {
    let store = Arc::new(ArticleStore::new());
    store.upsert(article(0, "en"));
    store.upsert(article(1, "en"));
    let queue = Arc::new(TranslationQueue::new(store.clone(), Arc::new(test_config())));
    let engine = Arc::new(MockTranslationEngine::new());
    queue.clone().init(Translator::from_engine(engine));

    queue.notify_new_articles();
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(store.get_untranslated("es").is_empty());
    queue.stop();
}
