use clap::Parser;
use news_aggregator::{default_catalog, AggregatorConfig, NewsAggregator};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "news-aggregator")]
#[command(about = "Multilingual news feed aggregator")]
struct Cli {
    /// Translation provider credential. Without it, feeds are still
    /// ingested but nothing is translated.
    #[arg(long, env = "TRANSLATOR_API_KEY")]
    api_key: Option<String>,

    /// Target locales for background translation.
    #[arg(long, value_delimiter = ',', default_value = "en,es,ar")]
    locales: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let config = AggregatorConfig {
        target_locales: cli.locales.clone(),
        ..AggregatorConfig::default()
    };

    let catalog = default_catalog()?;
    info!("Starting news aggregator with {} feeds", catalog.len());

    let aggregator = NewsAggregator::new(catalog, config)?;
    aggregator.start_scheduler()?;
    aggregator.init_translation_queue(cli.api_key.as_deref());

    if !aggregator.is_translation_enabled() {
        info!("No translation credential supplied; running ingestion only");
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    aggregator.stop_scheduler();
    aggregator.stop_translation_queue();

    let summary = aggregator.metrics();
    info!(
        "Final stats: {} fetches, {} articles added, {} failures",
        summary.total_fetches,
        summary.total_articles_added,
        summary.total_failures
    );
    Ok(())
}
