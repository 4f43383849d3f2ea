use crate::types::{FeedDescriptor, Result};

/// The built-in feed catalog: a fixed, ordered list of syndicated news
/// sources across languages. Poll intervals stay within 2 to 5 minutes.
pub fn default_catalog() -> Result<Vec<FeedDescriptor>> {
    Ok(vec![
        FeedDescriptor::new(
            "https://feeds.bbci.co.uk/news/world/rss.xml",
            "news",
            "world",
            "BBC News",
            3,
            "en",
        )?,
        FeedDescriptor::new(
            "https://rss.cnn.com/rss/edition.rss",
            "news",
            "general",
            "CNN",
            4,
            "en",
        )?,
        FeedDescriptor::new(
            "https://www.lemonde.fr/rss/une.xml",
            "news",
            "general",
            "Le Monde",
            5,
            "fr",
        )?,
        FeedDescriptor::new(
            "https://feeds.elpais.com/mrss-s/pages/ep/site/elpais.com/portada",
            "news",
            "general",
            "El País",
            5,
            "es",
        )?,
        FeedDescriptor::new(
            "https://www.spiegel.de/schlagzeilen/tops/index.rss",
            "news",
            "headlines",
            "Der Spiegel",
            4,
            "de",
        )?,
        FeedDescriptor::new(
            "https://www.aljazeera.com/xml/rss/all.xml",
            "news",
            "world",
            "Al Jazeera",
            2,
            "en",
        )?,
    ])
}
