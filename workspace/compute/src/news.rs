use common::NewsCard;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of cards the landing page feed always holds.
pub const FEED_SIZE: usize = 9;

const PLACEHOLDER_TEXT: &str = "Market updates and financial insights";
const DEFAULT_IMAGE: &str = "/default-news.png";
const DEFAULT_PUBLISHER: &str = "Financial News";
const DEFAULT_USERNAME: &str = "@financialnews";
const UNTITLED: &str = "News Title Unavailable";

/// A news hit from the search upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub resolutions: Vec<ThumbnailResolution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailResolution {
    pub url: String,
}

/// The card used to pad the feed, and to replace it entirely when search fails.
pub fn placeholder_card() -> NewsCard {
    NewsCard {
        text: PLACEHOLDER_TEXT.to_string(),
        image_src: DEFAULT_IMAGE.to_string(),
        name: DEFAULT_PUBLISHER.to_string(),
        username: DEFAULT_USERNAME.to_string(),
    }
}

pub fn placeholder_feed() -> Vec<NewsCard> {
    vec![placeholder_card(); FEED_SIZE]
}

impl From<&SearchArticle> for NewsCard {
    fn from(article: &SearchArticle) -> Self {
        let publisher = article.publisher.as_deref().filter(|p| !p.is_empty());
        NewsCard {
            text: article
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            image_src: article
                .thumbnail
                .as_ref()
                .and_then(|thumb| thumb.resolutions.first())
                .map(|res| res.url.clone())
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            name: publisher.unwrap_or(DEFAULT_PUBLISHER).to_string(),
            username: publisher.map(publisher_handle).unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
        }
    }
}

/// `"Economic Times"` becomes `"@economictimes"`.
fn publisher_handle(publisher: &str) -> String {
    let handle: String = publisher
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("@{}", handle)
}

/// Flattens per-symbol results in order into exactly `FEED_SIZE` cards.
pub fn build_feed(results: Vec<Vec<SearchArticle>>) -> Vec<NewsCard> {
    let mut feed: Vec<NewsCard> = results
        .iter()
        .flatten()
        .take(FEED_SIZE)
        .map(NewsCard::from)
        .collect();

    let real = feed.len();
    feed.resize(FEED_SIZE, placeholder_card());
    debug!("Built news feed with {} real and {} placeholder cards", real, FEED_SIZE - real);
    feed
}
