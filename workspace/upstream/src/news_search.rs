use async_trait::async_trait;
use common::NewsCard;
use compute::news::{SearchArticle, build_feed, placeholder_feed};
use futures::future::try_join_all;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::client::HttpClient;
use crate::error::Result;

/// A news search upstream.
#[async_trait]
pub trait NewsSearch: Send + Sync {
    async fn search_news(&self, symbol: &str, count: u32) -> Result<Vec<SearchArticle>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<Option<SearchArticle>>,
}

/// Yahoo Finance search (`/v1/finance/search`), news only.
#[derive(Debug, Clone)]
pub struct YahooNewsClient {
    client: HttpClient,
}

impl YahooNewsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(base_url, timeout)?,
        })
    }
}

#[async_trait]
impl NewsSearch for YahooNewsClient {
    #[instrument(skip(self))]
    async fn search_news(&self, symbol: &str, count: u32) -> Result<Vec<SearchArticle>> {
        let query = [
            ("q", symbol.to_string()),
            ("newsCount", count.to_string()),
            ("quotesCount", "0".to_string()),
        ];
        let response: SearchResponse = self.client.get_json(&["v1", "finance", "search"], &query).await?;
        let articles: Vec<SearchArticle> = response.news.into_iter().flatten().collect();
        debug!("Search for {} returned {} articles", symbol, articles.len());
        Ok(articles)
    }
}

/// Builds the landing page feed from concurrent searches, one per symbol.
///
/// All searches must succeed; if any fails the whole feed degrades to
/// placeholders. The failure is logged and never returned.
#[instrument(skip(search))]
pub async fn fetch_news_feed(search: &dyn NewsSearch, symbols: &[String], per_symbol: u32) -> Vec<NewsCard> {
    let searches = symbols.iter().map(|symbol| search.search_news(symbol, per_symbol));

    match try_join_all(searches).await {
        Ok(results) => {
            info!("Fetched news for {} symbols", results.len());
            build_feed(results)
        }
        Err(e) => {
            warn!("News search failed, serving placeholder feed: {}", e);
            placeholder_feed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::testing::spawn_upstream;
    use axum::{Json, Router, extract::Query, routing::get};
    use compute::news::{FEED_SIZE, placeholder_card};
    use std::collections::HashMap;

    struct FakeSearch {
        failing_symbol: Option<&'static str>,
    }

    #[async_trait]
    impl NewsSearch for FakeSearch {
        async fn search_news(&self, symbol: &str, count: u32) -> Result<Vec<SearchArticle>> {
            if self.failing_symbol == Some(symbol) {
                return Err(FetchError::Timeout);
            }
            Ok((0..count)
                .map(|i| SearchArticle {
                    title: Some(format!("{} #{}", symbol, i)),
                    publisher: Some("Reuters".to_string()),
                    thumbnail: None,
                })
                .collect())
        }
    }

    fn symbols() -> Vec<String> {
        vec!["AAPL".to_string(), "MSFT".to_string(), "GOOGL".to_string()]
    }

    #[tokio::test]
    async fn test_feed_from_all_symbols() {
        let feed = fetch_news_feed(&FakeSearch { failing_symbol: None }, &symbols(), 3).await;

        assert_eq!(feed.len(), FEED_SIZE);
        assert_eq!(feed[0].text, "AAPL #0");
        assert_eq!(feed[3].text, "MSFT #0");
        assert_eq!(feed[8].text, "GOOGL #2");
    }

    #[tokio::test]
    async fn test_one_failure_degrades_whole_feed() {
        let feed = fetch_news_feed(
            &FakeSearch {
                failing_symbol: Some("MSFT"),
            },
            &symbols(),
            3,
        )
        .await;

        assert_eq!(feed, placeholder_feed());
    }

    #[tokio::test]
    async fn test_short_results_are_padded() {
        let feed = fetch_news_feed(&FakeSearch { failing_symbol: None }, &symbols()[..1], 2).await;

        assert_eq!(feed.len(), FEED_SIZE);
        assert_eq!(feed[1].text, "AAPL #1");
        assert!(feed[2..].iter().all(|card| *card == placeholder_card()));
    }

    #[tokio::test]
    async fn test_yahoo_client_queries_news_only() {
        let app = Router::new().route(
            "/v1/finance/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("quotesCount").map(String::as_str), Some("0"));
                Json(serde_json::json!({
                    "count": 1,
                    "quotes": [],
                    "news": [{
                        "uuid": "abc",
                        "title": format!("{} beats estimates", params["q"]),
                        "publisher": "Motley Fool",
                        "thumbnail": { "resolutions": [{ "url": "https://img.example/1.jpg", "width": 140 }] }
                    }]
                }))
            }),
        );
        let base = spawn_upstream(app).await;
        let client = YahooNewsClient::new(&base, Duration::from_secs(2)).unwrap();

        let articles = client.search_news("AAPL", 3).await.unwrap();

        assert_eq!(articles.len(), 1);
        let card = NewsCard::from(&articles[0]);
        assert_eq!(card.text, "AAPL beats estimates");
        assert_eq!(card.username, "@motleyfool");
    }

    #[tokio::test]
    async fn test_null_search_entries_are_skipped() {
        let app = Router::new().route(
            "/v1/finance/search",
            get(|| async {
                Json(serde_json::json!({
                    "news": [{ "title": "Real one", "publisher": "Reuters" }, null]
                }))
            }),
        );
        let base = spawn_upstream(app).await;
        let client = YahooNewsClient::new(&base, Duration::from_secs(2)).unwrap();

        let feed = fetch_news_feed(&client, &symbols()[..1], 3).await;

        assert_eq!(feed.len(), FEED_SIZE);
        assert_eq!(feed[0].text, "Real one");
        assert!(feed[1..].iter().all(|card| *card == placeholder_card()));
    }
}
