#[cfg(test)]
pub mod test_utils {
    use crate::router::create_router;
    use crate::schemas::AppState;
    use async_trait::async_trait;
    use axum::Router;
    use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
    use common::{
        HistoricalBar, NewsArticle, PriceInfo, Sentiment, SentimentPercentage, StockListing, StockNews, StockSnapshot,
        SummaryDetail,
    };
    use compute::news::SearchArticle;
    use compute::view::PredictionViews;
    use moka::future::Cache;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;
    use upstream::{FetchError, NewsSearch, PredictionRequest, PredictionResponse, PredictionSource, Result, StockDataSource};

    /// Stock backend serving fixed records.
    #[derive(Default)]
    pub struct FakeStocks {
        pub listings: Vec<StockListing>,
        pub portfolio_error: Option<FetchError>,
        pub list_calls: AtomicUsize,
    }

    pub fn listing(symbol: &str, name: &str) -> StockListing {
        StockListing {
            id: symbol.to_lowercase(),
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }

    pub fn snapshot() -> StockSnapshot {
        StockSnapshot {
            summary_detail: SummaryDetail {
                day_high: Decimal::new(110, 0),
                day_low: Decimal::new(100, 0),
                fifty_two_week_high: Decimal::new(150, 0),
                fifty_two_week_low: Decimal::new(80, 0),
                market_cap: Decimal::new(25_000_000, 0),
                trailing_pe: Some(Decimal::new(2456, 2)),
                volume: Decimal::new(250_000, 0),
                average_volume: Decimal::new(98_765, 0),
            },
            price: PriceInfo {
                regular_market_price: Decimal::new(105, 0),
                regular_market_change: Decimal::new(-52, 2),
                regular_market_change_percent: Decimal::new(-49, 2),
                short_name: "TCS".to_string(),
                long_name: "Tata Consultancy Services Limited".to_string(),
            },
        }
    }

    fn article(date: &str, title: &str, snippet: &str, sentiment: Sentiment) -> NewsArticle {
        NewsArticle {
            date: date.parse().unwrap(),
            title: title.to_string(),
            snippet: snippet.to_string(),
            sentiment,
            link: format!("https://news.example/{}", title.to_lowercase().replace(' ', "-")),
        }
    }

    #[async_trait]
    impl StockDataSource for FakeStocks {
        async fn stock_data(&self, _symbol: &str) -> Result<StockSnapshot> {
            Ok(snapshot())
        }

        async fn historical_data(&self, _symbol: &str, period1: NaiveDate, _period2: NaiveDate) -> Result<Vec<HistoricalBar>> {
            Ok(vec![HistoricalBar {
                date: period1.and_hms_opt(0, 0, 0).unwrap().and_utc(),
                high: Decimal::new(110, 0),
                low: Decimal::new(100, 0),
                close: Decimal::new(105, 0),
                volume: Decimal::new(250_000, 0),
                adj_close: Decimal::new(105, 0),
            }])
        }

        async fn portfolio(&self, symbol: &str) -> Result<serde_json::Value> {
            match &self.portfolio_error {
                Some(error) => Err(error.clone()),
                None => Ok(serde_json::json!({ "symbol": symbol, "shares": 12 })),
            }
        }

        async fn stock_news(&self, _symbol: &str) -> Result<StockNews> {
            Ok(StockNews {
                articles: vec![
                    article("2024-03-01T09:00:00Z", "Older Story", "Quarterly results Stock Market News", Sentiment::Neutral),
                    article("2024-03-05T09:00:00Z", "Newest Story", "Deal signed Mint More", Sentiment::Positive),
                    article("2024-03-03T09:00:00Z", "Middle Story", "Guidance cut", Sentiment::Negative),
                ],
                sentiment_percentage: SentimentPercentage {
                    positive: Decimal::new(625, 1),
                    negative: Decimal::new(375, 1),
                },
            })
        }

        async fn list_stocks(&self) -> Result<Vec<StockListing>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.listings.clone())
        }
    }

    /// Prediction service answering every request with the same payload.
    ///
    /// Requests whose horizon appears in `delays` are held back that long.
    pub struct FakePredictions {
        pub response: std::result::Result<PredictionResponse, FetchError>,
        pub delays: HashMap<u32, Duration>,
        pub calls: AtomicUsize,
    }

    impl FakePredictions {
        pub fn answering(response: PredictionResponse) -> Self {
            Self {
                response: Ok(response),
                delays: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(error: FetchError) -> Self {
            Self {
                response: Err(error),
                delays: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_delay(mut self, future_days: u32, delay: Duration) -> Self {
            self.delays.insert(future_days, delay);
            self
        }
    }

    #[async_trait]
    impl PredictionSource for FakePredictions {
        async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(&request.future_days) {
                tokio::time::sleep(*delay).await;
            }
            self.response.clone()
        }
    }

    /// News search returning `count` articles per symbol, or failing for one symbol.
    #[derive(Default)]
    pub struct FakeNews {
        pub failing_symbol: Option<String>,
    }

    #[async_trait]
    impl NewsSearch for FakeNews {
        async fn search_news(&self, symbol: &str, count: u32) -> Result<Vec<SearchArticle>> {
            if self.failing_symbol.as_deref() == Some(symbol) {
                return Err(FetchError::Network("connection refused".to_string()));
            }
            Ok((0..count)
                .map(|i| SearchArticle {
                    title: Some(format!("{} headline {}", symbol, i)),
                    publisher: Some("Yahoo Finance".to_string()),
                    thumbnail: None,
                })
                .collect())
        }
    }

    /// Historical points in January 2024 (the first lies before the default
    /// window) followed by forecasts starting tomorrow.
    pub fn prediction_fixture() -> PredictionResponse {
        let today = Utc::now().date_naive();
        let tomorrow = (today + ChronoDuration::days(1)).format("%Y-%m-%d").to_string();
        let day_after = (today + ChronoDuration::days(2)).format("%Y-%m-%d").to_string();
        serde_json::from_value(serde_json::json!({
            "historical_data": {
                "dates": ["2023-12-29", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"],
                "actual_prices": [3700, 3720, 3735, 3710, 3750],
                "predicted_prices": [3690, 3715, 3740, 3725, 3745]
            },
            "future_predictions": {
                "dates": [tomorrow, day_after],
                "predicted_prices": [3800, 3820]
            }
        }))
        .unwrap()
    }

    pub fn stock_listings() -> Vec<StockListing> {
        vec![
            listing("TCS", "Tata Consultancy Services"),
            listing("TATAMOTORS", "Tata Motors"),
            listing("TATASTEEL", "Tata Steel"),
            listing("TATAPOWER", "Tata Power"),
            listing("TATACONSUM", "Tata Consumer Products"),
            listing("TITAN", "Titan Company, a Tata enterprise"),
            listing("INFY", "Infosys"),
        ]
    }

    /// Create AppState for testing
    pub fn setup_test_app_state(
        stocks: Arc<FakeStocks>,
        predictions: Arc<FakePredictions>,
        news: Arc<FakeNews>,
    ) -> AppState {
        AppState {
            stocks,
            predictions,
            news,
            news_symbols: Arc::new(vec!["AAPL".to_string(), "MSFT".to_string(), "GOOGL".to_string()]),
            news_per_symbol: 3,
            cache: Cache::new(100),
            views: PredictionViews::new(),
        }
    }

    pub fn default_test_app_state() -> AppState {
        setup_test_app_state(
            Arc::new(FakeStocks {
                listings: stock_listings(),
                ..Default::default()
            }),
            Arc::new(FakePredictions::answering(prediction_fixture())),
            Arc::new(FakeNews::default()),
        )
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is read from RUST_LOG, defaulting to WARN. The subscriber
    /// is installed globally once so spawned server tasks log too; later calls
    /// keep the first one.
    pub fn init_test_tracing() {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let _ = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Create axum app for testing from a prepared state
    pub fn setup_test_app_with(state: AppState) -> Router {
        init_test_tracing();
        create_router(state)
    }

    /// Create axum app for testing
    pub fn setup_test_app() -> Router {
        setup_test_app_with(default_test_app_state())
    }
}
