use async_trait::async_trait;
use chrono::NaiveDate;
use common::{DataEnvelope, HistoricalBar, StockListing, StockNews, StockSnapshot};
use std::time::Duration;
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::Result;

/// The stock-data backend.
#[async_trait]
pub trait StockDataSource: Send + Sync {
    /// Snapshot pricing and summary fields.
    async fn stock_data(&self, symbol: &str) -> Result<StockSnapshot>;

    /// Daily OHLC+volume bars between `period1` and `period2`.
    async fn historical_data(&self, symbol: &str, period1: NaiveDate, period2: NaiveDate) -> Result<Vec<HistoricalBar>>;

    /// Portfolio-context fields, passed through untouched.
    async fn portfolio(&self, symbol: &str) -> Result<serde_json::Value>;

    /// News articles with aggregate sentiment.
    async fn stock_news(&self, symbol: &str) -> Result<StockNews>;

    /// Every symbol the backend knows about.
    async fn list_stocks(&self) -> Result<Vec<StockListing>>;
}

/// HTTP implementation of [`StockDataSource`].
#[derive(Debug, Clone)]
pub struct StockApiClient {
    client: HttpClient,
}

impl StockApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(base_url, timeout)?,
        })
    }

    async fn get_data<T: serde::de::DeserializeOwned>(&self, segments: &[&str], query: &[(&str, String)]) -> Result<T> {
        let envelope: DataEnvelope<T> = self.client.get_json(segments, query).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl StockDataSource for StockApiClient {
    #[instrument(skip(self))]
    async fn stock_data(&self, symbol: &str) -> Result<StockSnapshot> {
        self.get_data(&["api", "stock", "stock-data", symbol], &[]).await
    }

    #[instrument(skip(self))]
    async fn historical_data(&self, symbol: &str, period1: NaiveDate, period2: NaiveDate) -> Result<Vec<HistoricalBar>> {
        let query = [
            ("period1", period1.format("%Y-%m-%d").to_string()),
            ("period2", period2.format("%Y-%m-%d").to_string()),
        ];
        self.get_data(&["api", "stock", "historical-data", symbol], &query).await
    }

    #[instrument(skip(self))]
    async fn portfolio(&self, symbol: &str) -> Result<serde_json::Value> {
        self.get_data(&["api", "stock", "portfolio", symbol], &[]).await
    }

    #[instrument(skip(self))]
    async fn stock_news(&self, symbol: &str) -> Result<StockNews> {
        self.get_data(&["api", "stock", "stock-news", symbol], &[]).await
    }

    #[instrument(skip(self))]
    async fn list_stocks(&self) -> Result<Vec<StockListing>> {
        self.get_data(&["api", "stock"], &[]).await
    }
}
