//! Typed clients for the services stockscope sits in front of: the stock-data
//! backend, the price-prediction service and Yahoo Finance news search.
//!
//! This crate is the schema boundary. Payloads are decoded into `common` and
//! `compute` records here; consumers never see raw JSON except for the
//! opaque portfolio block.

pub mod client;
pub mod dashboard;
pub mod error;
pub mod news_search;
pub mod prediction;
pub mod stock_api;

#[cfg(test)]
pub(crate) mod testing;

pub use client::HttpClient;
pub use dashboard::{DashboardData, fetch_dashboard};
pub use error::{FetchError, Result};
pub use news_search::{NewsSearch, YahooNewsClient, fetch_news_feed};
pub use prediction::{PredictionClient, PredictionRequest, PredictionResponse, PredictionSource};
pub use stock_api::{StockApiClient, StockDataSource};
