use anyhow::{Result, bail};
use compute::view::PredictionViews;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use upstream::{PredictionClient, StockApiClient, YahooNewsClient};

use crate::schemas::AppState;

/// Longest per-request upstream deadline accepted.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Service configuration
///
/// Resolved from built-in defaults, an optional `stockscope.{toml,yaml,json}`
/// file in the working directory and `STOCKSCOPE_*` environment variables,
/// later sources taking precedence.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub bind_address: String,
    pub stock_api_url: String,
    pub prediction_api_url: String,
    pub news_search_url: String,
    pub news_symbols: Vec<String>,
    pub news_per_symbol: u32,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub cache_capacity: u64,
}

fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("bind_address", "0.0.0.0:3000")?
        .set_default("stock_api_url", "http://localhost:8000")?
        .set_default("prediction_api_url", "http://127.0.0.1:5000")?
        .set_default("news_search_url", "https://query2.finance.yahoo.com")?
        .set_default("news_symbols", vec!["AAPL", "MSFT", "GOOGL"])?
        .set_default("news_per_symbol", 3)?
        .set_default("request_timeout_secs", 10)?
        .set_default("cache_ttl_secs", 300)?
        .set_default("cache_capacity", 1000)?)
}

impl AppConfig {
    /// Load configuration from every source
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let builder = builder_with_defaults()?
            .add_source(File::with_name("stockscope").required(false))
            .add_source(
                Environment::with_prefix("STOCKSCOPE")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("news_symbols"),
            );
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            bail!(
                "request_timeout_secs must be between 1 and {}, got {}",
                MAX_REQUEST_TIMEOUT_SECS,
                self.request_timeout_secs
            );
        }
        if self.news_symbols.iter().all(|symbol| symbol.trim().is_empty()) {
            bail!("news_symbols must name at least one symbol");
        }
        if self.news_per_symbol == 0 {
            bail!("news_per_symbol must be at least 1");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Build the upstream clients and caches the handlers share
pub fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    let timeout = config.request_timeout();
    info!(
        "Stock API at {}, prediction service at {}, news search at {}",
        config.stock_api_url, config.prediction_api_url, config.news_search_url
    );

    let stocks = StockApiClient::new(&config.stock_api_url, timeout)?;
    let predictions = PredictionClient::new(&config.prediction_api_url, timeout)?;
    let news = YahooNewsClient::new(&config.news_search_url, timeout)?;

    let cache = Cache::builder()
        .max_capacity(config.cache_capacity)
        .time_to_live(Duration::from_secs(config.cache_ttl_secs))
        .build();

    let news_symbols = config
        .news_symbols
        .iter()
        .map(|symbol| symbol.trim().to_string())
        .filter(|symbol| !symbol.is_empty())
        .collect();

    Ok(AppState {
        stocks: Arc::new(stocks),
        predictions: Arc::new(predictions),
        news: Arc::new(news),
        news_symbols: Arc::new(news_symbols),
        news_per_symbol: config.news_per_symbol,
        cache,
        views: PredictionViews::new(),
    })
}
