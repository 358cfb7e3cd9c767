use anyhow::Result;
use tracing::info;
use upstream::{YahooNewsClient, fetch_news_feed};

use crate::config::AppConfig;

pub async fn news() -> Result<()> {
    let config = AppConfig::load()?;
    info!("Searching news for {:?}", config.news_symbols);
    let client = YahooNewsClient::new(&config.news_search_url, config.request_timeout())?;

    let feed = fetch_news_feed(&client, &config.news_symbols, config.news_per_symbol).await;
    for card in feed {
        println!("{:<24} {}", card.username, card.text);
    }
    Ok(())
}
