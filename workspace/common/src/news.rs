use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Card shown in the landing page news carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsCard {
    pub text: String,
    pub image_src: String,
    pub name: String,
    pub username: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Sentiment {
    #[serde(alias = "positive")]
    Positive,
    #[serde(alias = "negative")]
    Negative,
    #[serde(alias = "neutral")]
    Neutral,
}

/// A news article with its classified sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewsArticle {
    pub date: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    pub sentiment: Sentiment,
    pub link: String,
}

/// Aggregate share of positive and negative articles, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SentimentPercentage {
    pub positive: Decimal,
    pub negative: Decimal,
}

/// News articles for one symbol plus the aggregate sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockNews {
    pub articles: Vec<NewsArticle>,
    pub sentiment_percentage: SentimentPercentage,
}

const SNIPPET_BOILERPLATE: [&str; 3] = ["Stock Market News", "Mint", "More"];

impl StockNews {
    /// Sorts articles newest first and strips publisher boilerplate from snippets.
    pub fn into_display_order(mut self) -> Self {
        self.articles.sort_by(|a, b| b.date.cmp(&a.date));
        for article in &mut self.articles {
            article.snippet = clean_snippet(&article.snippet);
        }
        self
    }
}

/// Removes the fixed boilerplate fragments publishers append to snippets.
pub fn clean_snippet(snippet: &str) -> String {
    let mut cleaned = snippet.to_string();
    for fragment in SNIPPET_BOILERPLATE {
        cleaned = cleaned.replace(fragment, "");
    }
    cleaned.trim().to_string()
}
