use axum::{extract::State, response::Json};
use common::NewsCard;
use tracing::{debug, instrument};
use upstream::fetch_news_feed;

use crate::schemas::AppState;

/// Landing page news feed
///
/// Always answers with exactly nine cards. When any feed search fails the
/// whole feed is replaced with placeholder cards.
#[utoipa::path(
    get,
    path = "/api/news",
    tag = "news",
    responses(
        (status = 200, description = "Nine news cards", body = Vec<NewsCard>)
    )
)]
#[instrument]
pub async fn get_news_feed(State(state): State<AppState>) -> Json<Vec<NewsCard>> {
    debug!("Building news feed for {:?}", state.news_symbols);
    let feed = fetch_news_feed(state.news.as_ref(), &state.news_symbols, state.news_per_symbol).await;
    Json(feed)
}
