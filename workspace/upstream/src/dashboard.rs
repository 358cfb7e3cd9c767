use chrono::NaiveDate;
use common::{HistoricalBar, StockSnapshot};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::stock_api::StockDataSource;

/// Everything the stock dashboard renders, fetched as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub snapshot: StockSnapshot,
    pub historical: Vec<HistoricalBar>,
    pub portfolio: serde_json::Value,
}

/// Issues the snapshot, historical and portfolio fetches concurrently.
///
/// Fails fast: the first error aborts the other requests and is returned
/// alone, so no partial dashboard is ever produced.
#[instrument(skip(source))]
pub async fn fetch_dashboard(
    source: &dyn StockDataSource,
    symbol: &str,
    period1: NaiveDate,
    period2: NaiveDate,
) -> Result<DashboardData> {
    let (snapshot, historical, portfolio) = tokio::try_join!(
        source.stock_data(symbol),
        source.historical_data(symbol, period1, period2),
        source.portfolio(symbol),
    )?;

    debug!("Dashboard for {} has {} historical bars", symbol, historical.len());
    Ok(DashboardData {
        snapshot,
        historical,
        portfolio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use common::{PriceInfo, StockListing, StockNews, SummaryDetail};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeBackend {
        fail_portfolio: bool,
        calls: AtomicUsize,
    }

    fn snapshot() -> StockSnapshot {
        StockSnapshot {
            summary_detail: SummaryDetail {
                day_high: Decimal::new(110, 0),
                day_low: Decimal::new(100, 0),
                fifty_two_week_high: Decimal::new(150, 0),
                fifty_two_week_low: Decimal::new(80, 0),
                market_cap: Decimal::new(1_000_000_000, 0),
                trailing_pe: None,
                volume: Decimal::new(250_000, 0),
                average_volume: Decimal::new(300_000, 0),
            },
            price: PriceInfo {
                regular_market_price: Decimal::new(105, 0),
                regular_market_change: Decimal::ONE,
                regular_market_change_percent: Decimal::new(96, 2),
                short_name: "ITC".to_string(),
                long_name: "ITC Limited".to_string(),
            },
        }
    }

    #[async_trait]
    impl StockDataSource for FakeBackend {
        async fn stock_data(&self, _symbol: &str) -> Result<StockSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(snapshot())
        }

        async fn historical_data(&self, _symbol: &str, _p1: NaiveDate, _p2: NaiveDate) -> Result<Vec<HistoricalBar>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn portfolio(&self, _symbol: &str) -> Result<serde_json::Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_portfolio {
                return Err(FetchError::Server {
                    status: 500,
                    message: "Server error: 500".to_string(),
                });
            }
            Ok(serde_json::json!({ "shares": 10 }))
        }

        async fn stock_news(&self, _symbol: &str) -> Result<StockNews> {
            unreachable!("not part of the dashboard")
        }

        async fn list_stocks(&self) -> Result<Vec<StockListing>> {
            unreachable!("not part of the dashboard")
        }
    }

    fn window() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_dashboard_combines_all_three() {
        let backend = FakeBackend {
            fail_portfolio: false,
            calls: AtomicUsize::new(0),
        };
        let (start, end) = window();

        let dashboard = fetch_dashboard(&backend, "ITC", start, end).await.unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
        assert_eq!(dashboard.snapshot.price.short_name, "ITC");
        assert_eq!(dashboard.portfolio["shares"], 10);
    }

    #[tokio::test]
    async fn test_dashboard_fails_fast_with_single_error() {
        let backend = FakeBackend {
            fail_portfolio: true,
            calls: AtomicUsize::new(0),
        };
        let (start, end) = window();

        let err = fetch_dashboard(&backend, "ITC", start, end).await.unwrap_err();

        assert!(matches!(err, FetchError::Server { status: 500, .. }));
    }
}
