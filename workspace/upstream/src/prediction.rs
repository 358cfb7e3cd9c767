use async_trait::async_trait;
use chrono::NaiveDate;
use common::PredictionWindow;
use compute::series::{FuturePoint, HistoricalPoint, RawDate, SeriesMerger};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::client::HttpClient;
use crate::error::Result;

/// Parameters of one prediction-service call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PredictionRequest {
    pub symbol: String,
    pub future_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PredictionRequest {
    fn query(&self) -> [(&'static str, String); 4] {
        [
            ("symbol", self.symbol.clone()),
            ("future_days", self.future_days.to_string()),
            ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
        ]
    }
}

/// Historical block of the prediction payload: parallel arrays indexed by position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalSeries {
    #[serde(default)]
    pub dates: Vec<Option<RawDate>>,
    #[serde(default)]
    pub actual_prices: Vec<Option<Decimal>>,
    #[serde(default)]
    pub predicted_prices: Vec<Option<Decimal>>,
}

/// Forecast block of the prediction payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FutureSeries {
    #[serde(default)]
    pub dates: Vec<Option<RawDate>>,
    #[serde(default)]
    pub predicted_prices: Vec<Option<Decimal>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub historical_data: HistoricalSeries,
    pub future_predictions: FutureSeries,
}

fn at<T: Clone>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).cloned().flatten()
}

impl PredictionResponse {
    /// Zips the parallel arrays into points.
    ///
    /// Arrays are zipped to the longest one, so a length mismatch surfaces as
    /// a missing field at a concrete index when the points are merged.
    pub fn into_points(&self) -> (Vec<HistoricalPoint>, Vec<FuturePoint>) {
        let hist = &self.historical_data;
        let hist_len = hist.dates.len().max(hist.actual_prices.len()).max(hist.predicted_prices.len());
        let historical = (0..hist_len)
            .map(|i| HistoricalPoint {
                date: at(&hist.dates, i),
                actual_price: at(&hist.actual_prices, i),
                predicted_price: at(&hist.predicted_prices, i),
            })
            .collect();

        let fut = &self.future_predictions;
        let fut_len = fut.dates.len().max(fut.predicted_prices.len());
        let future = (0..fut_len)
            .map(|i| FuturePoint {
                date: at(&fut.dates, i),
                predicted_price: at(&fut.predicted_prices, i),
            })
            .collect();

        (historical, future)
    }

    /// Merges both blocks and clips them to the request's date window.
    pub fn to_window(&self, merger: &SeriesMerger, request: &PredictionRequest) -> compute::error::Result<PredictionWindow> {
        let (historical, future) = self.into_points();
        let points = merger.merge_window(&historical, &future, request.start_date, request.end_date)?;
        Ok(PredictionWindow {
            symbol: request.symbol.clone(),
            future_days: request.future_days,
            start_date: request.start_date,
            end_date: request.end_date,
            points,
        })
    }
}

/// The price-prediction service.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse>;
}

/// HTTP implementation of [`PredictionSource`].
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: HttpClient,
}

impl PredictionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(base_url, timeout)?,
        })
    }
}

#[async_trait]
impl PredictionSource for PredictionClient {
    #[instrument(skip(self), fields(symbol = %request.symbol, future_days = request.future_days))]
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        let response: PredictionResponse = self.client.get_json(&["predict"], &request.query()).await?;
        debug!(
            "Prediction service returned {} historical and {} future dates",
            response.historical_data.dates.len(),
            response.future_predictions.dates.len()
        );
        Ok(response)
    }
}
