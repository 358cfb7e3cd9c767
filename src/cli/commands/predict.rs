use anyhow::{Result, bail};
use chrono::NaiveDate;
use common::{
    PredictionWindow,
    format::{format_axis_date, format_currency, format_fixed},
};
use compute::default_merger;
use tracing::{debug, info};
use upstream::{PredictionClient, PredictionRequest, PredictionSource};

use crate::config::AppConfig;
use crate::helpers::window::resolve_window;

/// Renders a merged prediction window as a fixed-width table.
pub fn render_table(window: &PredictionWindow) -> String {
    let mut out = format!(
        "{} predictions {} to {} (+{} days)\n{:<12} {:<7} {:>14} {:>14} {:>9}\n",
        window.symbol, window.start_date, window.end_date, window.future_days, "DATE", "TICK", "ACTUAL", "PREDICTED", ""
    );
    for point in &window.points {
        let actual = point.actual_price.map(format_currency).unwrap_or_else(|| "-".to_string());
        let marker = if point.is_forecast() { "forecast" } else { "" };
        out.push_str(&format!(
            "{:<12} {:<7} {:>14} {:>14} {:>9}\n",
            point.date.format("%Y-%m-%d").to_string(),
            format_axis_date(point.date),
            actual,
            format_currency(point.predicted_price),
            marker
        ));
    }
    let last_close = window
        .points
        .iter()
        .rev()
        .find_map(|point| point.actual_price.map(|actual| (actual, point.predicted_price)));
    if let Some((actual, predicted)) = last_close {
        out.push_str(&format!(
            "last close {} vs model {} (gap {})\n",
            format_currency(actual),
            format_currency(predicted),
            format_fixed(predicted - actual)
        ));
    }
    out
}

pub async fn predict(symbol: &str, days: u32, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Result<()> {
    let config = AppConfig::load()?;
    let (start_date, end_date) = resolve_window(start_date, end_date);
    if start_date > end_date {
        bail!("start date {} is after end date {}", start_date, end_date);
    }

    let request = PredictionRequest {
        symbol: symbol.trim().to_uppercase(),
        future_days: days,
        start_date,
        end_date,
    };
    info!("Requesting predictions from {}", config.prediction_api_url);
    let client = PredictionClient::new(&config.prediction_api_url, config.request_timeout())?;
    let response = client
        .predict(&request)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;

    let window = response.to_window(&default_merger(None), &request)?;
    debug!("Merged {} points for {}", window.points.len(), window.symbol);
    print!("{}", render_table(&window));
    Ok(())
}
