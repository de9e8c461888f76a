use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{AggregatorConfig, ExchangeConfig, ProviderConfig};
use crate::error::{AppError, Context};
use crate::fetch::{FetchResult, REQUEST_TIMEOUT_SECS};

/// One sampled price. Exchange rows use the period's closing price;
/// aggregator rows are raw samples.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Ordered price history for one asset over the lookback window. Provider
/// order is trusted and never re-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Latest price, taken from the last point of the series.
    pub fn current_price(&self) -> Option<f64> {
        self.points.last().map(|point| point.price)
    }

    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter();
        let first = iter.next()?.price;
        let (min, max) = iter.fold((first, first), |(min, max), point| {
            (min.min(point.price), max.max(point.price))
        });
        Some((min, max))
    }
}

pub type HistoryReceiver = Receiver<FetchResult<PriceSeries>>;

/// Fetch history on a background thread; the chart screen polls the
/// receiver so the terminal stays responsive while the request is in flight.
pub fn spawn_history_fetch(provider: &ProviderConfig, asset_key: &str) -> HistoryReceiver {
    let provider = provider.clone();
    let key = asset_key.to_string();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let _ = tx.send(fetch_history(&provider, &key));
    });

    rx
}

pub fn fetch_history(provider: &ProviderConfig, asset_key: &str) -> FetchResult<PriceSeries> {
    match provider {
        ProviderConfig::Exchange(cfg) => fetch_exchange_history(cfg, asset_key),
        ProviderConfig::Aggregator(cfg) => fetch_aggregator_history(cfg, asset_key),
    }
}

fn fetch_exchange_history(cfg: &ExchangeConfig, symbol: &str) -> FetchResult<PriceSeries> {
    let url = format!(
        "{}?symbol={}&interval={}&limit={}",
        cfg.klines_endpoint, symbol, cfg.interval, cfg.limit
    );
    let body = get_text(&url, symbol)?;
    parse_klines(&body)
}

fn fetch_aggregator_history(cfg: &AggregatorConfig, coin_id: &str) -> FetchResult<PriceSeries> {
    let url = cfg.market_chart_url(coin_id);
    let body = get_text(&url, coin_id)?;
    parse_market_chart(&body)
}

fn get_text(url: &str, asset_key: &str) -> FetchResult<String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to construct history HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("History request failed for {}", asset_key))?;

    if !response.status().is_success() {
        return Err(AppError::message(format!(
            "History request returned status {} for {}",
            response.status(),
            asset_key
        )));
    }

    response
        .text()
        .with_context(|| format!("Failed to read history body for {}", asset_key))
        .map_err(AppError::from)
}

/// Klines arrive as arrays: [open_time_ms, open, high, low, close, volume, …]
/// with prices JSON-encoded as strings. Only open time and close survive the
/// projection; malformed rows are skipped.
pub fn parse_klines(body: &str) -> FetchResult<PriceSeries> {
    let root: Value = serde_json::from_str(body).context("Failed to parse klines JSON")?;

    let rows = root
        .as_array()
        .context("Klines payload is not an array")?;

    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(fields) = row.as_array() else {
            continue;
        };
        if fields.len() < 5 {
            continue;
        }

        let Some(open_time_ms) = fields[0].as_i64() else {
            continue;
        };
        let Some(close) = json_number(&fields[4]) else {
            continue;
        };
        let Some(point) = make_point(open_time_ms, close) else {
            continue;
        };

        points.push(point);
    }

    Ok(PriceSeries::new(points))
}

#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(i64, f64)>,
}

/// Market chart payloads nest the series under `prices` as
/// [timestamp_ms, price] pairs.
pub fn parse_market_chart(body: &str) -> FetchResult<PriceSeries> {
    let chart: MarketChart =
        serde_json::from_str(body).context("Failed to parse market chart JSON")?;

    let points = chart
        .prices
        .into_iter()
        .filter_map(|(timestamp_ms, price)| make_point(timestamp_ms, price))
        .collect();

    Ok(PriceSeries::new(points))
}

fn make_point(timestamp_ms: i64, price: f64) -> Option<PricePoint> {
    if !price.is_finite() || price < 0.0 {
        return None;
    }

    let timestamp = Utc.timestamp_millis_opt(timestamp_ms).single()?;
    Some(PricePoint { timestamp, price })
}

fn json_number(value: &Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .or_else(|| value.as_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kline_close_prices() {
        let sample = r#"[
            [1700000000000, "100", "110", "95", "105.5", "1234", 1700086399999, "0", 10, "0", "0", "0"],
            [1700086400000, "105.5", "112", "101", "108.25", "999", 1700172799999, "0", 12, "0", "0", "0"]
        ]"#;

        let series = parse_klines(sample).unwrap();

        assert_eq!(series.len(), 2);
        assert!((series.points()[0].price - 105.5).abs() < 1e-9);
        assert!((series.points()[1].price - 108.25).abs() < 1e-9);
        assert!(series.points()[0].timestamp < series.points()[1].timestamp);
        assert!((series.current_price().unwrap() - 108.25).abs() < 1e-9);
    }

    #[test]
    fn skips_malformed_kline_rows() {
        let sample = r#"[
            [1700000000000, "100", "110", "95", "105.5", "1234"],
            "not a row",
            [1700086400000, "1", "2"],
            [1700172800000, "106", "110", "100", "not-a-number", "5"]
        ]"#;

        let series = parse_klines(sample).unwrap();

        assert_eq!(series.len(), 1);
        assert!((series.current_price().unwrap() - 105.5).abs() < 1e-9);
    }

    #[test]
    fn parses_market_chart_prices() {
        let sample = r#"{"prices":[[1700000000000,42000.5],[1700086400000,42500.0]],
                         "market_caps":[],"total_volumes":[]}"#;

        let series = parse_market_chart(sample).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(
            series.points()[0].timestamp.to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
        assert_eq!(
            series.points()[1].timestamp.to_rfc3339(),
            "2023-11-15T22:13:20+00:00"
        );
        assert!((series.points()[0].price - 42000.5).abs() < 1e-9);
        // Latest price comes from the last element of the series.
        assert!((series.current_price().unwrap() - 42500.0).abs() < 1e-9);
    }

    #[test]
    fn drops_negative_and_non_finite_prices() {
        let sample = r#"{"prices":[[1700000000000,-1.0],[1700086400000,42500.0]]}"#;

        let series = parse_market_chart(sample).unwrap();

        assert_eq!(series.len(), 1);
        assert!((series.points()[0].price - 42500.0).abs() < 1e-9);
    }

    #[test]
    fn empty_series_has_no_current_price() {
        let series = parse_market_chart(r#"{"prices":[]}"#).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.current_price(), None);
    }

    #[test]
    fn malformed_payloads_are_errors() {
        assert!(parse_klines("{\"oops\":1}").is_err());
        assert!(parse_market_chart("[1,2,3]").is_err());
    }

    #[test]
    fn price_bounds_cover_the_series() {
        let sample = r#"{"prices":[[1700000000000,10.0],[1700086400000,30.0],[1700172800000,20.0]]}"#;
        let series = parse_market_chart(sample).unwrap();
        assert_eq!(series.price_bounds(), Some((10.0, 30.0)));
    }
}
