use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::{AggregatorConfig, ExchangeConfig, ProviderConfig};
use crate::error::{AppError, Context};
use crate::fetch::{names, FetchResult, REQUEST_TIMEOUT_SECS};

/// One selectable asset, in provider order. `key` is what the history
/// endpoint expects (exchange pair symbol or aggregator coin id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetListing {
    pub key: String,
    pub label: String,
}

pub type CatalogReceiver = Receiver<FetchResult<Vec<AssetListing>>>;

/// Fetch the catalog on a background thread so the UI can keep polling.
pub fn spawn_catalog_fetch(provider: &ProviderConfig) -> CatalogReceiver {
    let provider = provider.clone();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let _ = tx.send(fetch_catalog(&provider));
    });

    rx
}

pub fn fetch_catalog(provider: &ProviderConfig) -> FetchResult<Vec<AssetListing>> {
    match provider {
        ProviderConfig::Exchange(cfg) => fetch_exchange_catalog(cfg),
        ProviderConfig::Aggregator(cfg) => fetch_aggregator_catalog(cfg),
    }
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct CoinEntry {
    id: String,
    symbol: String,
    name: String,
}

fn fetch_exchange_catalog(cfg: &ExchangeConfig) -> FetchResult<Vec<AssetListing>> {
    let body = get_text(&cfg.ticker_endpoint).context("Catalog request failed")?;
    parse_exchange_catalog(&body)
}

fn fetch_aggregator_catalog(cfg: &AggregatorConfig) -> FetchResult<Vec<AssetListing>> {
    let body = get_text(&cfg.list_url()).context("Catalog request failed")?;
    parse_aggregator_catalog(&body)
}

fn get_text(url: &str) -> FetchResult<String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to construct catalog HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("Catalog request failed for {}", url))?;

    if !response.status().is_success() {
        return Err(AppError::message(format!(
            "Catalog request returned status {}",
            response.status()
        )));
    }

    Ok(response.text().context("Failed to read catalog body")?)
}

/// Exchange tickers carry only a pair symbol; the display label comes from
/// the static name table, falling back to the symbol.
pub fn parse_exchange_catalog(body: &str) -> FetchResult<Vec<AssetListing>> {
    let entries: Vec<TickerEntry> =
        serde_json::from_str(body).context("Failed to parse ticker catalog JSON")?;

    Ok(entries
        .into_iter()
        .map(|entry| {
            let label = names::display_label(&entry.symbol);
            AssetListing {
                key: entry.symbol,
                label,
            }
        })
        .collect())
}

/// Aggregator listings already carry id, symbol and name.
pub fn parse_aggregator_catalog(body: &str) -> FetchResult<Vec<AssetListing>> {
    let entries: Vec<CoinEntry> =
        serde_json::from_str(body).context("Failed to parse coin list JSON")?;

    Ok(entries
        .into_iter()
        .map(|entry| AssetListing {
            label: format!("{} ({})", entry.name, entry.symbol),
            key: entry.id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exchange_tickers_in_order() {
        let sample = r#"[
            {"symbol": "BTCUSDT", "price": "64000.10"},
            {"symbol": "ETHUSDT", "price": "3100.55"},
            {"symbol": "ZZZUSDT", "price": "0.0001"}
        ]"#;

        let catalog = parse_exchange_catalog(sample).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog[0].key, "BTCUSDT");
        assert_eq!(catalog[0].label, "Bitcoin (BTCUSDT)");
        assert_eq!(catalog[1].label, "Ethereum (ETHUSDT)");
        // Unknown symbols keep the raw symbol as the name.
        assert_eq!(catalog[2].label, "ZZZUSDT (ZZZUSDT)");
        assert!(catalog.iter().all(|entry| !entry.label.is_empty()));
    }

    #[test]
    fn parses_aggregator_coin_list() {
        let sample = r#"[
            {"id": "bitcoin", "symbol": "btc", "name": "Bitcoin"},
            {"id": "ethereum", "symbol": "eth", "name": "Ethereum"}
        ]"#;

        let catalog = parse_aggregator_catalog(sample).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].key, "bitcoin");
        assert_eq!(catalog[0].label, "Bitcoin (btc)");
        assert_eq!(catalog[1].key, "ethereum");
    }

    #[test]
    fn empty_payload_yields_empty_catalog() {
        let catalog = parse_exchange_catalog("[]").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(parse_exchange_catalog("{\"oops\":true}").is_err());
        assert!(parse_aggregator_catalog("not json").is_err());
    }

    #[test]
    fn parsing_is_idempotent() {
        let sample = r#"[{"symbol": "BTCUSDT", "price": "1"}]"#;
        let first = parse_exchange_catalog(sample).unwrap();
        let second = parse_exchange_catalog(sample).unwrap();
        assert_eq!(first, second);
    }
}
