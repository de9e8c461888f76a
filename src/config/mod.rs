use std::collections::HashMap;

/// Fixed lookback window for price history, in days.
pub const HISTORY_DAYS: u32 = 30;

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub code: String,
    pub name: String,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Exchange(ExchangeConfig),
    Aggregator(AggregatorConfig),
}

/// Exchange-style provider: flat ticker list plus daily candle endpoint.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub ticker_endpoint: String,
    pub klines_endpoint: String,
    pub interval: String,
    pub limit: u32,
}

/// Aggregator-style provider: coin listing plus per-coin market chart.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub coins_endpoint: String,
    pub vs_currency: String,
    pub days: u32,
}

impl AggregatorConfig {
    pub fn list_url(&self) -> String {
        format!("{}/list", self.coins_endpoint)
    }

    pub fn market_chart_url(&self, coin_id: &str) -> String {
        format!(
            "{}/{}/market_chart?vs_currency={}&days={}",
            self.coins_endpoint, coin_id, self.vs_currency, self.days
        )
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sources: HashMap<String, SourceConfig>,
}

impl Config {
    pub fn builtin() -> Self {
        let exchange = SourceConfig {
            code: "BIN".to_string(),
            name: "Binance (exchange tickers)".to_string(),
            provider: ProviderConfig::Exchange(ExchangeConfig {
                ticker_endpoint: "https://api.binance.com/api/v3/ticker/price".to_string(),
                klines_endpoint: "https://api.binance.com/api/v3/klines".to_string(),
                interval: "1d".to_string(),
                limit: HISTORY_DAYS,
            }),
        };

        let aggregator = SourceConfig {
            code: "CGK".to_string(),
            name: "CoinGecko (market aggregator)".to_string(),
            provider: ProviderConfig::Aggregator(AggregatorConfig {
                coins_endpoint: "https://api.coingecko.com/api/v3/coins".to_string(),
                vs_currency: "usd".to_string(),
                days: HISTORY_DAYS,
            }),
        };

        let sources = HashMap::from([
            (exchange.code.clone(), exchange),
            (aggregator.code.clone(), aggregator),
        ]);

        Config { sources }
    }

    pub fn get_source(&self, code: &str) -> Option<&SourceConfig> {
        self.sources.get(code)
    }

    pub fn available_sources(&self) -> Vec<&SourceConfig> {
        let mut sources: Vec<&SourceConfig> = self.sources.values().collect();
        sources.sort_by(|a, b| a.code.cmp(&b.code));
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_exposes_both_sources() {
        let config = Config::builtin();
        let sources = config.available_sources();
        assert_eq!(sources.len(), 2);
        assert!(config.get_source("BIN").is_some());
        assert!(config.get_source("CGK").is_some());
    }

    #[test]
    fn market_chart_url_embeds_coin_id() {
        let cfg = AggregatorConfig {
            coins_endpoint: "https://api.coingecko.com/api/v3/coins".to_string(),
            vs_currency: "usd".to_string(),
            days: 30,
        };
        assert_eq!(
            cfg.market_chart_url("bitcoin"),
            "https://api.coingecko.com/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days=30"
        );
    }
}
