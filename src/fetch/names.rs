/// Static symbol-to-name table for exchange tickers, which only carry a raw
/// pair symbol. Covers the common USDT pairs; anything else falls back to the
/// symbol itself. A few keys repeat in the source data; the map keeps the
/// last occurrence.
const SYMBOL_NAMES: &[(&str, &str)] = &[
    ("BTCUSDT", "Bitcoin"),
    ("ETHUSDT", "Ethereum"),
    ("BNBUSDT", "Binance Coin"),
    ("ADAUSDT", "Cardano"),
    ("XRPUSDT", "Ripple"),
    ("SOLUSDT", "Solana"),
    ("DOGEUSDT", "Dogecoin"),
    ("DOTUSDT", "Polkadot"),
    ("MATICUSDT", "Polygon"),
    ("LTCUSDT", "Litecoin"),
    ("TRXUSDT", "TRON"),
    ("LINKUSDT", "Chainlink"),
    ("SHIBUSDT", "Shiba Inu"),
    ("AVAXUSDT", "Avalanche"),
    ("ATOMUSDT", "Cosmos"),
    ("XMRUSDT", "Monero"),
    ("UNIUSDT", "Uniswap"),
    ("BCHUSDT", "Bitcoin Cash"),
    ("ETCUSDT", "Ethereum Classic"),
    ("APTUSDT", "Aptos"),
    ("FILUSDT", "Filecoin"),
    ("NEARUSDT", "Near Protocol"),
    ("QNTUSDT", "Quant"),
    ("VETUSDT", "VeChain"),
    ("ICPUSDT", "Internet Computer"),
    ("ALGOUSDT", "Algorand"),
    ("EOSUSDT", "EOS"),
    ("SANDUSDT", "The Sandbox"),
    ("AAVEUSDT", "Aave"),
    ("XTZUSDT", "Tezos"),
    ("THETAUSDT", "Theta Network"),
    ("EGLDUSDT", "MultiversX"),
    ("GRTUSDT", "The Graph"),
    ("CAKEUSDT", "PancakeSwap"),
    ("XLMUSDT", "Stellar"),
    ("FTMUSDT", "Fantom"),
    ("RUNEUSDT", "THORChain"),
    ("ZECUSDT", "Zcash"),
    ("CHZUSDT", "Chiliz"),
    ("ENJUSDT", "Enjin Coin"),
    ("SNXUSDT", "Synthetix"),
    ("CRVUSDT", "Curve DAO"),
    ("COMPUSDT", "Compound"),
    ("KSMUSDT", "Kusama"),
    ("YFIUSDT", "yearn.finance"),
    ("1INCHUSDT", "1inch"),
    ("BATUSDT", "Basic Attention Token"),
    ("OMGUSDT", "OMG Network"),
    ("DASHUSDT", "Dash"),
    ("ZRXUSDT", "0x"),
    ("LRCUSDT", "Loopring"),
    ("CVCUSDT", "Civic"),
    ("STORJUSDT", "Storj"),
    ("SUSHIUSDT", "SushiSwap"),
    ("BALUSDT", "Balancer"),
    ("BNTUSDT", "Bancor"),
    ("RENUSDT", "Ren"),
    ("SRMUSDT", "Serum"),
    ("ANTUSDT", "Aragon"),
    ("OCEANUSDT", "Ocean Protocol"),
    ("FETUSDT", "Fetch.ai"),
    ("CELRUSDT", "Celer Network"),
    ("DENTUSDT", "Dent"),
    ("HOTUSDT", "Holo"),
    ("MTLUSDT", "Metal"),
    ("STMXUSDT", "StormX"),
    ("TWTUSDT", "Trust Wallet Token"),
    ("CTSIUSDT", "Cartesi"),
    ("AKROUSDT", "Akropolis"),
    ("BANDUSDT", "Band Protocol"),
    ("LPTUSDT", "Livepeer"),
    ("MKRUSDT", "Maker"),
    ("GALAUSDT", "Gala"),
    ("FLUXUSDT", "Flux"),
    ("COTIUSDT", "COTI"),
    ("SKLUSDT", "SKALE"),
    ("STPTUSDT", "STP"),
    ("CTKUSDT", "CertiK"),
    ("KAVAUSDT", "Kava"),
    ("XVSUSDT", "Venus"),
    ("SXPUSDT", "Solar"),
    ("FORTHUSDT", "Ampleforth Governance"),
    ("TOMOUSDT", "TomoChain"),
    ("PERLUSDT", "PERL.eco"),
    ("MDTUSDT", "Measurable Data Token"),
    ("DGBUSDT", "DigiByte"),
    ("NKNUSDT", "NKN"),
    ("VTHOUSDT", "VeThor Token"),
    ("PHAUSDT", "Phala Network"),
    ("LITUSDT", "Litentry"),
    ("SUNUSDT", "SUN"),
    ("CVCUSDT", "Civic"),
    ("BTSUSDT", "BitShares"),
    ("ARPAUSDT", "ARPA Chain"),
    ("DOCKUSDT", "Dock"),
    ("TROYUSDT", "TROY"),
    ("CTSIUSDT", "Cartesi"),
    ("BUSDUSDT", "Binance USD"),
    ("USDCUSDT", "USD Coin"),
    ("USDTUSDT", "Tether"),
];

pub fn display_name(symbol: &str) -> &str {
    // Later duplicates shadow earlier ones, so scan from the end.
    SYMBOL_NAMES
        .iter()
        .rev()
        .find(|(key, _)| *key == symbol)
        .map(|(_, name)| *name)
        .unwrap_or(symbol)
}

pub fn display_label(symbol: &str) -> String {
    format!("{} ({})", display_name(symbol), symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_symbol_resolves_to_name() {
        assert_eq!(display_name("BTCUSDT"), "Bitcoin");
        assert_eq!(display_label("ETHUSDT"), "Ethereum (ETHUSDT)");
    }

    #[test]
    fn unknown_symbol_falls_back_to_itself() {
        assert_eq!(display_name("ABCXYZ"), "ABCXYZ");
        assert_eq!(display_label("ABCXYZ"), "ABCXYZ (ABCXYZ)");
    }

    #[test]
    fn duplicate_keys_keep_last_entry() {
        // CVCUSDT and CTSIUSDT appear twice in the table; both occurrences
        // agree, and the lookup must settle on the later one.
        assert_eq!(display_name("CVCUSDT"), "Civic");
        assert_eq!(display_name("CTSIUSDT"), "Cartesi");
    }
}
