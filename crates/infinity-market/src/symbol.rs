//! Symbol resolution
//!
//! Maps a user-facing instrument code such as `XAUUSD` to the currency pair
//! the upstream provider expects.

use serde::{Deserialize, Serialize};

/// Instruments with an explicit provider mapping
const KNOWN_PAIRS: &[(&str, &str, &str)] = &[
    ("XAUUSD", "XAU", "USD"),
    ("XAGUSD", "XAG", "USD"),
    ("BTCUSD", "BTC", "USD"),
    ("ETHUSD", "ETH", "USD"),
    ("EURUSD", "EUR", "USD"),
    ("GBPUSD", "GBP", "USD"),
    ("USDJPY", "USD", "JPY"),
    ("AUDUSD", "AUD", "USD"),
];

/// Tickers served by the digital-currency endpoint
const CRYPTO_TICKERS: &[&str] = &["BTC", "ETH"];

/// Symbol used when a caller does not name one
pub const DEFAULT_SYMBOL: &str = "XAUUSD";

/// Provider parameters for one instrument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Base currency (`from_symbol` / `symbol` upstream)
    pub base: String,
    /// Quote currency (`to_symbol` / `market` upstream)
    pub quote: String,
}

impl CurrencyPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }
}

/// Resolve a symbol to its currency pair
///
/// Known instruments use the static table; anything else is split into its
/// first three and next three characters. Short inputs yield an empty quote
/// currency rather than an error.
pub fn resolve(symbol: &str) -> CurrencyPair {
    if let Some((_, base, quote)) = KNOWN_PAIRS.iter().find(|(code, _, _)| *code == symbol) {
        return CurrencyPair::new(*base, *quote);
    }

    let base: String = symbol.chars().take(3).collect();
    let quote: String = symbol.chars().skip(3).take(3).collect();
    CurrencyPair::new(base, quote)
}

/// Whether the symbol names a crypto asset the provider can serve
pub fn is_crypto(symbol: &str) -> bool {
    CRYPTO_TICKERS.iter().any(|ticker| symbol.contains(ticker))
}

/// Normalize caller input: trim, upper-case, default when blank
pub fn normalize(symbol: Option<&str>) -> String {
    match symbol.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_uppercase(),
        _ => DEFAULT_SYMBOL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_symbols() {
        assert_eq!(resolve("XAUUSD"), CurrencyPair::new("XAU", "USD"));
        assert_eq!(resolve("USDJPY"), CurrencyPair::new("USD", "JPY"));
        assert_eq!(resolve("ETHUSD"), CurrencyPair::new("ETH", "USD"));
    }

    #[test]
    fn test_unknown_symbols_split_three_and_three() {
        assert_eq!(resolve("NZDCAD"), CurrencyPair::new("NZD", "CAD"));
        // Extra characters are ignored
        assert_eq!(resolve("USDCHFX"), CurrencyPair::new("USD", "CHF"));
        // Short inputs leave the quote currency empty
        assert_eq!(resolve("XRP"), CurrencyPair::new("XRP", ""));
        assert_eq!(resolve("AB"), CurrencyPair::new("AB", ""));
        assert_eq!(resolve("SOLUS"), CurrencyPair::new("SOL", "US"));
        assert_eq!(resolve(""), CurrencyPair::new("", ""));
    }

    #[test]
    fn test_resolution_is_case_sensitive() {
        // Lower-case input is not in the table and goes through the split
        assert_eq!(resolve("usdjpy"), CurrencyPair::new("usd", "jpy"));
    }

    #[test]
    fn test_crypto_detection() {
        assert!(is_crypto("BTCUSD"));
        assert!(is_crypto("ETHEUR"));
        assert!(is_crypto("USDBTC"));
        assert!(!is_crypto("XAUUSD"));
        assert!(!is_crypto("SOLUSD"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Some(" eurusd ")), "EURUSD");
        assert_eq!(normalize(Some("")), DEFAULT_SYMBOL);
        assert_eq!(normalize(None), DEFAULT_SYMBOL);
    }
}
