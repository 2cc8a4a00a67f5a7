//! Market classification from ticker symbols.
//!
//! Pure string rules; nothing here checks that a symbol or interval actually
//! has data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Crypto,
    Indian,
    Forex,
    Us,
}

const INTRADAY_FULL: &[&str] = &[
    "1m", "2m", "5m", "15m", "30m", "60m", "90m", "1d", "5d", "1wk", "1mo", "3mo",
];
const INDIAN: &[&str] = &["5m", "15m", "30m", "60m", "1d", "5d", "1wk", "1mo", "3mo"];
const FOREX: &[&str] = &["15m", "30m", "60m", "1d", "5d", "1wk", "1mo", "3mo"];

impl Market {
    pub const ALL: [Market; 4] = [Market::Crypto, Market::Indian, Market::Forex, Market::Us];

    /// Classify a symbol. Rules are checked in order; the first match wins.
    ///
    /// - `.NS` suffix: Indian (NSE)
    /// - `USDT`, `-USD`, `BTC` or `ETH` suffix: crypto
    /// - at least 6 characters ending in `USD`, `INR` or `EUR`: forex
    /// - anything else: US equities
    pub fn infer(symbol: &str) -> Self {
        let s = symbol.trim().to_uppercase();
        if s.ends_with(".NS") {
            Market::Indian
        } else if ["USDT", "-USD", "BTC", "ETH"].iter().any(|x| s.ends_with(x)) {
            Market::Crypto
        } else if s.len() >= 6 && ["USD", "INR", "EUR"].iter().any(|x| s.ends_with(x)) {
            Market::Forex
        } else {
            Market::Us
        }
    }

    pub fn supported_intervals(&self) -> &'static [&'static str] {
        match self {
            Market::Crypto | Market::Us => INTRADAY_FULL,
            Market::Indian => INDIAN,
            Market::Forex => FOREX,
        }
    }

    pub fn supports(&self, interval: &str) -> bool {
        self.supported_intervals().contains(&interval)
    }

    /// Ticker in the form quote providers expect (`BTCUSDT` → `BTC-USD`,
    /// `EURUSD` → `EURUSD=X`). Equities pass through.
    pub fn provider_symbol(&self, symbol: &str) -> String {
        let s = symbol.trim();
        match self {
            Market::Crypto => {
                if let Some(base) = s.strip_suffix("USDT") {
                    format!("{base}-USD")
                } else if s.ends_with("-USD") {
                    s.to_string()
                } else if let Some(base) = s.strip_suffix("USD") {
                    format!("{base}-USD")
                } else {
                    s.to_string()
                }
            }
            Market::Forex if !s.ends_with("=X") => format!("{s}=X"),
            _ => s.to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Crypto => "crypto",
            Market::Indian => "indian",
            Market::Forex => "forex",
            Market::Us => "us",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crypto" => Ok(Market::Crypto),
            "indian" => Ok(Market::Indian),
            "forex" => Ok(Market::Forex),
            "us" => Ok(Market::Us),
            other => Err(format!("unknown market '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_markets() {
        assert_eq!(Market::infer("RELIANCE.NS"), Market::Indian);
        assert_eq!(Market::infer("btcusdt"), Market::Crypto);
        assert_eq!(Market::infer("ETH-USD"), Market::Crypto);
        assert_eq!(Market::infer("XAUUSD"), Market::Forex);
        assert_eq!(Market::infer("USDINR"), Market::Forex);
        assert_eq!(Market::infer("AAPL"), Market::Us);
        // too short to be a currency pair
        assert_eq!(Market::infer("AUSD"), Market::Us);
    }

    #[test]
    fn interval_tables() {
        assert!(Market::Crypto.supports("1m"));
        assert!(!Market::Indian.supports("1m"));
        assert!(!Market::Forex.supports("5m"));
        assert!(Market::Forex.supports("1d"));
        assert_eq!(Market::Us.supported_intervals(), Market::Crypto.supported_intervals());
    }

    #[test]
    fn provider_symbols() {
        assert_eq!(Market::Crypto.provider_symbol("BTCUSDT"), "BTC-USD");
        assert_eq!(Market::Crypto.provider_symbol("ETH-USD"), "ETH-USD");
        assert_eq!(Market::Forex.provider_symbol("EURUSD"), "EURUSD=X");
        assert_eq!(Market::Forex.provider_symbol("EURUSD=X"), "EURUSD=X");
        assert_eq!(Market::Us.provider_symbol(" AAPL "), "AAPL");
    }

    #[test]
    fn parses_names() {
        for m in Market::ALL {
            assert_eq!(m.as_str().parse::<Market>().unwrap(), m);
        }
        assert!("moon".parse::<Market>().is_err());
    }
}
