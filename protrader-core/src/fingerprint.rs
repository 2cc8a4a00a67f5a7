//! Series fingerprinting — a content hash identifying the exact input bars.
//!
//! Two series hash equal iff every bar (timestamp, OHLC, volume presence and
//! value) is bit-identical. Reports carry the hash so a decision can be tied
//! back to the data it was computed from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;

/// Hex-encoded BLAKE3 digest of a price series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesHash(pub String);

impl SeriesHash {
    pub fn of(series: &PriceSeries) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(series.len() as u64).to_le_bytes());
        for bar in series.bars() {
            hasher.update(&bar.timestamp.timestamp_millis().to_le_bytes());
            for value in [bar.open, bar.high, bar.low, bar.close] {
                hasher.update(&value.to_bits().to_le_bytes());
            }
            match bar.volume {
                Some(v) => {
                    hasher.update(&[1]);
                    hasher.update(&v.to_bits().to_le_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for SeriesHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = PriceSeries::from_closes(&[1.0, 2.0, 3.0]).unwrap();
        let b = PriceSeries::from_closes(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(SeriesHash::of(&a), SeriesHash::of(&b));
        assert_eq!(SeriesHash::of(&a).as_str().len(), 64);
    }

    #[test]
    fn any_change_alters_the_hash() {
        let a = PriceSeries::from_closes(&[1.0, 2.0, 3.0]).unwrap();
        let b = PriceSeries::from_closes(&[1.0, 2.0, 3.0000001]).unwrap();
        let c = PriceSeries::from_closes(&[1.0, 2.0]).unwrap();
        assert_ne!(SeriesHash::of(&a), SeriesHash::of(&b));
        assert_ne!(SeriesHash::of(&a), SeriesHash::of(&c));
    }

    #[test]
    fn short_form_is_a_prefix() {
        let h = SeriesHash::of(&PriceSeries::from_closes(&[5.0]).unwrap());
        assert_eq!(h.short().len(), 12);
        assert!(h.as_str().starts_with(h.short()));
    }
}
