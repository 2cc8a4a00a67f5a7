//! Bar — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLC bar with optional volume.
///
/// Data sources that only deliver a close price produce bars whose open, high
/// and low equal the close (see [`Bar::from_close`]). Deserialization applies
/// the same rule, so `{"timestamp": ..., "close": ...}` is a complete bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BarRecord")]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    pub fn from_close(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }
}

/// Wire shape of a bar: everything but the timestamp and close is optional.
#[derive(Deserialize)]
struct BarRecord {
    timestamp: DateTime<Utc>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: f64,
    volume: Option<f64>,
}

impl From<BarRecord> for Bar {
    fn from(r: BarRecord) -> Self {
        Self {
            timestamp: r.timestamp,
            open: r.open.unwrap_or(r.close),
            high: r.high.unwrap_or(r.close),
            low: r.low.unwrap_or(r.close),
            close: r.close,
            volume: r.volume,
        }
    }
}
