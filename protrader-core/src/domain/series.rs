//! PriceSeries — a validated, time-ordered run of bars.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::bar::Bar;
use crate::error::EngineError;

/// Ordered bars, oldest first.
///
/// Construction guarantees at least one bar, strictly increasing timestamps
/// and a finite close on every bar. Nothing else is required of a bar: the
/// engine only reads close prices and, when present, volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, EngineError> {
        if bars.is_empty() {
            return Err(EngineError::EmptySeries);
        }
        for (i, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() {
                return Err(EngineError::MissingData(format!(
                    "bar {i} has a non-finite close ({})",
                    bar.close
                )));
            }
            if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
                return Err(EngineError::UnorderedTimestamps {
                    index: i,
                    timestamp: bar.timestamp.to_rfc3339(),
                });
            }
        }
        Ok(Self { bars })
    }

    /// Build a close-only series on a synthetic one-minute clock.
    ///
    /// Used when the source carries no timestamps at all.
    pub fn from_closes(closes: &[f64]) -> Result<Self, EngineError> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar::from_close(synthetic_timestamp(i), close))
            .collect();
        Self::new(bars)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false: an empty series cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> &Bar {
        // Non-empty by construction.
        &self.bars[self.bars.len() - 1]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// The most recent `n` bars (or all of them when `n >= len`), as a new series.
    pub fn tail(&self, n: usize) -> Self {
        let n = n.clamp(1, self.bars.len());
        Self {
            bars: self.bars[self.bars.len() - n..].to_vec(),
        }
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bars = Vec::<Bar>::deserialize(deserializer)?;
        PriceSeries::new(bars).map_err(serde::de::Error::custom)
    }
}

fn synthetic_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200, 0)
        .single()
        .unwrap_or_default()
}

/// Timestamp of bar `index` on the synthetic one-minute clock
/// (2024-01-01T00:00:00Z plus `index` minutes).
pub fn synthetic_timestamp(index: usize) -> DateTime<Utc> {
    synthetic_epoch() + Duration::minutes(index as i64)
}
