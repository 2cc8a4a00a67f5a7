//! The structured result handed to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Decision, LevelSet, Signal};
use crate::engine::config::DecisionPolicy;
use crate::engine::frame::IndicatorRow;
use crate::fingerprint::SeriesHash;

/// Snapshot of the last indicator row, as exposed in `meta.indicators`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub sma_fast: f64,
    pub sma_slow: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub bb_mid: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub momentum: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub volume_avg: Option<f64>,
}

impl From<&IndicatorRow> for IndicatorSnapshot {
    fn from(row: &IndicatorRow) -> Self {
        Self {
            sma_fast: row.sma_fast,
            sma_slow: row.sma_slow,
            ema_fast: row.ema_fast,
            ema_slow: row.ema_slow,
            rsi: row.rsi,
            macd: row.macd,
            macd_signal: row.macd_signal,
            bb_mid: row.bb_mid,
            bb_upper: row.bb_upper,
            bb_lower: row.bb_lower,
            momentum: row.momentum,
            volume_avg: row.volume_avg,
        }
    }
}

/// Everything besides the verdict.
///
/// On the neutral error path only `bars` and `score` are meaningful; the
/// other fields are empty or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub indicators: Option<IndicatorSnapshot>,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub entry: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub take_profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub bars: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub series_hash: Option<SeriesHash>,
    /// Raw model output, present only when a confidence model was applied.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ml_confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub signal: Signal,
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub policy: DecisionPolicy,
    pub meta: ReportMeta,
}

impl SignalReport {
    pub(crate) fn assemble(
        decision: Decision,
        policy: DecisionPolicy,
        last: &IndicatorRow,
        levels: LevelSet,
        bars: usize,
        series_hash: SeriesHash,
        ml_confidence: Option<f64>,
    ) -> Self {
        Self {
            signal: decision.signal,
            confidence: decision.confidence,
            reasons: decision.reasons,
            policy,
            meta: ReportMeta {
                score: decision.score,
                indicators: Some(IndicatorSnapshot::from(last)),
                support_levels: levels.support_levels,
                resistance_levels: levels.resistance_levels,
                entry: Some(levels.entry),
                stop_loss: Some(levels.stop_loss),
                take_profit: Some(levels.take_profit),
                last_price: Some(last.close),
                timestamp: Some(last.timestamp),
                bars,
                series_hash: Some(series_hash),
                ml_confidence,
            },
        }
    }

    /// HOLD at zero confidence with a single reason and no levels.
    pub fn neutral(reason: impl Into<String>, policy: DecisionPolicy, bars: usize) -> Self {
        let decision = Decision::neutral(reason);
        Self {
            signal: decision.signal,
            confidence: decision.confidence,
            reasons: decision.reasons,
            policy,
            meta: ReportMeta {
                score: decision.score,
                indicators: None,
                support_levels: Vec::new(),
                resistance_levels: Vec::new(),
                entry: None,
                stop_loss: None,
                take_profit: None,
                last_price: None,
                timestamp: None,
                bars,
                series_hash: None,
                ml_confidence: None,
            },
        }
    }

    pub fn decision(&self) -> Decision {
        Decision {
            signal: self.signal,
            confidence: self.confidence,
            reasons: self.reasons.clone(),
            score: self.meta.score,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
