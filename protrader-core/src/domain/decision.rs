//! Decision — the engine's directional verdict.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason recorded when the frame is too short to evaluate.
pub const INSUFFICIENT_DATA: &str = "insufficient_data";

/// Reason recorded when no rule contributed.
pub const NO_STRONG_CONFIRMATION: &str = "no_strong_confirmation";

/// Outcome of the decision stage.
///
/// `score` is the raw rule sum the confidence was mapped from; it is zero
/// under the insufficient-data policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub signal: Signal,
    /// Rule-alignment strength in [0, 1]. Not a calibrated probability.
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub score: f64,
}

impl Decision {
    /// HOLD at zero confidence with a single reason.
    pub fn neutral(reason: impl Into<String>) -> Self {
        Self {
            signal: Signal::Hold,
            confidence: 0.0,
            reasons: vec![reason.into()],
            score: 0.0,
        }
    }

    pub fn insufficient_data() -> Self {
        Self::neutral(INSUFFICIENT_DATA)
    }
}
