//! Optional model-based confidence.
//!
//! A `ConfidenceModel` maps the last bar's features to a probability-like
//! value that is blended with the rule confidence. Models are injected by the
//! caller and held by value; the engine never loads, trains or caches one,
//! and it works unchanged without one.

use serde::{Deserialize, Serialize};

use crate::engine::frame::IndicatorFrame;

/// Feature vector handed to a confidence model, taken from the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MlFeatures {
    pub macd: f64,
    pub rsi: f64,
    /// Fast SMA minus slow SMA.
    pub sma_spread: f64,
    /// Close minus the previous close.
    pub price_change: f64,
}

impl MlFeatures {
    /// Needs at least two bars; returns `None` otherwise.
    pub fn from_frame(frame: &IndicatorFrame) -> Option<Self> {
        let (prev, last) = frame.last_two()?;
        Some(Self {
            macd: last.macd,
            rsi: last.rsi,
            sma_spread: last.sma_fast - last.sma_slow,
            price_change: last.close - prev.close,
        })
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.macd, self.rsi, self.sma_spread, self.price_change]
    }
}

/// A pure mapping from features to a confidence in [0, 1].
///
/// Implementations must be deterministic. Out-of-range outputs are clamped
/// and non-finite outputs are treated as the neutral 0.5 by [`blend`].
pub trait ConfidenceModel: Send + Sync {
    fn predict(&self, features: &MlFeatures) -> f64;
}

impl<F> ConfidenceModel for F
where
    F: Fn(&MlFeatures) -> f64 + Send + Sync,
{
    fn predict(&self, features: &MlFeatures) -> f64 {
        self(features)
    }
}

/// Logistic regression inference with externally supplied coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: [f64; 4],
    #[serde(default)]
    pub bias: f64,
}

impl ConfidenceModel for LogisticModel {
    fn predict(&self, features: &MlFeatures) -> f64 {
        let z = self
            .weights
            .iter()
            .zip(features.as_array())
            .fold(self.bias, |acc, (w, x)| acc + w * x);
        1.0 / (1.0 + (-z).exp())
    }
}

/// Model output used when the model produces nothing usable.
pub const NEUTRAL_MODEL_CONFIDENCE: f64 = 0.5;

/// `(1 - weight) * rule + weight * model`, with `weight` clamped to [0, 1].
pub fn blend(rule_confidence: f64, model_confidence: f64, weight: f64) -> f64 {
    let w = if weight.is_finite() {
        weight.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let model = sanitize(model_confidence);
    ((1.0 - w) * rule_confidence + w * model).clamp(0.0, 1.0)
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        NEUTRAL_MODEL_CONFIDENCE
    }
}
