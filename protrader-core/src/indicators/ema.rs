//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = EMA[t-1] + alpha * (close[t] - EMA[t-1]), alpha = 2 / (period + 1).
//! Seed: EMA[0] = close[0]. No warmup gap; early values are approximate.

use crate::components::indicator::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        ema_of_series(&closes(bars), self.period)
    }
}

/// Span-style EMA of an arbitrary series.
/// Used by composed indicators (MACD) that smooth a derived series.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let alpha = 2.0 / (period.max(1) as f64 + 1.0);
    ewm_of_series(values, alpha)
}

/// Exponentially weighted mean with an explicit smoothing factor.
///
/// The update is written as `prev + alpha * (x - prev)` so a constant input
/// reproduces itself exactly.
pub fn ewm_of_series(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &v in values {
        let next = match prev {
            None => v,
            Some(p) => p + alpha * (v - p),
        };
        result.push(next);
        prev = Some(next);
    }

    result
}
