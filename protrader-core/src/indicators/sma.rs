//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices. While fewer than `period` bars exist the
//! mean is taken over the available history (min-periods = 1), so the
//! first value equals the first close.

use crate::components::indicator::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        sma_of_series(&closes(bars), self.period)
    }
}

/// Rolling mean with min-periods = 1 over an arbitrary series.
///
/// Each window is summed from scratch, so a large value leaving the window
/// leaves no residue in later means.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let period = period.max(1);
    (0..values.len())
        .map(|i| {
            let window = &values[(i + 1).saturating_sub(period)..=i];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}
