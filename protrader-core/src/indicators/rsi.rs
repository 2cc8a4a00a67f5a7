//! Relative Strength Index (RSI).
//!
//! Up and down moves are smoothed separately with Wilder's factor
//! alpha = 1/period, seeded from the first move (which is zero).
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: avg_loss == 0 → RSI = 100; no movement at all → RSI = 50.

use crate::components::indicator::{closes, Indicator};
use crate::domain::Bar;

use super::ema::ewm_of_series;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes = closes(bars);
        let n = closes.len();

        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let change = closes[i] - closes[i - 1];
            if change > 0.0 {
                gains[i] = change;
            } else if change < 0.0 {
                losses[i] = -change;
            }
        }

        let alpha = 1.0 / self.period as f64;
        let avg_gain = ewm_of_series(&gains, alpha);
        let avg_loss = ewm_of_series(&losses, alpha);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| compute_rsi(g, l))
            .collect()
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else {
        (100.0 - 100.0 / (1.0 + avg_gain / avg_loss)).clamp(0.0, 100.0)
    }
}
