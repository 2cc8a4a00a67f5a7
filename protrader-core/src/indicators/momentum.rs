//! Momentum — close-to-close difference (not percentage).
//!
//! momentum[t] = close[t] - close[t-period]; bars without a predecessor
//! `period` bars back report 0.0.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Momentum {
    period: usize,
    name: String,
}

impl Momentum {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Momentum period must be >= 1");
        Self {
            period,
            name: format!("momentum_{period}"),
        }
    }
}

impl Indicator for Momentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        (0..bars.len())
            .map(|i| {
                if i < self.period {
                    0.0
                } else {
                    bars[i].close - bars[i - self.period].close
                }
            })
            .collect()
    }
}
