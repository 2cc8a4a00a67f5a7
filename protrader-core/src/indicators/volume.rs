//! Volume average — rolling mean of bar volume.
//!
//! Requires a full window of bars that all carry volume; otherwise NaN.

use crate::components::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct VolumeSma {
    period: usize,
    name: String,
}

impl VolumeSma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume period must be >= 1");
        Self {
            period,
            name: format!("volume_sma_{period}"),
        }
    }
}

impl Indicator for VolumeSma {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let window = &bars[i + 1 - self.period..=i];
            let sum: Option<f64> = window.iter().map(|b| b.volume).sum();
            if let Some(sum) = sum {
                result[i] = sum / self.period as f64;
            }
        }

        result
    }
}
