//! Indicator trait.
//!
//! Indicators are pure functions: bar history in, numeric series out.

use crate::domain::Bar;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. Rolling windows warm up on whatever history is available,
/// so most indicators have a value from the first bar on; those that require
/// a full window (bands, volume average) emit `f64::NAN` until it fills.
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_9", "rsi_14").
    fn name(&self) -> &str;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Close prices of a bar slice.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_bars, Sma};

    #[test]
    fn trait_object_builds() {
        let ind: Box<dyn Indicator> = Box::new(Sma::new(3));
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        assert_eq!(ind.compute(&bars).len(), 3);
        assert_eq!(ind.name(), "sma_3");
    }

    #[test]
    fn closes_extracts_in_order() {
        let bars = make_bars(&[5.0, 6.0]);
        assert_eq!(closes(&bars), vec![5.0, 6.0]);
    }
}
