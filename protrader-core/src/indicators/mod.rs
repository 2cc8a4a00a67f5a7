//! Concrete indicator implementations.
//!
//! All indicators implement the `Indicator` trait from `components::indicator`.
//! The indicator stage (`engine::frame`) computes them once per invocation and
//! assembles the per-bar `IndicatorFrame`.
//!
//! Multi-series indicators (MACD, Bollinger) are exposed as separate named
//! instances per output, keeping the single-series `Indicator` trait unchanged.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod momentum;
pub mod rsi;
pub mod sma;
pub mod volume;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use macd::{Macd, MacdOutput};
pub use momentum::Momentum;
pub use rsi::Rsi;
pub use sma::Sma;
pub use volume::VolumeSma;

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::minutes(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: Some(1000.0),
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
