//! Strict-consensus rule set (legacy mode).
//!
//! Direction only when the SMA cross, the MACD cross and the RSI filter all
//! agree on the same bar; anything less is HOLD. Kept for conformance with
//! older consumers. It yields no graded strength of its own, so the caller
//! attaches the weighted-score confidence.

use crate::domain::{Signal, NO_STRONG_CONFIRMATION};
use crate::engine::config::DecisionParams;
use crate::engine::frame::IndicatorRow;

use super::crossover::{detect_cross, Cross};

pub fn evaluate(
    prev: &IndicatorRow,
    last: &IndicatorRow,
    params: &DecisionParams,
) -> (Signal, Vec<String>) {
    let sma = detect_cross(prev.sma_fast, prev.sma_slow, last.sma_fast, last.sma_slow);
    let macd = detect_cross(prev.macd, prev.macd_signal, last.macd, last.macd_signal);
    let rsi = last.rsi;

    if sma == Cross::Up && macd == Cross::Up && rsi < params.strict_rsi_buy_max {
        return (Signal::Buy, tags("sma_cross_up", rsi));
    }
    if sma == Cross::Down && macd == Cross::Down && rsi > params.strict_rsi_sell_min {
        return (Signal::Sell, tags("sma_cross_down", rsi));
    }

    (Signal::Hold, vec![NO_STRONG_CONFIRMATION.to_string()])
}

fn tags(cross: &str, rsi: f64) -> Vec<String> {
    vec![
        cross.to_string(),
        "macd_confirm".to_string(),
        format!("rsi={rsi:.1}"),
    ]
}
