//! Decision stage — classifies the last two rows of an indicator frame.
//!
//! Decisions are computed fresh from the frame on every call: no state, no
//! randomness, no I/O. The same frame always yields the same decision.
//!
//! Two rule sets exist. `WeightedScore` is the reference policy: partial
//! confirmation still produces a graded confidence. `StrictConsensus` is the
//! legacy all-or-nothing policy.

pub mod crossover;
pub mod strict;
pub mod weighted;

pub use crossover::{detect_cross, Cross};
pub use weighted::score_to_confidence;

use tracing::debug;

use crate::domain::Decision;
use crate::engine::config::{DecisionParams, DecisionPolicy};
use crate::engine::frame::IndicatorFrame;

/// Decide with the reference parameters and the weighted-score policy.
pub fn decide(frame: &IndicatorFrame) -> Decision {
    decide_with(frame, &DecisionParams::default(), DecisionPolicy::WeightedScore)
}

/// At least `min_bars` rows, and never fewer than the two the rules compare.
pub fn has_enough_history(frame: &IndicatorFrame, params: &DecisionParams) -> bool {
    frame.len() >= params.min_bars.max(2)
}

pub fn decide_with(
    frame: &IndicatorFrame,
    params: &DecisionParams,
    policy: DecisionPolicy,
) -> Decision {
    if !has_enough_history(frame, params) {
        debug!(bars = frame.len(), min = params.min_bars, "insufficient history");
        return Decision::insufficient_data();
    }
    let Some((prev, last)) = frame.last_two() else {
        return Decision::insufficient_data();
    };

    let weighted = weighted::evaluate(&prev, &last, params);
    let decision = match policy {
        DecisionPolicy::WeightedScore => weighted,
        DecisionPolicy::StrictConsensus => {
            let (signal, reasons) = strict::evaluate(&prev, &last, params);
            Decision {
                signal,
                reasons,
                ..weighted
            }
        }
    };

    debug!(
        policy = policy.as_str(),
        signal = %decision.signal,
        score = decision.score,
        confidence = decision.confidence,
        "decision"
    );
    decision
}

#[cfg(test)]
pub(crate) mod test_rows {
    use chrono::TimeZone;

    use crate::engine::frame::IndicatorRow;

    /// A row where every moving average sits at `price` and nothing fires
    /// except the EMA tie-break.
    pub fn flat_row(price: f64) -> IndicatorRow {
        IndicatorRow {
            timestamp: chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            close: price,
            volume: None,
            sma_fast: price,
            sma_slow: price,
            ema_fast: price,
            ema_slow: price,
            rsi: 50.0,
            macd: 0.0,
            macd_signal: 0.0,
            bb_mid: None,
            bb_upper: None,
            bb_lower: None,
            momentum: 0.0,
            volume_avg: None,
        }
    }

    /// Two flat rows at 100.0, adjusted by `f(prev, last)`.
    pub fn pair(f: impl FnOnce(&mut IndicatorRow, &mut IndicatorRow)) -> (IndicatorRow, IndicatorRow) {
        let mut prev = flat_row(100.0);
        let mut last = flat_row(100.0);
        f(&mut prev, &mut last);
        (prev, last)
    }
}
