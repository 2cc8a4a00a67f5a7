//! Weighted-score rule set.
//!
//! Each rule adds or subtracts its weight and records a tag. The score maps
//! linearly onto confidence and is classified against symmetric thresholds.
//! Rules are evaluated in a fixed order; tags appear in that order.

use crate::domain::{Decision, Signal, NO_STRONG_CONFIRMATION};
use crate::engine::config::{DecisionParams, EmaTieBreak};
use crate::engine::frame::IndicatorRow;

use super::crossover::{detect_cross, Cross};

/// Running score and the tags of every rule that contributed.
#[derive(Debug, Default)]
struct Scorecard {
    score: f64,
    reasons: Vec<String>,
}

impl Scorecard {
    fn add(&mut self, weight: f64, reason: impl Into<String>) {
        self.score += weight;
        self.reasons.push(reason.into());
    }
}

pub fn evaluate(prev: &IndicatorRow, last: &IndicatorRow, params: &DecisionParams) -> Decision {
    let mut card = Scorecard::default();

    // Trend
    if last.ema_fast.is_finite() && last.ema_slow.is_finite() {
        let up = if last.ema_fast > last.ema_slow {
            Some(true)
        } else if last.ema_fast == last.ema_slow {
            match params.ema_tie_break {
                EmaTieBreak::Down => Some(false),
                EmaTieBreak::Up => Some(true),
                EmaTieBreak::Neutral => None,
            }
        } else {
            Some(false)
        };
        match up {
            Some(true) => card.add(params.trend_weight, "trend up"),
            Some(false) => card.add(-params.trend_weight, "trend down"),
            None => {}
        }
    }

    // SMA crossover
    match detect_cross(prev.sma_fast, prev.sma_slow, last.sma_fast, last.sma_slow) {
        Cross::Up => card.add(params.sma_cross_weight, "sma cross up"),
        Cross::Down => card.add(-params.sma_cross_weight, "sma cross down"),
        Cross::None => {}
    }

    // MACD confirmation
    match detect_cross(prev.macd, prev.macd_signal, last.macd, last.macd_signal) {
        Cross::Up => card.add(params.macd_cross_weight, "macd bullish"),
        Cross::Down => card.add(-params.macd_cross_weight, "macd bearish"),
        Cross::None => {}
    }

    // RSI extremity
    if last.rsi < params.rsi_oversold {
        card.add(params.rsi_weight, format!("oversold (rsi={:.1})", last.rsi));
    } else if last.rsi > params.rsi_overbought {
        card.add(-params.rsi_weight, format!("overbought (rsi={:.1})", last.rsi));
    }

    // Band breakout
    if let Some(upper) = last.bb_upper {
        if last.close > upper {
            card.add(params.breakout_weight, "breakout up");
        }
    }
    if let Some(lower) = last.bb_lower {
        if last.close < lower {
            card.add(-params.breakout_weight, "breakout down");
        }
    }

    // Volume confirmation
    if let (Some(volume), Some(avg)) = (last.volume, last.volume_avg) {
        if avg > 0.0 && volume > params.volume_spike_ratio * avg {
            card.add(params.volume_weight, "volume spike");
        }
    }

    let score = settle(card.score);
    let signal = classify(score, params);
    let reasons = if card.reasons.is_empty() {
        vec![NO_STRONG_CONFIRMATION.to_string()]
    } else {
        card.reasons
    };

    Decision {
        signal,
        confidence: score_to_confidence(score),
        reasons,
        score,
    }
}

/// Map a score in [-1, 1] onto [0, 1].
pub fn score_to_confidence(score: f64) -> f64 {
    ((score + 1.0) / 2.0).clamp(0.0, 1.0)
}

fn classify(score: f64, params: &DecisionParams) -> Signal {
    if score > params.buy_threshold {
        Signal::Buy
    } else if score < params.sell_threshold {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Weights are decimal fractions; strip binary summation noise so a score
/// that lands exactly on a threshold classifies the same way every time.
fn settle(score: f64) -> f64 {
    (score * 1e10).round() / 1e10
}
