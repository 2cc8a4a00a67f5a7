//! Level stage — support/resistance from recent local extrema.
//!
//! Works on the last `lookback` closes only. A close is a local maximum when
//! it equals the maximum of the centered window around it (and likewise for
//! minima), so plateaus mark every bar on them. Levels are rounded, then
//! deduplicated, newest first.
//!
//! Entry, stop-loss and take-profit are the latest close scaled by fixed
//! fractions. They do not adapt to volatility.

use tracing::debug;

use crate::domain::{LevelSet, PriceSeries};
use crate::engine::config::{LevelParams, MAX_LEVEL_PRECISION};

/// Levels with the reference parameters (lookback = min(120, len)).
pub fn levels(series: &PriceSeries) -> LevelSet {
    levels_with(series, &LevelParams::default())
}

pub fn levels_with(series: &PriceSeries, params: &LevelParams) -> LevelSet {
    let window = series.tail(params.lookback.max(1)).closes();
    let entry = series.last().close;
    let (support_levels, resistance_levels) = support_resistance(&window, params);

    debug!(
        lookback = window.len(),
        supports = support_levels.len(),
        resistances = resistance_levels.len(),
        "levels computed"
    );

    LevelSet {
        support_levels,
        resistance_levels,
        entry,
        stop_loss: entry * (1.0 - params.stop_loss_fraction),
        take_profit: entry * (1.0 + params.take_profit_fraction),
    }
}

/// Returns `(support, resistance)`.
fn support_resistance(closes: &[f64], params: &LevelParams) -> (Vec<f64>, Vec<f64>) {
    let width = params.extrema_window.max(3) | 1;
    let half = width / 2;
    let max_levels = params.max_levels.max(1);

    let (lo, hi) = min_max(closes);
    if closes.len() < width {
        let both = distinct(&[lo, hi], params.precision, max_levels);
        return (both.clone(), both);
    }

    let mut minima = Vec::new();
    let mut maxima = Vec::new();
    for i in half..closes.len() - half {
        let window = &closes[i - half..=i + half];
        let (w_lo, w_hi) = min_max(window);
        if closes[i] == w_hi {
            maxima.push(closes[i]);
        }
        if closes[i] == w_lo {
            minima.push(closes[i]);
        }
    }
    minima.reverse();
    maxima.reverse();

    let mut support = distinct(&minima, params.precision, max_levels);
    let mut resistance = distinct(&maxima, params.precision, max_levels);
    if support.is_empty() {
        support = distinct(&[lo], params.precision, max_levels);
    }
    if resistance.is_empty() {
        resistance = distinct(&[hi], params.precision, max_levels);
    }
    (support, resistance)
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Round, drop repeats (keeping first occurrence), cap at `limit`.
fn distinct(values: &[f64], precision: u32, limit: usize) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(limit);
    for &v in values {
        let rounded = round_to(v, precision);
        if !out.contains(&rounded) {
            out.push(rounded);
            if out.len() == limit {
                break;
            }
        }
    }
    out
}

fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision.min(MAX_LEVEL_PRECISION) as i32);
    (value * scale).round() / scale
}
