//! Look-ahead contamination tests for every indicator and for the frame.
//!
//! Invariant: no indicator value at bar t may depend on price data from bar
//! t+1 or later.
//!
//! Method: compute on a truncated series (bars 0..100) and on the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs. Any
//! difference means future data is leaking into past values.

use chrono::{Duration, TimeZone, Utc};
use protrader_core::components::indicator::Indicator;
use protrader_core::domain::{Bar, PriceSeries};
use protrader_core::engine::{compute_indicators, IndicatorRow};
use protrader_core::indicators::*;

/// N bars of a deterministic pseudo-random walk with volume.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price = (price + change).max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        bars.push(Bar {
            timestamp: start + Duration::minutes(i as i64),
            open,
            high: open.max(close) + 2.0,
            low: open.min(close) - 2.0,
            close,
            volume: Some(1000.0 + (seed % 5000) as f64),
        });
    }

    bars
}

fn assert_same(name: &str, i: usize, t: f64, f: f64) {
    if t.is_nan() && f.is_nan() {
        return;
    }
    assert!(
        !t.is_nan() && !f.is_nan(),
        "{name}: NaN mismatch at bar {i} (truncated={t}, full={f})"
    );
    assert!(
        (t - f).abs() < 1e-10,
        "{name}: look-ahead contamination at bar {i}: truncated={t}, full={f}"
    );
}

fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[Bar], truncated_len: usize) {
    let full = indicator.compute(full_bars);
    let truncated = indicator.compute(&full_bars[..truncated_len]);

    assert_eq!(truncated.len(), truncated_len, "{}: length", indicator.name());
    assert_eq!(full.len(), full_bars.len(), "{}: length", indicator.name());

    for i in 0..truncated_len {
        assert_same(indicator.name(), i, truncated[i], full[i]);
    }
}

#[test]
fn lookahead_sma() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Sma::new(9), &bars, 100);
    assert_no_lookahead(&Sma::new(21), &bars, 100);
}

#[test]
fn lookahead_ema() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Ema::new(12), &bars, 100);
    assert_no_lookahead(&Ema::new(26), &bars, 100);
}

#[test]
fn lookahead_rsi() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Rsi::new(14), &bars, 100);
    assert_no_lookahead(&Rsi::new(7), &bars, 100);
}

#[test]
fn lookahead_macd() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Macd::line(12, 26, 9), &bars, 100);
    assert_no_lookahead(&Macd::signal(12, 26, 9), &bars, 100);
}

#[test]
fn lookahead_bollinger() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Bollinger::upper(20, 2.0), &bars, 100);
    assert_no_lookahead(&Bollinger::middle(20, 2.0), &bars, 100);
    assert_no_lookahead(&Bollinger::lower(20, 2.0), &bars, 100);
}

#[test]
fn lookahead_momentum() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&Momentum::new(1), &bars, 100);
    assert_no_lookahead(&Momentum::new(10), &bars, 100);
}

#[test]
fn lookahead_volume_average() {
    let bars = make_test_bars(200);
    assert_no_lookahead(&VolumeSma::new(20), &bars, 100);
}

fn row_values(row: &IndicatorRow) -> Vec<(&'static str, f64)> {
    let opt = |v: Option<f64>| v.unwrap_or(f64::NAN);
    vec![
        ("sma_fast", row.sma_fast),
        ("sma_slow", row.sma_slow),
        ("ema_fast", row.ema_fast),
        ("ema_slow", row.ema_slow),
        ("rsi", row.rsi),
        ("macd", row.macd),
        ("macd_signal", row.macd_signal),
        ("bb_mid", opt(row.bb_mid)),
        ("bb_upper", opt(row.bb_upper)),
        ("bb_lower", opt(row.bb_lower)),
        ("momentum", row.momentum),
        ("volume_avg", opt(row.volume_avg)),
    ]
}

#[test]
fn lookahead_full_frame() {
    let bars = make_test_bars(200);
    let full = compute_indicators(&PriceSeries::new(bars.clone()).unwrap()).unwrap();
    let truncated = compute_indicators(&PriceSeries::new(bars[..100].to_vec()).unwrap()).unwrap();

    for i in 0..100 {
        let t = truncated.row(i).unwrap();
        let f = full.row(i).unwrap();
        for ((name, tv), (_, fv)) in row_values(&t).into_iter().zip(row_values(&f)) {
            assert_same(name, i, tv, fv);
        }
    }
}
