//! Indicator stage — extends a price series with per-bar derived fields.
//!
//! All indicators are computed once per invocation, in a fixed order, from
//! the bars alone. Each column has exactly one value per bar and value `i`
//! depends only on bars `0..=i`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::components::indicator::Indicator;
use crate::domain::{Bar, PriceSeries};
use crate::error::EngineError;
use crate::indicators::{Bollinger, Ema, Macd, Momentum, Rsi, Sma, VolumeSma};

use super::config::IndicatorParams;

/// One bar of the frame with all derived values.
///
/// Bands and the volume average are `None` until their window has filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub volume: Option<f64>,
    pub sma_fast: f64,
    pub sma_slow: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub bb_mid: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub momentum: f64,
    pub volume_avg: Option<f64>,
}

/// The price series plus derived indicator columns.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    bars: Vec<Bar>,
    sma_fast: Vec<f64>,
    sma_slow: Vec<f64>,
    ema_fast: Vec<f64>,
    ema_slow: Vec<f64>,
    rsi: Vec<f64>,
    macd: Vec<f64>,
    macd_signal: Vec<f64>,
    bb_mid: Vec<Option<f64>>,
    bb_upper: Vec<Option<f64>>,
    bb_lower: Vec<Option<f64>>,
    momentum: Vec<f64>,
    volume_avg: Vec<Option<f64>>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn row(&self, i: usize) -> Option<IndicatorRow> {
        let bar = self.bars.get(i)?;
        Some(IndicatorRow {
            timestamp: bar.timestamp,
            close: bar.close,
            volume: bar.volume,
            sma_fast: self.sma_fast[i],
            sma_slow: self.sma_slow[i],
            ema_fast: self.ema_fast[i],
            ema_slow: self.ema_slow[i],
            rsi: self.rsi[i],
            macd: self.macd[i],
            macd_signal: self.macd_signal[i],
            bb_mid: self.bb_mid[i],
            bb_upper: self.bb_upper[i],
            bb_lower: self.bb_lower[i],
            momentum: self.momentum[i],
            volume_avg: self.volume_avg[i],
        })
    }

    pub fn last(&self) -> Option<IndicatorRow> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }

    /// The previous and the current row, when at least two bars exist.
    pub fn last_two(&self) -> Option<(IndicatorRow, IndicatorRow)> {
        let n = self.len();
        if n < 2 {
            return None;
        }
        Some((self.row(n - 2)?, self.row(n - 1)?))
    }

    pub fn rsi(&self) -> &[f64] {
        &self.rsi
    }
}

/// Compute the indicator frame with the reference parameters.
pub fn compute_indicators(series: &PriceSeries) -> Result<IndicatorFrame, EngineError> {
    compute_indicators_with(series, &IndicatorParams::default())
}

pub fn compute_indicators_with(
    series: &PriceSeries,
    params: &IndicatorParams,
) -> Result<IndicatorFrame, EngineError> {
    if series.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    params
        .validate()
        .map_err(|msg| EngineError::Computation(format!("invalid indicator parameters: {msg}")))?;
    let bars = series.bars();
    let macd = Macd::line(params.ema_fast, params.ema_slow, params.macd_signal);
    let macd_signal = Macd::signal(params.ema_fast, params.ema_slow, params.macd_signal);
    let bb_period = params.bollinger_period;
    let bb_mult = params.bollinger_multiplier;

    let frame = IndicatorFrame {
        bars: bars.to_vec(),
        sma_fast: run(&Sma::new(params.sma_fast), bars),
        sma_slow: run(&Sma::new(params.sma_slow), bars),
        ema_fast: run(&Ema::new(params.ema_fast), bars),
        ema_slow: run(&Ema::new(params.ema_slow), bars),
        rsi: run(&Rsi::new(params.rsi_period), bars),
        macd: run(&macd, bars),
        macd_signal: run(&macd_signal, bars),
        bb_mid: defined(run(&Bollinger::middle(bb_period, bb_mult), bars)),
        bb_upper: defined(run(&Bollinger::upper(bb_period, bb_mult), bars)),
        bb_lower: defined(run(&Bollinger::lower(bb_period, bb_mult), bars)),
        momentum: run(&Momentum::new(1), bars),
        volume_avg: defined(run(&VolumeSma::new(params.volume_period), bars)),
    };

    check_last_row(&frame)?;
    debug!(bars = frame.len(), "indicator frame computed");
    Ok(frame)
}

fn run(indicator: &dyn Indicator, bars: &[Bar]) -> Vec<f64> {
    let series = indicator.compute(bars);
    debug_assert_eq!(
        series.len(),
        bars.len(),
        "indicator '{}' produced {} values for {} bars",
        indicator.name(),
        series.len(),
        bars.len()
    );
    series
}

/// Warmup NaNs become `None`.
fn defined(values: Vec<f64>) -> Vec<Option<f64>> {
    values
        .into_iter()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .collect()
}

/// The decision stage only reads the last two rows; a non-finite value there
/// means arithmetic overflowed somewhere upstream.
fn check_last_row(frame: &IndicatorFrame) -> Result<(), EngineError> {
    let Some(row) = frame.last() else {
        return Err(EngineError::EmptySeries);
    };
    let fields = [
        ("sma_fast", row.sma_fast),
        ("sma_slow", row.sma_slow),
        ("ema_fast", row.ema_fast),
        ("ema_slow", row.ema_slow),
        ("rsi", row.rsi),
        ("macd", row.macd),
        ("macd_signal", row.macd_signal),
        ("momentum", row.momentum),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(EngineError::Computation(format!(
                "{name} is not finite on the last bar ({value})"
            )));
        }
    }
    for (name, value) in [
        ("bb_upper", row.bb_upper),
        ("bb_lower", row.bb_lower),
        ("volume_avg", row.volume_avg),
    ] {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(EngineError::Computation(format!(
                    "{name} is not finite on the last bar ({v})"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(closes).unwrap()
    }

    #[test]
    fn frame_has_one_row_per_bar() {
        let frame = compute_indicators(&series(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(frame.len(), 3);
        assert!(frame.row(2).is_some());
        assert!(frame.row(3).is_none());
    }

    #[test]
    fn single_bar_frame() {
        let frame = compute_indicators(&series(&[42.0])).unwrap();
        let row = frame.last().unwrap();
        assert_eq!(row.sma_fast, 42.0);
        assert_eq!(row.ema_slow, 42.0);
        assert_eq!(row.macd, 0.0);
        assert_eq!(row.rsi, 50.0);
        assert_eq!(row.momentum, 0.0);
        assert!(row.bb_upper.is_none());
        assert!(frame.last_two().is_none());
    }

    #[test]
    fn bands_appear_at_twentieth_bar() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + (i % 3) as f64).collect();
        let frame = compute_indicators(&series(&closes)).unwrap();
        assert!(frame.row(18).unwrap().bb_mid.is_none());
        let row = frame.row(19).unwrap();
        assert!(row.bb_mid.is_some());
        assert!(row.bb_upper.unwrap() > row.bb_mid.unwrap());
        assert!(row.bb_lower.unwrap() < row.bb_mid.unwrap());
    }

    #[test]
    fn close_only_series_has_no_volume_average() {
        let closes: Vec<f64> = (0..30).map(|i| i as f64 + 1.0).collect();
        let frame = compute_indicators(&series(&closes)).unwrap();
        assert!(frame.last().unwrap().volume_avg.is_none());
    }

    #[test]
    fn momentum_is_first_difference() {
        let frame = compute_indicators(&series(&[10.0, 12.0, 9.0])).unwrap();
        let (prev, last) = frame.last_two().unwrap();
        assert_approx(prev.momentum, 2.0, 1e-12);
        assert_approx(last.momentum, -3.0, 1e-12);
    }

    #[test]
    fn overflow_is_a_computation_error() {
        let err = compute_indicators(&series(&[f64::MAX, f64::MAX, -f64::MAX])).unwrap_err();
        assert!(matches!(err, EngineError::Computation(_)));
    }

    #[test]
    fn invalid_params_are_an_error_not_a_panic() {
        let s = series(&[1.0, 2.0, 3.0]);
        let inverted = IndicatorParams {
            ema_fast: 26,
            ema_slow: 26,
            ..IndicatorParams::default()
        };
        let err = compute_indicators_with(&s, &inverted).unwrap_err();
        assert!(matches!(err, EngineError::Computation(msg) if msg.contains("ema_slow")));

        let zero = IndicatorParams {
            sma_fast: 0,
            ..IndicatorParams::default()
        };
        assert!(matches!(
            compute_indicators_with(&s, &zero),
            Err(EngineError::Computation(_))
        ));
    }

    #[test]
    fn custom_params_are_honoured() {
        let params = IndicatorParams {
            sma_fast: 2,
            sma_slow: 3,
            ..IndicatorParams::default()
        };
        let frame = compute_indicators_with(&series(&[1.0, 2.0, 3.0, 4.0]), &params).unwrap();
        let row = frame.last().unwrap();
        assert_approx(row.sma_fast, 3.5, 1e-12);
        assert_approx(row.sma_slow, 3.0, 1e-12);
    }
}
