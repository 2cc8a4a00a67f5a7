//! MACD — difference of a fast and a slow EMA, plus its EMA signal line.
//!
//! Two outputs (separate Indicator instances):
//! - Line: EMA(close, fast) - EMA(close, slow)
//! - Signal: EMA(line, signal)

use crate::components::indicator::{closes, Indicator};
use crate::domain::Bar;

use super::ema::ema_of_series;

/// Which MACD output to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdOutput {
    Line,
    Signal,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    output: MacdOutput,
    name: String,
}

impl Macd {
    pub fn line(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdOutput::Line)
    }

    pub fn signal(fast: usize, slow: usize, signal: usize) -> Self {
        Self::build(fast, slow, signal, MacdOutput::Signal)
    }

    fn build(fast: usize, slow: usize, signal: usize, output: MacdOutput) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(slow > fast, "MACD slow period must be > fast period");
        let kind = match output {
            MacdOutput::Line => "line",
            MacdOutput::Signal => "signal",
        };
        Self {
            fast,
            slow,
            signal,
            output,
            name: format!("macd_{kind}_{fast}_{slow}_{signal}"),
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let line = macd_line(&closes(bars), self.fast, self.slow);
        match self.output {
            MacdOutput::Line => line,
            MacdOutput::Signal => ema_of_series(&line, self.signal),
        }
    }
}

fn macd_line(closes: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    let fast_ema = ema_of_series(closes, fast);
    let slow_ema = ema_of_series(closes, slow);
    fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn macd_flat_is_zero() {
        let bars = make_bars(&[50.0; 40]);
        let line = Macd::line(12, 26, 9).compute(&bars);
        let signal = Macd::signal(12, 26, 9).compute(&bars);
        assert!(line.iter().all(|&v| v == 0.0));
        assert!(signal.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let line = Macd::line(12, 26, 9).compute(&bars);
        let signal = Macd::signal(12, 26, 9).compute(&bars);
        assert_approx(line[0], 0.0, DEFAULT_EPSILON);
        for i in 1..40 {
            assert!(line[i] > 0.0, "line not positive at {i}");
            // Signal lags the rising line.
            assert!(line[i] > signal[i], "signal not lagging at {i}");
        }
    }

    #[test]
    fn macd_names() {
        assert_eq!(Macd::line(12, 26, 9).name(), "macd_line_12_26_9");
        assert_eq!(Macd::signal(12, 26, 9).name(), "macd_signal_12_26_9");
    }

    #[test]
    #[should_panic(expected = "slow period must be > fast period")]
    fn macd_rejects_inverted_periods() {
        let _ = Macd::line(26, 12, 9);
    }
}
