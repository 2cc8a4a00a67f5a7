//! Runner — wires together config, data loading and the engine.
//!
//! Two entry points:
//! - `analyze_file()`: one input, one report. Used by the `analyze` command.
//! - `run_consensus()`: one input per timeframe, evaluated in parallel and
//!   combined by majority vote. Used by the `consensus` command.
//!
//! Engine failures never escape as errors here: they surface as neutral HOLD
//! reports. Only unreadable inputs and invalid requests are errors.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use protrader_core::consensus::{consensus, ConsensusDecision, TimeframeVote};
use protrader_core::engine::SignalEngine;
use protrader_core::market::Market;
use protrader_core::report::SignalReport;

use crate::config::ConfigError;
use crate::data_loader::{load_input, LoadError, LoadedInput};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] LoadError),

    #[error("timeframe '{timeframe}' is not available for {market} symbols")]
    UnsupportedTimeframe { timeframe: String, market: Market },

    #[error("no timeframe inputs given")]
    NoTimeframes,

    #[error("every timeframe failed to load: {}", .0.join("; "))]
    AllTimeframesFailed(Vec<String>),
}

/// Analyze already-loaded input. Resolution and engine errors become a
/// neutral report.
pub fn analyze_input(
    engine: &SignalEngine,
    input: &LoadedInput,
    max_bars: Option<usize>,
) -> SignalReport {
    match input.resolve(max_bars) {
        Ok(series) => engine.analyze_or_neutral(&series),
        Err(e) => engine.neutral_report(&e, input.len()),
    }
}

pub fn analyze_file(
    engine: &SignalEngine,
    path: &Path,
    max_bars: Option<usize>,
) -> Result<SignalReport, RunError> {
    let input = load_input(path)?;
    let report = analyze_input(engine, &input, max_bars);
    info!(
        path = %path.display(),
        signal = %report.signal,
        confidence = report.confidence,
        "analyzed"
    );
    Ok(report)
}

/// One timeframe's input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeframeInput {
    pub timeframe: String,
    pub path: PathBuf,
}

impl TimeframeInput {
    pub fn new(timeframe: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            timeframe: timeframe.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeReport {
    pub timeframe: String,
    pub report: SignalReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusReport {
    pub symbol: String,
    pub market: Market,
    pub consensus: ConsensusDecision,
    /// Last close of the last timeframe (in input order) that resolved.
    pub last_price: Option<f64>,
    pub timeframes: Vec<TimeframeReport>,
    /// `"<timeframe>: <error>"` for every input that could not be loaded.
    pub failures: Vec<String>,
}

/// Evaluate every timeframe in parallel and combine the signals.
///
/// Timeframes the symbol's market does not offer are rejected up front. A
/// timeframe whose file fails to load is skipped with a warning; the run
/// fails only when none load.
pub fn run_consensus(
    engine: &SignalEngine,
    symbol: &str,
    inputs: &[TimeframeInput],
    max_bars: Option<usize>,
) -> Result<ConsensusReport, RunError> {
    if inputs.is_empty() {
        return Err(RunError::NoTimeframes);
    }
    let market = Market::infer(symbol);
    if let Some(bad) = inputs.iter().find(|i| !market.supports(&i.timeframe)) {
        return Err(RunError::UnsupportedTimeframe {
            timeframe: bad.timeframe.clone(),
            market,
        });
    }

    // par_iter + collect keeps input order
    let outcomes: Vec<Result<TimeframeReport, String>> = inputs
        .par_iter()
        .map(|input| {
            load_input(&input.path)
                .map(|loaded| TimeframeReport {
                    timeframe: input.timeframe.clone(),
                    report: analyze_input(engine, &loaded, max_bars),
                })
                .map_err(|e| format!("{}: {e}", input.timeframe))
        })
        .collect();

    let mut timeframes = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(report) => timeframes.push(report),
            Err(failure) => {
                warn!(symbol, failure = %failure, "timeframe skipped");
                failures.push(failure);
            }
        }
    }
    if timeframes.is_empty() {
        return Err(RunError::AllTimeframesFailed(failures));
    }

    let votes: Vec<TimeframeVote> = timeframes
        .iter()
        .map(|tf| TimeframeVote::new(tf.timeframe.clone(), tf.report.decision()))
        .collect();
    let decision = consensus(&votes);
    let last_price = timeframes.iter().rev().find_map(|tf| tf.report.meta.last_price);

    info!(
        symbol,
        market = %market,
        signal = %decision.signal,
        votes = votes.len(),
        skipped = failures.len(),
        "consensus"
    );

    Ok(ConsensusReport {
        symbol: symbol.to_string(),
        market,
        consensus: decision,
        last_price,
        timeframes,
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use protrader_core::data::RawFrame;
    use protrader_core::domain::{PriceSeries, Signal};
    use protrader_core::engine::INDICATOR_ERROR_PREFIX;

    #[test]
    fn unresolvable_table_is_a_neutral_report() {
        let raw = RawFrame::new(vec!["note".into()], vec![vec!["x".into()]]).unwrap();
        let report = analyze_input(&SignalEngine::default(), &LoadedInput::Table(raw), None);
        assert_eq!(report.signal, Signal::Hold);
        assert_eq!(report.confidence, 0.0);
        assert!(report.reasons[0].starts_with(INDICATOR_ERROR_PREFIX));
        assert_eq!(report.meta.bars, 1);
    }

    #[test]
    fn max_bars_limits_the_analyzed_window() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let input = LoadedInput::Series(PriceSeries::from_closes(&closes).unwrap());
        let report = analyze_input(&SignalEngine::default(), &input, Some(20));
        assert_eq!(report.meta.bars, 20);
        assert_eq!(report.meta.support_levels, vec![130.0]);
    }

    #[test]
    fn consensus_rejects_unsupported_timeframes() {
        let err = run_consensus(
            &SignalEngine::default(),
            "RELIANCE.NS",
            &[TimeframeInput::new("1m", "unused.csv")],
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RunError::UnsupportedTimeframe { market: Market::Indian, .. }
        ));
    }

    #[test]
    fn consensus_needs_inputs() {
        let err = run_consensus(&SignalEngine::default(), "AAPL", &[], None).unwrap_err();
        assert!(matches!(err, RunError::NoTimeframes));
    }
}
