//! SignalEngine — runs the indicator, decision and level stages end to end.
//!
//! 1. Compute the indicator frame from the series
//! 2. Decide on the last two rows under the configured policy
//! 3. Blend in the model confidence, if a model is attached
//! 4. Extract levels from the look-back window
//! 5. Assemble the report
//!
//! The engine holds configuration and an optional model, never data. Every
//! call is independent; one engine can serve many threads.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::components::confidence::{blend, ConfidenceModel, MlFeatures};
use crate::data::RawFrame;
use crate::domain::{Decision, LevelSet, PriceSeries};
use crate::error::EngineError;
use crate::fingerprint::SeriesHash;
use crate::levels::levels_with;
use crate::report::SignalReport;
use crate::signals::{decide_with, has_enough_history};

use super::config::EngineConfig;
use super::frame::{compute_indicators_with, IndicatorFrame};

/// Prefix of the single reason carried by a neutralized report.
pub const INDICATOR_ERROR_PREFIX: &str = "indicator_error:";

#[derive(Clone, Default)]
pub struct SignalEngine {
    config: EngineConfig,
    model: Option<Arc<dyn ConfidenceModel>>,
    ml_weight: f64,
}

impl fmt::Debug for SignalEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalEngine")
            .field("config", &self.config)
            .field("model", &self.model.as_ref().map(|_| "<model>"))
            .field("ml_weight", &self.ml_weight)
            .finish()
    }
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            model: None,
            ml_weight: 0.0,
        }
    }

    /// Attach a confidence model; `weight` is its share of the blended
    /// confidence (clamped to [0, 1] at blend time).
    pub fn with_model(self, model: impl ConfidenceModel + 'static, weight: f64) -> Self {
        self.with_shared_model(Arc::new(model), weight)
    }

    pub fn with_shared_model(mut self, model: Arc<dyn ConfidenceModel>, weight: f64) -> Self {
        self.model = Some(model);
        self.ml_weight = weight;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn indicators(&self, series: &PriceSeries) -> Result<IndicatorFrame, EngineError> {
        compute_indicators_with(series, &self.config.indicators)
    }

    /// Decision only (no levels), with model blending applied.
    pub fn decide(&self, series: &PriceSeries) -> Result<Decision, EngineError> {
        let frame = self.indicators(series)?;
        Ok(self.decide_frame(&frame).0)
    }

    pub fn levels(&self, series: &PriceSeries) -> LevelSet {
        levels_with(series, &self.config.levels)
    }

    pub fn analyze(&self, series: &PriceSeries) -> Result<SignalReport, EngineError> {
        let frame = self.indicators(series)?;
        let (decision, ml_confidence) = self.decide_frame(&frame);
        let last = frame.last().ok_or(EngineError::EmptySeries)?;
        let levels = self.levels(series);
        let hash = SeriesHash::of(series);

        debug!(
            series = hash.short(),
            bars = series.len(),
            signal = %decision.signal,
            confidence = decision.confidence,
            "analysis complete"
        );

        Ok(SignalReport::assemble(
            decision,
            self.config.policy,
            &last,
            levels,
            series.len(),
            hash,
            ml_confidence,
        ))
    }

    /// Resolve a raw table, then analyze it.
    pub fn analyze_raw(&self, raw: &RawFrame) -> Result<SignalReport, EngineError> {
        self.analyze(&raw.to_series()?)
    }

    /// Like [`analyze`](Self::analyze), but an error becomes a HOLD report at
    /// zero confidence whose only reason is `indicator_error:<message>`.
    pub fn analyze_or_neutral(&self, series: &PriceSeries) -> SignalReport {
        self.analyze(series)
            .unwrap_or_else(|e| self.neutral_report(&e, series.len()))
    }

    pub fn analyze_raw_or_neutral(&self, raw: &RawFrame) -> SignalReport {
        self.analyze_raw(raw)
            .unwrap_or_else(|e| self.neutral_report(&e, raw.len()))
    }

    /// The HOLD report surfaced in place of `error`.
    pub fn neutral_report(&self, error: &EngineError, bars: usize) -> SignalReport {
        warn!(error = %error, bars, "analysis failed, reporting neutral HOLD");
        SignalReport::neutral(
            format!("{INDICATOR_ERROR_PREFIX}{error}"),
            self.config.policy,
            bars,
        )
    }

    /// Returns the decision and the raw model output, if one was applied.
    fn decide_frame(&self, frame: &IndicatorFrame) -> (Decision, Option<f64>) {
        let mut decision = decide_with(frame, &self.config.decision, self.config.policy);
        let Some(model) = &self.model else {
            return (decision, None);
        };
        if !has_enough_history(frame, &self.config.decision) {
            return (decision, None);
        }
        let Some(features) = MlFeatures::from_frame(frame) else {
            return (decision, None);
        };

        let predicted = model.predict(&features);
        let rule = decision.confidence;
        decision.confidence = blend(rule, predicted, self.ml_weight);
        debug!(
            rule,
            model = predicted,
            blended = decision.confidence,
            "confidence blended"
        );
        (decision, predicted.is_finite().then_some(predicted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Signal, INSUFFICIENT_DATA};
    use crate::engine::config::DecisionPolicy;

    fn rising(n: usize) -> PriceSeries {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        PriceSeries::from_closes(&closes).unwrap()
    }

    #[test]
    fn report_carries_levels_and_meta() {
        let series = rising(30);
        let report = SignalEngine::default().analyze(&series).unwrap();
        assert_eq!(report.policy, DecisionPolicy::WeightedScore);
        assert_eq!(report.meta.bars, 30);
        assert_eq!(report.meta.last_price, Some(129.0));
        assert_eq!(report.meta.support_levels, vec![100.0]);
        assert_eq!(report.meta.resistance_levels, vec![129.0]);
        assert_eq!(report.meta.series_hash, Some(SeriesHash::of(&series)));
        assert!(report.meta.indicators.is_some());
        assert!(report.meta.ml_confidence.is_none());
    }

    #[test]
    fn model_changes_confidence_not_signal() {
        let series = rising(30);
        let plain = SignalEngine::default().analyze(&series).unwrap();
        let blended = SignalEngine::default()
            .with_model(|_: &MlFeatures| 1.0, 0.5)
            .analyze(&series)
            .unwrap();
        assert_eq!(plain.signal, blended.signal);
        assert_eq!(plain.reasons, blended.reasons);
        assert!((blended.confidence - (0.5 * plain.confidence + 0.5)).abs() < 1e-12);
        assert_eq!(blended.meta.ml_confidence, Some(1.0));
    }

    #[test]
    fn model_is_skipped_on_short_history() {
        let report = SignalEngine::default()
            .with_model(|_: &MlFeatures| 1.0, 1.0)
            .analyze(&rising(3))
            .unwrap();
        assert_eq!(report.signal, Signal::Hold);
        assert_eq!(report.confidence, 0.0);
        assert_eq!(report.reasons, vec![INSUFFICIENT_DATA]);
        assert!(report.meta.ml_confidence.is_none());
    }

    #[test]
    fn nan_model_output_counts_as_neutral() {
        let series = rising(30);
        let plain = SignalEngine::default().analyze(&series).unwrap();
        let report = SignalEngine::default()
            .with_model(|_: &MlFeatures| f64::NAN, 1.0)
            .analyze(&series)
            .unwrap();
        assert_eq!(report.confidence, 0.5);
        assert_eq!(report.signal, plain.signal);
        assert!(report.meta.ml_confidence.is_none());
    }

    #[test]
    fn errors_become_neutral_reports() {
        let series = PriceSeries::from_closes(&[f64::MAX, f64::MAX, -f64::MAX]).unwrap();
        let engine = SignalEngine::default();
        assert!(engine.analyze(&series).is_err());

        let report = engine.analyze_or_neutral(&series);
        assert_eq!(report.signal, Signal::Hold);
        assert_eq!(report.confidence, 0.0);
        assert_eq!(report.reasons.len(), 1);
        assert!(report.reasons[0].starts_with(INDICATOR_ERROR_PREFIX));
        assert_eq!(report.meta.bars, 3);
    }

    #[test]
    fn invalid_indicator_config_is_neutral_not_a_panic() {
        let mut config = EngineConfig::default();
        config.indicators.sma_fast = 0;
        let engine = SignalEngine::new(config);
        let series = rising(30);

        assert!(matches!(engine.analyze(&series), Err(EngineError::Computation(_))));
        let report = engine.analyze_or_neutral(&series);
        assert_eq!(report.signal, Signal::Hold);
        assert_eq!(report.confidence, 0.0);
        assert!(report.reasons[0].starts_with(INDICATOR_ERROR_PREFIX));

        let mut config = EngineConfig::default();
        config.indicators.ema_fast = 26;
        assert!(SignalEngine::new(config).decide(&series).is_err());
    }

    #[test]
    fn unresolvable_raw_frame_is_neutral() {
        let raw = RawFrame::new(
            vec!["symbol".to_string()],
            vec![vec!["AAA".to_string()]],
        )
        .unwrap();
        let report = SignalEngine::default().analyze_raw_or_neutral(&raw);
        assert_eq!(report.signal, Signal::Hold);
        assert!(report.reasons[0].starts_with("indicator_error:missing price data"));
    }

    #[test]
    fn strict_policy_is_reported() {
        let config = EngineConfig {
            policy: DecisionPolicy::StrictConsensus,
            ..EngineConfig::default()
        };
        let report = SignalEngine::new(config).analyze(&rising(30)).unwrap();
        assert_eq!(report.policy, DecisionPolicy::StrictConsensus);
        assert_eq!(report.signal, Signal::Hold);
    }
}
