//! Signal engine — configuration, the indicator frame and the facade that
//! runs every stage.
//!
//! Data flows one way:
//!
//! 1. Indicator stage: series → `IndicatorFrame`
//! 2. Decision stage: last two rows → `Decision`
//! 3. Level stage: look-back window → `LevelSet`
//! 4. `SignalReport` assembly

pub mod config;
pub mod frame;
pub mod signal_engine;

pub use config::{
    DecisionParams, DecisionPolicy, EmaTieBreak, EngineConfig, IndicatorParams, LevelParams,
    MAX_LEVEL_PRECISION,
};
pub use frame::{compute_indicators, compute_indicators_with, IndicatorFrame, IndicatorRow};
pub use signal_engine::{SignalEngine, INDICATOR_ERROR_PREFIX};
