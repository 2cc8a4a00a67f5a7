//! ProTrader Core — stateless signal engine over price series.
//!
//! This crate contains:
//! - Domain types (bars, price series, decisions, level sets)
//! - Indicator implementations behind the `Indicator` trait
//! - The decision stage (weighted score and strict consensus)
//! - Support/resistance extraction and risk levels
//! - Optional model confidence blending and multi-timeframe consensus
//! - Raw table resolution into a validated series

pub mod components;
pub mod consensus;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod indicators;
pub mod levels;
pub mod market;
pub mod report;
pub mod signals;

pub use components::{ConfidenceModel, LogisticModel, MlFeatures};
pub use consensus::{consensus, ConsensusDecision, TimeframeVote};
pub use data::RawFrame;
pub use domain::{Bar, Decision, LevelSet, PriceSeries, Signal};
pub use engine::{DecisionPolicy, EngineConfig, SignalEngine};
pub use error::EngineError;
pub use fingerprint::SeriesHash;
pub use market::Market;
pub use report::{IndicatorSnapshot, ReportMeta, SignalReport};
