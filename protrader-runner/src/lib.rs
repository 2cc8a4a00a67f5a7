//! ProTrader Runner — config loading, file input and multi-timeframe runs.
//!
//! This crate builds on `protrader-core` to provide:
//! - TOML application config (`AppConfig`) and engine construction
//! - CSV / JSON price data loading
//! - Single-input analysis with neutral error surfacing
//! - Parallel multi-timeframe consensus

pub mod config;
pub mod data_loader;
pub mod runner;

pub use config::{AppConfig, ConfigError, DataConfig, MlConfig};
pub use data_loader::{load_input, read_csv, read_json, InputFormat, LoadError, LoadedInput};
pub use runner::{
    analyze_file, analyze_input, run_consensus, ConsensusReport, RunError, TimeframeInput,
    TimeframeReport,
};
