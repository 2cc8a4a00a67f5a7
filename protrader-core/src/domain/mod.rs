//! Domain types for the signal engine

pub mod bar;
pub mod decision;
pub mod levels;
pub mod series;

pub use bar::Bar;
pub use decision::{Decision, Signal, INSUFFICIENT_DATA, NO_STRONG_CONFIRMATION};
pub use levels::LevelSet;
pub use series::{synthetic_timestamp, PriceSeries};
