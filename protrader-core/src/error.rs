//! Engine error taxonomy.
//!
//! Insufficient history is not an error: the decision stage answers it with
//! a HOLD at zero confidence. Only inputs the engine cannot compute on at all
//! surface here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// No resolvable close price (no close column and no numeric column),
    /// or a bar whose close is missing or non-finite.
    #[error("missing price data: {0}")]
    MissingData(String),

    #[error("price series is empty")]
    EmptySeries,

    /// Bar at `index` does not have a timestamp strictly after its predecessor.
    #[error("bar {index} is not strictly after the previous bar ({timestamp})")]
    UnorderedTimestamps { index: usize, timestamp: String },

    /// A numeric failure the indicator stage did not guard against.
    #[error("computation failed: {0}")]
    Computation(String),
}
