//! LevelSet — support/resistance and default risk parameters.

use serde::{Deserialize, Serialize};

/// Price levels derived from the recent close history.
///
/// Both level lists hold at most three prices, most recent first, and are
/// never empty for a non-empty series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}
