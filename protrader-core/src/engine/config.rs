//! Engine parameters.
//!
//! Every section deserializes with defaults, so a partial (or empty) TOML
//! table yields the reference configuration.

use serde::{Deserialize, Serialize};

/// Which rule set classifies the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPolicy {
    /// Weighted score over trend, crossovers, RSI, bands and volume.
    #[default]
    WeightedScore,
    /// Legacy mode: direction only when SMA cross, MACD cross and RSI all agree.
    StrictConsensus,
}

impl DecisionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionPolicy::WeightedScore => "weighted_score",
            DecisionPolicy::StrictConsensus => "strict_consensus",
        }
    }
}

/// How the trend term treats a fast EMA exactly equal to the slow EMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaTieBreak {
    /// Tie counts as "trend down".
    #[default]
    Down,
    /// Tie counts as "trend up".
    Up,
    /// Tie contributes nothing.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub volume_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_fast: 9,
            sma_slow: 21,
            ema_fast: 12,
            ema_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            volume_period: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionParams {
    /// Frames shorter than this resolve to HOLD / 0.0 / "insufficient_data".
    pub min_bars: usize,
    pub trend_weight: f64,
    pub sma_cross_weight: f64,
    pub macd_cross_weight: f64,
    pub rsi_weight: f64,
    pub breakout_weight: f64,
    pub volume_weight: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    /// Current volume must exceed this multiple of its average.
    pub volume_spike_ratio: f64,
    pub buy_threshold: f64,
    pub sell_threshold: f64,
    pub ema_tie_break: EmaTieBreak,
    /// Strict-consensus BUY requires RSI below this.
    pub strict_rsi_buy_max: f64,
    /// Strict-consensus SELL requires RSI above this.
    pub strict_rsi_sell_min: f64,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            min_bars: 5,
            trend_weight: 0.30,
            sma_cross_weight: 0.20,
            macd_cross_weight: 0.15,
            rsi_weight: 0.10,
            breakout_weight: 0.05,
            volume_weight: 0.05,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            volume_spike_ratio: 1.5,
            buy_threshold: 0.25,
            sell_threshold: -0.25,
            ema_tie_break: EmaTieBreak::Down,
            strict_rsi_buy_max: 75.0,
            strict_rsi_sell_min: 25.0,
        }
    }
}

/// Support/resistance extraction and the fixed-percentage risk heuristic.
///
/// Stop-loss and take-profit are fixed fractions of the entry price and do
/// not account for volatility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelParams {
    pub lookback: usize,
    /// Centered window width for local extrema; must be odd.
    pub extrema_window: usize,
    pub max_levels: usize,
    pub precision: u32,
    pub stop_loss_fraction: f64,
    pub take_profit_fraction: f64,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            lookback: 120,
            extrema_window: 5,
            max_levels: 3,
            precision: 4,
            stop_loss_fraction: 0.01,
            take_profit_fraction: 0.02,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub policy: DecisionPolicy,
    pub indicators: IndicatorParams,
    pub decision: DecisionParams,
    pub levels: LevelParams,
}

/// Largest rounding precision for levels; beyond it `10^precision` loses
/// every integer digit of an f64 price.
pub const MAX_LEVEL_PRECISION: u32 = 12;

impl IndicatorParams {
    /// Periods must be positive and fast < slow. Returns the first problem.
    pub fn validate(&self) -> Result<(), String> {
        let periods = [
            ("sma_fast", self.sma_fast),
            ("sma_slow", self.sma_slow),
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("macd_signal", self.macd_signal),
            ("rsi_period", self.rsi_period),
            ("bollinger_period", self.bollinger_period),
            ("volume_period", self.volume_period),
        ];
        for (name, period) in periods {
            if period == 0 {
                return Err(format!("indicators.{name} must be >= 1"));
            }
        }
        if self.sma_slow <= self.sma_fast {
            return Err("indicators.sma_slow must be > sma_fast".into());
        }
        if self.ema_slow <= self.ema_fast {
            return Err("indicators.ema_slow must be > ema_fast".into());
        }
        if !self.bollinger_multiplier.is_finite() || self.bollinger_multiplier < 0.0 {
            return Err("indicators.bollinger_multiplier must be finite and >= 0".into());
        }
        Ok(())
    }
}

impl LevelParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.extrema_window < 3 || self.extrema_window % 2 == 0 {
            return Err("levels.extrema_window must be odd and >= 3".into());
        }
        if self.max_levels == 0 {
            return Err("levels.max_levels must be >= 1".into());
        }
        if self.lookback == 0 {
            return Err("levels.lookback must be >= 1".into());
        }
        if self.precision > MAX_LEVEL_PRECISION {
            return Err(format!(
                "levels.precision must be <= {MAX_LEVEL_PRECISION}, got {}",
                self.precision
            ));
        }
        if !(0.0..1.0).contains(&self.stop_loss_fraction) || self.take_profit_fraction < 0.0 {
            return Err("levels stop/take-profit fractions out of range".into());
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Check parameter consistency. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        self.indicators.validate()?;

        let dec = &self.decision;
        if dec.min_bars < 2 {
            return Err("decision.min_bars must be >= 2 (crossovers need a previous bar)".into());
        }
        if dec.rsi_oversold >= dec.rsi_overbought {
            return Err("decision.rsi_oversold must be < rsi_overbought".into());
        }
        if dec.sell_threshold > dec.buy_threshold {
            return Err("decision.sell_threshold must be <= buy_threshold".into());
        }

        self.levels.validate()
    }
}
