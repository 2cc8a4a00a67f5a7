//! Multi-timeframe consensus — majority vote over per-timeframe decisions.
//!
//! Each timeframe is decided independently; the combined signal is the one
//! with the most votes. A tie between the leading signals is HOLD.

use serde::{Deserialize, Serialize};

use crate::domain::{Decision, Signal};

/// One timeframe's decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeVote {
    pub timeframe: String,
    pub decision: Decision,
}

impl TimeframeVote {
    pub fn new(timeframe: impl Into<String>, decision: Decision) -> Self {
        Self {
            timeframe: timeframe.into(),
            decision,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusDecision {
    pub signal: Signal,
    /// Mean confidence of the votes agreeing with `signal`; 0.0 when none do.
    pub confidence: f64,
    /// Per-timeframe signals, in vote order.
    pub votes: Vec<(String, Signal)>,
    /// Every vote's reasons, prefixed `"<timeframe>:"`.
    pub details: Vec<String>,
}

pub fn consensus(votes: &[TimeframeVote]) -> ConsensusDecision {
    let tally = |s: Signal| votes.iter().filter(|v| v.decision.signal == s).count();
    let counts = [
        (Signal::Buy, tally(Signal::Buy)),
        (Signal::Sell, tally(Signal::Sell)),
        (Signal::Hold, tally(Signal::Hold)),
    ];
    let top = counts.iter().map(|&(_, n)| n).max().unwrap_or(0);
    let leaders: Vec<Signal> = counts
        .iter()
        .filter(|&&(_, n)| n == top && n > 0)
        .map(|&(s, _)| s)
        .collect();
    let signal = match leaders.as_slice() {
        [only] => *only,
        _ => Signal::Hold,
    };

    let agreeing: Vec<f64> = votes
        .iter()
        .filter(|v| v.decision.signal == signal)
        .map(|v| v.decision.confidence)
        .collect();
    let confidence = if agreeing.is_empty() {
        0.0
    } else {
        agreeing.iter().sum::<f64>() / agreeing.len() as f64
    };

    ConsensusDecision {
        signal,
        confidence,
        votes: votes
            .iter()
            .map(|v| (v.timeframe.clone(), v.decision.signal))
            .collect(),
        details: votes
            .iter()
            .flat_map(|v| {
                v.decision
                    .reasons
                    .iter()
                    .map(move |r| format!("{}:{}", v.timeframe, r))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(tf: &str, signal: Signal, confidence: f64) -> TimeframeVote {
        TimeframeVote::new(
            tf,
            Decision {
                signal,
                confidence,
                reasons: vec![format!("{}", signal.as_str().to_lowercase())],
                score: 0.0,
            },
        )
    }

    #[test]
    fn majority_wins() {
        let c = consensus(&[
            vote("1m", Signal::Buy, 0.7),
            vote("5m", Signal::Buy, 0.9),
            vote("1d", Signal::Sell, 0.2),
        ]);
        assert_eq!(c.signal, Signal::Buy);
        assert!((c.confidence - 0.8).abs() < 1e-12);
        assert_eq!(c.details, vec!["1m:buy", "5m:buy", "1d:sell"]);
        assert_eq!(c.votes[2], ("1d".to_string(), Signal::Sell));
    }

    #[test]
    fn tie_is_hold() {
        let c = consensus(&[vote("1m", Signal::Buy, 0.7), vote("1d", Signal::Sell, 0.3)]);
        assert_eq!(c.signal, Signal::Hold);
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn tie_with_hold_leader_is_hold() {
        let c = consensus(&[vote("1m", Signal::Buy, 0.7), vote("1d", Signal::Hold, 0.5)]);
        assert_eq!(c.signal, Signal::Hold);
        assert_eq!(c.confidence, 0.5);
    }

    #[test]
    fn no_votes_is_hold_at_zero() {
        let c = consensus(&[]);
        assert_eq!(c.signal, Signal::Hold);
        assert_eq!(c.confidence, 0.0);
        assert!(c.details.is_empty());
    }
}
