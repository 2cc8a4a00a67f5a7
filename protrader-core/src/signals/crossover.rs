//! Crossover detection between two series on consecutive bars.
//!
//! A cross needs a genuine change of ordering: up is `fast <= slow` on the
//! previous bar then `fast > slow` on the current one; down is `fast >= slow`
//! then `fast < slow`. Equal values on both bars are no cross at all, and a
//! NaN anywhere compares false, so it never fires.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cross {
    Up,
    Down,
    None,
}

pub fn detect_cross(fast_prev: f64, slow_prev: f64, fast_cur: f64, slow_cur: f64) -> Cross {
    if fast_prev <= slow_prev && fast_cur > slow_cur {
        Cross::Up
    } else if fast_prev >= slow_prev && fast_cur < slow_cur {
        Cross::Down
    } else {
        Cross::None
    }
}
