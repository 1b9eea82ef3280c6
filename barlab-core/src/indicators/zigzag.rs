//! ZigZag: percentage-deviation swing pivots over closes.
//!
//! State machine over `Undetermined` / `Up` / `Down`:
//! - `Undetermined` tracks the highest and lowest close since the first bar;
//!   a close more than `threshold`% above the low starts an up swing pivoted
//!   at that low, a close more than `threshold`% below the high starts a
//!   down swing
//! - in a swing, a close beyond the running extreme extends it; a reversal of
//!   more than `threshold`% from the extreme confirms the extreme as the new
//!   pivot and starts the opposite swing
//! - counter moves of at most `threshold`% change nothing
//!
//! Output: `[last_pivot, running_extreme, direction]` with direction +1 (up),
//! -1 (down) or 0 (undetermined). While undetermined, `last_pivot` is the
//! first close and `running_extreme` the latest close.
//! Valid from the first bar. Warmup: 1.

use crate::components::error::{require_positive, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::MultiValue;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwingState {
    Undetermined { first: f64, high: f64, low: f64 },
    Up { pivot: f64, extreme: f64 },
    Down { pivot: f64, extreme: f64 },
}

#[derive(Debug, Clone)]
pub struct ZigZag {
    threshold_pct: f64,
    /// threshold_pct / 100
    threshold: f64,
    name: String,
    state: Option<SwingState>,
}

impl ZigZag {
    pub fn new(threshold_pct: f64) -> Result<Self, IndicatorError> {
        let threshold_pct = require_positive("threshold_pct", threshold_pct)?;
        Ok(Self {
            threshold_pct,
            threshold: threshold_pct / 100.0,
            name: format!("ZIGZAG({threshold_pct})"),
            state: None,
        })
    }

    pub fn state(&self) -> Option<SwingState> {
        self.state
    }
}

/// Advance the swing machine by one close.
pub(crate) fn step_swing(state: SwingState, close: f64, threshold: f64) -> SwingState {
    match state {
        SwingState::Undetermined { first, high, low } => {
            if close > low * (1.0 + threshold) {
                SwingState::Up {
                    pivot: low,
                    extreme: close,
                }
            } else if close < high * (1.0 - threshold) {
                SwingState::Down {
                    pivot: high,
                    extreme: close,
                }
            } else {
                SwingState::Undetermined {
                    first,
                    high: high.max(close),
                    low: low.min(close),
                }
            }
        }
        SwingState::Up { pivot, extreme } => {
            if close > extreme {
                SwingState::Up {
                    pivot,
                    extreme: close,
                }
            } else if close < extreme * (1.0 - threshold) {
                SwingState::Down {
                    pivot: extreme,
                    extreme: close,
                }
            } else {
                state
            }
        }
        SwingState::Down { pivot, extreme } => {
            if close < extreme {
                SwingState::Down {
                    pivot,
                    extreme: close,
                }
            } else if close > extreme * (1.0 + threshold) {
                SwingState::Up {
                    pivot: extreme,
                    extreme: close,
                }
            } else {
                state
            }
        }
    }
}

impl Indicator for ZigZag {
    type Output = MultiValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        1
    }

    fn update(&mut self, bar: &Bar) -> MultiValue {
        let close = bar.close;
        let next = match self.state {
            None => SwingState::Undetermined {
                first: close,
                high: close,
                low: close,
            },
            Some(state) => step_swing(state, close, self.threshold),
        };
        self.state = Some(next);
        match next {
            SwingState::Undetermined { first, .. } => MultiValue::from_array([first, close, 0.0]),
            SwingState::Up { pivot, extreme } => MultiValue::from_array([pivot, extreme, 1.0]),
            SwingState::Down { pivot, extreme } => MultiValue::from_array([pivot, extreme, -1.0]),
        }
    }

    fn reset(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::BatchIndicator;
    use crate::components::output::IndicatorOutput;
    use crate::indicators::make_bars;

    fn triple(v: &MultiValue) -> (f64, f64, f64) {
        (v.get(0).unwrap(), v.get(1).unwrap(), v.get(2).unwrap())
    }

    #[test]
    fn zigzag_valid_from_first_bar() {
        let result = ZigZag::new(5.0).unwrap().compute(&make_bars(&[100.0]));
        assert!(result[0].is_valid());
        assert_eq!(triple(&result[0]), (100.0, 100.0, 0.0));
    }

    #[test]
    fn zigzag_swings() {
        let closes = [100.0, 102.0, 106.0, 110.0, 108.0, 103.0, 104.0, 109.0];
        let result = ZigZag::new(5.0).unwrap().compute(&make_bars(&closes));
        // 102: sub-threshold, still undetermined
        assert_eq!(triple(&result[1]), (100.0, 102.0, 0.0));
        // 106 > 100 * 1.05 → up swing pivoted at 100
        assert_eq!(triple(&result[2]), (100.0, 106.0, 1.0));
        // 110 extends
        assert_eq!(triple(&result[3]), (100.0, 110.0, 1.0));
        // 108 is a sub-threshold pullback
        assert_eq!(triple(&result[4]), (100.0, 110.0, 1.0));
        // 103 < 110 * 0.95 = 104.5 → down swing pivoted at 110
        assert_eq!(triple(&result[5]), (110.0, 103.0, -1.0));
        // 104 < 103 * 1.05: nothing
        assert_eq!(triple(&result[6]), (110.0, 103.0, -1.0));
        // 109 > 108.15 → up swing pivoted at 103
        assert_eq!(triple(&result[7]), (103.0, 109.0, 1.0));
    }

    #[test]
    fn zigzag_move_of_exactly_the_threshold_is_not_a_swing() {
        let result = ZigZag::new(5.0).unwrap().compute(&make_bars(&[100.0, 105.0]));
        assert_eq!(triple(&result[1]), (100.0, 105.0, 0.0));

        // 50% keeps every product exact in binary.
        let closes = [100.0, 150.0, 151.0, 75.5, 75.0];
        let result = ZigZag::new(50.0).unwrap().compute(&make_bars(&closes));
        assert_eq!(triple(&result[1]), (100.0, 150.0, 0.0));
        assert_eq!(triple(&result[2]), (100.0, 151.0, 1.0));
        // 151 * 0.5 = 75.5: a reversal of exactly 50% holds the up swing
        assert_eq!(triple(&result[3]), (100.0, 151.0, 1.0));
        assert_eq!(triple(&result[4]), (151.0, 75.0, -1.0));
    }

    #[test]
    fn zigzag_rejects_non_positive_threshold() {
        assert!(ZigZag::new(0.0).is_err());
        assert!(ZigZag::new(-1.0).is_err());
    }
}
