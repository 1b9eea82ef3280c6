//! Parabolic SAR: Wilder's acceleration factor system.
//!
//! Explicit state machine over `Long` / `Short`. While a trend holds:
//! - SAR[t] = SAR[t-1] + AF * (EP - SAR[t-1]), then clamped so it never
//!   enters the prior two bars' range (below their lows when long, above
//!   their highs when short)
//! - each new extreme point (EP) raises AF by `step`, capped at `max`
//!
//! A bar piercing the SAR reverses the trend: SAR resets to the prior EP,
//! EP to the bar's extreme, AF to `step`.
//!
//! The second bar seeds the trend from the close-to-close direction.
//! Output: `[sar, direction]` with direction +1 (long) / -1 (short).
//! Warmup: 2.

use crate::components::error::{require_positive, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::MultiValue;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SarDirection {
    Long,
    Short,
}

impl SarDirection {
    fn sign(self) -> f64 {
        match self {
            SarDirection::Long => 1.0,
            SarDirection::Short => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SarState {
    Empty,
    /// One bar seen; direction not yet known.
    Seeded { close: f64 },
    Trending {
        direction: SarDirection,
        sar: f64,
        ep: f64,
        af: f64,
    },
}

#[derive(Debug, Clone)]
pub struct ParabolicSar {
    step: f64,
    max: f64,
    name: String,
    state: SarState,
    /// (high, low) of the previous bar and the one before it.
    prev1: (f64, f64),
    prev2: (f64, f64),
}

impl ParabolicSar {
    pub fn new(step: f64, max: f64) -> Result<Self, IndicatorError> {
        let step = require_positive("step", step)?;
        let max = require_positive("max", max)?;
        if max < step {
            return Err(IndicatorError::invalid(
                "max",
                format!("max acceleration ({max}) must be >= step ({step})"),
            ));
        }
        Ok(Self {
            step,
            max,
            name: format!("PSAR({step},{max})"),
            state: SarState::Empty,
            prev1: (f64::NAN, f64::NAN),
            prev2: (f64::NAN, f64::NAN),
        })
    }

    /// Default parameters: step 0.02, max 0.20
    pub fn default_params() -> Result<Self, IndicatorError> {
        Self::new(0.02, 0.20)
    }

    fn push_prev(&mut self, bar: &Bar) {
        self.prev2 = self.prev1;
        self.prev1 = (bar.high, bar.low);
    }
}

/// Keep the SAR outside the prior two bars' range.
pub(crate) fn clamp_to_prior_extremes(
    sar: f64,
    direction: SarDirection,
    prev1: (f64, f64),
    prev2: (f64, f64),
) -> f64 {
    match direction {
        SarDirection::Long => sar.min(prev1.1).min(prev2.1),
        SarDirection::Short => sar.max(prev1.0).max(prev2.0),
    }
}

/// Extend the extreme point on a new high (long) / low (short), raising AF.
/// Returns the updated `(ep, af)`.
pub(crate) fn advance_extreme(
    direction: SarDirection,
    bar: &Bar,
    ep: f64,
    af: f64,
    step: f64,
    max: f64,
) -> (f64, f64) {
    let new_extreme = match direction {
        SarDirection::Long => bar.high > ep,
        SarDirection::Short => bar.low < ep,
    };
    if !new_extreme {
        return (ep, af);
    }
    let ep = match direction {
        SarDirection::Long => bar.high,
        SarDirection::Short => bar.low,
    };
    (ep, (af + step).min(max))
}

impl Indicator for ParabolicSar {
    type Output = MultiValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        2
    }

    fn update(&mut self, bar: &Bar) -> MultiValue {
        let next = match self.state {
            SarState::Empty => {
                self.state = SarState::Seeded { close: bar.close };
                self.push_prev(bar);
                return MultiValue::invalid(2);
            }
            SarState::Seeded { close } => {
                let (prev_high, prev_low) = self.prev1;
                if bar.close >= close {
                    SarState::Trending {
                        direction: SarDirection::Long,
                        sar: prev_low,
                        ep: bar.high,
                        af: self.step,
                    }
                } else {
                    SarState::Trending {
                        direction: SarDirection::Short,
                        sar: prev_high,
                        ep: bar.low,
                        af: self.step,
                    }
                }
            }
            SarState::Trending {
                direction,
                sar,
                ep,
                af,
            } => {
                let projected = sar + af * (ep - sar);
                let projected = clamp_to_prior_extremes(projected, direction, self.prev1, self.prev2);
                let pierced = match direction {
                    SarDirection::Long => bar.low < projected,
                    SarDirection::Short => bar.high > projected,
                };
                if pierced {
                    let (direction, new_ep) = match direction {
                        SarDirection::Long => (SarDirection::Short, bar.low),
                        SarDirection::Short => (SarDirection::Long, bar.high),
                    };
                    SarState::Trending {
                        direction,
                        sar: ep,
                        ep: new_ep,
                        af: self.step,
                    }
                } else {
                    let (ep, af) = advance_extreme(direction, bar, ep, af, self.step, self.max);
                    SarState::Trending {
                        direction,
                        sar: projected,
                        ep,
                        af,
                    }
                }
            }
        };
        self.state = next;
        self.push_prev(bar);
        match next {
            SarState::Trending { direction, sar, .. } => {
                MultiValue::from_array([sar, direction.sign()])
            }
            _ => MultiValue::invalid(2),
        }
    }

    fn reset(&mut self) {
        self.state = SarState::Empty;
        self.prev1 = (f64::NAN, f64::NAN);
        self.prev2 = (f64::NAN, f64::NAN);
    }
}
