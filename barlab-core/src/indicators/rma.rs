//! Wilder's running moving average (RMA, a.k.a. SMMA).
//!
//! Seed: simple average of the first `period` closes.
//! Then: RMA[t] = RMA[t-1] * (period - 1) / period + close[t] / period
//! Warmup: period.
//!
//! This is the smoother behind ATR, RSI, and ADX, which feed it their
//! derived series as degenerate bars.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rma {
    period: usize,
    name: String,
    seed_sum: f64,
    seen: usize,
    current: Option<f64>,
}

impl Rma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("RMA({period})"),
            seed_sum: 0.0,
            seen: 0,
            current: None,
        })
    }

    pub fn current(&self) -> Option<f64> {
        self.current
    }

    /// Feed a raw scalar. Equivalent to `update(&Bar::degenerate(_, value))`.
    pub(crate) fn push(&mut self, value: f64) -> Option<f64> {
        let n = self.period as f64;
        let next = match self.current {
            Some(prev) => prev * (n - 1.0) / n + value / n,
            None => {
                self.seed_sum += value;
                self.seen += 1;
                if self.seen < self.period {
                    return None;
                }
                self.seed_sum / n
            }
        };
        self.current = Some(next);
        self.current
    }
}

impl Indicator for Rma {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        self.push(bar.close)
            .map_or_else(SingleValue::invalid, SingleValue::new)
    }

    fn reset(&mut self) {
        self.seed_sum = 0.0;
        self.seen = 0;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::BatchIndicator;
    use crate::components::output::IndicatorOutput;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn rma_seed_then_wilder_recursion() {
        let bars = make_bars(&[8.0, 9.0, 6.0, 6.0]);
        let result = Rma::new(3).unwrap().compute(&bars);
        assert!(!result[1].is_valid());
        // Seed: mean(8, 9, 6) = 23/3
        assert_approx(result[2].value().unwrap(), 23.0 / 3.0, DEFAULT_EPSILON);
        // (23/3) * 2/3 + 6/3 = 46/9 + 2 = 64/9
        assert_approx(result[3].value().unwrap(), 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rma_name() {
        assert_eq!(Rma::new(14).unwrap().name(), "RMA(14)");
    }
}
