//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1)
//! Seed: EMA[period-1] = SMA of the first `period` closes.
//! Warmup: period.
//!
//! Reads only `close`, so it can be fed degenerate bars by composed indicators.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
    alpha: f64,
    seed_sum: f64,
    seen: usize,
    current: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("EMA({period})"),
            alpha: 2.0 / (period as f64 + 1.0),
            seed_sum: 0.0,
            seen: 0,
            current: None,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Latest value once seeded.
    pub fn current(&self) -> Option<f64> {
        self.current
    }
}

impl Indicator for Ema {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        let x = bar.close;
        let next = match self.current {
            Some(prev) => self.alpha * x + (1.0 - self.alpha) * prev,
            None => {
                self.seed_sum += x;
                self.seen += 1;
                if self.seen < self.period {
                    return SingleValue::invalid();
                }
                self.seed_sum / self.period as f64
            }
        };
        self.current = Some(next);
        SingleValue::new(next)
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
    fn ema_3_seed_and_recursion() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Ema::new(3).unwrap().compute(&bars);

        assert!(!result[0].is_valid());
        assert!(!result[1].is_valid());
        // Seed: SMA(10,11,12) = 11
        assert_approx(result[2].value().unwrap(), 11.0, DEFAULT_EPSILON);
        // alpha = 0.5: 0.5*13 + 0.5*11 = 12
        assert_approx(result[3].value().unwrap(), 12.0, DEFAULT_EPSILON);
        // 0.5*14 + 0.5*12 = 13
        assert_approx(result[4].value().unwrap(), 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_constant_series() {
        let bars = make_bars(&[50.0; 20]);
        let result = Ema::new(5).unwrap().compute(&bars);
        for v in &result[4..] {
            assert_approx(v.value().unwrap(), 50.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_degenerate_bars_match_real_bars() {
        let bars = make_bars(&[10.0, 12.0, 11.0, 15.0, 14.0, 13.0]);
        let degenerate: Vec<Bar> = bars
            .iter()
            .map(|b| Bar::degenerate(b.time, b.close))
            .collect();
        let mut ema = Ema::new(3).unwrap();
        assert_eq!(ema.compute(&bars), ema.compute(&degenerate));
    }

    #[test]
    fn ema_rejects_zero_period() {
        assert!(Ema::new(0).is_err());
    }
}
