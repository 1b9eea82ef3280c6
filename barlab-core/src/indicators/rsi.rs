//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing (RMA) of gains and losses between consecutive closes.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Warmup: period + 1 (period changes need period + 1 closes).
//! Edge cases: avg_loss == 0 → RSI = 100; avg_gain == 0 → RSI = 0;
//! flat market (both 0) → RSI = 50.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::rma::Rma;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
    gains: Rma,
    losses: Rma,
    prev_close: Option<f64>,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("RSI({period})"),
            gains: Rma::new(period)?,
            losses: Rma::new(period)?,
            prev_close: None,
        })
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        (100.0 - 100.0 / (1.0 + avg_gain / avg_loss)).clamp(0.0, 100.0)
    }
}

impl Indicator for Rsi {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period + 1
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        let Some(prev) = self.prev_close.replace(bar.close) else {
            return SingleValue::invalid();
        };
        let change = bar.close - prev;
        let gain = Indicator::update(&mut self.gains, &Bar::degenerate(bar.time, change.max(0.0)));
        let loss = Indicator::update(
            &mut self.losses,
            &Bar::degenerate(bar.time, (-change).max(0.0)),
        );
        match (gain.value(), loss.value()) {
            (Some(g), Some(l)) => SingleValue::new(rsi_from_averages(g, l)),
            _ => SingleValue::invalid(),
        }
    }

    fn reset(&mut self) {
        self.gains.reset();
        self.losses.reset();
        self.prev_close = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::BatchIndicator;
    use crate::components::output::IndicatorOutput;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn rsi_all_gains_is_100() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = Rsi::new(3).unwrap().compute(&bars);
        assert!(!result[2].is_valid());
        assert_eq!(result[3].value(), Some(100.0));
        assert_eq!(result[4].value(), Some(100.0));
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let bars = make_bars(&[5.0, 4.0, 3.0, 2.0]);
        let result = Rsi::new(3).unwrap().compute(&bars);
        assert_eq!(result[3].value(), Some(0.0));
    }

    #[test]
    fn rsi_flat_market_is_50() {
        let bars = make_bars(&[7.0; 10]);
        let result = Rsi::new(5).unwrap().compute(&bars);
        assert_eq!(result[5].value(), Some(50.0));
        assert_eq!(result[9].value(), Some(50.0));
    }

    #[test]
    fn rsi_known_value() {
        // Changes: +2, -1, +1 → avg_gain = 1, avg_loss = 1/3 → RS = 3 → RSI = 75
        let bars = make_bars(&[10.0, 12.0, 11.0, 12.0]);
        let result = Rsi::new(3).unwrap().compute(&bars);
        assert_approx(result[3].value().unwrap(), 75.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_warmup() {
        assert_eq!(Rsi::new(14).unwrap().warmup_period(), 15);
    }
}
