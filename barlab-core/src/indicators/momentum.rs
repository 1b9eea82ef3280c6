//! Momentum: absolute price change over N bars.
//!
//! MOM[t] = close[t] - close[t-period]
//! Warmup: period + 1.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;

#[derive(Debug, Clone)]
pub struct Momentum {
    period: usize,
    name: String,
    closes: RingBuffer,
}

impl Momentum {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("MOM({period})"),
            closes: RingBuffer::with_window(period + 1),
        })
    }
}

impl Indicator for Momentum {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period + 1
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        self.closes.add(bar.close);
        match self.closes.oldest() {
            Some(prev) if self.closes.is_full() => SingleValue::new(bar.close - prev),
            _ => SingleValue::invalid(),
        }
    }

    fn reset(&mut self) {
        self.closes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::BatchIndicator;
    use crate::components::output::IndicatorOutput;

    #[test]
    fn momentum_basic() {
        let bars = crate::indicators::make_bars(&[10.0, 12.0, 15.0, 11.0]);
        let result = Momentum::new(2).unwrap().compute(&bars);
        assert!(!result[1].is_valid());
        assert_eq!(result[2].value(), Some(5.0));
        assert_eq!(result[3].value(), Some(-1.0));
    }
}
