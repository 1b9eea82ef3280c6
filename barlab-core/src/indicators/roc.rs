//! Rate of Change (ROC).
//!
//! Percentage price change over N bars.
//! ROC[t] = (close[t] - close[t-period]) / close[t-period] * 100
//! A zero reference close yields 0 rather than an infinite change.
//! Warmup: period + 1.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;

#[derive(Debug, Clone)]
pub struct Roc {
    period: usize,
    name: String,
    closes: RingBuffer,
}

impl Roc {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("ROC({period})"),
            closes: RingBuffer::with_window(period + 1),
        })
    }
}

impl Indicator for Roc {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period + 1
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        self.closes.add(bar.close);
        match (self.closes.is_full(), self.closes.oldest()) {
            (true, Some(prev)) if prev != 0.0 => {
                SingleValue::new((bar.close - prev) / prev * 100.0)
            }
            (true, Some(_)) => SingleValue::new(0.0),
            _ => SingleValue::invalid(),
        }
    }

    fn reset(&mut self) {
        self.closes.clear();
    }
}
