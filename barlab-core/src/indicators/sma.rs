//! Simple Moving Average (SMA).
//!
//! Mean of the last `period` closes.
//! Warmup: period (first valid value at index period-1).

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
    window: RingBuffer,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("SMA({period})"),
            window: RingBuffer::with_window(period),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        self.window.add(bar.close);
        if !self.window.is_full() {
            return SingleValue::invalid();
        }
        SingleValue::new(self.window.mean())
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}
