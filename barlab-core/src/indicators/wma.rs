//! Weighted Moving Average (WMA).
//!
//! Linear weights 1..=period, newest close weighted `period`.
//! WMA = Σ(w_i * close_i) / (period * (period + 1) / 2)
//! Warmup: period.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;

#[derive(Debug, Clone)]
pub struct Wma {
    period: usize,
    name: String,
    window: RingBuffer,
}

impl Wma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("WMA({period})"),
            window: RingBuffer::with_window(period),
        })
    }
}

impl Indicator for Wma {
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
        let weighted: f64 = self
            .window
            .iter()
            .enumerate()
            .map(|(i, x)| (i + 1) as f64 * x)
            .sum();
        let denom = (self.period * (self.period + 1)) as f64 / 2.0;
        SingleValue::new(weighted / denom)
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}
