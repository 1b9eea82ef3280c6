//! Williams %R.
//!
//! %R = -100 * (HH - close) / (HH - LL) over `period` bars, in [-100, 0].
//! A zero range yields -50.
//! Warmup: period.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;
use crate::indicators::stochastic::percent_of_range;

#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
    name: String,
    highs: RingBuffer,
    lows: RingBuffer,
}

impl WilliamsR {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("WILLR({period})"),
            highs: RingBuffer::with_window(period),
            lows: RingBuffer::with_window(period),
        })
    }
}

impl Indicator for WilliamsR {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        self.highs.add(bar.high);
        self.lows.add(bar.low);
        if !self.highs.is_full() {
            return SingleValue::invalid();
        }
        match (self.highs.max(), self.lows.min()) {
            // %R is the stochastic %K shifted down by 100.
            (Some(hh), Some(ll)) => SingleValue::new(percent_of_range(bar.close, hh, ll) - 100.0),
            _ => SingleValue::invalid(),
        }
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
    }
}
