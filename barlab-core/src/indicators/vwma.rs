//! Volume-Weighted Moving Average (VWMA).
//!
//! VWMA = Σ(close * volume) / Σ(volume) over the last `period` bars.
//! A window with zero total volume falls back to the simple mean of closes.
//! Warmup: period.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;

#[derive(Debug, Clone)]
pub struct Vwma {
    period: usize,
    name: String,
    closes: RingBuffer,
    volumes: RingBuffer,
}

impl Vwma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("VWMA({period})"),
            closes: RingBuffer::with_window(period),
            volumes: RingBuffer::with_window(period),
        })
    }
}

impl Indicator for Vwma {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        self.closes.add(bar.close);
        self.volumes.add(bar.volume);
        if !self.closes.is_full() {
            return SingleValue::invalid();
        }
        let total_volume = self.volumes.sum();
        if total_volume <= 0.0 {
            return SingleValue::new(self.closes.mean());
        }
        let weighted: f64 = self
            .closes
            .iter()
            .zip(self.volumes.iter())
            .map(|(c, v)| c * v)
            .sum();
        SingleValue::new(weighted / total_volume)
    }

    fn reset(&mut self) {
        self.closes.clear();
        self.volumes.clear();
    }
}
