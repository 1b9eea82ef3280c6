//! Rolling population standard deviation of closes.
//!
//! σ = sqrt(Σ(close - mean)² / period), computed two-pass over the window so a
//! flat window yields exactly 0.
//! Warmup: period.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;

#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
    name: String,
    window: RingBuffer,
}

impl StdDev {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("STDDEV({period})"),
            window: RingBuffer::with_window(period),
        })
    }
}

/// Population mean and standard deviation of the buffer's values.
pub(crate) fn mean_and_stddev(window: &RingBuffer) -> (f64, f64) {
    let mean = window.mean();
    let var = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window.len() as f64;
    (mean, var.max(0.0).sqrt())
}

impl Indicator for StdDev {
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
        SingleValue::new(mean_and_stddev(&self.window).1)
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}
