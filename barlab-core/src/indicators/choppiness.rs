//! Choppiness Index.
//!
//! CI = 100 * log10(Σ TR / (HH - LL)) / log10(period), over `period` bars.
//! High values mean sideways chop, low values a directional trend.
//! TR of the first bar is high - low. A zero range yields 50; the result is
//! clamped to [0, 100].
//! Warmup: period (period >= 2).

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;

#[derive(Debug, Clone)]
pub struct ChoppinessIndex {
    period: usize,
    name: String,
    true_ranges: RingBuffer,
    highs: RingBuffer,
    lows: RingBuffer,
    prev_close: Option<f64>,
}

impl ChoppinessIndex {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 2)?;
        Ok(Self {
            period,
            name: format!("CHOP({period})"),
            true_ranges: RingBuffer::with_window(period),
            highs: RingBuffer::with_window(period),
            lows: RingBuffer::with_window(period),
            prev_close: None,
        })
    }
}

impl Indicator for ChoppinessIndex {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        let tr = bar.true_range(self.prev_close.replace(bar.close));
        self.true_ranges.add(tr);
        self.highs.add(bar.high);
        self.lows.add(bar.low);
        if !self.true_ranges.is_full() {
            return SingleValue::invalid();
        }
        let (Some(hh), Some(ll)) = (self.highs.max(), self.lows.min()) else {
            return SingleValue::invalid();
        };
        let range = hh - ll;
        let tr_sum = self.true_ranges.sum();
        if range <= 0.0 || tr_sum <= 0.0 {
            return SingleValue::new(50.0);
        }
        let ci = 100.0 * (tr_sum / range).log10() / (self.period as f64).log10();
        SingleValue::new(ci.clamp(0.0, 100.0))
    }

    fn reset(&mut self) {
        self.true_ranges.clear();
        self.highs.clear();
        self.lows.clear();
        self.prev_close = None;
    }
}
