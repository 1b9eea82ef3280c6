//! Stochastic Oscillator.
//!
//! %K = 100 * (close - LL) / (HH - LL) over `k_period` bars; 50 when the
//! range is zero. %D = SMA(d_period) of %K, fed as degenerate bars.
//! Both lie in [0, 100].
//!
//! Output: `[%K, %D]`.
//! Warmup: k_period + d_period - 1.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::MultiValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;
use crate::indicators::sma::Sma;

#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    name: String,
    highs: RingBuffer,
    lows: RingBuffer,
    d: Sma,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Result<Self, IndicatorError> {
        let k_period = require_period("k_period", k_period, 1)?;
        let d_period = require_period("d_period", d_period, 1)?;
        Ok(Self {
            k_period,
            d_period,
            name: format!("STOCH({k_period},{d_period})"),
            highs: RingBuffer::with_window(k_period),
            lows: RingBuffer::with_window(k_period),
            d: Sma::new(d_period)?,
        })
    }
}

/// Position of `close` within [low, high] scaled to [0, 100]; 50 on a zero range.
pub(crate) fn percent_of_range(close: f64, high: f64, low: f64) -> f64 {
    let range = high - low;
    if range <= 0.0 {
        return 50.0;
    }
    (100.0 * (close - low) / range).clamp(0.0, 100.0)
}

impl Indicator for Stochastic {
    type Output = MultiValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.k_period + self.d_period - 1
    }

    fn update(&mut self, bar: &Bar) -> MultiValue {
        self.highs.add(bar.high);
        self.lows.add(bar.low);
        if !self.highs.is_full() {
            return MultiValue::invalid(2);
        }
        let (Some(hh), Some(ll)) = (self.highs.max(), self.lows.min()) else {
            return MultiValue::invalid(2);
        };
        let k = percent_of_range(bar.close, hh, ll);
        match self.d.update(&Bar::degenerate(bar.time, k)).value() {
            Some(d) => MultiValue::from_array([k, d.clamp(0.0, 100.0)]),
            None => MultiValue::invalid(2),
        }
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
        self.d.reset();
    }
}
