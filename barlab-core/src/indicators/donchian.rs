//! Donchian Channel.
//!
//! Upper = highest high over the last `period` bars (current bar included).
//! Lower = lowest low over the same window. Middle = (upper + lower) / 2.
//!
//! Warmup: period.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::BandValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;

#[derive(Debug, Clone)]
pub struct Donchian {
    period: usize,
    name: String,
    highs: RingBuffer,
    lows: RingBuffer,
}

impl Donchian {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("DONCHIAN({period})"),
            highs: RingBuffer::with_window(period),
            lows: RingBuffer::with_window(period),
        })
    }
}

impl Indicator for Donchian {
    type Output = BandValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> BandValue {
        self.highs.add(bar.high);
        self.lows.add(bar.low);
        if !self.highs.is_full() {
            return BandValue::invalid();
        }
        match (self.highs.max(), self.lows.min()) {
            (Some(upper), Some(lower)) => BandValue::new(upper, (upper + lower) / 2.0, lower),
            _ => BandValue::invalid(),
        }
    }

    fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::BatchIndicator;
    use crate::components::output::IndicatorOutput;
    use crate::indicators::make_ohlc_bars;

    #[test]
    fn donchian_upper_lower() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 110.0, 98.0, 108.0),
            (108.0, 109.0, 100.0, 101.0),
            (101.0, 103.0, 90.0, 92.0),
        ]);
        let result = Donchian::new(3).unwrap().compute(&bars);
        assert!(!result[1].is_valid());
        assert_eq!(result[2].upper, 110.0);
        assert_eq!(result[2].lower, 95.0);
        assert_eq!(result[2].middle, 102.5);
        // Window slides: bar 0 drops out
        assert_eq!(result[3].upper, 110.0);
        assert_eq!(result[3].lower, 90.0);
    }
}
