//! Bollinger Bands.
//!
//! Middle = SMA(period) of close.
//! Upper  = middle + k * σ, Lower = middle - k * σ, with σ the population
//! standard deviation over the same window.
//!
//! Warmup: period.

use crate::components::error::{require_non_negative, require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::BandValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;
use crate::indicators::stddev::mean_and_stddev;

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    k: f64,
    name: String,
    window: RingBuffer,
}

impl Bollinger {
    pub fn new(period: usize, k: f64) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        let k = require_non_negative("k", k)?;
        Ok(Self {
            period,
            k,
            name: format!("BB({period},{k})"),
            window: RingBuffer::with_window(period),
        })
    }
}

impl Indicator for Bollinger {
    type Output = BandValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> BandValue {
        self.window.add(bar.close);
        if !self.window.is_full() {
            return BandValue::invalid();
        }
        let (mean, sd) = mean_and_stddev(&self.window);
        BandValue::new(mean + self.k * sd, mean, mean - self.k * sd)
    }

    fn reset(&mut self) {
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::BatchIndicator;
    use crate::components::output::IndicatorOutput;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn bollinger_known_values() {
        let bars = make_bars(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let result = Bollinger::new(8, 2.0).unwrap().compute(&bars);
        let v = result[7];
        assert!(!result[6].is_valid());
        assert_approx(v.middle, 5.0, DEFAULT_EPSILON);
        assert_approx(v.upper, 9.0, DEFAULT_EPSILON);
        assert_approx(v.lower, 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_flat_collapses() {
        let result = Bollinger::new(3, 2.0).unwrap().compute(&make_bars(&[8.0; 4]));
        let v = result[3];
        assert_eq!(v.upper, v.lower);
        assert_eq!(v.width(), 0.0);
    }

    #[test]
    fn bollinger_name() {
        assert_eq!(Bollinger::new(20, 2.0).unwrap().name(), "BB(20,2)");
        assert!(Bollinger::new(20, -2.0).is_err());
    }
}
