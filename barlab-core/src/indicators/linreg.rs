//! Linear Regression Channel.
//!
//! Least-squares line through the last `period` closes (x = 0 oldest ..
//! period-1 newest). Middle is the fitted value at the newest bar; upper /
//! lower are middle ± k * σ, with σ the population standard deviation of the
//! residuals around the line.
//!
//! Warmup: period (period >= 2, k >= 0).

use crate::components::error::{require_non_negative, require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::BandValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;

#[derive(Debug, Clone)]
pub struct LinRegChannel {
    period: usize,
    k: f64,
    name: String,
    window: RingBuffer,
}

impl LinRegChannel {
    pub fn new(period: usize, k: f64) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 2)?;
        let k = require_non_negative("k", k)?;
        Ok(Self {
            period,
            k,
            name: format!("LINREG({period},{k})"),
            window: RingBuffer::with_window(period),
        })
    }
}

/// `(intercept, slope)` of the least-squares fit over x = 0..n-1.
pub(crate) fn least_squares(values: &RingBuffer) -> (f64, f64) {
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.mean();
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    (y_mean - slope * x_mean, slope)
}

impl Indicator for LinRegChannel {
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
        let (intercept, slope) = least_squares(&self.window);
        let residual_var = self
            .window
            .iter()
            .enumerate()
            .map(|(i, y)| (y - (intercept + slope * i as f64)).powi(2))
            .sum::<f64>()
            / self.period as f64;
        let sigma = residual_var.max(0.0).sqrt();
        let middle = intercept + slope * (self.period - 1) as f64;
        BandValue::new(middle + self.k * sigma, middle, middle - self.k * sigma)
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
    fn linreg_exact_line_has_zero_width() {
        let closes: Vec<f64> = (0..6).map(|i| 10.0 + 2.0 * i as f64).collect();
        let result = LinRegChannel::new(4, 2.0).unwrap().compute(&make_bars(&closes));
        assert!(!result[2].is_valid());
        let v = result[5];
        assert_approx(v.middle, 20.0, 1e-9);
        assert_approx(v.upper, v.lower, 1e-9);
    }

    #[test]
    fn linreg_residual_band() {
        // Closes 1, 3, 2: slope 0.5, intercept 1.5 → fitted 1.5, 2, 2.5
        // residuals -0.5, 1, -0.5 → σ = sqrt(0.5)
        let result = LinRegChannel::new(3, 1.0).unwrap().compute(&make_bars(&[1.0, 3.0, 2.0]));
        let v = result[2];
        assert_approx(v.middle, 2.5, DEFAULT_EPSILON);
        assert_approx(v.upper - v.middle, 0.5f64.sqrt(), DEFAULT_EPSILON);
        assert!(v.upper >= v.middle && v.middle >= v.lower);
    }

    #[test]
    fn linreg_validates_parameters() {
        assert!(LinRegChannel::new(1, 2.0).is_err());
        assert!(LinRegChannel::new(10, -0.1).is_err());
    }
}
