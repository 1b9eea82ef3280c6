//! MACD: Moving Average Convergence/Divergence.
//!
//! macd      = EMA(fast) - EMA(slow) of closes
//! signal    = EMA(signal) of the macd line, fed as degenerate bars
//! histogram = macd - signal
//!
//! Output: `[macd, signal, histogram]`.
//! Warmup: slow + signal - 1. Requires fast < slow.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::MultiValue;
use crate::domain::Bar;
use crate::indicators::ema::Ema;

#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    name: String,
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, IndicatorError> {
        let fast = require_period("fast", fast, 1)?;
        let slow = require_period("slow", slow, 1)?;
        let signal = require_period("signal", signal, 1)?;
        if fast >= slow {
            return Err(IndicatorError::invalid(
                "fast",
                format!("fast period ({fast}) must be < slow period ({slow})"),
            ));
        }
        Ok(Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
            name: format!("MACD({fast},{slow},{signal})"),
            fast: Ema::new(fast)?,
            slow: Ema::new(slow)?,
            signal: Ema::new(signal)?,
        })
    }
}

impl Indicator for Macd {
    type Output = MultiValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn update(&mut self, bar: &Bar) -> MultiValue {
        let fast = self.fast.update(bar).value();
        let slow = self.slow.update(bar).value();
        let (Some(fast), Some(slow)) = (fast, slow) else {
            return MultiValue::invalid(3);
        };
        let macd = fast - slow;
        match self.signal.update(&Bar::degenerate(bar.time, macd)).value() {
            Some(signal) => MultiValue::from_array([macd, signal, macd - signal]),
            None => MultiValue::invalid(3),
        }
    }

    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::indicator::BatchIndicator;
    use crate::components::output::IndicatorOutput;
    use crate::indicators::make_bars;

    #[test]
    fn macd_rejects_fast_not_below_slow() {
        assert!(Macd::new(26, 12, 9).is_err());
        assert!(Macd::new(12, 12, 9).is_err());
        assert!(Macd::new(0, 12, 9).is_err());
    }

    #[test]
    fn macd_warmup_and_histogram_identity() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let mut macd = Macd::new(3, 6, 4).unwrap();
        assert_eq!(macd.warmup_period(), 9);
        let result = macd.compute(&make_bars(&closes));
        assert!(!result[7].is_valid());
        assert!(result[8].is_valid());
        for v in result.iter().filter(|v| v.is_valid()) {
            let (m, s, h) = (v.get(0).unwrap(), v.get(1).unwrap(), v.get(2).unwrap());
            assert_eq!(h, m - s);
        }
    }

    #[test]
    fn macd_constant_series_is_zero() {
        let result = Macd::new(2, 4, 2).unwrap().compute(&make_bars(&[10.0; 10]));
        assert!(result[9].get(0).unwrap().abs() < 1e-9);
        assert!(result[9].get(2).unwrap().abs() < 1e-9);
    }
}
