//! Double Exponential Moving Average (DEMA).
//!
//! E1 = EMA(close), E2 = EMA(E1); DEMA = 2*E1 - E2.
//! Warmup: 2*period - 1.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::ema::Ema;

#[derive(Debug, Clone)]
pub struct Dema {
    period: usize,
    name: String,
    e1: Ema,
    e2: Ema,
}

impl Dema {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("DEMA({period})"),
            e1: Ema::new(period)?,
            e2: Ema::new(period)?,
        })
    }
}

impl Indicator for Dema {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        2 * self.period - 1
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        let Some(e1) = self.e1.update(bar).value() else {
            return SingleValue::invalid();
        };
        match self.e2.update(&Bar::degenerate(bar.time, e1)).value() {
            Some(e2) => SingleValue::new(2.0 * e1 - e2),
            None => SingleValue::invalid(),
        }
    }

    fn reset(&mut self) {
        self.e1.reset();
        self.e2.reset();
    }
}
