//! TRIX: 1-bar percent rate of change of a triple-smoothed EMA.
//!
//! TRIX[t] = 100 * (E3[t] - E3[t-1]) / E3[t-1]; 0 when E3[t-1] is 0.
//! Warmup: 3*period - 1.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::tema::TripleEma;

#[derive(Debug, Clone)]
pub struct Trix {
    period: usize,
    name: String,
    chain: TripleEma,
    prev_e3: Option<f64>,
}

impl Trix {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("TRIX({period})"),
            chain: TripleEma::new(period)?,
            prev_e3: None,
        })
    }
}

impl Indicator for Trix {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        3 * self.period - 1
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        let Some((_, _, e3)) = self.chain.update(bar) else {
            return SingleValue::invalid();
        };
        match self.prev_e3.replace(e3) {
            Some(prev) if prev != 0.0 => SingleValue::new(100.0 * (e3 - prev) / prev),
            Some(_) => SingleValue::new(0.0),
            None => SingleValue::invalid(),
        }
    }

    fn reset(&mut self) {
        self.chain.reset();
        self.prev_e3 = None;
    }
}
