//! Triple Exponential Moving Average (TEMA).
//!
//! E1 = EMA(close), E2 = EMA(E1), E3 = EMA(E2); TEMA = 3*E1 - 3*E2 + E3.
//! Warmup: 3*period - 2.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::ema::Ema;

/// Three EMAs chained through degenerate bars. Shared with TRIX.
#[derive(Debug, Clone)]
pub(crate) struct TripleEma {
    e1: Ema,
    e2: Ema,
    e3: Ema,
}

impl TripleEma {
    pub(crate) fn new(period: usize) -> Result<Self, IndicatorError> {
        Ok(Self {
            e1: Ema::new(period)?,
            e2: Ema::new(period)?,
            e3: Ema::new(period)?,
        })
    }

    /// `(e1, e2, e3)` once the third stage has seeded.
    pub(crate) fn update(&mut self, bar: &Bar) -> Option<(f64, f64, f64)> {
        let e1 = self.e1.update(bar).value()?;
        let e2 = self.e2.update(&Bar::degenerate(bar.time, e1)).value()?;
        let e3 = self.e3.update(&Bar::degenerate(bar.time, e2)).value()?;
        Some((e1, e2, e3))
    }

    pub(crate) fn reset(&mut self) {
        self.e1.reset();
        self.e2.reset();
        self.e3.reset();
    }
}

#[derive(Debug, Clone)]
pub struct Tema {
    period: usize,
    name: String,
    chain: TripleEma,
}

impl Tema {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("TEMA({period})"),
            chain: TripleEma::new(period)?,
        })
    }
}

impl Indicator for Tema {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        3 * self.period - 2
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        match self.chain.update(bar) {
            Some((e1, e2, e3)) => SingleValue::new(3.0 * e1 - 3.0 * e2 + e3),
            None => SingleValue::invalid(),
        }
    }

    fn reset(&mut self) {
        self.chain.reset();
    }
}
