//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|); the first
//! bar has no previous close and uses high-low only.
//! ATR is the Wilder average (RMA) of the true range, seeded with the simple
//! mean of the first `period` TR values.
//! Warmup: period.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::SingleValue;
use crate::domain::Bar;
use crate::indicators::rma::Rma;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
    smoother: Rma,
    prev_close: Option<f64>,
}

impl Atr {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("ATR({period})"),
            smoother: Rma::new(period)?,
            prev_close: None,
        })
    }

    /// Latest ATR once warmed up.
    pub fn current(&self) -> Option<f64> {
        self.smoother.current()
    }
}

impl Indicator for Atr {
    type Output = SingleValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> SingleValue {
        let tr = bar.true_range(self.prev_close.replace(bar.close));
        Indicator::update(&mut self.smoother, &Bar::degenerate(bar.time, tr))
    }

    fn reset(&mut self) {
        self.smoother.reset();
        self.prev_close = None;
    }
}
