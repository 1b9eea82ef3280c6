//! Keltner Channel.
//!
//! Middle = EMA(ema_period) of close.
//! Upper  = middle + multiplier * ATR(atr_period)
//! Lower  = middle - multiplier * ATR(atr_period)
//!
//! Warmup: max(ema_period, atr_period).

use crate::components::error::{require_non_negative, require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::BandValue;
use crate::domain::Bar;
use crate::indicators::atr::Atr;
use crate::indicators::ema::Ema;

#[derive(Debug, Clone)]
pub struct Keltner {
    ema_period: usize,
    atr_period: usize,
    multiplier: f64,
    name: String,
    ema: Ema,
    atr: Atr,
}

impl Keltner {
    pub fn new(ema_period: usize, atr_period: usize, multiplier: f64) -> Result<Self, IndicatorError> {
        let ema_period = require_period("ema_period", ema_period, 1)?;
        let atr_period = require_period("atr_period", atr_period, 1)?;
        let multiplier = require_non_negative("multiplier", multiplier)?;
        Ok(Self {
            ema_period,
            atr_period,
            multiplier,
            name: format!("KC({ema_period},{atr_period},{multiplier})"),
            ema: Ema::new(ema_period)?,
            atr: Atr::new(atr_period)?,
        })
    }
}

impl Indicator for Keltner {
    type Output = BandValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.ema_period.max(self.atr_period)
    }

    fn update(&mut self, bar: &Bar) -> BandValue {
        let middle = self.ema.update(bar).value();
        let atr = self.atr.update(bar).value();
        match (middle, atr) {
            (Some(m), Some(a)) => {
                let offset = self.multiplier * a;
                BandValue::new(m + offset, m, m - offset)
            }
            _ => BandValue::invalid(),
        }
    }

    fn reset(&mut self) {
        self.ema.reset();
        self.atr.reset();
    }
}
