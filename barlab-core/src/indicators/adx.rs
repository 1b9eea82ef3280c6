//! ADX: Average Directional Index (Wilder, 1978).
//!
//! Steps, following Wilder's reference algorithm:
//! 1. +DM = high - prev_high when it exceeds prev_low - low and is positive, else 0;
//!    -DM symmetrically. TR uses the previous close.
//! 2. Smooth TR, +DM, -DM with Wilder's RMA, seeded by the simple average of
//!    the first `period` values (first available at bar `period`).
//! 3. +DI = 100 * s(+DM) / s(TR), -DI = 100 * s(-DM) / s(TR)  (0 when s(TR) is 0)
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)  (0 when the sum is 0)
//! 5. ADX = RMA of DX over `period`.
//!
//! Output: `[adx, +di, -di]`.
//! Warmup: 2 * period (first valid at index 2*period - 1).

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::MultiValue;
use crate::domain::Bar;
use crate::indicators::rma::Rma;

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    name: String,
    tr: Rma,
    plus_dm: Rma,
    minus_dm: Rma,
    adx: Rma,
    prev: Option<(f64, f64, f64)>,
}

impl Adx {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        Ok(Self {
            period,
            name: format!("ADX({period})"),
            tr: Rma::new(period)?,
            plus_dm: Rma::new(period)?,
            minus_dm: Rma::new(period)?,
            adx: Rma::new(period)?,
            prev: None,
        })
    }
}

/// Wilder's directional movement between two bars: `(+DM, -DM)`.
pub(crate) fn directional_movement(high: f64, low: f64, prev_high: f64, prev_low: f64) -> (f64, f64) {
    let up = high - prev_high;
    let down = prev_low - low;
    let plus = if up > down && up > 0.0 { up } else { 0.0 };
    let minus = if down > up && down > 0.0 { down } else { 0.0 };
    (plus, minus)
}

fn smooth(rma: &mut Rma, bar: &Bar, value: f64) -> Option<f64> {
    rma.update(&Bar::degenerate(bar.time, value)).value()
}

impl Indicator for Adx {
    type Output = MultiValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        2 * self.period
    }

    fn update(&mut self, bar: &Bar) -> MultiValue {
        let Some((prev_high, prev_low, prev_close)) =
            self.prev.replace((bar.high, bar.low, bar.close))
        else {
            return MultiValue::invalid(3);
        };

        let (plus, minus) = directional_movement(bar.high, bar.low, prev_high, prev_low);
        let tr = bar.true_range(Some(prev_close));

        let s_tr = smooth(&mut self.tr, bar, tr);
        let s_plus = smooth(&mut self.plus_dm, bar, plus);
        let s_minus = smooth(&mut self.minus_dm, bar, minus);
        let (Some(s_tr), Some(s_plus), Some(s_minus)) = (s_tr, s_plus, s_minus) else {
            return MultiValue::invalid(3);
        };

        let (plus_di, minus_di) = if s_tr == 0.0 {
            (0.0, 0.0)
        } else {
            (100.0 * s_plus / s_tr, 100.0 * s_minus / s_tr)
        };
        let di_sum = plus_di + minus_di;
        let dx = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / di_sum
        };

        match smooth(&mut self.adx, bar, dx) {
            Some(adx) => MultiValue::from_array([adx, plus_di, minus_di]),
            None => MultiValue::invalid(3),
        }
    }

    fn reset(&mut self) {
        self.tr.reset();
        self.plus_dm.reset();
        self.minus_dm.reset();
        self.adx.reset();
        self.prev = None;
    }
}
