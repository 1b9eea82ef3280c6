//! SuperTrend: ATR-band trend follower.
//!
//! Basic bands: hl2 ± multiplier * ATR(period).
//! State machine over `Uptrend` / `Downtrend`:
//! - the final upper band only moves down (tightens) unless the previous
//!   close broke above it; the final lower band only moves up unless the
//!   previous close broke below it
//! - an uptrend flips to downtrend when close falls below the lower band,
//!   and back when close rises above the upper band
//!
//! The first bar with a valid ATR starts in `Uptrend` when close >= hl2.
//! Output: `[line, direction]`: the lower band (+1) in an uptrend, the upper
//! band (-1) in a downtrend.
//! Warmup: period.

use crate::components::error::{require_non_negative, require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::MultiValue;
use crate::domain::Bar;
use crate::indicators::atr::Atr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendState {
    Uptrend,
    Downtrend,
}

#[derive(Debug, Clone, Copy)]
struct Bands {
    upper: f64,
    lower: f64,
    trend: TrendState,
    close: f64,
}

#[derive(Debug, Clone)]
pub struct SuperTrend {
    period: usize,
    multiplier: f64,
    name: String,
    atr: Atr,
    bands: Option<Bands>,
}

impl SuperTrend {
    pub fn new(period: usize, multiplier: f64) -> Result<Self, IndicatorError> {
        let period = require_period("period", period, 1)?;
        let multiplier = require_non_negative("multiplier", multiplier)?;
        Ok(Self {
            period,
            multiplier,
            name: format!("SUPERTREND({period},{multiplier})"),
            atr: Atr::new(period)?,
            bands: None,
        })
    }
}

/// Upper band tightens (never rises) while the previous close stayed at or below it.
pub(crate) fn tighten_upper(basic_upper: f64, prev_upper: f64, prev_close: f64) -> f64 {
    if prev_close <= prev_upper {
        basic_upper.min(prev_upper)
    } else {
        basic_upper
    }
}

/// Lower band tightens (never falls) while the previous close stayed at or above it.
pub(crate) fn tighten_lower(basic_lower: f64, prev_lower: f64, prev_close: f64) -> f64 {
    if prev_close >= prev_lower {
        basic_lower.max(prev_lower)
    } else {
        basic_lower
    }
}

fn next_trend(trend: TrendState, close: f64, upper: f64, lower: f64) -> TrendState {
    match trend {
        TrendState::Uptrend if close < lower => TrendState::Downtrend,
        TrendState::Downtrend if close > upper => TrendState::Uptrend,
        unchanged => unchanged,
    }
}

impl Indicator for SuperTrend {
    type Output = MultiValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) -> MultiValue {
        let Some(atr) = self.atr.update(bar).value() else {
            return MultiValue::invalid(2);
        };
        let hl2 = bar.hl2();
        let basic_upper = hl2 + self.multiplier * atr;
        let basic_lower = hl2 - self.multiplier * atr;

        let bands = match self.bands {
            None => Bands {
                upper: basic_upper,
                lower: basic_lower,
                trend: if bar.close >= hl2 {
                    TrendState::Uptrend
                } else {
                    TrendState::Downtrend
                },
                close: bar.close,
            },
            Some(prev) => {
                let upper = tighten_upper(basic_upper, prev.upper, prev.close);
                let lower = tighten_lower(basic_lower, prev.lower, prev.close);
                Bands {
                    upper,
                    lower,
                    trend: next_trend(prev.trend, bar.close, upper, lower),
                    close: bar.close,
                }
            }
        };
        self.bands = Some(bands);

        match bands.trend {
            TrendState::Uptrend => MultiValue::from_array([bands.lower, 1.0]),
            TrendState::Downtrend => MultiValue::from_array([bands.upper, -1.0]),
        }
    }

    fn reset(&mut self) {
        self.atr.reset();
        self.bands = None;
    }
}
