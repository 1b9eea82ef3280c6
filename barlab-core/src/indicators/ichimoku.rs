//! Ichimoku Kinko Hyo.
//!
//! tenkan   = (highest high + lowest low) / 2 over `tenkan` bars
//! kijun    = same over `kijun` bars
//! senkou A = (tenkan + kijun) / 2, displaced forward by `displacement` bars
//! senkou B = midpoint over `senkou_b` bars, displaced forward likewise
//! chikou   = close from `displacement` bars ago
//!
//! Forward displacement is realized without look-ahead: raw senkou values go
//! into ring buffers of capacity `displacement + 1`, and the value reported
//! at bar t is the oldest slot, i.e. the raw value computed at t - displacement.
//!
//! Output: `[tenkan, kijun, senkou_a, senkou_b, chikou]`.
//! Warmup: max(tenkan, kijun, senkou_b) + displacement.

use crate::components::error::{require_period, IndicatorError};
use crate::components::indicator::Indicator;
use crate::components::output::MultiValue;
use crate::domain::Bar;
use crate::indicators::buffer::RingBuffer;

#[derive(Debug, Clone)]
struct Midpoint {
    highs: RingBuffer,
    lows: RingBuffer,
}

impl Midpoint {
    fn new(period: usize) -> Self {
        Self {
            highs: RingBuffer::with_window(period),
            lows: RingBuffer::with_window(period),
        }
    }

    fn update(&mut self, bar: &Bar) -> Option<f64> {
        self.highs.add(bar.high);
        self.lows.add(bar.low);
        if !self.highs.is_full() {
            return None;
        }
        Some((self.highs.max()? + self.lows.min()?) / 2.0)
    }

    fn clear(&mut self) {
        self.highs.clear();
        self.lows.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Ichimoku {
    tenkan_period: usize,
    kijun_period: usize,
    senkou_b_period: usize,
    displacement: usize,
    name: String,
    tenkan: Midpoint,
    kijun: Midpoint,
    senkou_b: Midpoint,
    /// Raw senkou A / B / close, each read at its oldest slot.
    delayed_a: RingBuffer,
    delayed_b: RingBuffer,
    delayed_close: RingBuffer,
}

impl Ichimoku {
    pub fn new(
        tenkan: usize,
        kijun: usize,
        senkou_b: usize,
        displacement: usize,
    ) -> Result<Self, IndicatorError> {
        let tenkan = require_period("tenkan", tenkan, 1)?;
        let kijun = require_period("kijun", kijun, 1)?;
        let senkou_b = require_period("senkou_b", senkou_b, 1)?;
        Ok(Self {
            tenkan_period: tenkan,
            kijun_period: kijun,
            senkou_b_period: senkou_b,
            displacement,
            name: format!("ICHIMOKU({tenkan},{kijun},{senkou_b},{displacement})"),
            tenkan: Midpoint::new(tenkan),
            kijun: Midpoint::new(kijun),
            senkou_b: Midpoint::new(senkou_b),
            delayed_a: RingBuffer::new(displacement + 1)?,
            delayed_b: RingBuffer::new(displacement + 1)?,
            delayed_close: RingBuffer::new(displacement + 1)?,
        })
    }

    /// Standard parameters: 9, 26, 52, 26
    pub fn default_params() -> Result<Self, IndicatorError> {
        Self::new(9, 26, 52, 26)
    }
}

impl Indicator for Ichimoku {
    type Output = MultiValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn warmup_period(&self) -> usize {
        self.tenkan_period
            .max(self.kijun_period)
            .max(self.senkou_b_period)
            + self.displacement
    }

    fn update(&mut self, bar: &Bar) -> MultiValue {
        let tenkan = self.tenkan.update(bar);
        let kijun = self.kijun.update(bar);
        let senkou_b = self.senkou_b.update(bar);
        self.delayed_close.add(bar.close);

        // Raw senkou values start flowing once every window is full, so the
        // delayed buffers fill exactly `displacement` bars later.
        let (Some(tenkan), Some(kijun), Some(raw_b)) = (tenkan, kijun, senkou_b) else {
            return MultiValue::invalid(5);
        };
        self.delayed_a.add((tenkan + kijun) / 2.0);
        self.delayed_b.add(raw_b);
        if !self.delayed_a.is_full() {
            return MultiValue::invalid(5);
        }

        match (
            self.delayed_a.oldest(),
            self.delayed_b.oldest(),
            self.delayed_close.oldest(),
        ) {
            (Some(a), Some(b), Some(chikou)) => {
                MultiValue::from_array([tenkan, kijun, a, b, chikou])
            }
            _ => MultiValue::invalid(5),
        }
    }

    fn reset(&mut self) {
        self.tenkan.clear();
        self.kijun.clear();
        self.senkou_b.clear();
        self.delayed_a.clear();
        self.delayed_b.clear();
        self.delayed_close.clear();
    }
}
