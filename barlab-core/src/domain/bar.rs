//! Bar: the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timeframe::Timeframe;

/// OHLCV sample for one fixed time interval.
///
/// Bars are the source of truth for every indicator and are never mutated
/// after creation. `symbol` and `timeframe` are optional tags; indicators
/// never read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<Timeframe>,
}

impl Bar {
    pub fn new(
        time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
            symbol: None,
            timeframe: None,
        }
    }

    /// Synthetic bar carrying a single scalar: open = high = low = close = `value`.
    ///
    /// This is how composed indicators feed derived series (an EMA line, a true
    /// range, a DX value) into sub-indicators through the ordinary `update(bar)`
    /// contract. Contract: any indicator used as a sub-component fed degenerate
    /// bars must depend on `close` only, which here equals every price field.
    /// Volume is zero.
    pub fn degenerate(time: DateTime<Utc>, value: f64) -> Self {
        Self::new(time, value, value, value, value, 0.0)
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    /// (high + low) / 2
    pub fn hl2(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// True range against the previous close; high - low when there is none.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        let high_low = self.high - self.low;
        match prev_close {
            Some(pc) => high_low
                .max((self.high - pc).abs())
                .max((self.low - pc).abs()),
            None => high_low,
        }
    }

    /// Returns true if any price field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high >= open/close, low <= open/close.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.volume >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_bar() -> Bar {
        Bar::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            100.0,
            105.0,
            98.0,
            103.0,
            50_000.0,
        )
    }

    #[test]
    fn bar_is_sane() {
        assert!(sample_bar().is_sane());
    }

    #[test]
    fn bar_detects_void() {
        let mut bar = sample_bar();
        bar.open = f64::NAN;
        assert!(bar.is_void());
        assert!(!bar.is_sane());
    }

    #[test]
    fn bar_detects_insane_high_low() {
        let mut bar = sample_bar();
        bar.high = 97.0;
        assert!(!bar.is_sane());
    }

    #[test]
    fn degenerate_bar_collapses_prices() {
        let bar = Bar::degenerate(sample_bar().time, 42.5);
        assert_eq!(bar.open, 42.5);
        assert_eq!(bar.high, 42.5);
        assert_eq!(bar.low, 42.5);
        assert_eq!(bar.close, 42.5);
        assert_eq!(bar.volume, 0.0);
        assert_eq!(bar.range(), 0.0);
    }

    #[test]
    fn true_range_uses_previous_close() {
        let bar = sample_bar();
        assert_eq!(bar.true_range(None), 7.0);
        // Gap down from 110: |98 - 110| = 12
        assert_eq!(bar.true_range(Some(110.0)), 12.0);
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar()
            .with_symbol("SPY")
            .with_timeframe(Timeframe::D1);
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
