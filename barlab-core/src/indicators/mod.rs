//! Concrete indicator implementations.
//!
//! All 26 indicators implement the streaming `Indicator` trait from
//! `components::indicator`. Each keeps O(window) state and validates its
//! parameters in `new`, returning `IndicatorError::InvalidParameter` on bad
//! configuration.
//!
//! Composed indicators (MACD, DEMA, TEMA, TRIX, Keltner, Stochastic %D, ATR,
//! RSI, ADX) feed derived scalars into sub-indicators as degenerate bars
//! (`Bar::degenerate`). Every indicator used that way reads only `close`.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod buffer;
pub mod choppiness;
pub mod dema;
pub mod donchian;
pub mod ema;
pub mod ichimoku;
pub mod keltner;
pub mod linreg;
pub mod macd;
pub mod momentum;
pub mod parabolic_sar;
pub mod rma;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod stochastic;
pub mod supertrend;
pub mod tema;
pub mod trix;
pub mod vwma;
pub mod williams_r;
pub mod wma;
pub mod zigzag;

pub use adx::Adx;
pub use atr::Atr;
pub use bollinger::Bollinger;
pub use buffer::RingBuffer;
pub use choppiness::ChoppinessIndex;
pub use dema::Dema;
pub use donchian::Donchian;
pub use ema::Ema;
pub use ichimoku::Ichimoku;
pub use keltner::Keltner;
pub use linreg::LinRegChannel;
pub use macd::Macd;
pub use momentum::Momentum;
pub use parabolic_sar::ParabolicSar;
pub use rma::Rma;
pub use roc::Roc;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stddev::StdDev;
pub use stochastic::Stochastic;
pub use supertrend::SuperTrend;
pub use tema::Tema;
pub use trix::Trix;
pub use vwma::Vwma;
pub use williams_r::WilliamsR;
pub use wma::Wma;
pub use zigzag::ZigZag;

#[cfg(test)]
fn test_time(i: usize) -> chrono::DateTime<chrono::Utc> {
    use chrono::TimeZone;
    chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap() + chrono::Duration::days(i as i64)
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar::new(test_time(i), open, high, low, close, 1000.0)
        })
        .collect()
}

/// Create bars from explicit (open, high, low, close) tuples, volume = 1000.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| {
            Bar::new(test_time(i), open, high, low, close, 1000.0)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
