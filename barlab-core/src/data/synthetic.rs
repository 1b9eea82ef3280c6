//! Deterministic synthetic bars.
//!
//! A seeded random walk: the same `(config, seed)` always produces the same
//! series, bit for bit. Used by tests, benchmarks and demos.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Bar, Timeframe};

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub start: DateTime<Utc>,
    pub start_price: f64,
    /// Mean return per bar.
    pub drift: f64,
    /// Maximum absolute return per bar around the drift.
    pub volatility: f64,
}

impl SyntheticConfig {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, start: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            start,
            start_price: 100.0,
            drift: 0.0002,
            volatility: 0.02,
        }
    }
}

/// `count` bars spaced one timeframe apart, seeded by `seed`.
///
/// Bars are OHLC-consistent: low <= min(open, close) and
/// high >= max(open, close), with open equal to the previous close.
pub fn synthetic_bars(config: &SyntheticConfig, count: usize, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let step = config.timeframe.duration();
    let mut prev_close = config.start_price;
    let mut bars = Vec::with_capacity(count);
    let mut time = config.start;

    for _ in 0..count {
        let ret = config.drift + config.volatility * rng.gen_range(-1.0..=1.0);
        let open = prev_close;
        // Keep prices positive however large the volatility.
        let close = (open * (1.0 + ret)).max(0.01);
        let wick_up = config.volatility * rng.gen_range(0.0..=0.5);
        let wick_down = config.volatility * rng.gen_range(0.0..=0.5);
        let high = open.max(close) * (1.0 + wick_up);
        let low = (open.min(close) * (1.0 - wick_down)).max(0.005);
        let volume = rng.gen_range(1_000.0..100_000.0f64).round();

        bars.push(
            Bar::new(time, open, high, low, close, volume)
                .with_symbol(config.symbol.clone())
                .with_timeframe(config.timeframe),
        );
        prev_close = close;
        time += step;
    }
    bars
}
