//! Streaming indicator contract.
//!
//! Indicators are incremental state machines: each `update` consumes one bar
//! and returns the value as of that bar, using O(window) memory. Bars must be
//! fed in strictly increasing time order; `reset` returns the indicator to
//! its freshly constructed state.
//!
//! # Look-ahead contamination guard
//! The value returned for bar t depends only on bars up to and including t.
//! Streaming makes this structural: future bars have not been seen yet.

use super::output::{IndicatorOutput, IndicatorValue};
use crate::domain::Bar;

/// Trait for streaming indicators.
pub trait Indicator: Send + Sync {
    type Output: IndicatorOutput;

    /// Canonical display name, e.g. "RSI(14)".
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces a valid result.
    fn warmup_period(&self) -> usize;

    /// Consume one bar and return the value as of that bar.
    fn update(&mut self, bar: &Bar) -> Self::Output;

    /// Return to the freshly constructed state.
    fn reset(&mut self);
}

/// Batch computation over a full bar series.
///
/// Implemented for every `Indicator` by the blanket impl below and not meant
/// to be implemented by hand, so `compute` is always exactly `reset` followed
/// by `update` per bar.
pub trait BatchIndicator: Indicator {
    fn compute(&mut self, bars: &[Bar]) -> Vec<Self::Output> {
        self.reset();
        bars.iter().map(|bar| self.update(bar)).collect()
    }
}

impl<T: Indicator + ?Sized> BatchIndicator for T {}

/// Object-safe projection of `Indicator`, so heterogeneous indicators can be
/// held as `Box<dyn DynIndicator>`.
///
/// Method names differ from `Indicator`'s so that both traits can be in scope
/// at once without ambiguous calls on concrete types.
pub trait DynIndicator: Send + Sync {
    fn label(&self) -> &str;

    fn warmup(&self) -> usize;

    fn update_value(&mut self, bar: &Bar) -> IndicatorValue;

    fn reset_state(&mut self);

    /// `reset_state` then `update_value` per bar.
    fn replay(&mut self, bars: &[Bar]) -> Vec<IndicatorValue> {
        self.reset_state();
        bars.iter().map(|bar| self.update_value(bar)).collect()
    }
}

impl<T: Indicator> DynIndicator for T {
    fn label(&self) -> &str {
        Indicator::name(self)
    }

    fn warmup(&self) -> usize {
        Indicator::warmup_period(self)
    }

    fn update_value(&mut self, bar: &Bar) -> IndicatorValue {
        Indicator::update(self, bar).into_value()
    }

    fn reset_state(&mut self) {
        Indicator::reset(self)
    }
}
