//! Memoizing indicator provider.
//!
//! Several strategies on the same pair usually ask for the same indicators.
//! The provider caches one value (or one full series) per key so each is
//! computed once per bar. The runner owns it, clears it before every
//! `(pair, bar)` event, and hands a shared reference to every
//! `StrategyContext`.
//!
//! Storage is a pair of `DashMap`s, so lookups from several threads are safe.
//! Compute closures run with no shard lock held; if two callers race on the
//! same key, the first value inserted wins and both callers get it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use super::error::IndicatorError;
use super::output::{BandValue, IndicatorValue, MultiValue, SingleValue};
use super::spec::IndicatorSpec;
use crate::domain::{Bar, Timeframe};

#[derive(Debug, Default)]
pub struct IndicatorProvider {
    values: DashMap<String, IndicatorValue>,
    series: DashMap<String, Arc<[IndicatorValue]>>,
    computations: AtomicUsize,
}

impl IndicatorProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, running `compute` only on a miss.
    pub fn get_or_compute_value<F>(&self, key: &str, compute: F) -> IndicatorValue
    where
        F: FnOnce() -> IndicatorValue,
    {
        if let Some(hit) = self.values.get(key) {
            return *hit;
        }
        let value = compute();
        self.computations.fetch_add(1, Ordering::Relaxed);
        *self.values.entry(key.to_string()).or_insert(value)
    }

    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> SingleValue
    where
        F: FnOnce() -> SingleValue,
    {
        // The closure is shared between the cached path and the mismatch
        // fallback, and only one of them runs it.
        let mut compute = Some(compute);
        let mut run = || compute.take().map(|f| f()).unwrap_or_else(SingleValue::invalid);
        let value = self.get_or_compute_value(key, || run().into());
        match value.as_single() {
            Some(v) => v,
            None => {
                warn!(key, "cached value is not a single value; recomputing uncached");
                run()
            }
        }
    }

    pub fn get_or_compute_multi<F>(&self, key: &str, compute: F) -> MultiValue
    where
        F: FnOnce() -> MultiValue,
    {
        let mut compute = Some(compute);
        let mut run = || compute.take().map(|f| f()).unwrap_or_else(|| MultiValue::invalid(2));
        let value = self.get_or_compute_value(key, || run().into());
        match value.as_multi() {
            Some(v) => v,
            None => {
                warn!(key, "cached value is not a multi value; recomputing uncached");
                run()
            }
        }
    }

    pub fn get_or_compute_band<F>(&self, key: &str, compute: F) -> BandValue
    where
        F: FnOnce() -> BandValue,
    {
        let mut compute = Some(compute);
        let mut run = || compute.take().map(|f| f()).unwrap_or_else(BandValue::invalid);
        let value = self.get_or_compute_value(key, || run().into());
        match value.as_band() {
            Some(v) => v,
            None => {
                warn!(key, "cached value is not a band value; recomputing uncached");
                run()
            }
        }
    }

    /// Full-history series for `spec` on `timeframe`, replayed once per key.
    ///
    /// `bars` must be the pair's complete history up to the current bar.
    pub fn series(
        &self,
        spec: &IndicatorSpec,
        timeframe: Timeframe,
        bars: &[Bar],
    ) -> Result<Arc<[IndicatorValue]>, IndicatorError> {
        let key = spec.key(timeframe);
        if let Some(hit) = self.series.get(&key) {
            return Ok(Arc::clone(&hit));
        }
        let mut indicator = spec.build()?;
        let computed: Arc<[IndicatorValue]> = indicator.replay(bars).into();
        self.computations.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, bars = bars.len(), "indicator series computed");
        let entry = self.series.entry(key).or_insert(computed);
        Ok(Arc::clone(&entry))
    }

    /// Value at the latest bar, `None` when `bars` is empty.
    pub fn current(
        &self,
        spec: &IndicatorSpec,
        timeframe: Timeframe,
        bars: &[Bar],
    ) -> Result<Option<IndicatorValue>, IndicatorError> {
        Ok(self.series(spec, timeframe, bars)?.last().copied())
    }

    /// Value at the bar before the latest, `None` with fewer than two bars.
    pub fn previous(
        &self,
        spec: &IndicatorSpec,
        timeframe: Timeframe,
        bars: &[Bar],
    ) -> Result<Option<IndicatorValue>, IndicatorError> {
        let series = self.series(spec, timeframe, bars)?;
        Ok(series
            .len()
            .checked_sub(2)
            .and_then(|i| series.get(i).copied()))
    }

    pub fn clear(&self) {
        self.values.clear();
        self.series.clear();
    }

    /// Number of cached entries across values and series.
    pub fn len(&self) -> usize {
        self.values.len() + self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compute closures and series replays actually run since construction.
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }
}
