//! Bar sources.
//!
//! The runner asks a `BarSource` for each `(symbol, timeframe)` pair of the
//! config. Data is assumed to be materialized in memory already; a source
//! never blocks on I/O during a run.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use barlab_core::domain::{Bar, Timeframe};

pub trait BarSource: Send + Sync {
    /// Bars for one pair with `start <= time <= end`, oldest first.
    /// An unknown pair yields an empty vector.
    fn bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Bar>;
}

/// Pre-loaded series keyed by `(symbol, timeframe)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBarSource {
    series: BTreeMap<(String, Timeframe), Vec<Bar>>,
}

impl InMemoryBarSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bars` for the pair, tagging each with symbol and timeframe.
    pub fn insert(&mut self, symbol: impl Into<String>, timeframe: Timeframe, bars: Vec<Bar>) {
        let symbol = symbol.into();
        let bars = bars
            .into_iter()
            .map(|bar| bar.with_symbol(symbol.clone()).with_timeframe(timeframe))
            .collect();
        self.series.insert((symbol, timeframe), bars);
    }

    pub fn with_series(
        mut self,
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Self {
        self.insert(symbol, timeframe, bars);
        self
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl BarSource for InMemoryBarSource {
    fn bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Bar> {
        self.series
            .get(&(symbol.to_string(), timeframe))
            .map(|bars| {
                bars.iter()
                    .filter(|bar| bar.time >= start && bar.time <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barlab_core::data::{synthetic_bars, SyntheticConfig};
    use chrono::{Duration, TimeZone};

    #[test]
    fn filters_by_pair_and_window() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = synthetic_bars(&SyntheticConfig::new("X", Timeframe::D1, t0), 10, 1);
        let source = InMemoryBarSource::new().with_series("SPY", Timeframe::D1, bars);

        let window = source.bars("SPY", Timeframe::D1, t0 + Duration::days(2), t0 + Duration::days(4));
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].time, t0 + Duration::days(2));
        // Re-tagged on insert.
        assert_eq!(window[0].symbol.as_deref(), Some("SPY"));

        assert!(source.bars("SPY", Timeframe::H1, t0, t0 + Duration::days(30)).is_empty());
        assert!(source.bars("QQQ", Timeframe::D1, t0, t0 + Duration::days(30)).is_empty());
    }
}
