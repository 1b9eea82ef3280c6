//! Backtest result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use barlab_core::domain::{EquityPoint, Fill, OrderIntent};
use barlab_core::strategy::Signal;

use crate::config::RunId;
use crate::metrics::PerformanceMetrics;

/// An order the risk chain refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub time: DateTime<Utc>,
    /// The sized intent as it was presented to the chain.
    pub intent: OrderIntent,
    pub policy: String,
    pub reason: String,
}

/// Complete result of a backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Hash of the run configuration
    pub run_id: RunId,
    pub initial_cash: f64,
    pub final_equity: f64,
    /// One point per timestamp with at least one post-warmup bar.
    pub equity_curve: Vec<EquityPoint>,
    /// Every fill, in execution order.
    pub trades: Vec<Fill>,
    pub rejections: Vec<Rejection>,
    pub signals: Vec<Signal>,
    /// Bars consumed across all pairs, warmup included.
    pub bars_processed: usize,
    pub metrics: PerformanceMetrics,
}

impl BacktestResult {
    /// Result of a run with nothing to simulate.
    pub fn empty(run_id: RunId, initial_cash: f64) -> Self {
        Self {
            run_id,
            initial_cash,
            final_equity: initial_cash,
            equity_curve: Vec::new(),
            trades: Vec::new(),
            rejections: Vec::new(),
            signals: Vec::new(),
            bars_processed: 0,
            metrics: PerformanceMetrics::default(),
        }
    }

    pub fn total_return(&self) -> f64 {
        self.metrics.total_return
    }

    /// Equity values without timestamps.
    pub fn equity_values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|p| p.equity).collect()
    }
}
