//! Performance metrics: pure functions that compute run statistics.
//!
//! Every metric is a pure function: equity values and/or fills in, scalar out.
//! Equity series passed here start with the initial cash, so the first
//! simulated bar already contributes a return.

use serde::{Deserialize, Serialize};

use barlab_core::domain::{EquityPoint, Fill};

/// Bars per year used to annualize per-bar ratios.
pub const PERIODS_PER_YEAR: f64 = 252.0;

/// Aggregate performance metrics for a single backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    /// Largest peak-to-trough decline as a fraction, <= 0.
    pub max_drawdown: f64,
    /// Mean / standard deviation of per-bar returns, unannualized.
    pub sharpe: f64,
    /// `sharpe * sqrt(252)`.
    pub sharpe_annualized: f64,
    pub trade_count: usize,
    pub total_fees: f64,
}

impl PerformanceMetrics {
    pub fn compute(initial_cash: f64, equity_curve: &[EquityPoint], trades: &[Fill]) -> Self {
        let equity: Vec<f64> = std::iter::once(initial_cash)
            .chain(equity_curve.iter().map(|p| p.equity))
            .collect();
        let sharpe = sharpe_ratio(&equity);
        Self {
            total_return: total_return(&equity),
            max_drawdown: max_drawdown(&equity),
            sharpe,
            sharpe_annualized: sharpe * PERIODS_PER_YEAR.sqrt(),
            trade_count: trades.len(),
            total_fees: trades.iter().map(|f| f.fees).sum(),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(equity: &[f64]) -> f64 {
    match (equity.first(), equity.last()) {
        (Some(&initial), Some(&last)) if equity.len() >= 2 && initial > 0.0 => {
            (last - initial) / initial
        }
        _ => 0.0,
    }
}

/// Maximum drawdown as a negative fraction (0 when equity never falls).
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let Some(&first) = equity.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            max_dd = max_dd.min((eq - peak) / peak);
        }
    }
    max_dd
}

/// Per-bar Sharpe ratio with a zero risk-free rate.
///
/// Returns 0.0 with fewer than two returns or zero variance.
pub fn sharpe_ratio(equity: &[f64]) -> f64 {
    let returns = bar_returns(equity);
    if returns.len() < 2 {
        return 0.0;
    }
    let std = std_dev(&returns);
    if std < 1e-15 {
        return 0.0;
    }
    mean_f64(&returns) / std
}

pub fn bar_returns(equity: &[f64]) -> Vec<f64> {
    equity
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
