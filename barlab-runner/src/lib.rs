//! BarLab Runner: deterministic backtest orchestration.
//!
//! This crate builds on `barlab-core` to provide:
//! - Serializable run configuration with content-addressed run ids
//! - Bar sources and the per-bar backtest loop
//! - Performance metrics and CSV artifacts
//! - Parallel parameter sweeps

pub mod config;
pub mod export;
pub mod metrics;
pub mod result;
pub mod runner;
pub mod source;
pub mod sweep;

pub use config::{BacktestConfig, ConfigError, RunId};
pub use export::{write_equity_csv, write_trades_csv};
pub use metrics::PerformanceMetrics;
pub use result::{BacktestResult, Rejection};
pub use runner::{BacktestRunner, RunError};
pub use source::{BarSource, InMemoryBarSource};
pub use sweep::{run_sweep, SweepJob, SweepOutcome};
