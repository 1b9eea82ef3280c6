//! Parameter sweeps on rayon's pool.
//!
//! Each job builds its own runner, so jobs never share a provider, a ledger
//! or strategy state. Outcomes come back in job order.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::info;

use crate::config::BacktestConfig;
use crate::result::BacktestResult;
use crate::runner::{BacktestRunner, RunError};

/// Builds a fresh runner (strategies, sizer, risk, sink) for one job.
pub type RunnerFactory = dyn Fn() -> Result<BacktestRunner, RunError> + Send + Sync;

#[derive(Clone)]
pub struct SweepJob {
    pub label: String,
    pub config: BacktestConfig,
    factory: Arc<RunnerFactory>,
}

impl SweepJob {
    pub fn new<F>(label: impl Into<String>, config: BacktestConfig, factory: F) -> Self
    where
        F: Fn() -> Result<BacktestRunner, RunError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            config,
            factory: Arc::new(factory),
        }
    }

    pub fn run(&self) -> Result<BacktestResult, RunError> {
        let mut runner = (self.factory)()?;
        runner.run(&self.config)
    }
}

impl std::fmt::Debug for SweepJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepJob")
            .field("label", &self.label)
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Debug)]
pub struct SweepOutcome {
    pub label: String,
    pub result: Result<BacktestResult, RunError>,
}

/// Run every job in parallel.
pub fn run_sweep(jobs: &[SweepJob]) -> Vec<SweepOutcome> {
    info!(jobs = jobs.len(), "sweep started");
    let outcomes: Vec<SweepOutcome> = jobs
        .par_iter()
        .map(|job| SweepOutcome {
            label: job.label.clone(),
            result: job.run(),
        })
        .collect();
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(jobs = jobs.len(), failed, "sweep finished");
    outcomes
}

/// Successful outcome with the highest total return.
pub fn best_by_return(outcomes: &[SweepOutcome]) -> Option<(&str, &BacktestResult)> {
    outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok().map(|r| (o.label.as_str(), r)))
        .max_by(|a, b| a.1.metrics.total_return.total_cmp(&b.1.metrics.total_return))
}

/// `(fast, slow)` pairs for a moving-average crossover grid, skipping
/// combinations where fast >= slow.
pub fn crossover_grid(fast: &[usize], slow: &[usize]) -> Vec<(usize, usize)> {
    fast.iter()
        .flat_map(|&f| slow.iter().map(move |&s| (f, s)))
        .filter(|(f, s)| f < s)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use barlab_core::components::IndicatorError;

    #[test]
    fn grid_skips_invalid_pairs() {
        assert_eq!(
            crossover_grid(&[5, 10, 50], &[20, 50]),
            vec![(5, 20), (5, 50), (10, 20), (10, 50)]
        );
        assert!(crossover_grid(&[], &[20]).is_empty());
    }

    #[test]
    fn best_by_return_ignores_failures() {
        let ok = |label: &str, ret: f64| {
            let mut result = BacktestResult::empty(label.into(), 100.0);
            result.metrics.total_return = ret;
            SweepOutcome {
                label: label.into(),
                result: Ok(result),
            }
        };
        let outcomes = vec![
            ok("a", 0.1),
            SweepOutcome {
                label: "bad".into(),
                result: Err(RunError::Indicator(IndicatorError::invalid("period", "must be >= 1"))),
            },
            ok("b", 0.3),
            ok("c", -0.2),
        ];
        assert_eq!(best_by_return(&outcomes).map(|(l, _)| l), Some("b"));
        assert!(best_by_return(&[]).is_none());
    }
}
