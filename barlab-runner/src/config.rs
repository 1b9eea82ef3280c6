//! Serializable backtest configuration.
//!
//! Configs are read from a `[backtest]` TOML table:
//!
//! ```toml
//! [backtest]
//! symbols = ["SPY", "QQQ"]
//! timeframes = ["1d"]
//! start = "2024-01-02T00:00:00Z"
//! end = "2024-12-31T00:00:00Z"
//! initial_cash = 100000.0
//! warmup_bars = 20
//!
//! [backtest.execution]
//! slippage_bps = 5.0
//! commission = { type = "per_share", rate = 0.005, minimum = 1.0 }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use barlab_core::domain::Timeframe;
use barlab_core::execution::ExecutionSettings;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("config lists no symbols")]
    NoSymbols,
    #[error("config lists no timeframes")]
    NoTimeframes,
    #[error("start {start} is after end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("initial cash must be positive and finite, got {0}")]
    InvalidCash(f64),
}

/// Everything needed to reproduce one backtest over a bar source.
///
/// Strategies, sizer and risk chain are attached to the runner, not the
/// config; the config pins the data window, capital and execution frictions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestConfig {
    pub symbols: Vec<String>,
    pub timeframes: Vec<Timeframe>,
    /// Inclusive.
    pub start: DateTime<Utc>,
    /// Inclusive.
    pub end: DateTime<Utc>,
    pub initial_cash: f64,
    /// Bars of each pair consumed before strategies are called.
    #[serde(default)]
    pub warmup_bars: usize,
    #[serde(default)]
    pub execution: ExecutionSettings,
}

#[derive(Deserialize)]
struct ConfigFile {
    backtest: BacktestConfig,
}

impl BacktestConfig {
    pub fn new(
        symbols: Vec<String>,
        timeframes: Vec<Timeframe>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        initial_cash: f64,
    ) -> Self {
        Self {
            symbols,
            timeframes,
            start,
            end,
            initial_cash,
            warmup_bars: 0,
            execution: ExecutionSettings::default(),
        }
    }

    pub fn with_warmup_bars(mut self, warmup_bars: usize) -> Self {
        self.warmup_bars = warmup_bars;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionSettings) -> Self {
        self.execution = execution;
        self
    }

    /// Parse the `[backtest]` table of a TOML document and validate it.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        file.backtest.validate()?;
        Ok(file.backtest)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        if self.timeframes.is_empty() {
            return Err(ConfigError::NoTimeframes);
        }
        if self.start > self.end {
            return Err(ConfigError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        if !(self.initial_cash.is_finite() && self.initial_cash > 0.0) {
            return Err(ConfigError::InvalidCash(self.initial_cash));
        }
        Ok(())
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> Result<RunId, ConfigError> {
        let json = serde_json::to_vec(self)?;
        Ok(blake3::hash(&json).to_hex().to_string())
    }
}
