//! BarLab Core: streaming indicators, portfolio ledger, sizing, risk and execution.
//!
//! This crate contains everything a backtest needs except the run loop:
//! - Domain types (bars, timeframes, order intents, fills, positions, portfolio)
//! - 26 streaming indicators behind one `Indicator` trait
//! - A memoizing `IndicatorProvider` keyed by indicator spec and timeframe
//! - Strategies, position sizers and a short-circuiting risk chain
//! - A simulated execution adapter with slippage and commission
//! - Backtest events and sinks

pub mod components;
pub mod data;
pub mod domain;
pub mod events;
pub mod execution;
pub mod indicators;
pub mod risk;
pub mod sizers;
pub mod strategy;

pub use components::{
    BatchIndicator, DynIndicator, Indicator, IndicatorError, IndicatorProvider, IndicatorSpec,
    IndicatorValue, PolicyConfigError,
};
pub use domain::{Bar, Fill, OrderIntent, OrderSide, Portfolio, PortfolioState, Position, Timeframe};
