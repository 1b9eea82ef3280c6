//! Execution: turns approved order intents into fills.
//!
//! Key concepts:
//! - **ExecutionAdapter**: accepts sized, approved orders and reports fills
//! - **FillReceiver**: where fills go; the runner routes them into the ledger
//! - **Time in force**: GTC orders rest until marketable, Day and IOC orders
//!   that cannot fill on the submitting bar are cancelled
//! - **Costs**: directional slippage plus a commission model

pub mod cost;
pub mod simulated;

pub use cost::{CommissionModel, ExecutionSettings};
pub use simulated::SimulatedExecution;

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, Fill, OrderId, OrderIntent};

/// Sink for fills produced by an execution adapter.
pub trait FillReceiver {
    fn on_fill(&mut self, fill: Fill);
}

impl FillReceiver for Vec<Fill> {
    fn on_fill(&mut self, fill: Fill) {
        self.push(fill);
    }
}

/// What happened to a submitted order on its submitting bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Filled,
    Resting,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderAck {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// Broker seam.
///
/// # Responsibilities
/// - Decide whether and at what price an order fills against a bar
/// - Keep resting orders and re-check them on later bars of their symbol
///
/// # Non-Responsibilities
/// - Sizing and risk checks happen before `submit`
/// - Ledger updates happen in the `FillReceiver`
pub trait ExecutionAdapter: Send {
    fn name(&self) -> &str;

    /// Submit an order against the current `bar` of `intent.symbol`.
    fn submit(&mut self, intent: &OrderIntent, bar: &Bar, fills: &mut dyn FillReceiver)
        -> OrderAck;

    /// Re-evaluate resting orders for `symbol` against a new bar.
    fn on_bar(&mut self, symbol: &str, bar: &Bar, fills: &mut dyn FillReceiver);

    fn open_orders(&self) -> usize;

    /// Drop resting orders and restart id sequences.
    fn reset(&mut self);
}
