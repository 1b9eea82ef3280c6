//! Pre-trade risk checks.
//!
//! A `RiskChain` runs sized order intents through an ordered list of
//! `RiskPolicy`s. The first rejection wins and later policies are not
//! consulted. A rejection is a normal outcome, not an error.

pub mod capital;
pub mod chain;
pub mod limits;

pub use capital::{BuyingPower, MaxDrawdownHalt};
pub use chain::RiskChain;
pub use limits::{MaxOpenPositions, MaxOrderQuantity, MaxPositionNotional};

use serde::{Deserialize, Serialize};

use crate::domain::{OrderIntent, PortfolioState};

/// Outcome of a risk check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RiskDecision {
    Approved,
    Rejected { policy: String, reason: String },
}

impl RiskDecision {
    pub fn reject(policy: &str, reason: impl Into<String>) -> Self {
        RiskDecision::Rejected {
            policy: policy.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, RiskDecision::Approved)
    }
}

/// Ledger snapshot plus the price the order is expected to trade at.
#[derive(Debug, Clone, Copy)]
pub struct RiskContext<'a> {
    pub state: &'a PortfolioState,
    pub price: f64,
}

impl RiskContext<'_> {
    /// Signed position in the intent's symbol if the order filled in full.
    pub fn post_fill_quantity(&self, intent: &OrderIntent) -> f64 {
        self.state.signed_quantity(&intent.symbol) + intent.signed_quantity()
    }

    /// True when the fill would leave a larger absolute position.
    pub fn increases_exposure(&self, intent: &OrderIntent) -> bool {
        self.post_fill_quantity(intent).abs() > self.state.signed_quantity(&intent.symbol).abs()
    }
}

/// One pre-trade rule.
pub trait RiskPolicy: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self, intent: &OrderIntent, ctx: &RiskContext<'_>) -> RiskDecision;
}
