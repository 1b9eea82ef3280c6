//! Size and concentration limits.

use super::{RiskContext, RiskDecision, RiskPolicy};
use crate::components::error::{require_positive, PolicyConfigError};
use crate::domain::OrderIntent;

/// Rejects orders larger than `max` units.
#[derive(Debug, Clone)]
pub struct MaxOrderQuantity {
    max: f64,
}

impl MaxOrderQuantity {
    pub fn new(max: f64) -> Result<Self, PolicyConfigError> {
        Ok(Self {
            max: require_positive("max", max)
                .map_err(PolicyConfigError::attribute("MaxOrderQuantity"))?,
        })
    }
}

impl RiskPolicy for MaxOrderQuantity {
    fn name(&self) -> &str {
        "MaxOrderQuantity"
    }

    fn check(&self, intent: &OrderIntent, _ctx: &RiskContext<'_>) -> RiskDecision {
        let qty = intent.sized_quantity();
        if qty > self.max {
            return RiskDecision::reject(
                self.name(),
                format!("order size {qty} exceeds limit {}", self.max),
            );
        }
        RiskDecision::Approved
    }
}

/// Caps the notional of the position the order would leave behind.
/// Orders that shrink the position are always allowed.
#[derive(Debug, Clone)]
pub struct MaxPositionNotional {
    max: f64,
}

impl MaxPositionNotional {
    pub fn new(max: f64) -> Result<Self, PolicyConfigError> {
        Ok(Self {
            max: require_positive("max", max)
                .map_err(PolicyConfigError::attribute("MaxPositionNotional"))?,
        })
    }
}

impl RiskPolicy for MaxPositionNotional {
    fn name(&self) -> &str {
        "MaxPositionNotional"
    }

    fn check(&self, intent: &OrderIntent, ctx: &RiskContext<'_>) -> RiskDecision {
        if !ctx.increases_exposure(intent) {
            return RiskDecision::Approved;
        }
        let notional = ctx.post_fill_quantity(intent).abs() * ctx.price;
        if notional > self.max {
            return RiskDecision::reject(
                self.name(),
                format!(
                    "position notional {notional:.2} in {} would exceed limit {:.2}",
                    intent.symbol, self.max
                ),
            );
        }
        RiskDecision::Approved
    }
}

/// Limits how many symbols may hold a position at once.
#[derive(Debug, Clone)]
pub struct MaxOpenPositions {
    max: usize,
}

impl MaxOpenPositions {
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl RiskPolicy for MaxOpenPositions {
    fn name(&self) -> &str {
        "MaxOpenPositions"
    }

    fn check(&self, intent: &OrderIntent, ctx: &RiskContext<'_>) -> RiskDecision {
        let opens_new = ctx.state.is_flat(&intent.symbol) && intent.sized_quantity() > 0.0;
        let open = ctx.state.open_positions();
        if opens_new && open >= self.max {
            return RiskDecision::reject(
                self.name(),
                format!("{open} positions open, limit {}", self.max),
            );
        }
        RiskDecision::Approved
    }
}
