//! Capital-based checks: cash on hand and drawdown.

use super::{RiskContext, RiskDecision, RiskPolicy};
use crate::components::error::{require_positive, PolicyConfigError};
use crate::domain::{OrderIntent, OrderSide};

/// Cash must cover the long exposure a buy adds.
///
/// Buys that only cover a short are free of this check; a buy that flips a
/// short to long must cover the long remainder.
#[derive(Debug, Clone, Default)]
pub struct BuyingPower;

impl RiskPolicy for BuyingPower {
    fn name(&self) -> &str {
        "BuyingPower"
    }

    fn check(&self, intent: &OrderIntent, ctx: &RiskContext<'_>) -> RiskDecision {
        if intent.side != OrderSide::Buy {
            return RiskDecision::Approved;
        }
        let current = ctx.state.signed_quantity(&intent.symbol);
        let added_long = ctx.post_fill_quantity(intent).max(0.0) - current.max(0.0);
        if added_long <= 0.0 {
            return RiskDecision::Approved;
        }
        let cost = added_long * ctx.price;
        if cost > ctx.state.cash {
            return RiskDecision::reject(
                self.name(),
                format!("cost {cost:.2} exceeds cash {:.2}", ctx.state.cash),
            );
        }
        RiskDecision::Approved
    }
}

/// Halts new exposure once equity has fallen more than `max_drawdown`
/// (a fraction, 0.2 = 20%) below initial cash. Reducing orders still pass.
#[derive(Debug, Clone)]
pub struct MaxDrawdownHalt {
    max_drawdown: f64,
}

impl MaxDrawdownHalt {
    pub fn new(max_drawdown: f64) -> Result<Self, PolicyConfigError> {
        let max_drawdown = require_positive("max_drawdown", max_drawdown)
            .map_err(PolicyConfigError::attribute("MaxDrawdownHalt"))?;
        if max_drawdown > 1.0 {
            return Err(PolicyConfigError::new(
                "MaxDrawdownHalt",
                "max_drawdown",
                format!("must be <= 1, got {max_drawdown}"),
            ));
        }
        Ok(Self { max_drawdown })
    }
}

impl RiskPolicy for MaxDrawdownHalt {
    fn name(&self) -> &str {
        "MaxDrawdownHalt"
    }

    fn check(&self, intent: &OrderIntent, ctx: &RiskContext<'_>) -> RiskDecision {
        let initial = ctx.state.initial_cash;
        if initial <= 0.0 || !ctx.increases_exposure(intent) {
            return RiskDecision::Approved;
        }
        let drawdown = (initial - ctx.state.equity) / initial;
        if drawdown > self.max_drawdown {
            return RiskDecision::reject(
                self.name(),
                format!(
                    "drawdown {:.2}% exceeds {:.2}%",
                    drawdown * 100.0,
                    self.max_drawdown * 100.0
                ),
            );
        }
        RiskDecision::Approved
    }
}
