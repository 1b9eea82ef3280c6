//! Percent-of-Equity Sizer
//!
//! Commit a fixed fraction of current equity, floored to whole units.

use crate::components::error::{require_positive, PolicyConfigError};
use crate::domain::OrderIntent;
use crate::sizers::{presized, with_quantity, PositionSizer, SizingContext};

/// quantity = floor(equity * fraction / entry_price)
#[derive(Debug, Clone)]
pub struct PercentOfEquity {
    /// Fraction of equity per order (e.g., 0.1 = 10%)
    fraction: f64,
}

impl PercentOfEquity {
    pub fn new(fraction: f64) -> Result<Self, PolicyConfigError> {
        Ok(Self {
            fraction: require_positive("fraction", fraction)
                .map_err(PolicyConfigError::attribute("PercentOfEquity"))?,
        })
    }
}

impl PositionSizer for PercentOfEquity {
    fn name(&self) -> &str {
        "PercentOfEquity"
    }

    fn size(&self, intent: &OrderIntent, ctx: &SizingContext<'_>) -> OrderIntent {
        if let Some(sized) = presized(intent) {
            return sized;
        }
        let equity = ctx.state.equity;
        let quantity = match ctx.entry_price(intent) {
            Some(price) if equity > 0.0 => (equity * self.fraction / price).floor(),
            _ => 0.0,
        };
        with_quantity(intent, quantity)
    }
}
