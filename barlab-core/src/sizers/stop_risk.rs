//! Stop-Distance Risk Sizer
//!
//! Risk a fixed fraction of equity between the entry price and the intent's
//! `stop_loss` reference price.

use crate::components::error::{require_positive, PolicyConfigError};
use crate::domain::OrderIntent;
use crate::sizers::{presized, with_quantity, PositionSizer, SizingContext};

/// # Formula
/// ```text
/// risk_dollars  = equity * risk_fraction
/// stop_distance = |entry - stop_loss|
/// quantity      = risk_dollars / stop_distance
/// ```
///
/// Intents without a `stop_loss`, or with the stop at the entry price, size
/// to 0.
#[derive(Debug, Clone)]
pub struct StopDistanceRisk {
    risk_fraction: f64,
}

impl StopDistanceRisk {
    pub fn new(risk_fraction: f64) -> Result<Self, PolicyConfigError> {
        Ok(Self {
            risk_fraction: require_positive("risk_fraction", risk_fraction)
                .map_err(PolicyConfigError::attribute("StopDistanceRisk"))?,
        })
    }
}

impl PositionSizer for StopDistanceRisk {
    fn name(&self) -> &str {
        "StopDistanceRisk"
    }

    fn size(&self, intent: &OrderIntent, ctx: &SizingContext<'_>) -> OrderIntent {
        if let Some(sized) = presized(intent) {
            return sized;
        }
        let equity = ctx.state.equity;
        let quantity = match (ctx.entry_price(intent), intent.stop_loss) {
            (Some(entry), Some(stop)) if equity > 0.0 => {
                let distance = (entry - stop).abs();
                if distance > 0.0 {
                    equity * self.risk_fraction / distance
                } else {
                    0.0
                }
            }
            _ => 0.0,
        };
        with_quantity(intent, quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderSide;
    use crate::sizers::test_support::Fixture;

    #[test]
    fn test_risk_over_stop_distance() {
        // 1% of 100_000 = 1_000 risked over a 4.0 stop distance → 250
        let fx = Fixture::new(100_000.0, &[100.0]);
        let sizer = StopDistanceRisk::new(0.01).unwrap();
        let intent = OrderIntent::market("SPY", OrderSide::Buy).with_stop_loss(96.0);
        assert_eq!(sizer.size(&intent, &fx.ctx()).quantity, Some(250.0));
    }

    #[test]
    fn test_short_stop_above_entry() {
        let fx = Fixture::new(100_000.0, &[100.0]);
        let sizer = StopDistanceRisk::new(0.01).unwrap();
        let intent = OrderIntent::market("SPY", OrderSide::Sell).with_stop_loss(105.0);
        assert_eq!(sizer.size(&intent, &fx.ctx()).quantity, Some(200.0));
    }

    #[test]
    fn test_missing_or_zero_stop_returns_zero() {
        let fx = Fixture::new(100_000.0, &[100.0]);
        let sizer = StopDistanceRisk::new(0.01).unwrap();
        let no_stop = OrderIntent::market("SPY", OrderSide::Buy);
        assert_eq!(sizer.size(&no_stop, &fx.ctx()).quantity, Some(0.0));
        let at_entry = OrderIntent::market("SPY", OrderSide::Buy).with_stop_loss(100.0);
        assert_eq!(sizer.size(&at_entry, &fx.ctx()).quantity, Some(0.0));
    }
}
