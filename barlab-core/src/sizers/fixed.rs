//! Fixed Quantity Sizer
//!
//! Simplest sizer: trade the same number of units every time.

use crate::components::error::{require_positive, PolicyConfigError};
use crate::domain::OrderIntent;
use crate::sizers::{presized, with_quantity, PositionSizer, SizingContext};

#[derive(Debug, Clone)]
pub struct FixedQuantity {
    quantity: f64,
}

impl FixedQuantity {
    pub fn new(quantity: f64) -> Result<Self, PolicyConfigError> {
        Ok(Self {
            quantity: require_positive("quantity", quantity)
                .map_err(PolicyConfigError::attribute("FixedQuantity"))?,
        })
    }
}

impl PositionSizer for FixedQuantity {
    fn name(&self) -> &str {
        "FixedQuantity"
    }

    fn size(&self, intent: &OrderIntent, _ctx: &SizingContext<'_>) -> OrderIntent {
        presized(intent).unwrap_or_else(|| with_quantity(intent, self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderSide;
    use crate::sizers::test_support::Fixture;

    #[test]
    fn test_fixed_quantity() {
        let fx = Fixture::new(10_000.0, &[100.0]);
        let sizer = FixedQuantity::new(25.0).unwrap();
        let sized = sizer.size(&OrderIntent::market("SPY", OrderSide::Buy), &fx.ctx());
        assert_eq!(sized.quantity, Some(25.0));
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let err = FixedQuantity::new(0.0).unwrap_err();
        assert_eq!(err.component, "FixedQuantity");
        assert_eq!(err.name, "quantity");
        assert!(FixedQuantity::new(f64::NAN).is_err());
    }
}
