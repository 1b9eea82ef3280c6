use crate::domain::ids::{FillId, OrderId};
use crate::domain::order::OrderSide;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fill record. Immutable once produced by an execution adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub id: FillId,
    pub order_id: OrderId,
    pub symbol: String,
    pub time: DateTime<Utc>,
    pub side: OrderSide,
    pub quantity: f64,
    pub price: f64,
    pub fees: f64,
}

impl Fill {
    /// price * quantity, before fees.
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }

    /// Signed cash impact: buys debit `notional + fees`, sells credit `notional - fees`.
    pub fn cash_delta(&self) -> f64 {
        match self.side {
            OrderSide::Buy => -(self.notional() + self.fees),
            OrderSide::Sell => self.notional() - self.fees,
        }
    }
}
