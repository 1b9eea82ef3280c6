//! Order intents emitted by strategies.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// +1 for buys, -1 for sells.
    pub fn sign(&self) -> f64 {
        match self {
            OrderSide::Buy => 1.0,
            OrderSide::Sell => -1.0,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => f.write_str("BUY"),
            OrderSide::Sell => f.write_str("SELL"),
        }
    }
}

/// What kind of order and its price parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrderType {
    /// Fill at the current bar's close.
    Market,
    /// Fill at close when close is at the limit price or better.
    Limit { limit_price: f64 },
    /// Fill at close once close has crossed the stop price.
    Stop { stop_price: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Cancel if not filled on the submitting bar.
    #[default]
    Day,
    /// Rest until filled.
    Gtc,
    /// Fill immediately or cancel.
    Ioc,
}

/// A strategy's request to trade, before sizing and risk checks.
///
/// `quantity` is `None` when the strategy leaves sizing to the configured
/// `PositionSizer`. `stop_loss` is a reference price used by stop-distance
/// sizing; it does not create a resting stop order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub quantity: Option<f64>,
    pub stop_loss: Option<f64>,
    pub tag: String,
}

impl OrderIntent {
    pub fn market(symbol: impl Into<String>, side: OrderSide) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Day,
            quantity: None,
            stop_loss: None,
            tag: String::new(),
        }
    }

    pub fn limit(symbol: impl Into<String>, side: OrderSide, limit_price: f64) -> Self {
        Self {
            order_type: OrderType::Limit { limit_price },
            ..Self::market(symbol, side)
        }
    }

    pub fn stop(symbol: impl Into<String>, side: OrderSide, stop_price: f64) -> Self {
        Self {
            order_type: OrderType::Stop { stop_price },
            ..Self::market(symbol, side)
        }
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_stop_loss(mut self, stop_loss: f64) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Quantity if sized and positive, otherwise 0.
    pub fn sized_quantity(&self) -> f64 {
        match self.quantity {
            Some(q) if q.is_finite() && q > 0.0 => q,
            _ => 0.0,
        }
    }

    /// Signed quantity: positive for buys, negative for sells.
    pub fn signed_quantity(&self) -> f64 {
        self.side.sign() * self.sized_quantity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let intent = OrderIntent::limit("SPY", OrderSide::Buy, 99.5)
            .with_quantity(10.0)
            .with_time_in_force(TimeInForce::Gtc)
            .with_tag("entry");
        assert_eq!(intent.order_type, OrderType::Limit { limit_price: 99.5 });
        assert_eq!(intent.time_in_force, TimeInForce::Gtc);
        assert_eq!(intent.sized_quantity(), 10.0);
        assert_eq!(intent.tag, "entry");
    }

    #[test]
    fn unsized_or_invalid_quantity_is_zero() {
        let intent = OrderIntent::market("SPY", OrderSide::Sell);
        assert_eq!(intent.sized_quantity(), 0.0);
        assert_eq!(intent.clone().with_quantity(f64::NAN).sized_quantity(), 0.0);
        assert_eq!(intent.with_quantity(5.0).signed_quantity(), -5.0);
    }

    #[test]
    fn order_intent_serialization_roundtrip() {
        let intent = OrderIntent::stop("AAPL", OrderSide::Sell, 150.0).with_stop_loss(155.0);
        let json = serde_json::to_string(&intent).unwrap();
        let deser: OrderIntent = serde_json::from_str(&json).unwrap();
        assert_eq!(intent, deser);
    }
}
