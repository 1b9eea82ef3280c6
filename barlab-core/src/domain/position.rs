use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionSide {
    #[default]
    Flat,
    Long,
    Short,
}

impl PositionSide {
    /// +1 long, -1 short, 0 flat.
    pub fn sign(&self) -> f64 {
        match self {
            PositionSide::Long => 1.0,
            PositionSide::Short => -1.0,
            PositionSide::Flat => 0.0,
        }
    }
}

/// Position tracking. `quantity` is always >= 0; direction lives in `side`.
///
/// `avg_price` is meaningful only while `quantity > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: PositionSide,
    pub quantity: f64,
    pub avg_price: f64,
    pub realized_pnl: f64,
}

impl Position {
    pub fn flat(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            side: PositionSide::Flat,
            quantity: 0.0,
            avg_price: 0.0,
            realized_pnl: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.side == PositionSide::Flat || self.quantity <= 0.0
    }

    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long && self.quantity > 0.0
    }

    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short && self.quantity > 0.0
    }

    /// Quantity with direction: positive long, negative short.
    pub fn signed_quantity(&self) -> f64 {
        self.side.sign() * self.quantity
    }

    /// Signed market value at `price`.
    pub fn market_value(&self, price: f64) -> f64 {
        self.signed_quantity() * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.signed_quantity() * (price - self.avg_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long(qty: f64, avg: f64) -> Position {
        Position {
            side: PositionSide::Long,
            quantity: qty,
            avg_price: avg,
            ..Position::flat("SPY")
        }
    }

    #[test]
    fn long_unrealized_pnl() {
        let pos = long(100.0, 50.0);
        assert_eq!(pos.unrealized_pnl(55.0), 500.0);
        assert_eq!(pos.market_value(55.0), 5500.0);
    }

    #[test]
    fn short_unrealized_pnl() {
        let pos = Position {
            side: PositionSide::Short,
            ..long(100.0, 50.0)
        };
        assert_eq!(pos.unrealized_pnl(45.0), 500.0);
        assert_eq!(pos.market_value(45.0), -4500.0);
        assert!(pos.is_short());
    }

    #[test]
    fn flat_position_has_no_exposure() {
        let pos = Position::flat("SPY");
        assert!(pos.is_flat());
        assert_eq!(pos.signed_quantity(), 0.0);
        assert_eq!(pos.unrealized_pnl(123.0), 0.0);
    }
}
