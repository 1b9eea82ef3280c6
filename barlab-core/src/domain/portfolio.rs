//! Portfolio ledger: cash, positions, and marks, mutated only by fills.
//!
//! Netting rules for `apply`:
//! - flat / unknown symbol: open at the fill's quantity and price
//! - same direction: accumulate, `avg = (q0*a0 + q*p) / (q0 + q)`
//! - opposite direction: close `min(q0, q)` at the position's average price,
//!   realize `closed * (p - a0)` for longs or `closed * (a0 - p)` for shorts,
//!   minus the fill's fees; any remainder opens the opposite side at `p`
//!
//! Cash: buys debit `p*q + fees`, sells credit `p*q - fees`.
//!
//! Positions and marks live in `BTreeMap`s so every aggregate sums in symbol
//! order and is bit-for-bit reproducible.

use super::fill::Fill;
use super::order::OrderSide;
use super::position::{Position, PositionSide};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quantities at or below this are treated as fully closed.
const QTY_EPSILON: f64 = 1e-9;

/// Immutable snapshot of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub initial_cash: f64,
    pub cash: f64,
    pub equity: f64,
    pub realized_pnl: f64,
    pub total_fees: f64,
    /// Open (non-flat) positions only.
    pub positions: BTreeMap<String, Position>,
}

impl PortfolioState {
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    /// Signed quantity held in `symbol`; 0 when flat.
    pub fn signed_quantity(&self, symbol: &str) -> f64 {
        self.position(symbol).map_or(0.0, Position::signed_quantity)
    }

    pub fn open_positions(&self) -> usize {
        self.positions.len()
    }

    pub fn is_flat(&self, symbol: &str) -> bool {
        self.position(symbol).is_none()
    }
}

/// Aggregate portfolio ledger.
///
/// Tracks cash, positions (including flat ones, so per-symbol realized P&L
/// survives a round trip), the latest mark per symbol, and accumulated fees.
#[derive(Debug, Clone)]
pub struct Portfolio {
    initial_cash: f64,
    cash: f64,
    realized_pnl: f64,
    total_fees: f64,
    positions: BTreeMap<String, Position>,
    marks: BTreeMap<String, f64>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            initial_cash,
            cash: initial_cash,
            realized_pnl: 0.0,
            total_fees: 0.0,
            positions: BTreeMap::new(),
            marks: BTreeMap::new(),
        }
    }

    /// Clear every position, mark, and total, and restart from `initial_cash`.
    pub fn reset(&mut self, initial_cash: f64) {
        *self = Self::new(initial_cash);
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    pub fn total_fees(&self) -> f64 {
        self.total_fees
    }

    /// Position for `symbol`, flat or not, if the symbol was ever traded.
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn mark_price(&self, symbol: &str) -> Option<f64> {
        self.marks.get(symbol).copied()
    }

    /// Record the latest price for `symbol`. Non-finite prices are ignored.
    pub fn mark(&mut self, symbol: &str, price: f64) {
        if !price.is_finite() {
            return;
        }
        match self.marks.get_mut(symbol) {
            Some(existing) => *existing = price,
            None => {
                self.marks.insert(symbol.to_string(), price);
            }
        }
    }

    /// Apply a fill. This is the only way positions change.
    ///
    /// Returns the P&L realized by this fill (net of its fees when it closes
    /// exposure; 0 when it only opens or adds).
    pub fn apply(&mut self, fill: &Fill) -> f64 {
        self.cash += fill.cash_delta();
        self.total_fees += fill.fees;

        let position = self
            .positions
            .entry(fill.symbol.clone())
            .or_insert_with(|| Position::flat(fill.symbol.clone()));

        let realized = net_fill(position, fill);
        self.realized_pnl += realized;
        realized
    }

    /// Equity = cash + Σ signed quantity × mark (average price when unmarked).
    pub fn equity(&self) -> f64 {
        self.cash
            + self
                .positions
                .values()
                .filter(|p| !p.is_flat())
                .map(|p| p.market_value(self.price_for(p)))
                .sum::<f64>()
    }

    pub fn state(&self) -> PortfolioState {
        PortfolioState {
            initial_cash: self.initial_cash,
            cash: self.cash,
            equity: self.equity(),
            realized_pnl: self.realized_pnl,
            total_fees: self.total_fees,
            positions: self
                .positions
                .iter()
                .filter(|(_, p)| !p.is_flat())
                .map(|(s, p)| (s.clone(), p.clone()))
                .collect(),
        }
    }

    fn price_for(&self, position: &Position) -> f64 {
        self.marks
            .get(&position.symbol)
            .copied()
            .unwrap_or(position.avg_price)
    }
}

/// Merge `fill` into `position`, returning realized P&L (net of fees when closing).
///
/// On a flip the whole fill's fees are charged to the closed portion's
/// realized P&L; the remainder opens at the fill price with no fee basis.
/// Fees on opening or adding fills reduce cash only.
fn net_fill(position: &mut Position, fill: &Fill) -> f64 {
    let fill_side = match fill.side {
        OrderSide::Buy => PositionSide::Long,
        OrderSide::Sell => PositionSide::Short,
    };

    if position.is_flat() {
        open(position, fill_side, fill.quantity, fill.price);
        return 0.0;
    }

    if position.side == fill_side {
        accumulate(position, fill.quantity, fill.price);
        return 0.0;
    }

    let closed = position.quantity.min(fill.quantity);
    let gross = match position.side {
        PositionSide::Long => closed * (fill.price - position.avg_price),
        PositionSide::Short => closed * (position.avg_price - fill.price),
        PositionSide::Flat => 0.0,
    };
    let realized = gross - fill.fees;
    position.realized_pnl += realized;
    position.quantity -= closed;

    let remainder = fill.quantity - closed;
    if remainder > QTY_EPSILON {
        open(position, fill_side, remainder, fill.price);
    } else if position.quantity <= QTY_EPSILON {
        position.side = PositionSide::Flat;
        position.quantity = 0.0;
        position.avg_price = 0.0;
    }
    realized
}

fn open(position: &mut Position, side: PositionSide, quantity: f64, price: f64) {
    position.side = side;
    position.quantity = quantity;
    position.avg_price = price;
}

fn accumulate(position: &mut Position, quantity: f64, price: f64) {
    let total = position.quantity + quantity;
    position.avg_price = (position.quantity * position.avg_price + quantity * price) / total;
    position.quantity = total;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{FillId, OrderId};
    use chrono::{TimeZone, Utc};

    fn fill(side: OrderSide, qty: f64, price: f64, fees: f64) -> Fill {
        Fill {
            id: FillId(1),
            order_id: OrderId(1),
            symbol: "SPY".into(),
            time: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            side,
            quantity: qty,
            price,
            fees,
        }
    }

    #[test]
    fn flip_charges_all_fees_to_the_closed_portion() {
        let mut p = Portfolio::new(100_000.0);
        p.apply(&fill(OrderSide::Buy, 10.0, 100.0, 0.0));
        let realized = p.apply(&fill(OrderSide::Sell, 15.0, 110.0, 2.0));
        assert_eq!(realized, 98.0);
        let pos = p.position("SPY").unwrap();
        assert_eq!(pos.side, PositionSide::Short);
        assert_eq!(pos.quantity, 5.0);
        assert_eq!(pos.avg_price, 110.0);
        assert_eq!(p.cash(), 100_000.0 - 1_000.0 + 1_650.0 - 2.0);
        assert_eq!(p.total_fees(), 2.0);
    }

    #[test]
    fn equity_with_no_positions() {
        let portfolio = Portfolio::new(100_000.0);
        assert_eq!(portfolio.equity(), 100_000.0);
        assert!(portfolio.state().positions.is_empty());
    }

    #[test]
    fn buy_opens_long_and_debits_cash() {
        let mut p = Portfolio::new(100_000.0);
        p.apply(&fill(OrderSide::Buy, 50.0, 100.0, 0.0));
        assert_eq!(p.cash(), 95_000.0);
        let pos = p.position("SPY").unwrap();
        assert_eq!(pos.side, PositionSide::Long);
        assert_eq!(pos.quantity, 50.0);
        assert_eq!(pos.avg_price, 100.0);
    }

    #[test]
    fn same_direction_accumulates_weighted_average() {
        let mut p = Portfolio::new(100_000.0);
        p.apply(&fill(OrderSide::Buy, 100.0, 10.0, 0.0));
        p.apply(&fill(OrderSide::Buy, 100.0, 12.0, 0.0));
        let pos = p.position("SPY").unwrap();
        assert_eq!(pos.quantity, 200.0);
        assert!((pos.avg_price - 11.0).abs() < 1e-12);
    }

    #[test]
    fn netting_partial_close_then_flip() {
        let mut p = Portfolio::new(10_000.0);

        p.apply(&fill(OrderSide::Buy, 100.0, 10.0, 0.0));
        assert_eq!(p.cash(), 9_000.0);

        let realized = p.apply(&fill(OrderSide::Sell, 40.0, 12.0, 0.0));
        assert_eq!(realized, 80.0);
        assert_eq!(p.cash(), 9_480.0);
        let pos = p.position("SPY").unwrap();
        assert_eq!(pos.side, PositionSide::Long);
        assert_eq!(pos.quantity, 60.0);
        assert_eq!(pos.avg_price, 10.0);

        let realized = p.apply(&fill(OrderSide::Sell, 100.0, 9.0, 0.0));
        assert_eq!(realized, -60.0);
        let pos = p.position("SPY").unwrap();
        assert_eq!(pos.side, PositionSide::Short);
        assert_eq!(pos.quantity, 40.0);
        assert_eq!(pos.avg_price, 9.0);
        assert_eq!(pos.realized_pnl, 20.0);
        assert_eq!(p.realized_pnl(), 20.0);
    }

    #[test]
    fn exact_close_goes_flat() {
        let mut p = Portfolio::new(100_000.0);
        p.apply(&fill(OrderSide::Sell, 50.0, 100.0, 0.0));
        p.apply(&fill(OrderSide::Buy, 50.0, 90.0, 0.0));
        let pos = p.position("SPY").unwrap();
        assert_eq!(pos.side, PositionSide::Flat);
        assert_eq!(pos.quantity, 0.0);
        assert_eq!(pos.realized_pnl, 500.0);
        assert_eq!(p.cash(), 100_500.0);
        assert!(p.state().is_flat("SPY"));
    }

    #[test]
    fn fees_debit_cash_and_reduce_realized_on_close() {
        let mut p = Portfolio::new(10_000.0);
        p.apply(&fill(OrderSide::Buy, 10.0, 100.0, 2.0));
        assert_eq!(p.cash(), 10_000.0 - 1_002.0);
        let realized = p.apply(&fill(OrderSide::Sell, 10.0, 110.0, 3.0));
        assert_eq!(realized, 97.0);
        assert_eq!(p.cash(), 10_000.0 - 1_002.0 + 1_097.0);
        assert_eq!(p.total_fees(), 5.0);
    }

    #[test]
    fn equity_uses_mark_or_average() {
        let mut p = Portfolio::new(10_000.0);
        p.apply(&fill(OrderSide::Buy, 100.0, 10.0, 0.0));
        // Unmarked: valued at average price.
        assert_eq!(p.equity(), 10_000.0);
        p.mark("SPY", 12.0);
        assert_eq!(p.equity(), 10_200.0);
        assert_eq!(p.state().equity, 10_200.0);
    }

    #[test]
    fn short_equity_moves_inversely() {
        let mut p = Portfolio::new(10_000.0);
        p.apply(&fill(OrderSide::Sell, 100.0, 10.0, 0.0));
        assert_eq!(p.cash(), 11_000.0);
        p.mark("SPY", 8.0);
        assert_eq!(p.equity(), 10_200.0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut p = Portfolio::new(10_000.0);
        p.apply(&fill(OrderSide::Buy, 100.0, 10.0, 1.0));
        p.mark("SPY", 11.0);
        p.reset(5_000.0);
        assert_eq!(p.cash(), 5_000.0);
        assert_eq!(p.initial_cash(), 5_000.0);
        assert_eq!(p.total_fees(), 0.0);
        assert!(p.position("SPY").is_none());
        assert!(p.mark_price("SPY").is_none());
    }
}
