//! Simulated broker filling at the bar close.
//!
//! - Market: fills at close, plus slippage
//! - Limit: fills at close when close is at the limit or better (no slippage)
//! - Stop: fills at close, plus slippage, once close has reached the stop
//!
//! An order that is not marketable on its submitting bar rests if GTC and is
//! cancelled otherwise. Resting orders are checked on every later bar of
//! their symbol, in submission order.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{ExecutionAdapter, ExecutionSettings, FillReceiver, OrderAck, OrderStatus};
use crate::domain::{Bar, Fill, IdSequence, OrderId, OrderIntent, OrderSide, OrderType, TimeInForce};

#[derive(Debug, Clone)]
struct RestingOrder {
    id: OrderId,
    intent: OrderIntent,
    submitted: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedExecution {
    settings: ExecutionSettings,
    order_ids: IdSequence,
    fill_ids: IdSequence,
    resting: Vec<RestingOrder>,
}

impl SimulatedExecution {
    pub fn new(settings: ExecutionSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &ExecutionSettings {
        &self.settings
    }

    /// Close is at the limit or better / has crossed the stop.
    fn is_marketable(intent: &OrderIntent, close: f64) -> bool {
        match (intent.order_type, intent.side) {
            (OrderType::Market, _) => true,
            (OrderType::Limit { limit_price }, OrderSide::Buy) => close <= limit_price,
            (OrderType::Limit { limit_price }, OrderSide::Sell) => close >= limit_price,
            (OrderType::Stop { stop_price }, OrderSide::Buy) => close >= stop_price,
            (OrderType::Stop { stop_price }, OrderSide::Sell) => close <= stop_price,
        }
    }

    fn fill(&mut self, order_id: OrderId, intent: &OrderIntent, bar: &Bar) -> Fill {
        let price = self
            .settings
            .apply_slippage(bar.close, intent.side, &intent.order_type);
        let quantity = intent.sized_quantity();
        Fill {
            id: self.fill_ids.next_id().into(),
            order_id,
            symbol: intent.symbol.clone(),
            time: bar.time,
            side: intent.side,
            quantity,
            price,
            fees: self.settings.commission.fees(quantity, price),
        }
    }
}

impl ExecutionAdapter for SimulatedExecution {
    fn name(&self) -> &str {
        "SimulatedExecution"
    }

    fn submit(
        &mut self,
        intent: &OrderIntent,
        bar: &Bar,
        fills: &mut dyn FillReceiver,
    ) -> OrderAck {
        let order_id: OrderId = self.order_ids.next_id().into();
        let status = if intent.sized_quantity() <= 0.0 {
            OrderStatus::Cancelled
        } else if Self::is_marketable(intent, bar.close) {
            let fill = self.fill(order_id, intent, bar);
            fills.on_fill(fill);
            OrderStatus::Filled
        } else {
            match intent.time_in_force {
                TimeInForce::Gtc => {
                    self.resting.push(RestingOrder {
                        id: order_id,
                        intent: intent.clone(),
                        submitted: bar.time,
                    });
                    OrderStatus::Resting
                }
                TimeInForce::Day | TimeInForce::Ioc => OrderStatus::Cancelled,
            }
        };
        debug!(%order_id, symbol = %intent.symbol, side = %intent.side, ?status, "order submitted");
        OrderAck { order_id, status }
    }

    fn on_bar(&mut self, symbol: &str, bar: &Bar, fills: &mut dyn FillReceiver) {
        if self.resting.is_empty() {
            return;
        }
        let resting = std::mem::take(&mut self.resting);
        for order in resting {
            let due = order.intent.symbol == symbol
                && bar.time > order.submitted
                && Self::is_marketable(&order.intent, bar.close);
            if due {
                let fill = self.fill(order.id, &order.intent, bar);
                debug!(order_id = %order.id, price = fill.price, "resting order filled");
                fills.on_fill(fill);
            } else {
                self.resting.push(order);
            }
        }
    }

    fn open_orders(&self) -> usize {
        self.resting.len()
    }

    fn reset(&mut self) {
        self.resting.clear();
        self.order_ids.reset();
        self.fill_ids.reset();
    }
}
