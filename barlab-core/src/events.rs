//! Backtest events and sinks.
//!
//! The runner publishes every signal, risk decision and fill to an
//! `EventSink`. Sinks observe; they cannot influence the run.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Fill, OrderId, OrderIntent};
use crate::execution::OrderStatus;
use crate::strategy::Signal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BacktestEvent {
    Signal(Signal),
    OrderApproved {
        time: DateTime<Utc>,
        order_id: OrderId,
        intent: OrderIntent,
        status: OrderStatus,
    },
    OrderRejected {
        time: DateTime<Utc>,
        intent: OrderIntent,
        policy: String,
        reason: String,
    },
    Fill(Fill),
}

impl BacktestEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            BacktestEvent::Signal(_) => "signal",
            BacktestEvent::OrderApproved { .. } => "order_approved",
            BacktestEvent::OrderRejected { .. } => "order_rejected",
            BacktestEvent::Fill(_) => "fill",
        }
    }
}

pub trait EventSink: Send + Sync {
    fn publish(&self, event: &BacktestEvent);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: &BacktestEvent) {}
}

/// Keeps every event in memory. Clones share the same buffer, so a test can
/// hand one clone to the runner and read the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<BacktestEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BacktestEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: &BacktestEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}

/// Forwards events to `tracing` as structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: &BacktestEvent) {
        match event {
            BacktestEvent::Signal(s) => info!(
                strategy = %s.strategy,
                symbol = %s.symbol,
                timeframe = %s.timeframe,
                intent = ?s.intent,
                strength = s.strength,
                reason = %s.reason,
                "signal"
            ),
            BacktestEvent::OrderApproved {
                order_id,
                intent,
                status,
                ..
            } => debug!(
                %order_id,
                symbol = %intent.symbol,
                side = %intent.side,
                quantity = intent.sized_quantity(),
                ?status,
                "order approved"
            ),
            BacktestEvent::OrderRejected {
                intent,
                policy,
                reason,
                ..
            } => info!(
                symbol = %intent.symbol,
                side = %intent.side,
                %policy,
                %reason,
                "order rejected"
            ),
            BacktestEvent::Fill(f) => info!(
                fill_id = %f.id,
                order_id = %f.order_id,
                symbol = %f.symbol,
                side = %f.side,
                quantity = f.quantity,
                price = f.price,
                fees = f.fees,
                "fill"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FillId, OrderSide};
    use chrono::TimeZone;

    fn fill() -> Fill {
        Fill {
            id: FillId(1),
            order_id: OrderId(1),
            symbol: "SPY".into(),
            time: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            side: OrderSide::Buy,
            quantity: 1.0,
            price: 10.0,
            fees: 0.0,
        }
    }

    #[test]
    fn recording_sink_clones_share_events() {
        let sink = RecordingSink::new();
        let handle = sink.clone();
        sink.publish(&BacktestEvent::Fill(fill()));
        assert_eq!(handle.events().len(), 1);
        assert_eq!(handle.count("fill"), 1);
        assert_eq!(handle.count("signal"), 0);
        handle.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn sinks_are_object_safe() {
        let sinks: Vec<Box<dyn EventSink>> = vec![
            Box::new(NullSink),
            Box::new(TracingSink),
            Box::new(RecordingSink::new()),
        ];
        for sink in &sinks {
            sink.publish(&BacktestEvent::Fill(fill()));
        }
    }

    #[test]
    fn event_serializes_with_tag() {
        let json = serde_json::to_string(&BacktestEvent::Fill(fill())).unwrap();
        assert!(json.contains(r#""event":"fill""#));
    }
}
