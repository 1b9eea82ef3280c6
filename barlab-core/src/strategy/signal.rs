//! Signals: what a strategy wants, published alongside its orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Timeframe;

/// Desired market exposure.
///
/// Intent is what the strategy "wants" based on market data, not what the
/// portfolio currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalIntent {
    /// Want long exposure
    Long,

    /// Want short exposure
    Short,

    /// Want no exposure (close existing position)
    Flat,
}

impl SignalIntent {
    pub fn is_directional(&self) -> bool {
        matches!(self, SignalIntent::Long | SignalIntent::Short)
    }

    pub fn opposite(&self) -> Self {
        match self {
            SignalIntent::Long => SignalIntent::Short,
            SignalIntent::Short => SignalIntent::Long,
            SignalIntent::Flat => SignalIntent::Flat,
        }
    }

    /// Check if intent requires a position change from the current signed
    /// quantity (positive = long, negative = short, zero = flat).
    pub fn requires_change(&self, current: f64) -> bool {
        match self {
            SignalIntent::Long => current <= 0.0,
            SignalIntent::Short => current >= 0.0,
            SignalIntent::Flat => current != 0.0,
        }
    }
}

/// A published signal, recorded in the backtest result and sent to the
/// event sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub strategy: String,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub time: DateTime<Utc>,
    pub intent: SignalIntent,
    /// Conviction in [0, 1].
    pub strength: f64,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_intent_is_directional() {
        assert!(SignalIntent::Long.is_directional());
        assert!(SignalIntent::Short.is_directional());
        assert!(!SignalIntent::Flat.is_directional());
    }

    #[test]
    fn test_signal_intent_opposite() {
        assert_eq!(SignalIntent::Long.opposite(), SignalIntent::Short);
        assert_eq!(SignalIntent::Flat.opposite(), SignalIntent::Flat);
    }

    #[test]
    fn test_requires_change() {
        assert!(SignalIntent::Long.requires_change(0.0)); // flat → long
        assert!(SignalIntent::Long.requires_change(-100.0)); // short → long
        assert!(!SignalIntent::Long.requires_change(100.0)); // already long

        assert!(SignalIntent::Short.requires_change(100.0));
        assert!(!SignalIntent::Short.requires_change(-100.0));

        assert!(SignalIntent::Flat.requires_change(-100.0));
        assert!(!SignalIntent::Flat.requires_change(0.0));
    }
}
