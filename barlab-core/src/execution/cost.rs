//! Cost model: slippage and commission calculation.
//!
//! Slippage is directional: buyers pay more (higher price), sellers receive
//! less (lower price). Limit orders fill passively and pay no slippage.
//! Commission is computed from the filled quantity and price.

use serde::{Deserialize, Serialize};

use crate::domain::{OrderSide, OrderType};

/// How fees are charged per fill.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommissionModel {
    #[default]
    Free,
    /// Flat fee per fill.
    PerOrder { fee: f64 },
    /// `rate` per unit, at least `minimum` per fill.
    PerShare { rate: f64, minimum: f64 },
    /// Basis points of notional.
    Bps { bps: f64 },
}

impl CommissionModel {
    pub fn fees(&self, quantity: f64, price: f64) -> f64 {
        let fees = match *self {
            CommissionModel::Free => 0.0,
            CommissionModel::PerOrder { fee } => fee,
            CommissionModel::PerShare { rate, minimum } => (rate * quantity).max(minimum),
            CommissionModel::Bps { bps } => quantity * price * bps / 10_000.0,
        };
        if fees.is_finite() {
            fees.max(0.0)
        } else {
            0.0
        }
    }
}

/// Friction parameters for `SimulatedExecution`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionSettings {
    /// Slippage in basis points, applied directionally.
    #[serde(default)]
    pub slippage_bps: f64,
    #[serde(default)]
    pub commission: CommissionModel,
}

impl ExecutionSettings {
    pub fn frictionless() -> Self {
        Self::default()
    }

    /// Apply slippage to a raw fill price.
    pub fn apply_slippage(&self, raw_price: f64, side: OrderSide, order_type: &OrderType) -> f64 {
        if self.slippage_bps == 0.0 || matches!(order_type, OrderType::Limit { .. }) {
            return raw_price;
        }
        let slip_fraction = self.slippage_bps / 10_000.0;
        match side {
            OrderSide::Buy => raw_price * (1.0 + slip_fraction),
            OrderSide::Sell => raw_price * (1.0 - slip_fraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slippage_is_directional() {
        let settings = ExecutionSettings {
            slippage_bps: 10.0,
            commission: CommissionModel::Free,
        };
        let buy = settings.apply_slippage(100.0, OrderSide::Buy, &OrderType::Market);
        let sell = settings.apply_slippage(100.0, OrderSide::Sell, &OrderType::Market);
        assert!((buy - 100.1).abs() < 1e-10);
        assert!((sell - 99.9).abs() < 1e-10);
    }

    #[test]
    fn limit_orders_pay_no_slippage() {
        let settings = ExecutionSettings {
            slippage_bps: 10.0,
            commission: CommissionModel::Free,
        };
        let limit = OrderType::Limit { limit_price: 101.0 };
        assert_eq!(settings.apply_slippage(100.0, OrderSide::Buy, &limit), 100.0);
    }

    #[test]
    fn commission_models() {
        assert_eq!(CommissionModel::Free.fees(100.0, 50.0), 0.0);
        assert_eq!(CommissionModel::PerOrder { fee: 1.5 }.fees(100.0, 50.0), 1.5);
        let per_share = CommissionModel::PerShare {
            rate: 0.005,
            minimum: 1.0,
        };
        assert_eq!(per_share.fees(100.0, 50.0), 1.0);
        assert!((per_share.fees(1_000.0, 50.0) - 5.0).abs() < 1e-12);
        assert!((CommissionModel::Bps { bps: 10.0 }.fees(100.0, 50.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: ExecutionSettings = serde_json::from_str(r#"{"slippage_bps": 5.0}"#).unwrap();
        assert_eq!(settings.slippage_bps, 5.0);
        assert_eq!(settings.commission, CommissionModel::Free);
    }
}
