//! ATR Risk Sizer
//!
//! Position size based on volatility (ATR) and fixed risk per trade.
//! Classic risk management: risk X% of equity per trade, with stop at k * ATR.

use tracing::debug;

use crate::components::error::{require_period, require_positive, PolicyConfigError};
use crate::components::IndicatorSpec;
use crate::domain::OrderIntent;
use crate::sizers::{presized, with_quantity, PositionSizer, SizingContext};

/// ATR-based risk sizer
///
/// # Formula
/// ```text
/// risk_dollars = equity * risk_fraction
/// stop_distance = multiplier * ATR(period)
/// quantity = risk_dollars / stop_distance
/// ```
///
/// ATR is the streaming Wilder ATR over the pair's history, fetched through
/// the provider so it is shared with any strategy asking for the same key.
///
/// # Example
/// - Equity: $100,000
/// - Risk per trade: 1% ($1,000)
/// - ATR: $2.00
/// - Multiplier: 2x (stop at 2 * ATR = $4.00)
/// - Quantity: $1,000 / $4.00 = 250 shares
#[derive(Debug, Clone)]
pub struct AtrRisk {
    risk_fraction: f64,
    multiplier: f64,
    atr: IndicatorSpec,
}

impl AtrRisk {
    pub fn new(
        risk_fraction: f64,
        multiplier: f64,
        period: usize,
    ) -> Result<Self, PolicyConfigError> {
        Ok(Self {
            risk_fraction: require_positive("risk_fraction", risk_fraction)
                .map_err(PolicyConfigError::attribute("AtrRisk"))?,
            multiplier: require_positive("multiplier", multiplier)
                .map_err(PolicyConfigError::attribute("AtrRisk"))?,
            atr: IndicatorSpec::Atr {
                period: require_period("period", period, 1)
                    .map_err(PolicyConfigError::attribute("AtrRisk"))?,
            },
        })
    }
}

impl PositionSizer for AtrRisk {
    fn name(&self) -> &str {
        "AtrRisk"
    }

    fn size(&self, intent: &OrderIntent, ctx: &SizingContext<'_>) -> OrderIntent {
        if let Some(sized) = presized(intent) {
            return sized;
        }
        let equity = ctx.state.equity;
        if equity <= 0.0 {
            return with_quantity(intent, 0.0);
        }
        let atr = match ctx.provider.current(&self.atr, ctx.timeframe, ctx.bars) {
            Ok(value) => value.and_then(|v| v.valid_at(0)),
            Err(err) => {
                debug!("ATR unavailable for sizing: {err}");
                None
            }
        };
        let quantity = match atr {
            Some(atr) if atr > 0.0 => equity * self.risk_fraction / (self.multiplier * atr),
            // Still warming up or zero volatility
            _ => 0.0,
        };
        with_quantity(intent, quantity)
    }
}
