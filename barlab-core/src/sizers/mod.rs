//! Position Sizers: determine order quantity
//!
//! Sizers run before the risk chain and fill in the quantity of intents that
//! leave it unset. They are portfolio-aware (use equity) but signal-agnostic.
//! An intent that already carries a positive quantity passes through
//! unchanged; degenerate inputs produce quantity 0, never NaN.

pub mod atr_risk;
pub mod fixed;
pub mod percent;
pub mod stop_risk;

pub use atr_risk::AtrRisk;
pub use fixed::FixedQuantity;
pub use percent::PercentOfEquity;
pub use stop_risk::StopDistanceRisk;

use crate::components::IndicatorProvider;
use crate::domain::{Bar, OrderIntent, OrderType, PortfolioState, Timeframe};

/// Everything a sizer may look at for one order.
#[derive(Debug, Clone, Copy)]
pub struct SizingContext<'a> {
    pub state: &'a PortfolioState,
    /// The pair's bar history, newest last.
    pub bars: &'a [Bar],
    pub timeframe: Timeframe,
    pub provider: &'a IndicatorProvider,
}

impl<'a> SizingContext<'a> {
    pub fn current_bar(&self) -> Option<&'a Bar> {
        self.bars.last()
    }

    /// Expected entry price: the limit / stop price, or the latest close for
    /// market orders.
    pub fn entry_price(&self, intent: &OrderIntent) -> Option<f64> {
        let price = match intent.order_type {
            OrderType::Market => self.current_bar()?.close,
            OrderType::Limit { limit_price } => limit_price,
            OrderType::Stop { stop_price } => stop_price,
        };
        (price.is_finite() && price > 0.0).then_some(price)
    }
}

/// Position sizing logic
///
/// # Responsibilities
/// - Convert equity + intent + bar data → order quantity
/// - Apply a risk budget (e.g., risk % of equity per trade)
///
/// # Non-Responsibilities
/// - Sizers do NOT decide entry/exit (that's the strategy's job)
/// - Sizers do NOT approve orders (that's the risk chain's job)
pub trait PositionSizer: Send + Sync {
    /// Sizer name for logging
    fn name(&self) -> &str;

    /// Return `intent` with its quantity filled in.
    fn size(&self, intent: &OrderIntent, ctx: &SizingContext<'_>) -> OrderIntent;
}

/// `Some(intent)` unchanged when it already carries a positive quantity.
pub(crate) fn presized(intent: &OrderIntent) -> Option<OrderIntent> {
    (intent.sized_quantity() > 0.0).then(|| intent.clone())
}

/// Copy of `intent` with `quantity`, mapping NaN / infinite / negative to 0.
pub(crate) fn with_quantity(intent: &OrderIntent, quantity: f64) -> OrderIntent {
    let quantity = if quantity.is_finite() && quantity > 0.0 {
        quantity
    } else {
        0.0
    };
    intent.clone().with_quantity(quantity)
}
