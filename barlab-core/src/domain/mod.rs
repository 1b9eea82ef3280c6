//! Domain types for BarLab

pub mod bar;
pub mod fill;
pub mod ids;
pub mod order;
pub mod portfolio;
pub mod position;
pub mod timeframe;

pub use bar::Bar;
pub use fill::Fill;
pub use ids::{FillId, IdSequence, OrderId};
pub use order::{OrderIntent, OrderSide, OrderType, TimeInForce};
pub use portfolio::{Portfolio, PortfolioState};
pub use position::{Position, PositionSide};
pub use timeframe::{Timeframe, TimeframeParseError};

/// Symbol type alias
pub type Symbol = String;

/// One equity-curve sample.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EquityPoint {
    pub time: chrono::DateTime<chrono::Utc>,
    pub equity: f64,
}
