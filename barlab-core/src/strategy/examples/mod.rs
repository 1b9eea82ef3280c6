//! Example strategies

pub mod ma_cross;
pub mod rsi_reversion;

pub use ma_cross::{MaCrossover, MaType};
pub use rsi_reversion::RsiReversion;
