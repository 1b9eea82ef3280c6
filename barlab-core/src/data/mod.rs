//! Bar data generation

pub mod synthetic;

pub use synthetic::{synthetic_bars, SyntheticConfig};
