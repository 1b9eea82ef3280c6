//! Indicator-facing components.
//!
//! - `output`: fixed-shape result types returned by every indicator
//! - `indicator`: the streaming contract plus batch and dynamic projections
//! - `spec`: typed indicator specifications and cache keys
//! - `provider`: per-bar memoization shared by strategies

pub mod error;
pub mod indicator;
pub mod output;
pub mod provider;
pub mod spec;

pub use error::{IndicatorError, PolicyConfigError};
pub use indicator::{BatchIndicator, DynIndicator, Indicator};
pub use output::{BandValue, IndicatorOutput, IndicatorValue, MultiValue, SingleValue};
pub use provider::IndicatorProvider;
pub use spec::IndicatorSpec;
