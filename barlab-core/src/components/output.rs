//! Indicator result types.
//!
//! Every indicator returns one of three fixed shapes, all `Copy` and
//! stack-sized:
//! - `SingleValue`: one number (SMA, RSI, ATR, ...)
//! - `MultiValue`: 2 to 5 numbers (MACD, ADX, Ichimoku, ...)
//! - `BandValue`: upper / middle / lower (Bollinger, Keltner, ...)
//!
//! An invalid result (warmup) reports the value count of its shape but its
//! payload is NaN and must not be read. Equality compares validity and, for
//! valid results, the exact bits of every value, so batch and streaming
//! outputs can be compared with `==`.

use super::error::IndicatorError;

/// Maximum number of values carried by a `MultiValue`.
pub const MAX_VALUES: usize = 5;

/// Common accessors shared by every result shape.
pub trait IndicatorOutput: Copy + Send + Sync + std::fmt::Debug + PartialEq + 'static {
    fn is_valid(&self) -> bool;

    fn value_count(&self) -> usize;

    /// Value at `index`, or `IndexOutOfRange` when `index >= value_count()`.
    fn get(&self, index: usize) -> Result<f64, IndicatorError>;

    fn into_value(self) -> IndicatorValue;
}

fn out_of_range(index: usize, len: usize) -> IndicatorError {
    IndicatorError::IndexOutOfRange { index, len }
}

// ── SingleValue ──

#[derive(Debug, Clone, Copy)]
pub struct SingleValue {
    value: f64,
    valid: bool,
}

impl SingleValue {
    pub fn new(value: f64) -> Self {
        Self { value, valid: true }
    }

    pub fn invalid() -> Self {
        Self {
            value: f64::NAN,
            valid: false,
        }
    }

    /// The value when valid.
    pub fn value(&self) -> Option<f64> {
        self.valid.then_some(self.value)
    }
}

impl PartialEq for SingleValue {
    fn eq(&self, other: &Self) -> bool {
        match (self.valid, other.valid) {
            (true, true) => self.value.to_bits() == other.value.to_bits(),
            (false, false) => true,
            _ => false,
        }
    }
}

impl IndicatorOutput for SingleValue {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn value_count(&self) -> usize {
        1
    }

    fn get(&self, index: usize) -> Result<f64, IndicatorError> {
        if index == 0 {
            Ok(self.value)
        } else {
            Err(out_of_range(index, 1))
        }
    }

    fn into_value(self) -> IndicatorValue {
        IndicatorValue::Single(self)
    }
}

// ── MultiValue ──

#[derive(Debug, Clone, Copy)]
pub struct MultiValue {
    values: [f64; MAX_VALUES],
    count: u8,
    valid: bool,
}

impl MultiValue {
    /// A valid result holding 2 to 5 values.
    pub fn new(values: &[f64]) -> Result<Self, IndicatorError> {
        let count = Self::check_count(values.len())?;
        let mut slots = [f64::NAN; MAX_VALUES];
        slots[..count].copy_from_slice(values);
        Ok(Self {
            values: slots,
            count: count as u8,
            valid: true,
        })
    }

    /// An invalid result shaped for `count` values.
    pub fn invalid(count: usize) -> Self {
        Self {
            values: [f64::NAN; MAX_VALUES],
            count: count.clamp(2, MAX_VALUES) as u8,
            valid: false,
        }
    }

    /// Build from a fixed array; the length is checked at compile time by callers
    /// choosing `N` in 2..=5.
    pub(crate) fn from_array<const N: usize>(values: [f64; N]) -> Self {
        let mut slots = [f64::NAN; MAX_VALUES];
        let n = N.min(MAX_VALUES);
        slots[..n].copy_from_slice(&values[..n]);
        Self {
            values: slots,
            count: n as u8,
            valid: true,
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values[..self.count as usize]
    }

    fn check_count(len: usize) -> Result<usize, IndicatorError> {
        if (2..=MAX_VALUES).contains(&len) {
            Ok(len)
        } else {
            Err(IndicatorError::invalid(
                "values",
                format!("MultiValue holds 2 to {MAX_VALUES} values, got {len}"),
            ))
        }
    }
}

impl PartialEq for MultiValue {
    fn eq(&self, other: &Self) -> bool {
        if self.count != other.count || self.valid != other.valid {
            return false;
        }
        !self.valid
            || self
                .values()
                .iter()
                .zip(other.values())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl IndicatorOutput for MultiValue {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn value_count(&self) -> usize {
        self.count as usize
    }

    fn get(&self, index: usize) -> Result<f64, IndicatorError> {
        self.values()
            .get(index)
            .copied()
            .ok_or_else(|| out_of_range(index, self.count as usize))
    }

    fn into_value(self) -> IndicatorValue {
        IndicatorValue::Multi(self)
    }
}

// ── BandValue ──

/// Upper / middle / lower band. `get(0)` is upper, `get(1)` middle, `get(2)` lower.
#[derive(Debug, Clone, Copy)]
pub struct BandValue {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    valid: bool,
}

impl BandValue {
    pub fn new(upper: f64, middle: f64, lower: f64) -> Self {
        Self {
            upper,
            middle,
            lower,
            valid: true,
        }
    }

    pub fn invalid() -> Self {
        Self {
            upper: f64::NAN,
            middle: f64::NAN,
            lower: f64::NAN,
            valid: false,
        }
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl PartialEq for BandValue {
    fn eq(&self, other: &Self) -> bool {
        match (self.valid, other.valid) {
            (true, true) => {
                self.upper.to_bits() == other.upper.to_bits()
                    && self.middle.to_bits() == other.middle.to_bits()
                    && self.lower.to_bits() == other.lower.to_bits()
            }
            (false, false) => true,
            _ => false,
        }
    }
}

impl IndicatorOutput for BandValue {
    fn is_valid(&self) -> bool {
        self.valid
    }

    fn value_count(&self) -> usize {
        3
    }

    fn get(&self, index: usize) -> Result<f64, IndicatorError> {
        match index {
            0 => Ok(self.upper),
            1 => Ok(self.middle),
            2 => Ok(self.lower),
            _ => Err(out_of_range(index, 3)),
        }
    }

    fn into_value(self) -> IndicatorValue {
        IndicatorValue::Band(self)
    }
}

// ── IndicatorValue ──

/// Tagged union of the three result shapes, used by the provider and by
/// dynamically dispatched indicators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Single(SingleValue),
    Multi(MultiValue),
    Band(BandValue),
}

impl IndicatorValue {
    pub fn is_valid(&self) -> bool {
        match self {
            IndicatorValue::Single(v) => v.is_valid(),
            IndicatorValue::Multi(v) => v.is_valid(),
            IndicatorValue::Band(v) => v.is_valid(),
        }
    }

    pub fn value_count(&self) -> usize {
        match self {
            IndicatorValue::Single(v) => v.value_count(),
            IndicatorValue::Multi(v) => v.value_count(),
            IndicatorValue::Band(v) => v.value_count(),
        }
    }

    pub fn get(&self, index: usize) -> Result<f64, IndicatorError> {
        match self {
            IndicatorValue::Single(v) => v.get(index),
            IndicatorValue::Multi(v) => v.get(index),
            IndicatorValue::Band(v) => v.get(index),
        }
    }

    /// Value at `index` if the result is valid and the index exists.
    pub fn valid_at(&self, index: usize) -> Option<f64> {
        if self.is_valid() {
            self.get(index).ok()
        } else {
            None
        }
    }

    pub fn as_single(&self) -> Option<SingleValue> {
        match self {
            IndicatorValue::Single(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_multi(&self) -> Option<MultiValue> {
        match self {
            IndicatorValue::Multi(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_band(&self) -> Option<BandValue> {
        match self {
            IndicatorValue::Band(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<SingleValue> for IndicatorValue {
    fn from(v: SingleValue) -> Self {
        IndicatorValue::Single(v)
    }
}

impl From<MultiValue> for IndicatorValue {
    fn from(v: MultiValue) -> Self {
        IndicatorValue::Multi(v)
    }
}

impl From<BandValue> for IndicatorValue {
    fn from(v: BandValue) -> Self {
        IndicatorValue::Band(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_accessors() {
        let v = SingleValue::new(42.0);
        assert!(v.is_valid());
        assert_eq!(v.value(), Some(42.0));
        assert_eq!(v.get(0), Ok(42.0));
        assert_eq!(
            v.get(1),
            Err(IndicatorError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(SingleValue::invalid().value(), None);
    }

    #[test]
    fn multi_value_accepts_two_to_five() {
        assert!(MultiValue::new(&[1.0]).is_err());
        assert!(MultiValue::new(&[1.0; 6]).is_err());
        let v = MultiValue::new(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(v.value_count(), 3);
        assert_eq!(v.get(2), Ok(3.0));
        assert!(v.get(3).is_err());
    }

    #[test]
    fn invalid_results_keep_their_shape() {
        assert_eq!(MultiValue::invalid(3).value_count(), 3);
        assert_eq!(BandValue::invalid().value_count(), 3);
        assert!(!MultiValue::invalid(3).is_valid());
        assert_ne!(MultiValue::invalid(3), MultiValue::invalid(2));
    }

    #[test]
    fn equality_is_bitwise_for_valid_results() {
        assert_eq!(SingleValue::new(0.1 + 0.2), SingleValue::new(0.1 + 0.2));
        assert_ne!(SingleValue::new(0.0), SingleValue::new(-0.0));
        assert_ne!(SingleValue::new(1.0), SingleValue::invalid());
        assert_eq!(SingleValue::invalid(), SingleValue::invalid());
    }

    #[test]
    fn band_value_indexing() {
        let b = BandValue::new(3.0, 2.0, 1.0);
        assert_eq!(b.get(0), Ok(3.0));
        assert_eq!(b.get(1), Ok(2.0));
        assert_eq!(b.get(2), Ok(1.0));
        assert!(b.get(3).is_err());
        assert_eq!(b.width(), 2.0);
    }

    #[test]
    fn indicator_value_dispatch() {
        let v: IndicatorValue = BandValue::new(3.0, 2.0, 1.0).into();
        assert_eq!(v.value_count(), 3);
        assert_eq!(v.valid_at(1), Some(2.0));
        assert!(v.as_single().is_none());
        let invalid: IndicatorValue = SingleValue::invalid().into();
        assert_eq!(invalid.valid_at(0), None);
    }
}
