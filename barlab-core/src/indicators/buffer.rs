//! Fixed-capacity circular buffer of f64 values.
//!
//! Index 0 is the oldest held value, `len() - 1` the newest. Once full, each
//! `add` overwrites the oldest slot. Storage is allocated once in `new` and
//! never reallocated, including across `clear`.

use crate::components::error::IndicatorError;

#[derive(Debug, Clone)]
pub struct RingBuffer {
    data: Vec<f64>,
    /// Slot the next `add` writes to.
    head: usize,
    len: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Result<Self, IndicatorError> {
        if capacity == 0 {
            return Err(IndicatorError::invalid("capacity", "must be >= 1"));
        }
        Ok(Self {
            data: vec![0.0; capacity],
            head: 0,
            len: 0,
        })
    }

    /// Buffer for an indicator window whose size was already validated.
    pub(crate) fn with_window(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    /// Append `value`, evicting the oldest when full. Returns the evicted value.
    pub fn add(&mut self, value: f64) -> Option<f64> {
        let cap = self.data.len();
        let evicted = if self.len == cap {
            Some(self.data[self.head])
        } else {
            self.len += 1;
            None
        };
        self.data[self.head] = value;
        self.head = (self.head + 1) % cap;
        evicted
    }

    pub fn get(&self, index: usize) -> Result<f64, IndicatorError> {
        if index >= self.len {
            return Err(IndicatorError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(self.data[self.physical(index)])
    }

    pub fn newest(&self) -> Option<f64> {
        self.len.checked_sub(1).map(|i| self.data[self.physical(i)])
    }

    pub fn oldest(&self) -> Option<f64> {
        (self.len > 0).then(|| self.data[self.physical(0)])
    }

    /// Values from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.data[self.physical(i)])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.data.len()
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Sum of held values in oldest-to-newest order.
    pub fn sum(&self) -> f64 {
        self.iter().sum()
    }

    /// Mean of held values; NaN when empty.
    pub fn mean(&self) -> f64 {
        if self.len == 0 {
            return f64::NAN;
        }
        self.sum() / self.len as f64
    }

    pub fn max(&self) -> Option<f64> {
        self.iter().reduce(f64::max)
    }

    pub fn min(&self) -> Option<f64> {
        self.iter().reduce(f64::min)
    }

    /// Logical index -> physical slot.
    fn physical(&self, index: usize) -> usize {
        let cap = self.data.len();
        let start = (self.head + cap - self.len) % cap;
        (start + index) % cap
    }
}
