use serde::{Deserialize, Serialize};
use std::fmt;

/// Order ID, assigned sequentially by the execution adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "O{}", self.0)
    }
}

/// Fill ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FillId(pub u64);

impl From<u64> for FillId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for FillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// Monotonic ID source. Starts at 1 so that 0 never names a real order.
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_id(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic_and_resettable() {
        let mut seq = IdSequence::new();
        assert_eq!(seq.next_id(), 1);
        assert_eq!(seq.next_id(), 2);
        seq.reset();
        assert_eq!(OrderId::from(seq.next_id()), OrderId(1));
    }

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(OrderId(7).to_string(), "O7");
        assert_eq!(FillId(3).to_string(), "F3");
    }
}
