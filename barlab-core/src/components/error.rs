//! Indicator error type and parameter validation helpers.

use thiserror::Error;

/// Errors raised by indicator construction and result access.
///
/// Warmup is not an error: an indicator that has not seen enough bars
/// returns an invalid result instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl IndicatorError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Invalid constructor parameter of a position sizer or risk policy.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {component} parameter '{name}': {reason}")]
pub struct PolicyConfigError {
    pub component: &'static str,
    pub name: String,
    pub reason: String,
}

impl PolicyConfigError {
    pub fn new(component: &'static str, name: &str, reason: impl Into<String>) -> Self {
        Self {
            component,
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Attribute a failed parameter check to `component`, for `map_err`.
    pub fn attribute(component: &'static str) -> impl Fn(IndicatorError) -> Self {
        move |err| match err {
            IndicatorError::InvalidParameter { name, reason } => Self {
                component,
                name,
                reason,
            },
            other => Self::new(component, "parameter", other.to_string()),
        }
    }
}

/// Period must be >= `min`.
pub fn require_period(name: &str, value: usize, min: usize) -> Result<usize, IndicatorError> {
    if value < min {
        return Err(IndicatorError::invalid(
            name,
            format!("must be >= {min}, got {value}"),
        ));
    }
    Ok(value)
}

/// Finite and >= 0.
pub fn require_non_negative(name: &str, value: f64) -> Result<f64, IndicatorError> {
    if !value.is_finite() || value < 0.0 {
        return Err(IndicatorError::invalid(
            name,
            format!("must be finite and >= 0, got {value}"),
        ));
    }
    Ok(value)
}

/// Finite and > 0.
pub fn require_positive(name: &str, value: f64) -> Result<f64, IndicatorError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(IndicatorError::invalid(
            name,
            format!("must be finite and > 0, got {value}"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_period_rejects_small_values() {
        assert_eq!(require_period("period", 14, 1), Ok(14));
        let err = require_period("period", 0, 1).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter { ref name, .. } if name == "period"));
    }

    #[test]
    fn float_checks_reject_nan() {
        assert!(require_non_negative("k", f64::NAN).is_err());
        assert!(require_non_negative("k", -0.5).is_err());
        assert_eq!(require_non_negative("k", 0.0), Ok(0.0));
        assert!(require_positive("step", 0.0).is_err());
    }

    #[test]
    fn policy_errors_name_the_component() {
        let err = require_positive("quantity", 0.0)
            .map_err(PolicyConfigError::attribute("FixedQuantity"))
            .unwrap_err();
        assert_eq!(err.component, "FixedQuantity");
        assert_eq!(err.name, "quantity");
        assert_eq!(
            err.to_string(),
            "invalid FixedQuantity parameter 'quantity': must be finite and > 0, got 0"
        );
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = IndicatorError::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(err.to_string(), "index 5 out of range (len 3)");
    }
}
