//! Configuration error types

use thiserror::Error;

/// Errors raised while building samplers, curves, fields and timelines.
///
/// Every variant is fatal at construction time. Nothing on the per-tick path
/// returns one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A count that must be at least one was zero
    #[error("{name} must be greater than zero")]
    NonPositiveCount { name: &'static str },

    /// A length, radius or rate that must be strictly positive was not
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// A parameter was NaN or infinite
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    /// A curve was built without breakpoints
    #[error("curve needs at least one breakpoint")]
    EmptyBreakpoints,

    /// Breakpoint x values are not strictly increasing
    #[error("breakpoint {index} has x = {x}, which does not exceed the previous x = {previous}")]
    UnorderedBreakpoints { index: usize, x: f64, previous: f64 },

    /// Breakpoint y values decrease, so the curve would not be monotone
    #[error("breakpoint {index} has y = {y}, below the previous y = {previous}")]
    DecreasingBreakpoints { index: usize, y: f64, previous: f64 },

    /// A color string could not be parsed
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// An easing curve would not map [0, 1] onto a monotone function
    #[error("invalid easing: {0}")]
    InvalidEasing(String),

    /// A script or node refers to an observable that was never declared
    #[error("unknown observable: {0:?}")]
    UnknownObservable(String),

    /// An observable was declared twice
    #[error("observable declared twice: {0:?}")]
    DuplicateObservable(String),

    /// A scalar observable was given a vector value or the other way round
    #[error("observable {0:?} cannot hold a value of that kind")]
    MismatchedValue(String),
}

/// Result type for configuration
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Reject NaN and infinities.
pub fn ensure_finite(name: &'static str, value: f64) -> ConfigResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

/// Reject anything that is not a strictly positive finite number.
pub fn ensure_positive(name: &'static str, value: f64) -> ConfigResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("radius", 3.0), Ok(3.0));
        assert!(ensure_positive("radius", 0.0).is_err());
        assert!(ensure_positive("radius", -1.0).is_err());
        assert!(ensure_positive("radius", f64::NAN).is_err());
        assert!(ensure_positive("radius", f64::INFINITY).is_err());
    }

    #[test]
    fn test_messages_name_the_parameter() {
        let err = ensure_positive("sample_count", -2.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sample_count must be a positive finite number, got -2"
        );
    }
}
