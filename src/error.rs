//! Error types for the sigma-rs library.
//!
//! The propagation engine itself never fails: floating point exceptions flow through
//! as IEEE infinities and NaNs. These errors come from the validating entry points
//! (checked construction, parsing, sampling).

use thiserror::Error;

/// The main error type for the sigma-rs library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UncertainError {
    /// Error when an invalid parameter value is provided.
    #[error("Invalid parameter '{parameter}': value {value} {constraint}")]
    InvalidParameter {
        /// The name of the parameter
        parameter: &'static str,
        /// The invalid value
        value: f64,
        /// A description of the constraint that was violated
        constraint: &'static str,
    },

    /// Error when a parameter is not finite (NaN or infinite).
    #[error("Non-finite parameter '{parameter}': {value}")]
    NonFiniteParameter {
        /// The name of the parameter
        parameter: &'static str,
        /// The non-finite value
        value: f64,
    },

    /// Error when sample count is invalid (zero or too large).
    #[error("Invalid sample count: {count} ({reason})")]
    InvalidSampleCount {
        /// The invalid sample count
        count: usize,
        /// The reason the count is invalid
        reason: &'static str,
    },

    /// Error when text does not have the `<mean>+/-<std>` shape.
    #[error("Cannot parse '{input}' as an uncertain value: {reason}")]
    Parse {
        /// The rejected input
        input: String,
        /// What was wrong with it
        reason: &'static str,
    },
}

/// A specialized `Result` type for uncertain operations.
///
/// This is a convenience type alias for `Result<T, UncertainError>`.
pub type Result<T> = std::result::Result<T, UncertainError>;

impl UncertainError {
    /// Create an error for invalid parameter with constraint.
    ///
    /// # Example
    /// ```
    /// use sigma_rs::error::UncertainError;
    ///
    /// let error = UncertainError::invalid_parameter("std", -1.0, "must be non-negative");
    /// assert!(error.to_string().contains("std"));
    /// ```
    pub fn invalid_parameter(
        parameter: &'static str,
        value: f64,
        constraint: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            parameter,
            value,
            constraint,
        }
    }

    /// Create an error for non-finite parameter.
    ///
    /// # Example
    /// ```
    /// use sigma_rs::error::UncertainError;
    ///
    /// let error = UncertainError::non_finite("mean", f64::NAN);
    /// assert!(error.to_string().contains("mean"));
    /// ```
    pub fn non_finite(parameter: &'static str, value: f64) -> Self {
        Self::NonFiniteParameter { parameter, value }
    }

    /// Create an error for invalid sample count.
    pub fn invalid_sample_count(count: usize, reason: &'static str) -> Self {
        Self::InvalidSampleCount { count, reason }
    }

    /// Create a parse error for `input`.
    ///
    /// # Example
    /// ```
    /// use sigma_rs::error::UncertainError;
    ///
    /// let error = UncertainError::parse("3 pm 2", "missing '+/-' separator");
    /// assert!(error.to_string().contains("3 pm 2"));
    /// ```
    pub fn parse(input: impl Into<String>, reason: &'static str) -> Self {
        Self::Parse {
            input: input.into(),
            reason,
        }
    }
}
