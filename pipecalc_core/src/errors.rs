//! # Error Types
//!
//! Structured error types for pipecalc_core. Domain validation failures are
//! reported to callers as a failed [`ResultSet`](crate::result::ResultSet);
//! a [`CalcError`] escaping a module means something unexpected happened
//! (unknown calculation id, broken table invariant, programming defect).
//!
//! ## Example
//!
//! ```rust
//! use pipecalc_core::errors::{CalcError, CalcResult};
//!
//! fn check_flow(flow_rate: f64) -> CalcResult<()> {
//!     if flow_rate <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "flowRate",
//!             flow_rate.to_string(),
//!             "Flow rate must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_flow(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pipecalc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not positive, unknown option)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing or could not be read as a number
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Material/grade combination not found in the stress or density tables
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// No module is registered under the requested identifier
    #[error("Unknown calculation: {calculation_id}")]
    UnknownCalculation { calculation_id: String },

    /// Calculation could not produce a result
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create an UnknownCalculation error
    pub fn unknown_calculation(calculation_id: impl Into<String>) -> Self {
        CalcError::UnknownCalculation {
            calculation_id: calculation_id.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(
        calculation_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CalcError::Internal {
            message: message.into(),
        }
    }

    /// Whether this error is a domain validation failure that a module
    /// reports as `{success: false}` instead of propagating.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::MissingField { .. }
                | CalcError::MaterialNotFound { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::UnknownCalculation { .. } => "UNKNOWN_CALCULATION",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
