//! # Error Types
//!
//! Structured error types for drex_core. Only malformed input is fatal: it is
//! rejected at the boundary before any calculation runs. Everything that can
//! go wrong downstream (no fan match, high pressure loss, failed elevation
//! lookup) is a [`DesignWarning`](crate::warnings::DesignWarning) attached to
//! the result instead.
//!
//! ## Example
//!
//! ```rust
//! use drex_core::errors::{CalcError, CalcResult};
//!
//! fn validate_flow(flow_cfm: f64) -> CalcResult<()> {
//!     if flow_cfm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "flow_cfm",
//!             flow_cfm.to_string(),
//!             "Flow rate must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for drex_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// Each variant carries enough context to point the user at the offending
/// field, and serializes to tagged JSON for machine consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, unsupported size, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Duct geometry or flow that the pressure-loss equation cannot evaluate
    #[error("Invalid geometry: {parameter} = {value} - {reason}")]
    InvalidGeometry {
        parameter: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Report rendering failed (Typst compile or PDF export)
    #[error("Report rendering failed: {report} - {reason}")]
    RenderFailed { report: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidGeometry error
    pub fn invalid_geometry(parameter: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        CalcError::InvalidGeometry {
            parameter: parameter.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a RenderFailed error
    pub fn render_failed(report: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::RenderFailed {
            report: report.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's data rather than by the engine.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::InvalidGeometry { .. }
                | CalcError::MissingField { .. }
                | CalcError::SerializationError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::RenderFailed { .. } => "RENDER_FAILED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("dryers[0].flow_cfm", "-5", "Flow rate must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("dryers").error_code(), "MISSING_FIELD");
        assert_eq!(
            CalcError::invalid_geometry("diameter_in", 0.0, "must be positive").error_code(),
            "INVALID_GEOMETRY"
        );
        assert_eq!(CalcError::render_failed("proposal", "boom").error_code(), "RENDER_FAILED");
    }

    #[test]
    fn test_input_errors_are_classified() {
        assert!(CalcError::invalid_input("zip_code", "abc", "not 5 digits").is_input_error());
        assert!(!CalcError::render_failed("proposal", "font missing").is_input_error());
    }

    #[test]
    fn test_display_mentions_field() {
        let e = CalcError::invalid_geometry("flow_cfm", -1.0, "Flow must be positive");
        assert_eq!(e.to_string(), "Invalid geometry: flow_cfm = -1 - Flow must be positive");
    }
}
