//! Error types for Avni address cache operations

use crate::CatchmentId;
use thiserror::Error;

/// Errors raised by the location-lookup provider.
///
/// The cache never creates these itself; it hands them back to the caller
/// exactly as the provider produced them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Location store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Address query failed for catchment {catchment_id}: {reason}")]
    QueryFailed {
        catchment_id: CatchmentId,
        reason: String,
    },

    #[error("Catchment not found: {catchment_id}")]
    CatchmentNotFound { catchment_id: CatchmentId },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Avni cache errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AvniError {
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Avni operations.
pub type AvniResult<T> = Result<T, AvniError>;

// =============================================================================
// TESTS
// =============================================================================
