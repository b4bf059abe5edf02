//! Verification domain errors
//!
//! Every error here is raised while inputs are being constructed or loaded.
//! Evaluation itself has no error type: once a [`FactBundle`], a
//! [`ReferenceData`] and a [`VerificationConfig`] exist, `evaluate` always
//! produces a result.
//!
//! [`FactBundle`]: crate::facts::FactBundle
//! [`ReferenceData`]: crate::reference::ReferenceData
//! [`VerificationConfig`]: crate::config::VerificationConfig

use core_kernel::{MoneyError, TemporalError};
use thiserror::Error;

/// A fact bundle or reference record that cannot be evaluated
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// A numeric observation outside its documented range
    #[error("{field} out of range: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A monetary amount below zero
    #[error("Negative amount for {field}: {value}")]
    NegativeAmount { field: &'static str, value: String },

    /// Amounts that must share a currency do not
    #[error("Currency mismatch for {field}: {source}")]
    Currency {
        field: &'static str,
        #[source]
        source: MoneyError,
    },

    /// Cost estimate minimum above its maximum
    #[error("Cost estimate minimum {min} exceeds maximum {max}")]
    InvertedEstimate { min: String, max: String },

    /// Policy validity window ends before it starts
    #[error("Invalid policy window: {0}")]
    InvalidWindow(#[from] TemporalError),

    /// A required identifier or label is blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Two submitted images share an identifier
    #[error("Duplicate image identifier: {0}")]
    DuplicateImage(String),
}

impl ValidationError {
    /// Creates an out-of-range error
    pub fn out_of_range(
        field: &'static str,
        value: impl std::fmt::Display,
        expected: &'static str,
    ) -> Self {
        ValidationError::OutOfRange {
            field,
            value: value.to_string(),
            expected,
        }
    }
}

/// Thresholds that would make the decision matrix incoherent
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: String },

    #[error("{name} must be strictly positive (got {value})")]
    NotPositive { name: &'static str, value: String },

    #[error("{name} must lie within 0..=1 (got {value})")]
    ConfidenceOutOfRange { name: &'static str, value: f64 },

    #[error("flag_threshold {flag} must not exceed reject_threshold {reject}")]
    ThresholdOrder { flag: String, reject: String },

    #[error("{name} must not exceed {max} (got {value})")]
    AboveMaximum {
        name: &'static str,
        value: String,
        max: &'static str,
    },

    #[error("compound_multiplier must be at least 1.0 (got {0})")]
    MultiplierBelowOne(String),

    #[error("compound_failure_threshold must be at least 1")]
    ZeroCompoundTrigger,

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

/// Umbrella error for callers that build inputs and configuration together
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}
