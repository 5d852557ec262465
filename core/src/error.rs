//! Error types for the privacy core
//!
//! Messages carry public context only (lengths, indices, curve names).
//! Secret material never reaches an error value.

use thiserror::Error;

use crate::curve::Curve;

/// Result type for privacy core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds surfaced by every operation in this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed point or scalar bytes
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(&'static str),

    /// Amount exceeds the protocol bound
    #[error("Value out of range: {value} exceeds maximum {max}")]
    ValueOutOfRange { value: u128, max: u128 },

    /// Zero scalar or identity point produced; the caller must resample
    #[error("Degenerate key material - resample and retry")]
    DegenerateKey,

    /// Operands belong to different curves
    #[error("Curve mismatch: expected {expected}, found {found}")]
    CurveMismatch { expected: Curve, found: Curve },

    /// Meta-address is malformed or uses invalid keys
    #[error("Invalid stealth meta-address: {0}")]
    InvalidMetaAddress(String),

    /// Conditional disclosure trigger has not fired yet
    #[error("Disclosure conditions not met")]
    NotRevealable,

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Authenticated decryption failed
    #[error(transparent)]
    Decrypt(#[from] DecryptError),

    /// Threshold split or reconstruction failed
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}

/// AEAD authentication failure
///
/// Deliberately a single variant: a wrong key and tampered data are
/// indistinguishable to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Decryption failed - wrong key or corrupted payload")]
pub struct DecryptError;

/// Threshold sharing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThresholdError {
    /// Fewer valid shares than the threshold
    #[error("Insufficient shares: need {required}, got {provided}")]
    InsufficientShares { required: u8, provided: usize },

    /// A share failed its verification commitment or is inconsistent with the set
    #[error("Invalid share at index {index}")]
    InvalidShare { index: u8 },

    /// Threshold parameters out of range (1 <= t <= n <= 255)
    #[error("Invalid threshold parameters: t={threshold}, n={total}")]
    InvalidParameters { threshold: u8, total: u8 },
}
