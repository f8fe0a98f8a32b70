//! Unified error types for seedkey
//!
//! All errors flow through this module so callers (and the CLI's JSON
//! output) see one consistent shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all seedkey operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedKeyError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl SeedKeyError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_word(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidWord, msg)
    }

    pub fn invalid_checksum(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidChecksum, msg)
    }

    pub fn invalid_digest(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidDigest, msg)
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    pub fn insufficient_entropy(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientEntropy, msg)
    }

    pub fn insufficient_randomness(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientRandomness, msg)
    }

    pub fn invalid_bit_length(bits: usize) -> Self {
        Self::new(
            ErrorCode::InvalidBitLength,
            format!("unsupported modulus size: {} bits", bits),
        )
    }

    pub fn invalid_worker_count(workers: i64) -> Self {
        Self::new(
            ErrorCode::InvalidWorkerCount,
            format!("worker count must be -1 or at least 1, got {}", workers),
        )
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfig, msg)
    }

    pub fn worker_pool(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::WorkerPoolFailure, msg)
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Cancelled, msg)
    }

    pub fn primitive(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::PrimitiveFailure, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    /// Validation errors indicate bad input and must never be retried.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::InvalidChecksum
                | ErrorCode::InvalidWord
                | ErrorCode::InvalidWordCount
                | ErrorCode::InvalidDigest
                | ErrorCode::InvalidAddress
                | ErrorCode::InvalidBitLength
                | ErrorCode::InvalidWorkerCount
                | ErrorCode::InvalidConfig
        )
    }
}

impl fmt::Display for SeedKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for SeedKeyError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Mnemonic / input errors
    InvalidChecksum,
    InvalidWord,
    InvalidWordCount,
    InvalidDigest,
    InvalidAddress,

    // Entropy and randomness
    InsufficientEntropy,
    InsufficientRandomness,

    // Key generation configuration
    InvalidBitLength,
    InvalidWorkerCount,
    InvalidConfig,

    // Execution
    WorkerPoolFailure,
    Cancelled,

    // Hash / RSA library errors, passed through opaquely
    PrimitiveFailure,

    // Parse errors
    JsonError,
    HexError,

    // Internal
    Internal,
}

/// Result type alias for seedkey operations
pub type SeedKeyResult<T> = Result<T, SeedKeyError>;

// Conversions from common error types

impl From<bip39::Error> for SeedKeyError {
    fn from(e: bip39::Error) -> Self {
        let code = match e {
            bip39::Error::UnknownWord(_) => ErrorCode::InvalidWord,
            bip39::Error::InvalidChecksum => ErrorCode::InvalidChecksum,
            bip39::Error::BadWordCount(_) => ErrorCode::InvalidWordCount,
            _ => ErrorCode::PrimitiveFailure,
        };
        SeedKeyError::new(code, format!("BIP39 error: {}", e))
    }
}

impl From<rsa::Error> for SeedKeyError {
    fn from(e: rsa::Error) -> Self {
        SeedKeyError::primitive(format!("RSA error: {}", e))
    }
}

impl From<serde_json::Error> for SeedKeyError {
    fn from(e: serde_json::Error) -> Self {
        SeedKeyError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for SeedKeyError {
    fn from(e: hex::FromHexError) -> Self {
        SeedKeyError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<std::io::Error> for SeedKeyError {
    fn from(e: std::io::Error) -> Self {
        SeedKeyError::new(ErrorCode::Internal, e.to_string())
    }
}
