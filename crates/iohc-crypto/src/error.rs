// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Error types for cryptographic operations

use core::fmt;

/// Error type for cryptographic operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid key format or size
    InvalidKey,
    /// MAC verification failed
    MacMismatch,
    /// Random number generator failure
    RngFailure,
    /// Buffer is too small for the operation
    BufferTooSmall,
    /// Input length not valid for the operation
    InvalidLength,
}

impl CryptoError {
    /// Get error code for logging
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::InvalidKey => 0x0101,
            Self::MacMismatch => 0x0102,
            Self::RngFailure => 0x0103,
            Self::BufferTooSmall => 0x0104,
            Self::InvalidLength => 0x0105,
        }
    }

    /// Get error description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidKey => "invalid key",
            Self::MacMismatch => "MAC mismatch",
            Self::RngFailure => "RNG failure",
            Self::BufferTooSmall => "buffer too small",
            Self::InvalidLength => "invalid length",
        }
    }
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:04X}] {}", self.code(), self.description())
    }
}

impl From<CryptoError> for iohc_common::Error {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidKey => Self::InvalidKey,
            CryptoError::MacMismatch => Self::BadMac,
            CryptoError::RngFailure => Self::RngFailure,
            CryptoError::BufferTooSmall => Self::BufferTooSmall,
            CryptoError::InvalidLength => Self::InvalidParameter,
        }
    }
}

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;
