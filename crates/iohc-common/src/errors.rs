// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Error types for the iohc protocol engine
//!
//! One flat, `Copy` error enum shared by the codec, the crypto layer and the
//! controller. No heap allocation; every variant carries at most a small
//! scalar of context.
//!
//! Two policies from the protocol are encoded here rather than left to
//! callers' judgement:
//!
//! - Parse and CRC failures are indistinguishable from band noise and are
//!   classified as *noise* ([`Error::is_noise`]); receive paths drop them
//!   without surfacing anything.
//! - MAC failures are authentication events and are always surfaced.

use core::fmt;

/// Result type alias for iohc operations
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the iohc protocol engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Frame codec errors (0x01xx)
    // =========================================================================
    /// Buffer shorter than the minimum frame or the claimed frame length
    FrameTooShort,
    /// Frame longer than the protocol maximum
    FrameTooLong,
    /// Length field disagrees with a representable parameter length
    LengthMismatch,
    /// Command parameters exceed the 21-byte maximum
    ParamsOverflow,
    /// Output buffer too small for serialization
    BufferTooSmall,

    // =========================================================================
    // Validation errors (0x02xx)
    // =========================================================================
    /// CRC-16 check failed
    BadCrc,
    /// MAC verification failed
    BadMac,
    /// 2W operation attempted without a challenge
    ChallengeRequired,

    // =========================================================================
    // Link errors (0x03xx)
    // =========================================================================
    /// Physical layer returned a non-OK status code
    Radio(i16),
    /// API used before `begin`
    NotInitialized,
    /// Challenge or discovery window expired
    Timeout,
    /// Discovery table is full
    DiscoveryFull,

    // =========================================================================
    // General errors (0xFFxx)
    // =========================================================================
    /// Random number generator failure
    RngFailure,
    /// Invalid key format or size
    InvalidKey,
    /// Invalid parameter provided
    InvalidParameter,
    /// Operation not valid in the current state
    InvalidState,
}

impl Error {
    /// Get the error code for this error
    ///
    /// Codes are grouped by category:
    /// - 0x01xx: frame codec
    /// - 0x02xx: validation / authentication
    /// - 0x03xx: link and radio
    /// - 0xFFxx: general
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::FrameTooShort => 0x0101,
            Self::FrameTooLong => 0x0102,
            Self::LengthMismatch => 0x0103,
            Self::ParamsOverflow => 0x0104,
            Self::BufferTooSmall => 0x0105,

            Self::BadCrc => 0x0201,
            Self::BadMac => 0x0202,
            Self::ChallengeRequired => 0x0203,

            Self::Radio(_) => 0x0301,
            Self::NotInitialized => 0x0302,
            Self::Timeout => 0x0303,
            Self::DiscoveryFull => 0x0304,

            Self::RngFailure => 0xFF01,
            Self::InvalidKey => 0xFF02,
            Self::InvalidParameter => 0xFF03,
            Self::InvalidState => 0xFF04,
        }
    }

    /// Whether this error is indistinguishable from air noise
    ///
    /// Noise-class errors (truncated frames, length garbage, CRC failures)
    /// are the common case on a shared sub-GHz band and must be dropped
    /// silently by receive paths. Everything else is surfaced.
    #[must_use]
    pub const fn is_noise(&self) -> bool {
        matches!(
            self,
            Self::FrameTooShort | Self::FrameTooLong | Self::LengthMismatch | Self::BadCrc
        )
    }

    /// Whether this error indicates a failed authentication
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::BadMac | Self::ChallengeRequired)
    }

    /// Get a short description of the error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::FrameTooShort => "frame too short",
            Self::FrameTooLong => "frame too long",
            Self::LengthMismatch => "length field mismatch",
            Self::ParamsOverflow => "parameters too large",
            Self::BufferTooSmall => "buffer too small",
            Self::BadCrc => "CRC check failed",
            Self::BadMac => "MAC verification failed",
            Self::ChallengeRequired => "challenge required",
            Self::Radio(_) => "radio error",
            Self::NotInitialized => "not initialized",
            Self::Timeout => "timeout",
            Self::DiscoveryFull => "discovery table full",
            Self::RngFailure => "RNG failure",
            Self::InvalidKey => "invalid key",
            Self::InvalidParameter => "invalid parameter",
            Self::InvalidState => "invalid state",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radio(status) => {
                write!(f, "[0x{:04X}] {} ({})", self.code(), self.description(), status)
            }
            _ => write!(f, "[0x{:04X}] {}", self.code(), self.description()),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[0x{:04X}] {}", self.code(), self.description());
    }
}
