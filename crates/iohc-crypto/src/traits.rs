// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Cryptographic capability traits
//!
//! The engine never owns an entropy source; hosts inject one through
//! [`CryptoRng`]. Platform RNG peripherals, OS randomness and deterministic
//! test generators all fit behind the same trait.

use crate::error::CryptoError;

/// Cryptographically secure random number generator capability
///
/// Challenge nonces go on the air; implementations must be suitable for
/// security use, not merely statistical use.
pub trait CryptoRng {
    /// Fill buffer with random bytes
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::RngFailure` if the underlying source fails.
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), CryptoError>;

    /// Generate a random u32
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::RngFailure` if the underlying source fails.
    fn next_u32(&mut self) -> Result<u32, CryptoError> {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }
}

/// Constant-time comparison
///
/// Compares two byte slices in time independent of where they first differ.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}
