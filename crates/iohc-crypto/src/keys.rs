// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Key material wrappers

use iohc_common::consts::AES_KEY_SIZE;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES-128 system key shared among paired nodes
///
/// The root of MAC authentication. Wrapped so the bytes are zeroized on
/// drop and never show up in debug output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SystemKey([u8; AES_KEY_SIZE]);

impl SystemKey {
    /// Create a key from bytes
    #[must_use]
    pub const fn new(bytes: [u8; AES_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a key from a slice
    ///
    /// Returns `None` if the slice length is not exactly 16 bytes.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != AES_KEY_SIZE {
            return None;
        }
        let mut bytes = [0u8; AES_KEY_SIZE];
        bytes.copy_from_slice(slice);
        Some(Self(bytes))
    }

    /// Get the key bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; AES_KEY_SIZE] {
        &self.0
    }
}

impl AsRef<[u8]> for SystemKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SystemKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Never print key bytes.
        write!(f, "SystemKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_length_check() {
        assert!(SystemKey::from_slice(&[0u8; 16]).is_some());
        assert!(SystemKey::from_slice(&[0u8; 15]).is_none());
        assert!(SystemKey::from_slice(&[0u8; 17]).is_none());
    }

    #[test]
    fn test_debug_redacts() {
        let key = SystemKey::new([0xAB; 16]);
        let rendered = std::format!("{key:?}");
        assert!(!rendered.contains("AB"));
    }
}
