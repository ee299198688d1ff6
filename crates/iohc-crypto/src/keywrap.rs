// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Pairing key wrap
//!
//! During pairing the 16-byte system key crosses the air masked by XOR with
//! AES-128(transfer_key, IV). The transfer key is a fixed protocol constant,
//! so this is obfuscation against casual sniffing, not encryption; the
//! construction is dictated by deployed devices.
//!
//! The mask IV differs per mode:
//! - 1W: the target node address repeated across all 16 bytes
//! - 2W: ten `0x55` padding bytes followed by the 6-byte challenge
//!
//! XOR with the same mask twice cancels, so `wrap` is its own inverse.

use crate::block::encrypt_block;
use crate::error::CryptoError;
use crate::keys::SystemKey;
use iohc_common::consts::{AES_KEY_SIZE, IV_PADDING, IV_SIZE, MAC_SIZE, TRANSFER_KEY};
use iohc_common::NodeId;

fn apply_mask(key: &SystemKey, iv: &[u8; IV_SIZE]) -> Result<[u8; AES_KEY_SIZE], CryptoError> {
    let mask = encrypt_block(&TRANSFER_KEY, iv)?;

    // Full-width XOR, no data-dependent exit.
    let mut out = [0u8; AES_KEY_SIZE];
    for i in 0..AES_KEY_SIZE {
        out[i] = key.as_bytes()[i] ^ mask[i];
    }
    Ok(out)
}

/// Wrap (or unwrap) a system key for 1W pairing
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` if the cipher rejects the transfer key.
pub fn wrap_1w(key: &SystemKey, node: NodeId) -> Result<[u8; AES_KEY_SIZE], CryptoError> {
    let mut iv = [0u8; IV_SIZE];
    for (i, slot) in iv.iter_mut().enumerate() {
        *slot = node.as_bytes()[i % NodeId::SIZE];
    }

    apply_mask(key, &iv)
}

/// Wrap (or unwrap) a system key for 2W pairing
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` if the cipher rejects the transfer key.
pub fn wrap_2w(key: &SystemKey, challenge: &[u8; MAC_SIZE]) -> Result<[u8; AES_KEY_SIZE], CryptoError> {
    let mut iv = [IV_PADDING; IV_SIZE];
    iv[10..].copy_from_slice(challenge);

    apply_mask(key, &iv)
}
