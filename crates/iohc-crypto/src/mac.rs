// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Truncated frame MAC
//!
//! MAC = first 6 bytes of AES-128-ECB(system_key, IV). Verification is
//! constant-time: a forged tag and a corrupted tag take the same path.

use crate::block::encrypt_block;
use crate::error::CryptoError;
use crate::iv;
use crate::keys::SystemKey;
use crate::traits::constant_time_eq;
use iohc_common::consts::{MAC_SIZE, ROLLING_CODE_SIZE};

fn truncate(block: [u8; 16]) -> [u8; MAC_SIZE] {
    let mut tag = [0u8; MAC_SIZE];
    tag.copy_from_slice(&block[..MAC_SIZE]);
    tag
}

/// Compute the 1W MAC over `frame_data` (opcode followed by parameters)
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` if the cipher rejects the key.
pub fn compute_1w(
    frame_data: &[u8],
    rolling_code: [u8; ROLLING_CODE_SIZE],
    key: &SystemKey,
) -> Result<[u8; MAC_SIZE], CryptoError> {
    let iv = iv::build_1w(frame_data, rolling_code);
    Ok(truncate(encrypt_block(key.as_bytes(), &iv)?))
}

/// Compute the 2W MAC over `frame_data` (opcode followed by parameters)
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` if the cipher rejects the key.
pub fn compute_2w(
    frame_data: &[u8],
    challenge: &[u8; MAC_SIZE],
    key: &SystemKey,
) -> Result<[u8; MAC_SIZE], CryptoError> {
    let iv = iv::build_2w(frame_data, challenge);
    Ok(truncate(encrypt_block(key.as_bytes(), &iv)?))
}

/// Verify a received MAC
///
/// `seq_or_challenge` is the rolling code (1W, 2 bytes) or the challenge
/// (2W, 6 bytes). Comparison is constant-time across all 6 tag bytes.
///
/// # Errors
///
/// Returns `CryptoError::InvalidLength` if `seq_or_challenge` has the wrong
/// size for the mode, `CryptoError::MacMismatch` if the tag disagrees.
pub fn verify(
    frame_data: &[u8],
    received: &[u8; MAC_SIZE],
    seq_or_challenge: &[u8],
    key: &SystemKey,
    two_way: bool,
) -> Result<(), CryptoError> {
    let computed = if two_way {
        let challenge: &[u8; MAC_SIZE] = seq_or_challenge
            .try_into()
            .map_err(|_| CryptoError::InvalidLength)?;
        compute_2w(frame_data, challenge, key)?
    } else {
        let rolling_code: [u8; ROLLING_CODE_SIZE] = seq_or_challenge
            .try_into()
            .map_err(|_| CryptoError::InvalidLength)?;
        compute_1w(frame_data, rolling_code, key)?
    };

    if constant_time_eq(&computed, received) {
        Ok(())
    } else {
        Err(CryptoError::MacMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SystemKey {
        SystemKey::new([0u8; 16])
    }

    #[test]
    fn test_compute_then_verify_1w() {
        let data = [0x60, 0x32, 0x00];
        let tag = compute_1w(&data, [0x01, 0x00], &key()).unwrap();
        assert!(verify(&data, &tag, &[0x01, 0x00], &key(), false).is_ok());
    }

    #[test]
    fn test_compute_then_verify_2w() {
        let data = [0x3D, 0xAA, 0xBB];
        let challenge = [1, 2, 3, 4, 5, 6];
        let tag = compute_2w(&data, &challenge, &key()).unwrap();
        assert!(verify(&data, &tag, &challenge, &key(), true).is_ok());
    }

    #[test]
    fn test_rolling_code_binds_mac() {
        let data = [0x60, 0x32, 0x00];
        let a = compute_1w(&data, [0x01, 0x00], &key()).unwrap();
        let b = compute_1w(&data, [0x02, 0x00], &key()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rolling_code_wrap_is_unremarkable() {
        let data = [0x60, 0x64, 0x00];
        let at_max = compute_1w(&data, 0xFFFFu16.to_le_bytes(), &key()).unwrap();
        let wrapped = compute_1w(&data, 0x0000u16.to_le_bytes(), &key()).unwrap();
        assert_ne!(at_max, wrapped);
        assert!(verify(&data, &wrapped, &0x0000u16.to_le_bytes(), &key(), false).is_ok());
    }

    #[test]
    fn test_tampered_tag_rejected() {
        let data = [0x60, 0x32, 0x00];
        let mut tag = compute_1w(&data, [0x01, 0x00], &key()).unwrap();
        tag[5] ^= 0x01;
        assert_eq!(
            verify(&data, &tag, &[0x01, 0x00], &key(), false),
            Err(CryptoError::MacMismatch)
        );
    }

    #[test]
    fn test_wrong_key_rejected() {
        let data = [0x61, 0x00];
        let tag = compute_1w(&data, [0x05, 0x00], &key()).unwrap();
        let other = SystemKey::new([0x77u8; 16]);
        assert_eq!(
            verify(&data, &tag, &[0x05, 0x00], &other, false),
            Err(CryptoError::MacMismatch)
        );
    }

    #[test]
    fn test_wrong_nonce_length_rejected() {
        let data = [0x60];
        let tag = compute_1w(&data, [0, 0], &key()).unwrap();
        assert_eq!(
            verify(&data, &tag, &[0, 0, 0], &key(), false),
            Err(CryptoError::InvalidLength)
        );
        assert_eq!(
            verify(&data, &tag, &[0, 0], &key(), true),
            Err(CryptoError::InvalidLength)
        );
    }
}
