// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! AES-128-ECB block encryption
//!
//! A thin wrapper over the RustCrypto `aes` core. The protocol encrypts
//! exactly one block at a time (the 16-byte MAC IV or the key-wrap IV);
//! there is no chaining and no padding anywhere in io-homecontrol.

use crate::error::CryptoError;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes128;
use iohc_common::consts::AES_BLOCK_SIZE;

/// Encrypt a single block with AES-128
///
/// # Errors
///
/// Returns `CryptoError::InvalidKey` if the cipher rejects the key.
pub fn encrypt_block(
    key: &[u8; AES_BLOCK_SIZE],
    input: &[u8; AES_BLOCK_SIZE],
) -> Result<[u8; AES_BLOCK_SIZE], CryptoError> {
    let cipher = Aes128::new_from_slice(key).map_err(|_| CryptoError::InvalidKey)?;

    let mut block = aes::Block::from(*input);
    cipher.encrypt_block(&mut block);

    Ok(block.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fips197_vector() {
        // FIPS-197 Appendix C.1 equivalent AES-128 known-answer test
        // (NIST ECB-AES128 vector, key 2b7e.., plaintext 6bc1..).
        let key = [
            0x2B, 0x7E, 0x15, 0x16, 0x28, 0xAE, 0xD2, 0xA6,
            0xAB, 0xF7, 0x15, 0x88, 0x09, 0xCF, 0x4F, 0x3C,
        ];
        let plaintext = [
            0x6B, 0xC1, 0xBE, 0xE2, 0x2E, 0x40, 0x9F, 0x96,
            0xE9, 0x3D, 0x7E, 0x11, 0x73, 0x93, 0x17, 0x2A,
        ];
        let expected = [
            0x3A, 0xD7, 0x7B, 0xB4, 0x0D, 0x7A, 0x36, 0x60,
            0xA8, 0x9E, 0xCA, 0xF3, 0x24, 0x66, 0xEF, 0x97,
        ];

        assert_eq!(encrypt_block(&key, &plaintext).unwrap(), expected);
    }

    #[test]
    fn test_deterministic() {
        let key = [0x42u8; 16];
        let input = [0x55u8; 16];
        assert_eq!(
            encrypt_block(&key, &input).unwrap(),
            encrypt_block(&key, &input).unwrap()
        );
    }

    #[test]
    fn test_key_sensitivity() {
        let input = [0x55u8; 16];
        let a = encrypt_block(&[0x00u8; 16], &input).unwrap();
        let b = encrypt_block(&[0x01u8; 16], &input).unwrap();
        assert_ne!(a, b);
    }
}
