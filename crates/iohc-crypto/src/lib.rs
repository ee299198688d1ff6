// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Cryptographic layer for the iohc protocol engine
//!
//! io-homecontrol authenticates frames with a bespoke construction:
//!
//! 1. A proprietary two-byte rolling checksum over the frame payload
//!    ([`checksum`])
//! 2. A 16-byte IV assembled from payload, checksum and rolling code or
//!    challenge ([`iv`])
//! 3. A 6-byte MAC, the truncated AES-128-ECB encryption of that IV under
//!    the system key ([`mac`])
//!
//! Pairing masks the system key by XOR with an AES encryption under the
//! publicly known transfer key ([`keywrap`]). Frame integrity against air
//! noise is CRC-16/KERMIT ([`crc`]).
//!
//! # Security notes
//!
//! - MAC comparison and key-wrap XOR never short-circuit; comparisons go
//!   through `subtle`.
//! - Key material lives in zeroizing wrappers ([`keys::SystemKey`]).
//! - Challenge generation requires an injected [`traits::CryptoRng`];
//!   there is no fallback randomness source.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod block;
pub mod checksum;
pub mod crc;
pub mod error;
pub mod iv;
pub mod keys;
pub mod keywrap;
pub mod mac;
pub mod traits;

pub use error::{CryptoError, CryptoResult};
pub use keys::SystemKey;
pub use traits::{constant_time_eq, CryptoRng};
