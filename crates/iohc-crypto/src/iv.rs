// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! MAC IV construction
//!
//! The 16-byte IV binds the MAC to the frame payload and to the replay
//! counter (1W rolling code) or session nonce (2W challenge):
//!
//! ```text
//! [0..8)   payload bytes, right-padded with 0x55 when shorter than 8
//! [8..10)  rolling checksum (c1, c2) over the WHOLE payload
//! 1W:
//! [10..12) rolling code, little-endian
//! [12..16) 0x55 padding
//! 2W:
//! [10..16) challenge
//! ```
//!
//! Note the asymmetry: only the first 8 payload bytes are copied, but the
//! checksum runs over every payload byte, so long payloads still influence
//! the MAC.

use crate::checksum::IvChecksum;
use iohc_common::consts::{IV_PADDING, IV_SIZE, MAC_SIZE, ROLLING_CODE_SIZE};

fn payload_prefix(iv: &mut [u8; IV_SIZE], frame_data: &[u8]) {
    let mut state = IvChecksum::new();
    for (i, &byte) in frame_data.iter().enumerate() {
        state.update(byte);
        if i < 8 {
            iv[i] = byte;
        }
    }
    for slot in iv.iter_mut().take(8).skip(frame_data.len()) {
        *slot = IV_PADDING;
    }

    let (c1, c2) = state.finish();
    iv[8] = c1;
    iv[9] = c2;
}

/// Build the 1W IV from payload and rolling code
#[must_use]
pub fn build_1w(frame_data: &[u8], rolling_code: [u8; ROLLING_CODE_SIZE]) -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    payload_prefix(&mut iv, frame_data);

    iv[10] = rolling_code[0];
    iv[11] = rolling_code[1];
    iv[12..].fill(IV_PADDING);

    iv
}

/// Build the 2W IV from payload and challenge
#[must_use]
pub fn build_2w(frame_data: &[u8], challenge: &[u8; MAC_SIZE]) -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    payload_prefix(&mut iv, frame_data);

    iv[10..].copy_from_slice(challenge);

    iv
}
