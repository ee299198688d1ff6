// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Configuration structures for the iohc protocol engine
//!
//! Everything here is compile-time constant data: the io-homecontrol air
//! profile and the link-layer timing defaults. Hosts override individual
//! fields only for bench or regulatory testing; production nodes run the
//! defaults.

use crate::consts;
use crate::time::{Micros, Millis};

/// Physical-layer air profile applied by `configure_radio`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadioProfile {
    /// Center frequency in MHz
    pub frequency_mhz: f32,
    /// FSK bit rate in kbps
    pub bit_rate_kbps: f32,
    /// FSK frequency deviation in kHz
    pub freq_deviation_khz: f32,
    /// Sync word bytes, MSB first
    pub sync_word: [u8; consts::SYNC_WORD_LEN],
    /// Preamble length in bytes
    pub preamble_len_bytes: u16,
    /// Initial TX power in dBm, stepped down until the transceiver accepts
    pub initial_power_dbm: i8,
}

impl RadioProfile {
    /// The io-homecontrol air profile on the primary channel
    pub const DEFAULT: Self = Self {
        frequency_mhz: consts::FREQUENCY_CHANNEL_2_MHZ,
        bit_rate_kbps: consts::BIT_RATE_KBPS,
        freq_deviation_khz: consts::FREQ_DEVIATION_KHZ,
        sync_word: sync_word_bytes(),
        preamble_len_bytes: consts::PREAMBLE_LENGTH_BITS / 8,
        initial_power_dbm: consts::INITIAL_TX_POWER_DBM,
    };

    /// The default profile re-centered on another frequency
    #[must_use]
    pub const fn on_frequency(frequency_mhz: f32) -> Self {
        Self {
            frequency_mhz,
            bit_rate_kbps: Self::DEFAULT.bit_rate_kbps,
            freq_deviation_khz: Self::DEFAULT.freq_deviation_khz,
            sync_word: Self::DEFAULT.sync_word,
            preamble_len_bytes: Self::DEFAULT.preamble_len_bytes,
            initial_power_dbm: Self::DEFAULT.initial_power_dbm,
        }
    }
}

impl Default for RadioProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Sync word serialized MSB-first over three bytes, as reference
/// implementations configure it
const fn sync_word_bytes() -> [u8; consts::SYNC_WORD_LEN] {
    [
        ((consts::SYNC_WORD >> 16) & 0xFF) as u8,
        ((consts::SYNC_WORD >> 8) & 0xFF) as u8,
        (consts::SYNC_WORD & 0xFF) as u8,
    ]
}

/// Link-layer timing defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    /// Challenge-response timeout
    pub challenge_timeout: Millis,
    /// 2W channel dwell time
    pub hop_dwell: Micros,
    /// Default discovery collection window
    pub discovery_timeout: Millis,
}

impl LinkConfig {
    /// Protocol defaults
    pub const DEFAULT: Self = Self {
        challenge_timeout: Millis::new(5_000),
        hop_dwell: Micros::new(consts::CHANNEL_HOP_INTERVAL_US),
        discovery_timeout: Millis::new(10_000),
    };
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
