// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Physical layer abstraction
//!
//! The engine owns exactly one radio through this trait; there is no
//! process-wide radio state. Drivers for concrete transceivers (SX127x,
//! RFM69, Si446x and the like) implement it and report failures as
//! [`Error::Radio`] with their native status code.

use iohc_common::{Error, Result};

/// Channel scan outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelScan {
    /// Preamble detected; a packet should be readable
    PreambleDetected,
    /// Nothing heard on the channel
    Clear,
}

/// Bit encoding on the air
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Non-return-to-zero (io-homecontrol uses this)
    Nrz,
    /// Manchester encoding
    Manchester,
    /// Whitening
    Whitening,
}

/// TX pulse shaping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shaping {
    /// No shaping (io-homecontrol uses this)
    None,
    /// Gaussian, BT = 0.5
    Gaussian05,
    /// Gaussian, BT = 1.0
    Gaussian10,
}

/// Sub-GHz FSK transceiver interface
///
/// All operations may block for a bounded, driver-governed time. The
/// `scan_channel` / `read_data` pair is the polled receive path: scan
/// reports a preamble, read drains the packet. Whether preamble detection
/// is the right "packet available" signal is transceiver-specific; drivers
/// for chips without a preamble IRQ should synthesize the equivalent.
pub trait PhysicalLayer {
    /// Tune the carrier frequency in MHz
    fn set_frequency(&mut self, mhz: f32) -> Result<()>;

    /// Set TX output power in dBm
    ///
    /// Drivers reject levels outside their capability with an error;
    /// callers step down from the regulatory maximum until accepted.
    fn set_output_power(&mut self, dbm: i8) -> Result<()>;

    /// Set FSK bit rate (kbps) and frequency deviation (kHz)
    fn set_data_rate(&mut self, bit_rate_kbps: f32, freq_deviation_khz: f32) -> Result<()>;

    /// Set the bit encoding
    fn set_encoding(&mut self, encoding: Encoding) -> Result<()>;

    /// Set TX pulse shaping
    fn set_shaping(&mut self, shaping: Shaping) -> Result<()>;

    /// Set the sync word, first byte transmitted first
    fn set_sync_word(&mut self, word: &[u8]) -> Result<()>;

    /// Set the preamble length in bytes
    fn set_preamble_length(&mut self, bytes: u16) -> Result<()>;

    /// Enter continuous receive mode
    fn start_receive(&mut self) -> Result<()>;

    /// Enter standby mode
    fn standby(&mut self) -> Result<()>;

    /// Probe the channel for an incoming packet
    fn scan_channel(&mut self) -> Result<ChannelScan>;

    /// Read a received packet into `buf`, returning its length
    fn read_data(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Transmit a packet
    fn transmit(&mut self, data: &[u8]) -> Result<()>;

    /// RSSI of the last reception in dBm
    fn rssi(&mut self) -> i16;

    /// SNR of the last reception in dB
    fn snr(&mut self) -> f32;
}

/// Step TX power down from `start_dbm` until the driver accepts a level
///
/// Regulatory ceilings differ per transceiver and board; the protocol asks
/// for the maximum legal power, so configuration starts high and backs off.
///
/// # Errors
///
/// Returns the driver's last error if no level down to 0 dBm is accepted.
pub fn negotiate_output_power<R: PhysicalLayer>(radio: &mut R, start_dbm: i8) -> Result<i8> {
    let mut power = start_dbm;
    let mut last_err = Error::Radio(0);

    while power >= 0 {
        match radio.set_output_power(power) {
            Ok(()) => return Ok(power),
            Err(e) => last_err = e,
        }
        power -= 1;
    }

    Err(last_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts nothing above a fixed ceiling.
    struct CappedRadio {
        max_dbm: i8,
        attempts: u8,
    }

    impl PhysicalLayer for CappedRadio {
        fn set_frequency(&mut self, _mhz: f32) -> Result<()> {
            Ok(())
        }
        fn set_output_power(&mut self, dbm: i8) -> Result<()> {
            self.attempts += 1;
            if dbm > self.max_dbm {
                Err(Error::Radio(-13))
            } else {
                Ok(())
            }
        }
        fn set_data_rate(&mut self, _b: f32, _d: f32) -> Result<()> {
            Ok(())
        }
        fn set_encoding(&mut self, _e: Encoding) -> Result<()> {
            Ok(())
        }
        fn set_shaping(&mut self, _s: Shaping) -> Result<()> {
            Ok(())
        }
        fn set_sync_word(&mut self, _w: &[u8]) -> Result<()> {
            Ok(())
        }
        fn set_preamble_length(&mut self, _b: u16) -> Result<()> {
            Ok(())
        }
        fn start_receive(&mut self) -> Result<()> {
            Ok(())
        }
        fn standby(&mut self) -> Result<()> {
            Ok(())
        }
        fn scan_channel(&mut self) -> Result<ChannelScan> {
            Ok(ChannelScan::Clear)
        }
        fn read_data(&mut self, _buf: &mut [u8]) -> Result<usize> {
            Ok(0)
        }
        fn transmit(&mut self, _data: &[u8]) -> Result<()> {
            Ok(())
        }
        fn rssi(&mut self) -> i16 {
            -80
        }
        fn snr(&mut self) -> f32 {
            8.0
        }
    }

    #[test]
    fn test_power_negotiation_steps_down() {
        let mut radio = CappedRadio { max_dbm: 14, attempts: 0 };
        assert_eq!(negotiate_output_power(&mut radio, 20), Ok(14));
        assert_eq!(radio.attempts, 7);
    }

    #[test]
    fn test_power_negotiation_exhausts() {
        let mut radio = CappedRadio { max_dbm: -5, attempts: 0 };
        assert_eq!(negotiate_output_power(&mut radio, 3), Err(Error::Radio(-13)));
    }
}
