// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! io-homecontrol node controller
//!
//! The public face of the engine: owns the radio, the node identity, the
//! system key and the 1W rolling code, and provides the blocking send API
//! plus the polled receive path.
//!
//! # Receive path
//!
//! `check_received` is a poll: it probes the channel, reads and parses a
//! packet if one is pending, and validates it. Noise-class failures
//! (truncation, length garbage, CRC) return `Ok(None)`; on a shared band
//! they are constant background and indistinguishable from static. MAC
//! failures surface as `Err(BadMac)`. 1W frames are MAC-checked against
//! the system key here; 2W frames are CRC-checked only, because their MAC
//! is bound to a challenge the authenticator owns, and are delivered for
//! it to verify.
//!
//! # Transmit discipline
//!
//! A send atomically stops receive, transmits, and re-arms receive with
//! the same callback. The rolling code increments once the frame clears
//! the codec and is never rolled back on a radio failure: a partially
//! radiated packet must not be repeatable under the same counter.

use crate::frame::Frame;
use crate::radio::{negotiate_output_power, ChannelScan, Encoding, PhysicalLayer, Shaping};
use iohc_common::consts::{CMD_SET_POSITION, CMD_STOP, FRAME_MAX_SIZE};
use iohc_common::log::LogBuffer;
use iohc_common::{log_debug, log_info, log_warn};
use iohc_common::{Error, Millis, Mode, NodeId, RadioProfile, Result, SignalQuality};
use iohc_crypto::SystemKey;

const MODULE: &str = "ctrl";

/// Callback invoked synchronously from `check_received` for valid frames
pub type FrameCallback = fn(&Frame, SignalQuality);

/// A validated received frame with its signal quality
#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    /// The frame
    pub frame: Frame,
    /// RSSI and SNR at reception
    pub signal: SignalQuality,
}

/// io-homecontrol node controller
pub struct Controller<R: PhysicalLayer> {
    radio: R,
    node_id: NodeId,
    key: Option<SystemKey>,
    mode: Mode,
    rolling_code: u16,
    receiving: bool,
    callback: Option<FrameCallback>,
    now: Millis,
    log: LogBuffer,
}

impl<R: PhysicalLayer> Controller<R> {
    /// Create a controller owning `radio`
    ///
    /// The controller is inert until [`Controller::begin`].
    pub fn new(radio: R) -> Self {
        Self {
            radio,
            node_id: NodeId::BROADCAST,
            key: None,
            mode: Mode::OneWay,
            rolling_code: 0,
            receiving: false,
            callback: None,
            now: Millis::ZERO,
            log: LogBuffer::new(),
        }
    }

    /// Initialize node identity, system key and mode
    ///
    /// Idempotent: calling again replaces identity and key.
    pub fn begin(&mut self, node_id: NodeId, key: SystemKey, mode: Mode) {
        self.node_id = node_id;
        self.key = Some(key);
        self.mode = mode;
        log_info!(self.log, self.now, MODULE, "node {} up", node_id);
    }

    /// Update the controller's notion of time, used for log timestamps
    pub fn tick(&mut self, now: Millis) {
        self.now = now;
    }

    /// Apply the io-homecontrol air profile on the given frequency
    ///
    /// FSK 38.4 kbps, 19.2 kHz deviation, NRZ, no shaping, the protocol
    /// sync word and a 64-byte preamble. TX power starts at the regulatory
    /// maximum and steps down until the transceiver accepts a level.
    ///
    /// # Errors
    ///
    /// Surfaces the driver's error when any step fails.
    pub fn configure_radio(&mut self, frequency_mhz: f32) -> Result<()> {
        let profile = RadioProfile::on_frequency(frequency_mhz);

        self.radio.set_frequency(profile.frequency_mhz)?;
        let power = negotiate_output_power(&mut self.radio, profile.initial_power_dbm)?;
        self.radio
            .set_data_rate(profile.bit_rate_kbps, profile.freq_deviation_khz)?;
        self.radio.set_encoding(Encoding::Nrz)?;
        self.radio.set_shaping(Shaping::None)?;
        self.radio.set_sync_word(&profile.sync_word)?;
        self.radio.set_preamble_length(profile.preamble_len_bytes)?;

        log_info!(
            self.log,
            self.now,
            MODULE,
            "radio on {} MHz at {} dBm",
            frequency_mhz,
            power
        );
        Ok(())
    }

    /// Arm the radio for reception
    ///
    /// # Errors
    ///
    /// `Error::NotInitialized` before `begin`; radio errors pass through.
    pub fn start_receive(&mut self, callback: Option<FrameCallback>) -> Result<()> {
        if self.key.is_none() {
            return Err(Error::NotInitialized);
        }

        self.callback = callback;
        self.radio.start_receive()?;
        self.receiving = true;
        Ok(())
    }

    /// Put the radio in standby
    ///
    /// # Errors
    ///
    /// Radio errors pass through.
    pub fn stop_receive(&mut self) -> Result<()> {
        if self.receiving {
            self.radio.standby()?;
            self.receiving = false;
        }
        Ok(())
    }

    /// Poll for a received frame
    ///
    /// Returns `Ok(None)` when nothing valid is pending (idle channel or
    /// noise), `Ok(Some(..))` for a validated frame. The receive callback,
    /// if any, runs synchronously before this returns.
    ///
    /// # Errors
    ///
    /// - `Error::BadMac` when a well-formed frame fails authentication
    /// - `Error::Radio` when the driver fails
    pub fn check_received(&mut self) -> Result<Option<Received>> {
        if !self.receiving {
            return Ok(None);
        }

        if self.radio.scan_channel()? != ChannelScan::PreambleDetected {
            return Ok(None);
        }

        let mut buf = [0u8; FRAME_MAX_SIZE];
        let len = self.radio.read_data(&mut buf)?;

        let frame = match Frame::parse(&buf[..len]) {
            Ok(frame) => frame,
            Err(e) if e.is_noise() => {
                log_debug!(self.log, self.now, MODULE, "dropped noise: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        // 1W frames authenticate against the system key directly. 2W MACs
        // are bound to the authenticator's challenge, so only the CRC is
        // checked before delivery.
        let key = if frame.mode().is_one_way() {
            self.key.as_ref()
        } else {
            None
        };
        match frame.validate(key, None) {
            Ok(()) => {}
            Err(e) if e.is_noise() => {
                log_debug!(self.log, self.now, MODULE, "dropped noise: {}", e);
                return Ok(None);
            }
            Err(e) => {
                log_warn!(self.log, self.now, MODULE, "rx auth failure from {}", frame.src());
                return Err(e);
            }
        }

        let signal = SignalQuality::new(self.radio.rssi(), self.radio.snr());
        if let Some(callback) = self.callback {
            callback(&frame, signal);
        }

        Ok(Some(Received { frame, signal }))
    }

    /// Build, authenticate and transmit a command frame
    ///
    /// In 1W mode the current rolling code is stamped into the frame and
    /// incremented once the codec accepts it.
    ///
    /// # Errors
    ///
    /// - `Error::NotInitialized` before `begin`
    /// - `Error::ParamsOverflow` / `Error::FrameTooLong` for unbuildable
    ///   frames
    /// - `Error::ChallengeRequired` in 2W mode (authenticated sessions
    ///   build their frames through the authenticator)
    /// - `Error::Radio` on transmit failure; the rolling code stays
    ///   incremented
    pub fn send_command(&mut self, dest: NodeId, opcode: u8, params: &[u8]) -> Result<()> {
        let Some(key) = self.key.as_ref() else {
            return Err(Error::NotInitialized);
        };

        let mut frame = Frame::new(self.mode, dest, self.node_id);
        frame.set_command(opcode, params)?;

        if self.mode.is_one_way() {
            frame.set_rolling_code(self.rolling_code);
        }
        frame.finalize(key, None)?;

        if self.mode.is_one_way() {
            self.rolling_code = self.rolling_code.wrapping_add(1);
        }

        self.transmit_frame(&frame)
    }

    /// Command an actuator to a position, 0 (closed) to 100 (open) percent
    ///
    /// # Errors
    ///
    /// As [`Controller::send_command`].
    pub fn set_position(&mut self, dest: NodeId, percent: u8) -> Result<()> {
        log_debug!(self.log, self.now, MODULE, "position {} -> {}", percent, dest);
        self.send_command(dest, CMD_SET_POSITION, &[percent, 0x00])
    }

    /// Fully open an actuator
    ///
    /// # Errors
    ///
    /// As [`Controller::send_command`].
    pub fn open(&mut self, dest: NodeId) -> Result<()> {
        self.set_position(dest, 100)
    }

    /// Fully close an actuator
    ///
    /// # Errors
    ///
    /// As [`Controller::send_command`].
    pub fn close(&mut self, dest: NodeId) -> Result<()> {
        self.set_position(dest, 0)
    }

    /// Stop actuator movement
    ///
    /// # Errors
    ///
    /// As [`Controller::send_command`].
    pub fn stop(&mut self, dest: NodeId) -> Result<()> {
        self.send_command(dest, CMD_STOP, &[0x00])
    }

    /// Current rolling code, for external persistence
    #[must_use]
    pub const fn rolling_code(&self) -> u16 {
        self.rolling_code
    }

    /// Restore the rolling code, typically at boot from persisted state
    pub fn set_rolling_code(&mut self, code: u16) {
        self.rolling_code = code;
    }

    /// This node's address
    #[must_use]
    pub const fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Operating mode
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the radio is armed for reception
    #[must_use]
    pub const fn is_receiving(&self) -> bool {
        self.receiving
    }

    /// RSSI of the last reception
    pub fn rssi(&mut self) -> i16 {
        self.radio.rssi()
    }

    /// SNR of the last reception
    pub fn snr(&mut self) -> f32 {
        self.radio.snr()
    }

    /// Raise log verbosity to debug level (or drop back to info)
    pub fn set_verbose(&mut self, verbose: bool) {
        use iohc_common::log::LogLevel;
        self.log
            .set_min_level(if verbose { LogLevel::Debug } else { LogLevel::Info });
    }

    /// The controller's log buffer, for hosts to drain
    #[must_use]
    pub const fn logs(&self) -> &LogBuffer {
        &self.log
    }

    /// Transmit a finalized frame with the stop/transmit/re-arm discipline
    ///
    /// # Errors
    ///
    /// The transmit error wins over a re-arm error; either surfaces.
    pub fn transmit_frame(&mut self, frame: &Frame) -> Result<()> {
        let mut buf = [0u8; FRAME_MAX_SIZE];
        let len = frame.serialize(&mut buf)?;

        let was_receiving = self.receiving;
        if was_receiving {
            self.stop_receive()?;
        }

        let tx_result = self.radio.transmit(&buf[..len]);

        if was_receiving {
            let rearm = self.start_receive(self.callback);
            tx_result?;
            rearm?;
        } else {
            tx_result?;
        }

        log_debug!(self.log, self.now, MODULE, "tx {} bytes to {}", len, frame.dest());
        Ok(())
    }
}
