// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! io-homecontrol frame codec
//!
//! Wire layout, in transmission order:
//!
//! ```text
//! ctrl0  ctrl1  dest(3)  src(3)  opcode  params(0..21)  [rolling(2)]  mac(6)  crc(2)
//! ```
//!
//! ctrl0 carries the mode bit (bit 5: 0 = 1W, 1 = 2W) and the 5-bit length
//! field. The rolling code is present in 1W frames only. CRC and rolling
//! code are little-endian; addresses and MAC transmit MSB first.
//!
//! Deployed devices compute the length field with the command byte counted
//! twice, so a frame's wire image is one byte shorter than the field
//! claims; parsers recover the parameter count through the same accounting
//! and the two cancel. Both directions here reproduce that arithmetic
//! exactly. It is what the installed base speaks.

use heapless::Vec;
use iohc_common::consts::{
    COMMAND_ID_SIZE, CRC_SIZE, CTRL0_LENGTH_MASK, CTRL0_PROTOCOL_MASK, CTRL1_ACK,
    CTRL1_LOW_POWER, CTRL1_PROTOCOL_VERSION, CTRL1_ROUTED, CTRL1_USE_BEACON,
    FRAME_MAX_DATA_SIZE, FRAME_MAX_SIZE, FRAME_MIN_SIZE, MAC_SIZE, OFFSET_DATA,
    ROLLING_CODE_SIZE,
};
use iohc_common::{Error, Mode, NodeId, Result};
use iohc_crypto::{crc, mac, SystemKey};

/// A protocol frame
///
/// Built field by field and finalized (MAC + CRC) before transmission, or
/// produced by [`Frame::parse`] from received bytes. Frames are ephemeral
/// values; nothing retains them after transmit or delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    ctrl0: u8,
    ctrl1: u8,
    dest: NodeId,
    src: NodeId,
    opcode: u8,
    params: Vec<u8, FRAME_MAX_DATA_SIZE>,
    rolling_code: [u8; ROLLING_CODE_SIZE],
    mac: [u8; MAC_SIZE],
    crc: [u8; CRC_SIZE],
}

impl Frame {
    /// Create an empty frame for the given mode and addresses
    #[must_use]
    pub fn new(mode: Mode, dest: NodeId, src: NodeId) -> Self {
        let ctrl0 = match mode {
            Mode::OneWay => 0x00,
            Mode::TwoWay => CTRL0_PROTOCOL_MASK,
        };

        let mut frame = Self {
            ctrl0,
            ctrl1: 0x00,
            dest,
            src,
            opcode: 0x00,
            params: Vec::new(),
            rolling_code: [0; ROLLING_CODE_SIZE],
            mac: [0; MAC_SIZE],
            crc: [0; CRC_SIZE],
        };
        frame.update_length_field();
        frame
    }

    /// Set the command identifier and parameters
    ///
    /// # Errors
    ///
    /// Returns `Error::ParamsOverflow` for more than 21 parameter bytes.
    pub fn set_command(&mut self, opcode: u8, params: &[u8]) -> Result<()> {
        if params.len() > FRAME_MAX_DATA_SIZE {
            return Err(Error::ParamsOverflow);
        }

        self.opcode = opcode;
        self.params.clear();
        // Length checked above; the push cannot fail.
        let _ = self.params.extend_from_slice(params);

        self.update_length_field();
        Ok(())
    }

    /// Set the rolling code (meaningful in 1W mode only)
    pub fn set_rolling_code(&mut self, code: u16) {
        self.rolling_code = code.to_le_bytes();
    }

    /// Mark or clear the beacon flag (ctrl1 bit 7)
    pub fn set_beacon(&mut self, beacon: bool) {
        if beacon {
            self.ctrl1 |= CTRL1_USE_BEACON;
        } else {
            self.ctrl1 &= !CTRL1_USE_BEACON;
        }
    }

    /// Set or clear ctrl1 bit 4 (ACK request in 1W, priority in 2W)
    pub fn set_ack_priority(&mut self, set: bool) {
        if set {
            self.ctrl1 |= CTRL1_ACK;
        } else {
            self.ctrl1 &= !CTRL1_ACK;
        }
    }

    /// Compute MAC and CRC, completing the frame for transmission
    ///
    /// The MAC covers opcode and parameters, keyed by the system key and
    /// bound to the rolling code (1W) or the caller's challenge (2W). The
    /// CRC then covers the whole wire image before itself.
    ///
    /// # Errors
    ///
    /// - `Error::ChallengeRequired` for a 2W frame without a challenge
    /// - `Error::FrameTooLong` when the frame exceeds the 32-byte protocol
    ///   maximum
    pub fn finalize(&mut self, key: &SystemKey, challenge: Option<&[u8; MAC_SIZE]>) -> Result<()> {
        if self.encoded_len() > FRAME_MAX_SIZE {
            return Err(Error::FrameTooLong);
        }

        let mut frame_data = [0u8; COMMAND_ID_SIZE + FRAME_MAX_DATA_SIZE];
        frame_data[0] = self.opcode;
        frame_data[1..1 + self.params.len()].copy_from_slice(&self.params);
        let data = &frame_data[..COMMAND_ID_SIZE + self.params.len()];

        self.mac = match self.mode() {
            Mode::OneWay => mac::compute_1w(data, self.rolling_code, key)?,
            Mode::TwoWay => {
                let challenge = challenge.ok_or(Error::ChallengeRequired)?;
                mac::compute_2w(data, challenge, key)?
            }
        };

        let mut buf = [0u8; FRAME_MAX_SIZE];
        let len = self.serialize(&mut buf)?;
        let crc = crc::compute(&buf[..len - CRC_SIZE]);
        self.crc = crc.to_le_bytes();

        Ok(())
    }

    /// Serialize the frame into `buf`, returning the wire length
    ///
    /// # Errors
    ///
    /// Returns `Error::BufferTooSmall` if `buf` cannot hold the frame.
    pub fn serialize(&self, buf: &mut [u8]) -> Result<usize> {
        let len = self.wire_len();
        if buf.len() < len {
            return Err(Error::BufferTooSmall);
        }

        buf[0] = self.ctrl0;
        buf[1] = self.ctrl1;
        buf[2..5].copy_from_slice(self.dest.as_bytes());
        buf[5..8].copy_from_slice(self.src.as_bytes());
        buf[8] = self.opcode;

        let mut offset = OFFSET_DATA;
        buf[offset..offset + self.params.len()].copy_from_slice(&self.params);
        offset += self.params.len();

        if self.mode().is_one_way() {
            buf[offset..offset + ROLLING_CODE_SIZE].copy_from_slice(&self.rolling_code);
            offset += ROLLING_CODE_SIZE;
        }

        buf[offset..offset + MAC_SIZE].copy_from_slice(&self.mac);
        offset += MAC_SIZE;
        buf[offset..offset + CRC_SIZE].copy_from_slice(&self.crc);
        offset += CRC_SIZE;

        Ok(offset)
    }

    /// Parse a frame from received bytes
    ///
    /// Trailing bytes beyond the frame are ignored; radios commonly hand
    /// back fixed-size buffers.
    ///
    /// # Errors
    ///
    /// - `Error::FrameTooShort` when the buffer cannot hold the claimed
    ///   frame
    /// - `Error::FrameTooLong` when the length field claims more than the
    ///   protocol maximum
    /// - `Error::LengthMismatch` when the length field implies an invalid
    ///   parameter count
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < FRAME_MIN_SIZE {
            return Err(Error::FrameTooShort);
        }

        let ctrl0 = buf[0];
        let ctrl1 = buf[1];
        let one_way = ctrl0 & CTRL0_PROTOCOL_MASK == 0;

        let encoded_len = (ctrl0 & CTRL0_LENGTH_MASK) as usize + FRAME_MIN_SIZE;
        if encoded_len > FRAME_MAX_SIZE {
            return Err(Error::FrameTooLong);
        }

        let rc_len = if one_way { ROLLING_CODE_SIZE } else { 0 };
        let overhead = OFFSET_DATA + COMMAND_ID_SIZE + rc_len + MAC_SIZE + CRC_SIZE;
        let params_len = encoded_len
            .checked_sub(overhead)
            .ok_or(Error::LengthMismatch)?;
        if params_len > FRAME_MAX_DATA_SIZE {
            return Err(Error::LengthMismatch);
        }

        // Bytes actually on the wire for this frame.
        let needed = OFFSET_DATA + params_len + rc_len + MAC_SIZE + CRC_SIZE;
        if buf.len() < needed {
            return Err(Error::FrameTooShort);
        }

        // Addresses are always present at fixed offsets.
        let dest = NodeId::from_slice(&buf[2..5]).ok_or(Error::FrameTooShort)?;
        let src = NodeId::from_slice(&buf[5..8]).ok_or(Error::FrameTooShort)?;

        let mut params = Vec::new();
        // params_len validated against capacity above.
        let _ = params.extend_from_slice(&buf[OFFSET_DATA..OFFSET_DATA + params_len]);
        let mut offset = OFFSET_DATA + params_len;

        let mut rolling_code = [0u8; ROLLING_CODE_SIZE];
        if one_way {
            rolling_code.copy_from_slice(&buf[offset..offset + ROLLING_CODE_SIZE]);
            offset += ROLLING_CODE_SIZE;
        }

        let mut mac = [0u8; MAC_SIZE];
        mac.copy_from_slice(&buf[offset..offset + MAC_SIZE]);
        offset += MAC_SIZE;

        let mut crc = [0u8; CRC_SIZE];
        crc.copy_from_slice(&buf[offset..offset + CRC_SIZE]);

        Ok(Self {
            ctrl0,
            ctrl1,
            dest,
            src,
            opcode: buf[8],
            params,
            rolling_code,
            mac,
            crc,
        })
    }

    /// Validate CRC and, when a key is supplied, the MAC
    ///
    /// Broadcast frames get no exemption: the same checks apply.
    ///
    /// # Errors
    ///
    /// - `Error::BadCrc` on CRC mismatch (noise-class; callers drop
    ///   silently)
    /// - `Error::BadMac` on MAC mismatch (always surfaced)
    /// - `Error::ChallengeRequired` when MAC-checking a 2W frame without a
    ///   challenge
    pub fn validate(&self, key: Option<&SystemKey>, challenge: Option<&[u8; MAC_SIZE]>) -> Result<()> {
        let mut buf = [0u8; FRAME_MAX_SIZE];
        let len = self.serialize(&mut buf)?;
        if !crc::verify(&buf[..len]) {
            return Err(Error::BadCrc);
        }

        let Some(key) = key else {
            return Ok(());
        };

        let mut frame_data = [0u8; COMMAND_ID_SIZE + FRAME_MAX_DATA_SIZE];
        frame_data[0] = self.opcode;
        frame_data[1..1 + self.params.len()].copy_from_slice(&self.params);
        let data = &frame_data[..COMMAND_ID_SIZE + self.params.len()];

        match self.mode() {
            Mode::OneWay => {
                mac::verify(data, &self.mac, &self.rolling_code, key, false)
                    .map_err(|_| Error::BadMac)?;
            }
            Mode::TwoWay => {
                let challenge = challenge.ok_or(Error::ChallengeRequired)?;
                mac::verify(data, &self.mac, challenge, key, true)
                    .map_err(|_| Error::BadMac)?;
            }
        }

        Ok(())
    }

    /// Protocol mode, from ctrl0 bit 5
    #[must_use]
    pub const fn mode(&self) -> Mode {
        if self.ctrl0 & CTRL0_PROTOCOL_MASK == 0 {
            Mode::OneWay
        } else {
            Mode::TwoWay
        }
    }

    /// Destination address
    #[must_use]
    pub const fn dest(&self) -> NodeId {
        self.dest
    }

    /// Source address
    #[must_use]
    pub const fn src(&self) -> NodeId {
        self.src
    }

    /// Command identifier
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Command parameters
    #[must_use]
    pub fn params(&self) -> &[u8] {
        &self.params
    }

    /// Rolling code value (1W frames)
    #[must_use]
    pub const fn rolling_code(&self) -> u16 {
        u16::from_le_bytes(self.rolling_code)
    }

    /// The 6-byte MAC
    #[must_use]
    pub const fn mac(&self) -> &[u8; MAC_SIZE] {
        &self.mac
    }

    /// Raw control byte 0
    #[must_use]
    pub const fn ctrl0(&self) -> u8 {
        self.ctrl0
    }

    /// Raw control byte 1
    #[must_use]
    pub const fn ctrl1(&self) -> u8 {
        self.ctrl1
    }

    /// Whether the beacon flag is set
    #[must_use]
    pub const fn is_beacon(&self) -> bool {
        self.ctrl1 & CTRL1_USE_BEACON != 0
    }

    /// Whether the routed flag is set
    #[must_use]
    pub const fn is_routed(&self) -> bool {
        self.ctrl1 & CTRL1_ROUTED != 0
    }

    /// Whether the low-power flag is set
    #[must_use]
    pub const fn is_low_power(&self) -> bool {
        self.ctrl1 & CTRL1_LOW_POWER != 0
    }

    /// ctrl1 bit 4 (ACK request in 1W, priority in 2W)
    #[must_use]
    pub const fn ack_priority(&self) -> bool {
        self.ctrl1 & CTRL1_ACK != 0
    }

    /// Protocol version field (ctrl1 bits 3-0)
    #[must_use]
    pub const fn protocol_version(&self) -> u8 {
        self.ctrl1 & CTRL1_PROTOCOL_VERSION
    }

    /// Whether the destination is the broadcast address
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self.dest.is_broadcast()
    }

    /// Frame length as encoded in the ctrl0 length field
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let rc_len = if self.mode().is_one_way() {
            ROLLING_CODE_SIZE
        } else {
            0
        };
        OFFSET_DATA + COMMAND_ID_SIZE + self.params.len() + rc_len + MAC_SIZE + CRC_SIZE
    }

    /// Number of bytes this frame occupies on the wire
    #[must_use]
    pub fn wire_len(&self) -> usize {
        self.encoded_len() - 1
    }

    fn update_length_field(&mut self) {
        let field = (self.encoded_len() - FRAME_MIN_SIZE) as u8;
        self.ctrl0 = (self.ctrl0 & !CTRL0_LENGTH_MASK) | (field & CTRL0_LENGTH_MASK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iohc_common::consts::{CMD_SET_POSITION, CMD_STOP};

    const DEST: NodeId = NodeId::new([0x11, 0x22, 0x33]);
    const SRC: NodeId = NodeId::new([0xAA, 0xBB, 0xCC]);

    fn zero_key() -> SystemKey {
        SystemKey::new([0u8; 16])
    }

    fn position_frame() -> Frame {
        let mut frame = Frame::new(Mode::OneWay, DEST, SRC);
        frame.set_command(CMD_SET_POSITION, &[0x32, 0x00]).unwrap();
        frame.set_rolling_code(0x0001);
        frame.finalize(&zero_key(), None).unwrap();
        frame
    }

    #[test]
    fn test_wire_layout_of_position_command() {
        let frame = position_frame();
        let mut buf = [0u8; FRAME_MAX_SIZE];
        let len = frame.serialize(&mut buf).unwrap();

        assert_eq!(len, 21);
        assert_eq!(frame.encoded_len(), 22);
        // Length field: encoded 22 - 11 = 11, mode bit clear.
        assert_eq!(buf[0], 0x0B);
        assert_eq!(buf[1], 0x00);
        assert_eq!(&buf[2..5], &[0x11, 0x22, 0x33]);
        assert_eq!(&buf[5..8], &[0xAA, 0xBB, 0xCC]);
        assert_eq!(buf[8], 0x60);
        assert_eq!(&buf[9..11], &[0x32, 0x00]);
        // Rolling code little-endian.
        assert_eq!(&buf[11..13], &[0x01, 0x00]);
        // MAC matches the crypto layer's answer for the same inputs.
        let expected_mac =
            iohc_crypto::mac::compute_1w(&[0x60, 0x32, 0x00], [0x01, 0x00], &zero_key()).unwrap();
        assert_eq!(&buf[13..19], &expected_mac);
        // Trailing CRC verifies over the whole image.
        assert!(iohc_crypto::crc::verify(&buf[..len]));
    }

    #[test]
    fn test_round_trip() {
        let frame = position_frame();
        let mut buf = [0u8; FRAME_MAX_SIZE];
        let len = frame.serialize(&mut buf).unwrap();

        let parsed = Frame::parse(&buf[..len]).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_round_trip_with_padded_buffer() {
        // Radios hand back fixed-size buffers; trailing bytes are ignored.
        let frame = position_frame();
        let mut buf = [0xEEu8; FRAME_MAX_SIZE];
        frame.serialize(&mut buf).unwrap();

        let parsed = Frame::parse(&buf).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_round_trip_empty_params_both_modes() {
        let mut one_way = Frame::new(Mode::OneWay, DEST, SRC);
        one_way.set_command(CMD_STOP, &[]).unwrap();
        one_way.set_rolling_code(0xFFFF);
        one_way.finalize(&zero_key(), None).unwrap();
        assert_eq!(one_way.encoded_len(), 20);

        let mut buf = [0u8; FRAME_MAX_SIZE];
        let len = one_way.serialize(&mut buf).unwrap();
        assert_eq!(Frame::parse(&buf[..len]).unwrap(), one_way);

        let challenge = [1, 2, 3, 4, 5, 6];
        let mut two_way = Frame::new(Mode::TwoWay, DEST, SRC);
        two_way.set_command(CMD_STOP, &[]).unwrap();
        two_way.finalize(&zero_key(), Some(&challenge)).unwrap();
        assert_eq!(two_way.encoded_len(), 18);

        let len = two_way.serialize(&mut buf).unwrap();
        let parsed = Frame::parse(&buf[..len]).unwrap();
        assert_eq!(parsed, two_way);
        assert!(parsed.validate(Some(&zero_key()), Some(&challenge)).is_ok());
    }

    #[test]
    fn test_length_field_law() {
        for params_len in [0usize, 1, 5, 12] {
            let params = [0x5Au8; 12];
            let mut frame = Frame::new(Mode::OneWay, DEST, SRC);
            frame.set_command(0x01, &params[..params_len]).unwrap();
            assert_eq!(
                frame.encoded_len(),
                (frame.ctrl0() & CTRL0_LENGTH_MASK) as usize + FRAME_MIN_SIZE
            );
        }
    }

    #[test]
    fn test_params_overflow_refused() {
        let mut frame = Frame::new(Mode::OneWay, DEST, SRC);
        assert_eq!(
            frame.set_command(0x60, &[0u8; 22]),
            Err(Error::ParamsOverflow)
        );
    }

    #[test]
    fn test_oversize_frame_refused_at_finalize() {
        // 21 parameter bytes fit the field but push the frame past the
        // 32-byte protocol maximum; the build must refuse.
        let mut frame = Frame::new(Mode::OneWay, DEST, SRC);
        frame.set_command(0x60, &[0u8; 21]).unwrap();
        assert_eq!(frame.finalize(&zero_key(), None), Err(Error::FrameTooLong));
    }

    #[test]
    fn test_2w_without_challenge_refused() {
        let mut frame = Frame::new(Mode::TwoWay, DEST, SRC);
        frame.set_command(0x3C, &[0u8; 6]).unwrap();
        assert_eq!(
            frame.finalize(&zero_key(), None),
            Err(Error::ChallengeRequired)
        );
    }

    #[test]
    fn test_validate_rejects_crc_flip() {
        let frame = position_frame();
        let mut buf = [0u8; FRAME_MAX_SIZE];
        let len = frame.serialize(&mut buf).unwrap();

        buf[len - 2] ^= 0x01;
        let parsed = Frame::parse(&buf[..len]).unwrap();
        assert_eq!(parsed.validate(None, None), Err(Error::BadCrc));
    }

    #[test]
    fn test_validate_rejects_any_single_bit_flip() {
        let frame = position_frame();
        let mut buf = [0u8; FRAME_MAX_SIZE];
        let len = frame.serialize(&mut buf).unwrap();

        for i in 0..len {
            for bit in 0..8 {
                let mut corrupted = buf;
                corrupted[i] ^= 1 << bit;
                // Flips in ctrl0 may change the claimed geometry and fail
                // parsing outright; everything that parses must fail
                // validation on CRC or MAC.
                match Frame::parse(&corrupted[..len]) {
                    Ok(parsed) => {
                        assert!(
                            parsed.validate(Some(&zero_key()), None).is_err(),
                            "flip at byte {i} bit {bit} validated"
                        );
                    }
                    Err(e) => assert!(e.is_noise()),
                }
            }
        }
    }

    #[test]
    fn test_validate_wrong_rolling_code_fails_mac() {
        let frame = position_frame();
        let mut buf = [0u8; FRAME_MAX_SIZE];
        let len = frame.serialize(&mut buf).unwrap();

        let mut other = Frame::parse(&buf[..len]).unwrap();
        other.set_rolling_code(0x0002);
        // CRC no longer matches either, so revalidate on the MAC only by
        // rebuilding CRC over the altered image.
        let mut altered = [0u8; FRAME_MAX_SIZE];
        let altered_len = other.serialize(&mut altered).unwrap();
        let crc = iohc_crypto::crc::compute(&altered[..altered_len - 2]);
        altered[altered_len - 2..altered_len].copy_from_slice(&crc.to_le_bytes());

        let reparsed = Frame::parse(&altered[..altered_len]).unwrap();
        assert_eq!(
            reparsed.validate(Some(&zero_key()), None),
            Err(Error::BadMac)
        );
    }

    #[test]
    fn test_parse_rejects_short_buffer() {
        assert_eq!(Frame::parse(&[0u8; 10]), Err(Error::FrameTooShort));

        // Claimed geometry larger than the bytes actually present.
        let frame = position_frame();
        let mut buf = [0u8; FRAME_MAX_SIZE];
        let len = frame.serialize(&mut buf).unwrap();
        assert_eq!(Frame::parse(&buf[..len - 1]), Err(Error::FrameTooShort));
    }

    #[test]
    fn test_parse_rejects_absurd_length_field() {
        let mut buf = [0u8; FRAME_MAX_SIZE];
        // Length field 31 claims a 42-byte frame.
        buf[0] = 0x1F;
        assert_eq!(Frame::parse(&buf), Err(Error::FrameTooLong));
    }

    #[test]
    fn test_parse_rejects_impossible_params_length() {
        // 2W frame claiming less than its fixed overhead: field 0 means
        // encoded 11, below the 18-byte 2W minimum.
        let mut buf = [0u8; FRAME_MAX_SIZE];
        buf[0] = CTRL0_PROTOCOL_MASK;
        assert_eq!(Frame::parse(&buf), Err(Error::LengthMismatch));
    }

    #[test]
    fn test_beacon_flag() {
        let mut frame = Frame::new(Mode::TwoWay, DEST, SRC);
        assert!(!frame.is_beacon());
        frame.set_beacon(true);
        assert!(frame.is_beacon());
        assert_eq!(frame.ctrl1() & 0x80, 0x80);
        frame.set_beacon(false);
        assert!(!frame.is_beacon());
    }

    #[test]
    fn test_broadcast_detection() {
        let frame = Frame::new(Mode::OneWay, NodeId::BROADCAST, SRC);
        assert!(frame.is_broadcast());
        assert!(!position_frame().is_broadcast());
    }
}
