// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! io-homecontrol protocol constants
//!
//! Frame geometry, control-byte bit layout, command identifiers and the
//! physical-layer air profile. Values are interop-defining: they must match
//! deployed actuators bit for bit.

// =============================================================================
// Physical layer
// =============================================================================

/// Channel 1 center frequency in MHz (2W only)
pub const FREQUENCY_CHANNEL_1_MHZ: f32 = 868.25;
/// Channel 2 center frequency in MHz (1W/2W primary)
pub const FREQUENCY_CHANNEL_2_MHZ: f32 = 868.95;
/// Channel 3 center frequency in MHz (2W only)
pub const FREQUENCY_CHANNEL_3_MHZ: f32 = 869.85;

/// FSK bit rate in kbps
pub const BIT_RATE_KBPS: f32 = 38.4;
/// FSK frequency deviation in kHz
pub const FREQ_DEVIATION_KHZ: f32 = 19.2;
/// Preamble length in bits
pub const PREAMBLE_LENGTH_BITS: u16 = 512;

/// Sync word value, serialized MSB-first over [`SYNC_WORD_LEN`] bytes
pub const SYNC_WORD: u32 = 0xFF33;
/// Sync word length in bytes
pub const SYNC_WORD_LEN: usize = 3;

/// 2W channel dwell time in microseconds
pub const CHANNEL_HOP_INTERVAL_US: u64 = 2_700;

/// Initial TX power in dBm; stepped down until the transceiver accepts
pub const INITIAL_TX_POWER_DBM: i8 = 20;

// =============================================================================
// Frame geometry
// =============================================================================

/// Minimum frame size in bytes
pub const FRAME_MIN_SIZE: usize = 11;
/// Maximum frame size in bytes
pub const FRAME_MAX_SIZE: usize = 32;
/// Maximum command parameter length in bytes
pub const FRAME_MAX_DATA_SIZE: usize = 21;

/// Control byte pair size
pub const CTRL_BYTE_SIZE: usize = 2;
/// Node address size
pub const NODE_ID_SIZE: usize = 3;
/// Command identifier size
pub const COMMAND_ID_SIZE: usize = 1;
/// Rolling code size (1W only)
pub const ROLLING_CODE_SIZE: usize = 2;
/// Truncated MAC size
pub const MAC_SIZE: usize = 6;
/// CRC size
pub const CRC_SIZE: usize = 2;

/// Offset of control byte 0
pub const OFFSET_CTRL_BYTE_0: usize = 0;
/// Offset of control byte 1
pub const OFFSET_CTRL_BYTE_1: usize = 1;
/// Offset of the destination address
pub const OFFSET_DEST_NODE: usize = 2;
/// Offset of the source address
pub const OFFSET_SRC_NODE: usize = 5;
/// Offset of the command identifier
pub const OFFSET_COMMAND_ID: usize = 8;
/// Offset of the command parameters
pub const OFFSET_DATA: usize = 9;

// =============================================================================
// Control byte 0
// =============================================================================

/// ctrl0 bits 7-6: order field
pub const CTRL0_ORDER_MASK: u8 = 0xC0;
/// ctrl0 bit 5: protocol mode (0 = 1W, 1 = 2W)
pub const CTRL0_PROTOCOL_MASK: u8 = 0x20;
/// ctrl0 bits 4-0: frame length field
pub const CTRL0_LENGTH_MASK: u8 = 0x1F;

// =============================================================================
// Control byte 1
// =============================================================================

/// ctrl1 bit 7: beacon frame
pub const CTRL1_USE_BEACON: u8 = 0x80;
/// ctrl1 bit 6: routed frame
pub const CTRL1_ROUTED: u8 = 0x40;
/// ctrl1 bit 5: low-power node
pub const CTRL1_LOW_POWER: u8 = 0x20;
/// ctrl1 bit 4: ACK request (1W) / priority (2W)
///
/// The two meanings share one mask; the engine exposes the bit without
/// interpreting it.
pub const CTRL1_ACK: u8 = 0x10;
/// ctrl1 bits 3-0: protocol version
pub const CTRL1_PROTOCOL_VERSION: u8 = 0x0F;

// =============================================================================
// Cryptography
// =============================================================================

/// AES-128 key size in bytes
pub const AES_KEY_SIZE: usize = 16;
/// AES block size in bytes
pub const AES_BLOCK_SIZE: usize = 16;
/// MAC IV size in bytes
pub const IV_SIZE: usize = 16;

/// IV padding byte
pub const IV_PADDING: u8 = 0x55;

/// Transfer key: fixed, publicly known, used only to mask the system key
/// during pairing
pub const TRANSFER_KEY: [u8; AES_KEY_SIZE] = [
    0x34, 0xC3, 0x46, 0x6E, 0xD8, 0x8F, 0x4E, 0x8E,
    0x16, 0xAA, 0x47, 0x39, 0x49, 0x88, 0x43, 0x73,
];

/// CRC-16/KERMIT reflected polynomial
pub const CRC_POLYNOMIAL: u16 = 0x8408;
/// CRC-16/KERMIT initial value
pub const CRC_INITIAL: u16 = 0x0000;

// =============================================================================
// Command identifiers
// =============================================================================

/// Discover actuators (broadcast)
pub const CMD_DISCOVER_ACTUATOR: u8 = 0x28;
/// Discover sensors (broadcast)
pub const CMD_DISCOVER_SENSOR: u8 = 0x29;
/// Discover beacons (broadcast)
pub const CMD_DISCOVER_BEACON: u8 = 0x2A;
/// Discover controllers (broadcast)
pub const CMD_DISCOVER_CONTROLLER: u8 = 0x2B;

/// Key transfer, 1W variant
pub const CMD_KEY_TRANSFER_1W: u8 = 0x30;
/// Key transfer, 2W variant
pub const CMD_KEY_TRANSFER_2W: u8 = 0x31;

/// Challenge request (2W)
pub const CMD_CHALLENGE_REQUEST: u8 = 0x3C;
/// Challenge response (2W)
pub const CMD_CHALLENGE_RESPONSE: u8 = 0x3D;

/// Read node name
pub const CMD_GET_NAME: u8 = 0x50;
/// Write node name
pub const CMD_SET_NAME: u8 = 0x51;
/// Read node info
pub const CMD_GET_INFO: u8 = 0x52;
/// Write node info
pub const CMD_SET_INFO: u8 = 0x53;

/// Set actuator position (TBD against live devices)
pub const CMD_SET_POSITION: u8 = 0x60;
/// Stop actuator movement (TBD against live devices)
pub const CMD_STOP: u8 = 0x61;
/// Open actuator (TBD against live devices)
pub const CMD_OPEN: u8 = 0x62;
/// Close actuator (TBD against live devices)
pub const CMD_CLOSE: u8 = 0x63;

/// Enter bootloader
pub const CMD_BOOTLOADER_START: u8 = 0xE0;
/// Bootloader data block
pub const CMD_BOOTLOADER_DATA: u8 = 0xE1;

/// Service ping
pub const CMD_SERVICE_PING: u8 = 0xF0;
/// Service reset
pub const CMD_SERVICE_RESET: u8 = 0xF1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_geometry_consistency() {
        // Header through command id must land on the data offset.
        assert_eq!(
            CTRL_BYTE_SIZE + 2 * NODE_ID_SIZE + COMMAND_ID_SIZE,
            OFFSET_DATA
        );
        assert_eq!(FRAME_MIN_SIZE + FRAME_MAX_DATA_SIZE, FRAME_MAX_SIZE);
    }

    #[test]
    fn test_length_field_covers_max_frame() {
        assert!(FRAME_MAX_SIZE - FRAME_MIN_SIZE <= CTRL0_LENGTH_MASK as usize);
    }
}
