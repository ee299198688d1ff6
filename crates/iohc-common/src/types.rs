// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Common types for the iohc protocol engine
//!
//! Node addressing, protocol mode and the io-homecontrol device type table.

use core::fmt;

/// io-homecontrol node address (3 bytes, big-endian on the wire)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId([u8; 3]);

impl NodeId {
    /// Size of a node address in bytes
    pub const SIZE: usize = 3;

    /// The broadcast address `00 00 00`
    pub const BROADCAST: Self = Self([0x00, 0x00, 0x00]);

    /// Create a node address from bytes
    #[must_use]
    pub const fn new(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }

    /// Create a node address from a slice
    ///
    /// Returns `None` if the slice length is not exactly 3 bytes.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != Self::SIZE {
            return None;
        }
        let mut bytes = [0u8; 3];
        bytes.copy_from_slice(slice);
        Some(Self(bytes))
    }

    /// Get the address as a byte array
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }

    /// Check whether this is the broadcast address
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self.0 == [0x00, 0x00, 0x00]
    }
}

impl AsRef<[u8]> for NodeId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 3]> for NodeId {
    fn from(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:02X} {:02X} {:02X})", self.0[0], self.0[1], self.0[2])
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0[0], self.0[1], self.0[2])
    }
}

/// Protocol operating mode
///
/// 1W frames carry a rolling code; 2W frames carry none but participate in
/// challenge-response authentication and channel hopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One-way operation (rolling code)
    OneWay,
    /// Two-way operation (challenge-response, FHSS)
    TwoWay,
}

impl Mode {
    /// Check whether this is one-way mode
    #[must_use]
    pub const fn is_one_way(&self) -> bool {
        matches!(self, Self::OneWay)
    }
}

/// io-homecontrol actuator subtypes
///
/// Values are the on-air device type codes used by discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum DeviceType {
    RollerShutter = 0x00,
    AdjustableSlatShutter = 0x01,
    Screen = 0x02,
    WindowOpener = 0x03,
    VenetianBlind = 0x04,
    ExteriorBlind = 0x05,
    DualShutter = 0x06,
    GarageDoor = 0x07,
    Awning = 0x08,
    Curtain = 0x09,
    Pergola = 0x0A,
    HorizontalAwning = 0x0B,
    ExteriorScreen = 0x0C,
    Light = 0x0D,
    Lock = 0x0E,
    Heating = 0x0F,
    Gate = 0x10,
    Beacon = 0x11,
    Sensor = 0x12,
    /// Unrecognized device type code
    Unknown = 0xFF,
}

impl DeviceType {
    /// Decode a device type from its on-air code
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0x00 => Self::RollerShutter,
            0x01 => Self::AdjustableSlatShutter,
            0x02 => Self::Screen,
            0x03 => Self::WindowOpener,
            0x04 => Self::VenetianBlind,
            0x05 => Self::ExteriorBlind,
            0x06 => Self::DualShutter,
            0x07 => Self::GarageDoor,
            0x08 => Self::Awning,
            0x09 => Self::Curtain,
            0x0A => Self::Pergola,
            0x0B => Self::HorizontalAwning,
            0x0C => Self::ExteriorScreen,
            0x0D => Self::Light,
            0x0E => Self::Lock,
            0x0F => Self::Heating,
            0x10 => Self::Gate,
            0x11 => Self::Beacon,
            0x12 => Self::Sensor,
            _ => Self::Unknown,
        }
    }
}

/// Receive signal quality reported by the physical layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalQuality {
    /// Received signal strength in dBm
    pub rssi_dbm: i16,
    /// Signal-to-noise ratio in dB
    pub snr_db: f32,
}

impl SignalQuality {
    /// Create a new signal quality reading
    #[must_use]
    pub const fn new(rssi_dbm: i16, snr_db: f32) -> Self {
        Self { rssi_dbm, snr_db }
    }
}
