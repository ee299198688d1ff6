// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Discovery and pairing
//!
//! Discovery broadcasts a probe (1W, destination `00 00 00`) and collects
//! responders into a bounded table, keyed by source address with
//! duplicates suppressed. Pairing then transfers the system key to a
//! chosen device, masked per the mode's key-wrap variant.

use crate::frame::Frame;
use heapless::Vec;
use iohc_common::consts::{
    CMD_DISCOVER_ACTUATOR, CMD_DISCOVER_BEACON, CMD_DISCOVER_SENSOR, CMD_KEY_TRANSFER_1W,
    CMD_KEY_TRANSFER_2W, MAC_SIZE,
};
use iohc_common::{DeviceType, Millis, Mode, NodeId, Result};
use iohc_crypto::{keywrap, SystemKey};

/// Maximum devices retained per discovery run
pub const MAX_DISCOVERED_DEVICES: usize = 32;

/// Discovery lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    /// Not collecting
    Idle,
    /// Probe sent, collecting responses
    Discovering,
    /// At least one device responded
    Found,
}

/// A device that answered a discovery probe
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredDevice {
    /// Responder address
    pub node: NodeId,
    /// Advertised device type
    pub device_type: DeviceType,
    /// Manufacturer code
    pub manufacturer: u8,
    /// Advertised protocol version
    pub protocol_version: u8,
    /// RSSI of the response
    pub rssi_dbm: i16,
    /// When the response arrived
    pub discovered_at: Millis,
}

/// Discovery and pairing manager
pub struct DiscoveryManager {
    own_node_id: NodeId,
    state: DiscoveryState,
    started_at: Millis,
    timeout: Millis,
    probe_type: u8,
    devices: Vec<DiscoveredDevice, MAX_DISCOVERED_DEVICES>,
}

impl DiscoveryManager {
    /// Create a manager for a controller with the given address
    #[must_use]
    pub const fn new(own_node_id: NodeId) -> Self {
        Self {
            own_node_id,
            state: DiscoveryState::Idle,
            started_at: Millis::ZERO,
            timeout: Millis::ZERO,
            probe_type: 0xFF,
            devices: Vec::new(),
        }
    }

    /// Arm response collection for a device type
    ///
    /// Clears any previous run's table.
    pub fn start_discovery(&mut self, device_type: u8, now: Millis, timeout: Millis) {
        self.state = DiscoveryState::Discovering;
        self.started_at = now;
        self.timeout = timeout;
        self.probe_type = device_type;
        self.devices.clear();
    }

    /// Device type the current run is probing for
    #[must_use]
    pub const fn probe_device_type(&self) -> u8 {
        self.probe_type
    }

    /// Disarm response collection, keeping the table
    pub fn stop_discovery(&mut self) {
        self.state = DiscoveryState::Idle;
    }

    /// Whether the collection window has passed
    #[must_use]
    pub fn is_window_expired(&self, now: Millis) -> bool {
        self.state != DiscoveryState::Idle && now.has_elapsed(self.started_at, self.timeout)
    }

    /// Map a device type to its discovery opcode
    ///
    /// Unrecognized types probe as actuators. `CMD_DISCOVER_CONTROLLER`
    /// has no device type of its own; controllers probing for peers send
    /// it through `send_command` directly.
    #[must_use]
    pub const fn discovery_opcode(device_type: DeviceType) -> u8 {
        match device_type {
            DeviceType::Sensor => CMD_DISCOVER_SENSOR,
            DeviceType::Beacon => CMD_DISCOVER_BEACON,
            _ => CMD_DISCOVER_ACTUATOR,
        }
    }

    /// Build the broadcast probe frame for a device type
    ///
    /// 1W mode, destination `00 00 00`, one parameter byte carrying the
    /// raw device type. The caller finalizes and transmits it through the
    /// controller, which owns key and rolling code.
    ///
    /// # Errors
    ///
    /// Codec errors from command assembly.
    pub fn discovery_request(&self, device_type: u8) -> Result<Frame> {
        let opcode = Self::discovery_opcode(DeviceType::from_u8(device_type));

        let mut frame = Frame::new(Mode::OneWay, NodeId::BROADCAST, self.own_node_id);
        frame.set_command(opcode, &[device_type])?;
        Ok(frame)
    }

    /// Record a discovery response
    ///
    /// Returns true when the device was newly added. Duplicates, responses
    /// outside a collection window and responses past the table capacity
    /// all return false; an expired window flips the state back to idle.
    pub fn handle_response(&mut self, frame: &Frame, rssi_dbm: i16, now: Millis) -> bool {
        if self.state == DiscoveryState::Idle {
            return false;
        }
        if self.is_window_expired(now) {
            self.state = DiscoveryState::Idle;
            return false;
        }

        if self.devices.iter().any(|d| d.node == frame.src()) {
            return false;
        }
        if self.devices.is_full() {
            return false;
        }

        let params = frame.params();
        let (device_type, manufacturer) = if params.len() >= 2 {
            (DeviceType::from_u8(params[0]), params[1])
        } else {
            (DeviceType::RollerShutter, 0)
        };
        let protocol_version = if params.len() >= 3 { params[2] } else { 0 };

        // Capacity checked above; the push cannot fail.
        let _ = self.devices.push(DiscoveredDevice {
            node: frame.src(),
            device_type,
            manufacturer,
            protocol_version,
            rssi_dbm,
            discovered_at: now,
        });
        self.state = DiscoveryState::Found;
        true
    }

    /// Devices collected so far
    #[must_use]
    pub fn devices(&self) -> &[DiscoveredDevice] {
        &self.devices
    }

    /// Number of devices collected so far
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// A collected device by index
    #[must_use]
    pub fn device(&self, index: usize) -> Option<&DiscoveredDevice> {
        self.devices.get(index)
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> DiscoveryState {
        self.state
    }

    /// Build a 1W key-transfer frame (opcode 0x30)
    ///
    /// The payload is the system key masked under the transfer key with
    /// the destination address as IV.
    ///
    /// # Errors
    ///
    /// Crypto errors from the key wrap; codec errors from assembly.
    pub fn key_transfer_1w(&self, dest: NodeId, system_key: &SystemKey) -> Result<Frame> {
        let wrapped = keywrap::wrap_1w(system_key, dest)?;

        let mut frame = Frame::new(Mode::OneWay, dest, self.own_node_id);
        frame.set_command(CMD_KEY_TRANSFER_1W, &wrapped)?;
        Ok(frame)
    }

    /// Build a 2W key-transfer frame (opcode 0x31)
    ///
    /// The payload is the system key masked under the transfer key with
    /// the session challenge in the IV tail.
    ///
    /// # Errors
    ///
    /// Crypto errors from the key wrap; codec errors from assembly.
    pub fn key_transfer_2w(
        &self,
        dest: NodeId,
        system_key: &SystemKey,
        challenge: &[u8; MAC_SIZE],
    ) -> Result<Frame> {
        let wrapped = keywrap::wrap_2w(system_key, challenge)?;

        let mut frame = Frame::new(Mode::TwoWay, dest, self.own_node_id);
        frame.set_command(CMD_KEY_TRANSFER_2W, &wrapped)?;
        Ok(frame)
    }
}
