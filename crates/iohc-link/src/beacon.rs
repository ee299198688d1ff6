// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! 2W beacon tracking
//!
//! A beacon is any frame with ctrl1 bit 7 set. Two-way nodes advertise
//! with them; a controller uses the most recent one to judge whether a
//! peer is in range and its timing is fresh enough to talk to.

use crate::frame::Frame;
use heapless::Vec;
use iohc_common::consts::FRAME_MAX_DATA_SIZE;
use iohc_common::{Millis, NodeId, SignalQuality};

/// Beacon type, taken from the first data byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BeaconKind {
    /// Synchronization beacon
    Sync = 0x00,
    /// Discovery announcement
    Discovery = 0x01,
    /// System announcement
    System = 0x02,
}

impl BeaconKind {
    /// Decode from the first data byte; unknown values and empty payloads
    /// read as sync beacons
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0x01 => Self::Discovery,
            0x02 => Self::System,
            _ => Self::Sync,
        }
    }
}

/// A recorded beacon
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconInfo {
    /// Advertising node
    pub node: NodeId,
    /// Beacon type
    pub kind: BeaconKind,
    /// Beacon payload
    pub data: Vec<u8, FRAME_MAX_DATA_SIZE>,
    /// Signal quality at reception
    pub signal: SignalQuality,
    /// Reception timestamp
    pub received_at: Millis,
}

/// Most-recent-beacon cache
#[derive(Debug, Default)]
pub struct BeaconTracker {
    last: Option<BeaconInfo>,
}

impl BeaconTracker {
    /// Create an empty tracker
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Record a frame if it is a beacon
    ///
    /// Returns false for non-beacon frames, which are left to other
    /// consumers.
    pub fn observe(&mut self, frame: &Frame, signal: SignalQuality, now: Millis) -> bool {
        if !frame.is_beacon() {
            return false;
        }

        let kind = match frame.params().first() {
            Some(&byte) => BeaconKind::from_u8(byte),
            None => BeaconKind::Sync,
        };

        let mut data = Vec::new();
        // Frame parameters never exceed the vector capacity.
        let _ = data.extend_from_slice(frame.params());

        self.last = Some(BeaconInfo {
            node: frame.src(),
            kind,
            data,
            signal,
            received_at: now,
        });
        true
    }

    /// The most recent beacon, if any was ever received
    #[must_use]
    pub const fn last(&self) -> Option<&BeaconInfo> {
        self.last.as_ref()
    }

    /// Whether a beacon arrived within `timeout` of `now`
    #[must_use]
    pub fn has_recent(&self, now: Millis, timeout: Millis) -> bool {
        match &self.last {
            Some(info) => now.since(info.received_at) <= timeout,
            None => false,
        }
    }

    /// Time since the last beacon; `None` when none was ever received
    #[must_use]
    pub fn time_since(&self, now: Millis) -> Option<Millis> {
        self.last.as_ref().map(|info| now.since(info.received_at))
    }

    /// Forget the cached beacon
    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iohc_common::Mode;

    const PEER: NodeId = NodeId::new([0x44, 0x55, 0x66]);
    const US: NodeId = NodeId::new([0xAA, 0xBB, 0xCC]);

    fn beacon_frame(data: &[u8]) -> Frame {
        let mut frame = Frame::new(Mode::TwoWay, NodeId::BROADCAST, PEER);
        frame.set_command(0x00, data).unwrap();
        frame.set_beacon(true);
        frame
    }

    fn signal() -> SignalQuality {
        SignalQuality::new(-80, 7.0)
    }

    #[test]
    fn test_non_beacon_ignored() {
        let mut tracker = BeaconTracker::new();
        let plain = Frame::new(Mode::TwoWay, US, PEER);
        assert!(!tracker.observe(&plain, signal(), Millis::ZERO));
        assert!(tracker.last().is_none());
    }

    #[test]
    fn test_beacon_recorded_with_kind() {
        let mut tracker = BeaconTracker::new();
        assert!(tracker.observe(&beacon_frame(&[0x02, 0x99]), signal(), Millis::new(50)));

        let info = tracker.last().unwrap();
        assert_eq!(info.node, PEER);
        assert_eq!(info.kind, BeaconKind::System);
        assert_eq!(info.data.as_slice(), &[0x02, 0x99]);
        assert_eq!(info.received_at, Millis::new(50));
    }

    #[test]
    fn test_empty_payload_defaults_to_sync() {
        let mut tracker = BeaconTracker::new();
        tracker.observe(&beacon_frame(&[]), signal(), Millis::ZERO);
        assert_eq!(tracker.last().unwrap().kind, BeaconKind::Sync);
    }

    #[test]
    fn test_unknown_kind_reads_as_sync() {
        assert_eq!(BeaconKind::from_u8(0x7F), BeaconKind::Sync);
        assert_eq!(BeaconKind::from_u8(0x01), BeaconKind::Discovery);
    }

    #[test]
    fn test_freshness_window() {
        let mut tracker = BeaconTracker::new();
        assert!(!tracker.has_recent(Millis::new(1_000), Millis::from_secs(5)));

        tracker.observe(&beacon_frame(&[0x00]), signal(), Millis::new(1_000));
        assert!(tracker.has_recent(Millis::new(5_999), Millis::from_secs(5)));
        assert!(tracker.has_recent(Millis::new(6_000), Millis::from_secs(5)));
        assert!(!tracker.has_recent(Millis::new(6_001), Millis::from_secs(5)));
    }

    #[test]
    fn test_time_since() {
        let mut tracker = BeaconTracker::new();
        assert_eq!(tracker.time_since(Millis::new(99)), None);

        tracker.observe(&beacon_frame(&[]), signal(), Millis::new(100));
        assert_eq!(tracker.time_since(Millis::new(350)), Some(Millis::new(250)));
    }

    #[test]
    fn test_newer_beacon_replaces() {
        let mut tracker = BeaconTracker::new();
        tracker.observe(&beacon_frame(&[0x00]), signal(), Millis::new(10));
        tracker.observe(&beacon_frame(&[0x01]), signal(), Millis::new(20));

        let info = tracker.last().unwrap();
        assert_eq!(info.kind, BeaconKind::Discovery);
        assert_eq!(info.received_at, Millis::new(20));
    }
}
