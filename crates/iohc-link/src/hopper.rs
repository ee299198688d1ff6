// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! 2W frequency hopping
//!
//! Two-way nodes rotate across three channels with a 2.7 ms dwell:
//! 868.95 MHz (primary) -> 869.85 -> 868.25 -> back to primary.
//!
//! The hopper is a pure timing state machine. `update` reports when the
//! dwell has elapsed; the caller re-tunes the radio on a true return.
//! Tuning latency varies per transceiver, so the hardware driver is the
//! right place to coalesce or pipeline the actual retune.

use iohc_common::consts::{
    CHANNEL_HOP_INTERVAL_US, FREQUENCY_CHANNEL_1_MHZ, FREQUENCY_CHANNEL_2_MHZ,
    FREQUENCY_CHANNEL_3_MHZ,
};
use iohc_common::Micros;

/// One of the three 2W channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// 868.25 MHz
    Ch1,
    /// 868.95 MHz, the primary channel
    Ch2,
    /// 869.85 MHz
    Ch3,
}

impl Channel {
    /// Center frequency in MHz
    #[must_use]
    pub const fn frequency_mhz(self) -> f32 {
        match self {
            Self::Ch1 => FREQUENCY_CHANNEL_1_MHZ,
            Self::Ch2 => FREQUENCY_CHANNEL_2_MHZ,
            Self::Ch3 => FREQUENCY_CHANNEL_3_MHZ,
        }
    }

    /// Next channel in rotation order
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Ch1 => Self::Ch2,
            Self::Ch2 => Self::Ch3,
            Self::Ch3 => Self::Ch1,
        }
    }
}

/// Three-channel FHSS state machine
#[derive(Debug, Clone)]
pub struct ChannelHopper {
    current: Channel,
    last_hop: Micros,
    dwell: Micros,
    enabled: bool,
}

impl ChannelHopper {
    /// Create a hopper with the protocol dwell, parked on the primary
    /// channel and disabled
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Channel::Ch2,
            last_hop: Micros::ZERO,
            dwell: Micros::new(CHANNEL_HOP_INTERVAL_US),
            enabled: false,
        }
    }

    /// Restart on the primary channel with the given dwell
    ///
    /// Hopping stays disabled until [`ChannelHopper::set_enabled`].
    pub fn begin(&mut self, dwell: Micros, now: Micros) {
        self.dwell = dwell;
        self.last_hop = now;
        self.current = Channel::Ch2;
        self.enabled = false;
    }

    /// Advance the state machine
    ///
    /// Returns true exactly when the dwell elapsed and the channel
    /// rotated; the caller must then re-tune the radio to
    /// [`ChannelHopper::frequency_mhz`].
    pub fn update(&mut self, now: Micros) -> bool {
        if !self.enabled {
            return false;
        }

        if now.has_elapsed(self.last_hop, self.dwell) {
            self.current = self.current.next();
            self.last_hop = now;
            return true;
        }

        false
    }

    /// Time until the next hop is due; zero when overdue
    #[must_use]
    pub fn time_until_next_hop(&self, now: Micros) -> Micros {
        let elapsed = now.since(self.last_hop);
        if elapsed >= self.dwell {
            Micros::ZERO
        } else {
            self.dwell - elapsed
        }
    }

    /// Return to the primary channel and restart the dwell
    pub fn reset(&mut self, now: Micros) {
        self.current = Channel::Ch2;
        self.last_hop = now;
    }

    /// Enable or disable hopping
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether hopping is enabled
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current channel
    #[must_use]
    pub const fn current_channel(&self) -> Channel {
        self.current
    }

    /// Current channel's frequency in MHz
    #[must_use]
    pub const fn frequency_mhz(&self) -> f32 {
        self.current.frequency_mhz()
    }
}

impl Default for ChannelHopper {
    fn default() -> Self {
        Self::new()
    }
}
