// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! io-homecontrol link layer
//!
//! Frame codec, controller and two-way state machines:
//!
//! - **Frame codec**: bit-exact serialization and parsing of the on-air
//!   format ([`frame`])
//! - **Controller**: the public node API over an injected radio
//!   ([`controller`])
//! - **Channel hopper**: three-channel FHSS timing for 2W ([`hopper`])
//! - **Authenticator**: 2W challenge-response ([`auth`])
//! - **Beacon tracker**: last-beacon cache and freshness ([`beacon`])
//! - **Discovery/pairing**: probe broadcast, response collection and
//!   key-transfer framing ([`pairing`])
//!
//! # Concurrency model
//!
//! Single-threaded and cooperative. Nothing here blocks beyond the radio
//! driver's own bounded primitives; timed state machines take
//! caller-supplied monotonic timestamps. A multi-threaded adapter is a
//! host concern.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod auth;
pub mod beacon;
pub mod controller;
pub mod frame;
pub mod hopper;
pub mod pairing;
pub mod radio;

pub use auth::{AuthState, Authenticator};
pub use beacon::{BeaconInfo, BeaconKind, BeaconTracker};
pub use controller::{Controller, Received};
pub use frame::Frame;
pub use hopper::{Channel, ChannelHopper};
pub use pairing::{DiscoveredDevice, DiscoveryManager, DiscoveryState};
pub use radio::{ChannelScan, Encoding, PhysicalLayer, Shaping};
