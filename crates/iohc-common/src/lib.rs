// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Common library for the iohc protocol engine
//!
//! This crate provides the types, error definitions, protocol constants and
//! configuration structures shared by the crypto and link-layer crates.
//!
//! # Features
//!
//! - `std`: Enable standard library support (disabled by default for embedded)
//! - `defmt`: Enable defmt formatting for embedded debugging
//!
//! # Design
//!
//! Everything here is no_std and allocation-free: fixed-size arrays and
//! heapless collections only. Timed state machines take caller-supplied
//! monotonic timestamps ([`time::Millis`] / [`time::Micros`]) instead of
//! reading a clock, so they stay deterministic under test.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod consts;
pub mod errors;
pub mod log;
pub mod time;
pub mod types;

pub use config::{LinkConfig, RadioProfile};
pub use errors::{Error, Result};
pub use time::{Micros, Millis};
pub use types::{DeviceType, Mode, NodeId, SignalQuality};
