// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! Integration tests for iohc-common

use iohc_common::consts;
use iohc_common::time::{Deadline, Micros, Millis};
use iohc_common::{Error, LinkConfig, Mode, NodeId, RadioProfile};

#[test]
fn error_display_includes_code() {
    let rendered = std::format!("{}", Error::BadMac);
    assert!(rendered.contains("0x0202"));
    assert!(rendered.contains("MAC"));

    let rendered = std::format!("{}", Error::Radio(-707));
    assert!(rendered.contains("-707"));
}

#[test]
fn transfer_key_is_the_protocol_constant() {
    assert_eq!(consts::TRANSFER_KEY.len(), 16);
    assert_eq!(consts::TRANSFER_KEY[0], 0x34);
    assert_eq!(consts::TRANSFER_KEY[15], 0x73);
}

#[test]
fn radio_profile_matches_air_parameters() {
    let p = RadioProfile::default();
    assert_eq!(p.bit_rate_kbps, 38.4);
    assert_eq!(p.freq_deviation_khz, 19.2);
    // 512 preamble bits on the air.
    assert_eq!(u32::from(p.preamble_len_bytes) * 8, 512);
}

#[test]
fn link_config_defaults() {
    let c = LinkConfig::default();
    assert_eq!(c.challenge_timeout.as_millis(), 5_000);
    assert_eq!(c.hop_dwell, Micros::new(consts::CHANNEL_HOP_INTERVAL_US));
}

#[test]
fn node_id_round_trip_and_broadcast() {
    let id = NodeId::new([0xAA, 0xBB, 0xCC]);
    assert_eq!(NodeId::from_slice(id.as_ref()), Some(id));
    assert!(!id.is_broadcast());
    assert!(NodeId::BROADCAST.is_broadcast());
    assert_eq!(std::format!("{id}"), "AABBCC");
}

#[test]
fn deadline_over_hop_dwell() {
    let dwell = LinkConfig::default().hop_dwell;
    let d = Deadline::new(Micros::ZERO, dwell);
    assert!(!d.is_expired(Micros::new(2_699)));
    assert!(d.is_expired(Micros::new(2_700)));
}

#[test]
fn mode_and_durations() {
    assert!(Mode::OneWay.is_one_way());
    assert_eq!(Millis::from_secs(5).as_millis(), 5_000);
    assert_eq!(Micros::from_millis(2).as_micros(), 2_000);
}
