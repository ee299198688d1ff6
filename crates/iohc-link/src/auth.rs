// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 the iohc project authors

//! 2W challenge-response authentication
//!
//! The controller side of the exchange: issue a 6-byte random challenge
//! (opcode 0x3C), expect it back inside the window under a MAC keyed to
//! that exact challenge (opcode 0x3D).
//!
//! ```text
//! IDLE ── generate challenge ──▶ CHALLENGE_SENT
//! CHALLENGE_SENT ── valid response in time ──▶ AUTHENTICATED
//! CHALLENGE_SENT ── invalid or late ──▶ IDLE (error surfaced, never silent)
//! AUTHENTICATED ── reset ──▶ IDLE
//! ```
//!
//! Challenges come from an injected [`CryptoRng`]; there is no fallback
//! source. A predictable challenge makes the whole MAC replayable.

use crate::frame::Frame;
use iohc_common::consts::{CMD_CHALLENGE_REQUEST, CMD_CHALLENGE_RESPONSE, MAC_SIZE};
use iohc_common::{Error, Millis, Mode, NodeId, Result};
use iohc_crypto::{CryptoRng, SystemKey};

/// Authentication state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No exchange in progress
    Idle,
    /// Challenge issued, awaiting the response
    ChallengeSent,
    /// Peer proved knowledge of the system key
    Authenticated,
}

/// Challenge-response authenticator
pub struct Authenticator {
    key: SystemKey,
    challenge: [u8; MAC_SIZE],
    state: AuthState,
    issued_at: Millis,
    timeout: Millis,
}

impl Authenticator {
    /// Create an authenticator with the protocol's 5 s response window
    #[must_use]
    pub fn new(key: SystemKey) -> Self {
        Self::with_timeout(key, Millis::from_secs(5))
    }

    /// Create an authenticator with a custom response window
    #[must_use]
    pub fn with_timeout(key: SystemKey, timeout: Millis) -> Self {
        Self {
            key,
            challenge: [0; MAC_SIZE],
            state: AuthState::Idle,
            issued_at: Millis::ZERO,
            timeout,
        }
    }

    /// Generate and store a fresh challenge, entering CHALLENGE_SENT
    ///
    /// # Errors
    ///
    /// Returns `Error::RngFailure` when the entropy source fails; state is
    /// unchanged in that case.
    pub fn generate_challenge<R: CryptoRng>(
        &mut self,
        rng: &mut R,
        now: Millis,
    ) -> Result<[u8; MAC_SIZE]> {
        let mut challenge = [0u8; MAC_SIZE];
        rng.fill_bytes(&mut challenge).map_err(|_| Error::RngFailure)?;

        self.challenge = challenge;
        self.issued_at = now;
        self.state = AuthState::ChallengeSent;
        Ok(challenge)
    }

    /// Build a finalized challenge request frame (opcode 0x3C)
    ///
    /// Generates a fresh challenge as a side effect.
    ///
    /// # Errors
    ///
    /// `Error::RngFailure` from challenge generation; codec errors from
    /// frame finalization.
    pub fn challenge_request<R: CryptoRng>(
        &mut self,
        dest: NodeId,
        src: NodeId,
        rng: &mut R,
        now: Millis,
    ) -> Result<Frame> {
        let challenge = self.generate_challenge(rng, now)?;

        let mut frame = Frame::new(Mode::TwoWay, dest, src);
        frame.set_command(CMD_CHALLENGE_REQUEST, &challenge)?;
        frame.finalize(&self.key, Some(&challenge))?;
        Ok(frame)
    }

    /// Build a finalized response frame (opcode 0x3D) to a peer's challenge
    ///
    /// This is the responder side: echo the received challenge under a MAC
    /// keyed to it.
    ///
    /// # Errors
    ///
    /// Codec errors from frame finalization.
    pub fn challenge_response(
        &self,
        dest: NodeId,
        src: NodeId,
        received_challenge: &[u8; MAC_SIZE],
    ) -> Result<Frame> {
        let mut frame = Frame::new(Mode::TwoWay, dest, src);
        frame.set_command(CMD_CHALLENGE_RESPONSE, received_challenge)?;
        frame.finalize(&self.key, Some(received_challenge))?;
        Ok(frame)
    }

    /// Verify a received challenge response
    ///
    /// On success the state becomes AUTHENTICATED. Every failure path
    /// returns to IDLE and surfaces its reason; the caller must issue a
    /// fresh challenge to retry.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidState` when no challenge is outstanding
    /// - `Error::Timeout` when the response window expired
    /// - `Error::InvalidParameter` for a non-response opcode
    /// - `Error::BadCrc` / `Error::BadMac` from frame validation
    pub fn verify_response(&mut self, frame: &Frame, now: Millis) -> Result<()> {
        if self.state != AuthState::ChallengeSent {
            return Err(Error::InvalidState);
        }

        // Responses landing exactly on the window boundary are still valid.
        if now.since(self.issued_at) > self.timeout {
            self.state = AuthState::Idle;
            return Err(Error::Timeout);
        }

        if frame.opcode() != CMD_CHALLENGE_RESPONSE {
            self.state = AuthState::Idle;
            return Err(Error::InvalidParameter);
        }

        if let Err(e) = frame.validate(Some(&self.key), Some(&self.challenge)) {
            self.state = AuthState::Idle;
            return Err(e);
        }

        self.state = AuthState::Authenticated;
        Ok(())
    }

    /// Drop any session state and wipe the stored challenge
    pub fn reset(&mut self) {
        self.state = AuthState::Idle;
        self.challenge = [0; MAC_SIZE];
        self.issued_at = Millis::ZERO;
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> AuthState {
        self.state
    }

    /// The outstanding challenge
    ///
    /// Valid while a challenge is outstanding or authenticated; pairing
    /// uses it for the 2W key transfer mask.
    #[must_use]
    pub const fn challenge(&self) -> &[u8; MAC_SIZE] {
        &self.challenge
    }
}
