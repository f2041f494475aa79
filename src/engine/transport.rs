//! Transport state machine
//!
//! Tracks the play-head against the device clock with plain arithmetic: a
//! frozen offset plus, while playing, the time elapsed since the device
//! clock reading captured at start. No background timer ever ticks the
//! position; `position()` is computed lazily at the caller's cadence, so
//! it can never drift from the device's own clock.
//!
//! Device time is passed into every transition, which keeps this type pure
//! and directly unit-testable.

use std::fmt;

use log::debug;

use serde::{Deserialize, Serialize};

/// Transport lifecycle state
///
/// `Idle → Playing ⇄ Paused`, and any active state `→ Stopped`. A fresh
/// `play()` leaves `Stopped` again; only an explicit reset returns to
/// `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransportState {
    /// Nothing has ever played
    #[default]
    Idle,
    /// Audio is sounding; the play-head is advancing with the device clock
    Playing,
    /// The play-head is frozen at its pause position
    Paused,
    /// Playback ended by explicit stop; the last offset is still readable
    Stopped,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportState::Idle => write!(f, "Idle"),
            TransportState::Playing => write!(f, "Playing"),
            TransportState::Paused => write!(f, "Paused"),
            TransportState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Play-head tracking against a device clock
#[derive(Debug, Clone)]
pub struct Transport {
    /// Current state
    state: TransportState,

    /// Logical position, seconds; the live position while not playing
    play_head_offset: f64,

    /// Device clock reading captured at the most recent start/resume
    device_clock_at_start: f64,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport {
    /// Create a transport in `Idle` at offset zero
    pub fn new() -> Self {
        Self {
            state: TransportState::Idle,
            play_head_offset: 0.0,
            device_clock_at_start: 0.0,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Enter `Playing` at `offset`
    ///
    /// Valid from any state; a running session is expected to have been torn
    /// down by the caller first.
    ///
    /// # Arguments
    /// * `offset` - Play-head position the session starts from, seconds
    /// * `device_now` - Device clock reading at this instant
    pub fn begin(&mut self, offset: f64, device_now: f64) {
        self.play_head_offset = offset;
        self.device_clock_at_start = device_now;
        self.state = TransportState::Playing;
        debug!("transport playing from {:.3}s", offset);
    }

    /// Freeze the play-head and enter `Paused`
    ///
    /// No-op unless `Playing`.
    ///
    /// # Returns
    /// `true` if the transport transitioned (the caller should tear down
    /// live voices), `false` if this was a no-op
    pub fn pause(&mut self, device_now: f64) -> bool {
        if self.state != TransportState::Playing {
            return false;
        }

        self.play_head_offset += device_now - self.device_clock_at_start;
        self.state = TransportState::Paused;
        debug!("transport paused at {:.3}s", self.play_head_offset);
        true
    }

    /// Enter `Stopped`
    ///
    /// Valid from any state; a second call is a no-op. The offset is left at
    /// the value captured at the most recent start or pause, so the caller
    /// can still inspect the last position until the next `begin` redefines
    /// it.
    ///
    /// # Returns
    /// `true` if the transport transitioned
    pub fn stop(&mut self) -> bool {
        if self.state == TransportState::Stopped {
            return false;
        }
        self.state = TransportState::Stopped;
        debug!("transport stopped at {:.3}s", self.play_head_offset);
        true
    }

    /// Move the frozen play-head, clamped at zero
    ///
    /// Only meaningful while not playing; a playing session must instead be
    /// restarted at the new position. Returns `false` while `Playing`.
    pub fn seek(&mut self, offset: f64) -> bool {
        if self.state == TransportState::Playing {
            return false;
        }
        self.play_head_offset = offset.max(0.0);
        true
    }

    /// Return to `Idle` at offset zero
    ///
    /// Never happens implicitly; this is the explicit caller action.
    pub fn reset(&mut self) {
        self.state = TransportState::Idle;
        self.play_head_offset = 0.0;
        self.device_clock_at_start = 0.0;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current play-head position, seconds
    ///
    /// While `Playing` this is `offset + (device_now - clock_at_start)`;
    /// otherwise the frozen offset.
    pub fn position(&self, device_now: f64) -> f64 {
        if self.state == TransportState::Playing {
            self.play_head_offset + (device_now - self.device_clock_at_start)
        } else {
            self.play_head_offset
        }
    }

    /// The frozen offset (session start position while playing)
    pub fn play_head_offset(&self) -> f64 {
        self.play_head_offset
    }

    /// Check if the transport is in `Playing`
    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    /// Current state
    pub fn state(&self) -> TransportState {
        self.state
    }
}
