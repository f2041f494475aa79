//! Cueline - Timeline Audio Playback Scheduler
//!
//! Cueline positions time-addressed audio clips against a shared timeline
//! and keeps synchronized, gapless playback consistent through
//! play/pause/resume/seek/stop.
//!
//! # Architecture
//!
//! The crate is a pipeline from data to sound:
//! - `timeline`: clip model, immutable timeline snapshots, and the pure
//!   window resolver that decides what is audible at a given play-head time
//! - `engine`: the playback graph (live voice ownership), the device-clock
//!   transport, and the `AudioEngine` facade callers drive
//! - `audio`: decoded PCM buffers and the WAV decode boundary
//!
//! Position tracking is plain device-clock arithmetic; there is no
//! background tick, so the play-head cannot drift from the device's own
//! clock.

pub mod audio;
pub mod engine;
pub mod error;
pub mod timeline;

pub use error::{CuelineError, Result};
