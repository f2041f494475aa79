//! Playback device abstraction
//!
//! The downstream collaborator: a platform primitive that can play a raw
//! sample buffer at a specified device time, with adjustable gain, and stop
//! it early. The engine talks to it through [`AudioDevice`] and owns the
//! returned [`Voice`] handles.
//!
//! [`OfflineDevice`] is the in-repo implementation: a manually advanced
//! clock plus an event journal. It backs the test suite and any offline
//! (non-realtime) consumer; real platform backends implement the same trait
//! outside this crate.

use std::sync::{Arc, Mutex};

use crate::audio::PcmBuffer;
use crate::error::{CuelineError, Result};

/// One-shot request to sound a sub-range of a buffer
///
/// The device guarantees playback begins at `start_at` (device clock
/// seconds), sounds `duration` seconds of the buffer starting at
/// `source_offset`, at linear `gain`, unless the returned voice is stopped
/// first.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Decoded PCM data to play
    pub buffer: Arc<PcmBuffer>,
    /// Offset inside the buffer where playback begins, seconds
    pub source_offset: f64,
    /// How long to play, seconds
    pub duration: f64,
    /// Device-clock time at which playback begins
    pub start_at: f64,
    /// Linear gain applied to the voice
    pub gain: f32,
}

/// Handle to one live playback voice
///
/// Dropping a voice does not stop it; teardown is always an explicit
/// `stop()` so the graph manager controls exactly when audio ceases.
pub trait Voice {
    /// Request immediate stop. Idempotent: stopping a finished or already
    /// stopped voice is a no-op and must not fail.
    fn stop(&mut self);

    /// Adjust the voice's gain-control node
    fn set_gain(&mut self, gain: f32);
}

/// A playback device: a clock plus one-shot voice scheduling
pub trait AudioDevice {
    /// Current device-clock reading, seconds
    ///
    /// Monotonic; the origin is arbitrary, only differences carry meaning.
    fn now(&self) -> f64;

    /// Schedule a one-shot voice
    ///
    /// # Errors
    /// * `InvalidSchedule` - The request does not describe playable audio
    ///   (offset outside the buffer, non-positive duration, non-finite
    ///   values). Callers are expected to skip the clip and continue.
    fn schedule(&mut self, request: ScheduleRequest) -> Result<Box<dyn Voice>>;
}

// ============================================================================
// Offline device
// ============================================================================

/// Observable effect recorded by [`OfflineDevice`]
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// A voice was scheduled
    Scheduled {
        voice: usize,
        start_at: f64,
        source_offset: f64,
        duration: f64,
        gain: f32,
    },
    /// A voice was stopped
    Stopped { voice: usize },
    /// A voice's gain node was adjusted
    GainChanged { voice: usize, gain: f32 },
}

type Journal = Arc<Mutex<Vec<DeviceEvent>>>;

fn record(journal: &Journal, event: DeviceEvent) {
    if let Ok(mut events) = journal.lock() {
        events.push(event);
    }
}

/// In-memory playback device with a manually advanced clock
///
/// Every `schedule`/`stop`/`set_gain` lands in an event journal in call
/// order, so tests can assert on the exact sequence of device effects,
/// including the teardown-before-restart ordering a superseding `play()`
/// must preserve.
///
/// # Example
/// ```
/// use cueline::engine::{AudioDevice, OfflineDevice};
///
/// let mut device = OfflineDevice::new();
/// device.advance(1.0);
/// assert_eq!(device.now(), 1.0);
/// ```
#[derive(Debug, Default)]
pub struct OfflineDevice {
    clock: f64,
    next_voice: usize,
    journal: Journal,
}

impl OfflineDevice {
    /// Create a device with its clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the device clock by `dt` seconds
    ///
    /// Negative advances are ignored; device clocks never run backwards.
    pub fn advance(&mut self, dt: f64) {
        if dt > 0.0 {
            self.clock += dt;
        }
    }

    /// Snapshot of all recorded events, in call order
    pub fn events(&self) -> Vec<DeviceEvent> {
        self.journal
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of `Scheduled` events recorded so far
    pub fn scheduled_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, DeviceEvent::Scheduled { .. }))
            .count()
    }

    /// Discard the recorded journal
    pub fn clear_events(&mut self) {
        if let Ok(mut events) = self.journal.lock() {
            events.clear();
        }
    }

    fn validate(request: &ScheduleRequest) -> Result<()> {
        let reject = |reason: String| Err(CuelineError::InvalidSchedule { reason });

        if !request.source_offset.is_finite()
            || !request.duration.is_finite()
            || !request.start_at.is_finite()
            || !request.gain.is_finite()
        {
            return reject("non-finite schedule parameter".to_string());
        }
        if request.duration <= 0.0 {
            return reject(format!("non-positive duration {}", request.duration));
        }
        if request.source_offset < 0.0 {
            return reject(format!("negative source offset {}", request.source_offset));
        }
        if request.gain < 0.0 {
            return reject(format!("negative gain {}", request.gain));
        }

        let buffer_end = request.buffer.duration() + 1e-6;
        if request.source_offset + request.duration > buffer_end {
            return reject(format!(
                "window {}..{} past end of {}s buffer",
                request.source_offset,
                request.source_offset + request.duration,
                request.buffer.duration()
            ));
        }

        Ok(())
    }
}

impl AudioDevice for OfflineDevice {
    fn now(&self) -> f64 {
        self.clock
    }

    fn schedule(&mut self, request: ScheduleRequest) -> Result<Box<dyn Voice>> {
        Self::validate(&request)?;

        let voice = self.next_voice;
        self.next_voice += 1;

        record(
            &self.journal,
            DeviceEvent::Scheduled {
                voice,
                start_at: request.start_at,
                source_offset: request.source_offset,
                duration: request.duration,
                gain: request.gain,
            },
        );

        Ok(Box::new(OfflineVoice {
            id: voice,
            stopped: false,
            journal: Arc::clone(&self.journal),
        }))
    }
}

/// Voice handle produced by [`OfflineDevice`]
#[derive(Debug)]
struct OfflineVoice {
    id: usize,
    stopped: bool,
    journal: Journal,
}

impl Voice for OfflineVoice {
    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        record(&self.journal, DeviceEvent::Stopped { voice: self.id });
    }

    fn set_gain(&mut self, gain: f32) {
        if self.stopped {
            return;
        }
        record(
            &self.journal,
            DeviceEvent::GainChanged {
                voice: self.id,
                gain,
            },
        );
    }
}
