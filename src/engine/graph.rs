//! Playback Graph Manager
//!
//! Owns the live per-clip voices for the current playback session. Voices
//! are created from resolved windows and torn down as one unit: on stop,
//! on pause, or when a new session supersedes this one. Nothing outside
//! this type ever holds a voice handle, so there is no way to orphan one.

use std::collections::HashMap;
use std::fmt;

use log::{debug, trace, warn};

use crate::engine::device::{AudioDevice, ScheduleRequest, Voice};
use crate::timeline::{ClipId, ScheduledWindow, TimelineSnapshot};

/// Ownership record for one live clip: its playback voice and the gain the
/// voice was attached with
struct LiveNodeEntry {
    voice: Box<dyn Voice>,
    gain: f32,
}

/// The set of live voices for the current session
///
/// Exists between a `start` and the next `stop_all`; empty otherwise.
#[derive(Default)]
pub struct PlaybackGraph {
    live: HashMap<ClipId, LiveNodeEntry>,
}

impl PlaybackGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate and schedule a voice for every resolved window
    ///
    /// Each window becomes one one-shot voice starting at `device_now`,
    /// playing `window.play_duration` seconds from `window.source_offset`
    /// at `window.gain`. A clip whose request the device rejects is skipped
    /// with a warning; one bad clip never aborts the session.
    ///
    /// # Arguments
    /// * `device` - The playback device to schedule on
    /// * `timeline` - Source of the clips' buffers
    /// * `windows` - Resolver output for the session's start position
    /// * `device_now` - Device-clock time the session starts at
    ///
    /// # Returns
    /// Number of voices actually started
    pub fn start<D: AudioDevice>(
        &mut self,
        device: &mut D,
        timeline: &TimelineSnapshot,
        windows: &[ScheduledWindow],
        device_now: f64,
    ) -> usize {
        let mut started = 0;

        for window in windows {
            let Some(clip) = timeline.get(window.clip_id) else {
                warn!("clip {} not in timeline, skipping", window.clip_id);
                continue;
            };
            let Some(buffer) = clip.buffer.clone() else {
                warn!("clip {} has no decoded buffer, skipping", window.clip_id);
                continue;
            };

            let request = ScheduleRequest {
                buffer,
                source_offset: window.source_offset,
                duration: window.play_duration,
                start_at: device_now,
                gain: window.gain,
            };

            match device.schedule(request) {
                Ok(voice) => {
                    trace!(
                        "clip {} live: offset {:.3}s for {:.3}s",
                        window.clip_id,
                        window.source_offset,
                        window.play_duration
                    );
                    self.live.insert(
                        window.clip_id,
                        LiveNodeEntry {
                            voice,
                            gain: window.gain,
                        },
                    );
                    started += 1;
                }
                Err(err) => {
                    warn!("clip {} failed to schedule, skipping: {}", window.clip_id, err);
                }
            }
        }

        started
    }

    /// Stop and release every live voice
    ///
    /// Safe to call with no live voices (no-op) and safe to call twice.
    /// All voices are stopped before the call returns, so a caller that
    /// immediately starts a new session never has two sessions' voices
    /// attached at once.
    pub fn stop_all(&mut self) {
        if self.live.is_empty() {
            return;
        }

        debug!("tearing down {} live voice(s)", self.live.len());
        for (clip_id, mut entry) in self.live.drain() {
            entry.voice.stop();
            trace!("clip {} stopped", clip_id);
        }
    }

    /// Adjust the gain node of a live clip
    ///
    /// # Returns
    /// `true` if the clip had a live voice
    pub fn set_gain(&mut self, clip_id: ClipId, gain: f32) -> bool {
        match self.live.get_mut(&clip_id) {
            Some(entry) => {
                entry.gain = gain;
                entry.voice.set_gain(gain);
                true
            }
            None => false,
        }
    }

    /// Gain the clip's voice is currently attached with
    pub fn gain(&self, clip_id: ClipId) -> Option<f32> {
        self.live.get(&clip_id).map(|entry| entry.gain)
    }

    /// Check whether a clip has a live voice
    pub fn contains(&self, clip_id: ClipId) -> bool {
        self.live.contains_key(&clip_id)
    }

    /// Number of live voices
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Check if no voices are live
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl fmt::Debug for PlaybackGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackGraph")
            .field("live", &self.live.keys().collect::<Vec<_>>())
            .finish()
    }
}
