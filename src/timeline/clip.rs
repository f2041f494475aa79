//! Clip model
//!
//! A `ClipSpec` is an immutable description of one scheduled audio unit: a
//! placement window on the shared timeline, a trim window into its decoded
//! buffer, and a linear gain. Clips never own playback state; live nodes
//! belong to the playback graph.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audio::PcmBuffer;

/// Slack allowed when comparing trim bounds against a buffer duration, so a
/// duration that round-tripped through seconds arithmetic still validates.
const TRIM_EPSILON: f64 = 1e-9;

/// Unique identifier for a clip, stable across the clip's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(Uuid);

impl ClipId {
    /// Create a new random clip id
    pub fn new() -> Self {
        ClipId(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One scheduled audio unit on the timeline
///
/// All times are in seconds. `placement_start`/`placement_end` position the
/// clip on the shared timeline; `trim_in`/`trim_out` select the audible
/// sub-range of the decoded buffer; `gain` is a linear amplitude multiplier.
///
/// The buffer is owned externally and attached behind an `Arc`. A clip
/// without a buffer (e.g. freshly deserialized, or decode still pending) is
/// never scheduled.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use cueline::audio::PcmBuffer;
/// use cueline::timeline::ClipSpec;
///
/// let buffer = Arc::new(PcmBuffer::sine(440.0, 5.0, 48000).unwrap());
/// let clip = ClipSpec::new(buffer, 0.0, 5.0).with_gain(0.8);
/// assert!(clip.is_schedulable());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipSpec {
    /// Unique identifier
    #[serde(default = "ClipId::new")]
    pub id: ClipId,

    /// Decoded PCM data; `None` until decode resolves
    #[serde(skip)]
    pub buffer: Option<Arc<PcmBuffer>>,

    /// Clip start on the shared timeline, seconds
    pub placement_start: f64,

    /// Clip end on the shared timeline, seconds (exclusive)
    pub placement_end: f64,

    /// Offset into the buffer where audible audio begins, seconds
    #[serde(default)]
    pub trim_in: f64,

    /// Offset into the buffer where audible audio ends, seconds.
    /// A value of 0 means "full buffer" and is replaced with the buffer
    /// duration when a buffer is attached.
    #[serde(default)]
    pub trim_out: f64,

    /// Linear amplitude multiplier, `>= 0`
    #[serde(default = "default_gain")]
    pub gain: f32,
}

fn default_gain() -> f32 {
    1.0
}

impl ClipSpec {
    /// Create a clip spanning `placement_start..placement_end` with the
    /// whole buffer audible and unity gain
    ///
    /// # Arguments
    /// * `buffer` - Decoded PCM data for the clip
    /// * `placement_start` - Start position on the timeline, seconds
    /// * `placement_end` - End position on the timeline, seconds
    pub fn new(buffer: Arc<PcmBuffer>, placement_start: f64, placement_end: f64) -> Self {
        let trim_out = buffer.duration();
        Self {
            id: ClipId::new(),
            buffer: Some(buffer),
            placement_start,
            placement_end,
            trim_in: 0.0,
            trim_out,
            gain: 1.0,
        }
    }

    /// Set the trim window (offsets into the buffer, seconds)
    pub fn with_trim(mut self, trim_in: f64, trim_out: f64) -> Self {
        self.trim_in = trim_in;
        self.trim_out = trim_out;
        self
    }

    /// Set the gain, clamped at zero
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain.max(0.0);
        self
    }

    /// Override the generated id
    pub fn with_id(mut self, id: ClipId) -> Self {
        self.id = id;
        self
    }

    /// Attach a decoded buffer to a clip that was created without one
    ///
    /// Applies the trim default: a `trim_out` of 0 becomes the buffer
    /// duration.
    pub fn attach_buffer(&mut self, buffer: Arc<PcmBuffer>) {
        if self.trim_out == 0.0 {
            self.trim_out = buffer.duration();
        }
        self.buffer = Some(buffer);
    }

    /// Length of the audible sub-range of the buffer, seconds
    pub fn usable_duration(&self) -> f64 {
        self.trim_out - self.trim_in
    }

    /// Length of the placement window on the timeline, seconds
    pub fn placement_duration(&self) -> f64 {
        self.placement_end - self.placement_start
    }

    /// Check whether this clip may ever be scheduled
    ///
    /// Requires a buffer, a positive placement window, and a trim window
    /// that lies inside the buffer with positive usable duration. Clips that
    /// fail this are silently excluded from playback.
    pub fn is_schedulable(&self) -> bool {
        let Some(buffer) = &self.buffer else {
            return false;
        };

        self.placement_end > self.placement_start
            && self.trim_in >= 0.0
            && self.trim_out > self.trim_in
            && self.trim_out <= buffer.duration() + TRIM_EPSILON
    }
}
