//! Timeline snapshot
//!
//! An ordered set of clips handed to the engine as one immutable unit.
//! Editing a timeline during playback means building a new snapshot and
//! calling `play()` again; a live session never observes edits.

use serde::{Deserialize, Serialize};

use crate::timeline::clip::{ClipId, ClipSpec};

/// Immutable set of clips scheduled against the shared timeline
///
/// Clip order is irrelevant for playback; clips may overlap freely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineSnapshot {
    clips: Vec<ClipSpec>,
}

impl TimelineSnapshot {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timeline from a list of clips
    pub fn with_clips(clips: Vec<ClipSpec>) -> Self {
        Self { clips }
    }

    /// Add a clip
    pub fn add(&mut self, clip: ClipSpec) {
        self.clips.push(clip);
    }

    /// All clips, in insertion order
    pub fn clips(&self) -> &[ClipSpec] {
        &self.clips
    }

    /// Number of clips
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Check if the timeline has no clips
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Look up a clip by id
    pub fn get(&self, id: ClipId) -> Option<&ClipSpec> {
        self.clips.iter().find(|clip| clip.id == id)
    }

    /// Look up a clip by id, mutably (e.g. to attach a decoded buffer)
    pub fn get_mut(&mut self, id: ClipId) -> Option<&mut ClipSpec> {
        self.clips.iter_mut().find(|clip| clip.id == id)
    }

    /// Clips that may ever produce audio
    pub fn schedulable_clips(&self) -> impl Iterator<Item = &ClipSpec> {
        self.clips.iter().filter(|clip| clip.is_schedulable())
    }

    /// Timeline end: the latest placement end across schedulable clips
    ///
    /// Returns 0 for an empty timeline.
    pub fn duration(&self) -> f64 {
        self.schedulable_clips()
            .map(|clip| clip.placement_end)
            .fold(0.0, f64::max)
    }
}
