//! Window Resolver
//!
//! Pure computation of what must sound at a given play-head position. Given
//! a timeline and a time, produces one `ScheduledWindow` per audible clip:
//! where inside the clip's buffer playback must begin, and for how long.
//!
//! Referential transparency is the point: `resolve_windows(timeline, t)`
//! always yields the same answer for the same inputs, which is what makes
//! seek a plain re-resolve at the new position.

use serde::{Deserialize, Serialize};

use crate::timeline::clip::{ClipId, ClipSpec};
use crate::timeline::snapshot::TimelineSnapshot;

/// Playback instructions for one audible clip at a given play-head time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledWindow {
    /// The clip this window belongs to
    pub clip_id: ClipId,
    /// Offset inside the clip's buffer where playback begins, seconds
    pub source_offset: f64,
    /// How long the clip sounds from there, seconds
    pub play_duration: f64,
    /// Linear gain applied to the clip's node
    pub gain: f32,
}

/// Compute the windows audible at `time`
///
/// A clip is active iff `placement_start <= time < placement_end`; the
/// interval is half-open, so a clip ending exactly at `time` stays silent
/// and cannot double-trigger at the boundary instant. Clips that can never
/// be scheduled (missing buffer, empty trim window) are filtered before
/// activity is evaluated, and a window whose remaining trim has run out is
/// dropped even when the placement window still has room.
///
/// # Arguments
/// * `timeline` - The clips under consideration
/// * `time` - Play-head position, seconds; may be any real number
pub fn resolve_windows(timeline: &TimelineSnapshot, time: f64) -> Vec<ScheduledWindow> {
    timeline
        .schedulable_clips()
        .filter_map(|clip| resolve_clip(clip, time))
        .collect()
}

/// Resolve a single clip at `time`, if it is audible there
fn resolve_clip(clip: &ClipSpec, time: f64) -> Option<ScheduledWindow> {
    if time < clip.placement_start || time >= clip.placement_end {
        return None;
    }

    let clip_elapsed = time - clip.placement_start;
    let source_offset = clip.trim_in + clip_elapsed;
    let remaining_in_placement = clip.placement_end - time;
    let remaining_in_trim = clip.usable_duration() - clip_elapsed;
    let play_duration = remaining_in_placement.min(remaining_in_trim);

    // Trim window exhausted before the placement window: nothing to sound.
    if play_duration <= 0.0 {
        return None;
    }

    Some(ScheduledWindow {
        clip_id: clip.id,
        source_offset,
        play_duration,
        gain: clip.gain,
    })
}
