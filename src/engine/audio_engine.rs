//! Audio Engine
//!
//! The root component and the only type external callers drive. Composes a
//! playback device, the playback graph, and the transport into the public
//! play/pause/resume/seek/stop surface, and keeps the current session's
//! timeline snapshot for resume.

use std::sync::Arc;

use log::debug;

use crate::engine::device::AudioDevice;
use crate::engine::graph::PlaybackGraph;
use crate::engine::transport::{Transport, TransportState};
use crate::timeline::{resolve_windows, ClipId, TimelineSnapshot};

/// Timeline playback engine over a device `D`
///
/// All operations are synchronous and non-blocking; decode is awaited by
/// the caller before clips enter a timeline. The engine never runs a
/// background loop; the play-head is derived from the device clock on
/// demand.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use cueline::audio::PcmBuffer;
/// use cueline::engine::{AudioEngine, OfflineDevice};
/// use cueline::timeline::{ClipSpec, TimelineSnapshot};
///
/// let buffer = Arc::new(PcmBuffer::sine(440.0, 5.0, 48000).unwrap());
/// let timeline = TimelineSnapshot::with_clips(vec![
///     ClipSpec::new(buffer, 0.0, 5.0),
/// ]);
///
/// let mut engine = AudioEngine::new(OfflineDevice::new());
/// engine.play(Arc::new(timeline), 2.0);
/// assert!(engine.is_playing());
/// assert_eq!(engine.current_time(), 2.0);
/// ```
#[derive(Debug)]
pub struct AudioEngine<D: AudioDevice> {
    device: D,
    graph: PlaybackGraph,
    transport: Transport,
    /// Timeline of the current session; kept for resume/seek
    session: Option<Arc<TimelineSnapshot>>,
}

impl<D: AudioDevice> AudioEngine<D> {
    /// Create an engine over a device
    pub fn new(device: D) -> Self {
        Self {
            device,
            graph: PlaybackGraph::new(),
            transport: Transport::new(),
            session: None,
        }
    }

    // ========================================================================
    // Playback control
    // ========================================================================

    /// Start playing `timeline` from `time`
    ///
    /// Replaces, never layers: any live session is torn down completely
    /// before the new session's voices attach. The snapshot is held for the
    /// whole session; timeline edits require a new snapshot and another
    /// `play()`.
    ///
    /// # Arguments
    /// * `timeline` - The clips to play; immutable for this session
    /// * `time` - Play-head position to start from, seconds
    pub fn play(&mut self, timeline: Arc<TimelineSnapshot>, time: f64) {
        // Old voices must all be detached before any new voice attaches.
        self.graph.stop_all();

        let device_now = self.device.now();
        let windows = resolve_windows(&timeline, time);
        let started = self
            .graph
            .start(&mut self.device, &timeline, &windows, device_now);

        debug!(
            "session start: {} of {} clip(s) audible at {:.3}s",
            started,
            timeline.len(),
            time
        );

        self.transport.begin(time, device_now);
        self.session = Some(timeline);
    }

    /// Freeze the play-head and silence the session
    ///
    /// No-op unless playing.
    pub fn pause(&mut self) {
        let device_now = self.device.now();
        if self.transport.pause(device_now) {
            self.graph.stop_all();
        }
    }

    /// Resume the paused (or stopped) session at the frozen play-head
    ///
    /// Exactly a fresh `play()` at the current offset. No-op while already
    /// playing or when no session has ever been played.
    pub fn resume(&mut self) {
        if self.transport.is_playing() {
            return;
        }
        let Some(timeline) = self.session.clone() else {
            return;
        };
        let offset = self.transport.play_head_offset();
        self.play(timeline, offset);
    }

    /// Move the play-head to `time` (clamped at zero)
    ///
    /// While playing, the session restarts at the new position; otherwise
    /// only the frozen offset moves and playback stays silent until the
    /// next `play()`/`resume()`.
    pub fn seek(&mut self, time: f64) {
        let time = time.max(0.0);
        if self.transport.is_playing() {
            if let Some(timeline) = self.session.clone() {
                self.play(timeline, time);
            }
        } else {
            self.transport.seek(time);
        }
    }

    /// Stop playback
    ///
    /// Valid in any state; stopping twice is a no-op. The last play-head
    /// offset stays readable until the next `play()` redefines it.
    pub fn stop(&mut self) {
        self.graph.stop_all();
        self.transport.stop();
    }

    /// Tear down everything and return the transport to `Idle` at zero
    ///
    /// The engine never does this implicitly.
    pub fn reset(&mut self) {
        self.graph.stop_all();
        self.transport.reset();
        self.session = None;
    }

    /// Adjust the gain of a clip's live voice, if it has one
    ///
    /// Affects only the current session; the clip's own `gain` field is the
    /// value used when a future session schedules it again.
    ///
    /// # Returns
    /// `true` if the clip was live
    pub fn set_clip_gain(&mut self, clip_id: ClipId, gain: f32) -> bool {
        self.graph.set_gain(clip_id, gain.max(0.0))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current play-head position, seconds
    ///
    /// Derived lazily from the device clock; accurate to the moment of the
    /// call.
    pub fn current_time(&self) -> f64 {
        self.transport.position(self.device.now())
    }

    /// Check if the engine is playing
    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    /// Current transport state
    pub fn state(&self) -> TransportState {
        self.transport.state()
    }

    /// The current session's timeline, if any
    pub fn timeline(&self) -> Option<&Arc<TimelineSnapshot>> {
        self.session.as_ref()
    }

    /// Number of live voices in the current session
    pub fn live_voices(&self) -> usize {
        self.graph.len()
    }

    /// The underlying device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The underlying device, mutably (e.g. to advance an offline clock)
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}
