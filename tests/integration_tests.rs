//! Integration Tests
//!
//! End-to-end scenarios driven through `AudioEngine` with the offline
//! device, asserting on the exact sequence of device effects.

use std::sync::Arc;

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;

use cueline::audio::PcmBuffer;
use cueline::engine::{AudioEngine, DeviceEvent, OfflineDevice, TransportState};
use cueline::timeline::{ClipSpec, TimelineSnapshot};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A clip over a silence buffer exactly as long as its trim window needs
fn make_clip(start: f64, end: f64, trim_in: f64, trim_out: f64) -> ClipSpec {
    let buffer = Arc::new(PcmBuffer::silence(trim_out, 48000).expect("buffer"));
    ClipSpec::new(buffer, start, end).with_trim(trim_in, trim_out)
}

fn engine_with(clips: Vec<ClipSpec>) -> (AudioEngine<OfflineDevice>, Arc<TimelineSnapshot>) {
    let timeline = Arc::new(TimelineSnapshot::with_clips(clips));
    (AudioEngine::new(OfflineDevice::new()), timeline)
}

fn scheduled_windows(events: &[DeviceEvent]) -> Vec<(f64, f64, f32)> {
    events
        .iter()
        .filter_map(|event| match event {
            DeviceEvent::Scheduled {
                source_offset,
                duration,
                gain,
                ..
            } => Some((*source_offset, *duration, *gain)),
            _ => None,
        })
        .collect()
}

// === Resolution through the engine ===

#[test]
fn test_mid_clip_seek_schedules_remainder() {
    init_logging();
    // 5s clip at the origin, played from t=2: 3 seconds remain,
    // starting 2 seconds into the buffer
    let (mut engine, timeline) = engine_with(vec![make_clip(0.0, 5.0, 0.0, 5.0)]);
    engine.play(timeline, 2.0);

    let windows = scheduled_windows(&engine.device().events());
    assert_eq!(windows.len(), 1);
    let (source_offset, duration, _) = windows[0];
    assert_relative_eq!(source_offset, 2.0, epsilon = 1e-9);
    assert_relative_eq!(duration, 3.0, epsilon = 1e-9);
}

#[test]
fn test_short_trim_inside_long_placement() {
    // 1s of usable audio placed in a 3s window: audible at the window
    // start, silent once the trim is exhausted
    let (mut engine, timeline) = engine_with(vec![make_clip(3.0, 6.0, 1.0, 2.0)]);

    engine.play(Arc::clone(&timeline), 3.0);
    let windows = scheduled_windows(&engine.device().events());
    assert_eq!(windows.len(), 1);
    assert_relative_eq!(windows[0].0, 1.0, epsilon = 1e-9);
    assert_relative_eq!(windows[0].1, 1.0, epsilon = 1e-9);

    engine.device_mut().clear_events();
    engine.play(timeline, 4.0);
    assert!(engine.is_playing());
    assert_eq!(engine.live_voices(), 0);
    assert_eq!(scheduled_windows(&engine.device().events()).len(), 0);
}

#[test]
fn test_overlapping_clips_sound_together() {
    let a = make_clip(0.0, 6.0, 0.0, 6.0).with_gain(0.8);
    let b = make_clip(3.0, 8.0, 0.0, 5.0).with_gain(0.25);
    let (mut engine, timeline) = engine_with(vec![a, b]);

    engine.play(timeline, 4.0);

    let mut windows = scheduled_windows(&engine.device().events());
    windows.sort_by(|l, r| l.2.partial_cmp(&r.2).expect("finite gains"));
    assert_eq!(windows.len(), 2);
    assert_relative_eq!(windows[0].2 as f64, 0.25, epsilon = 1e-6);
    assert_relative_eq!(windows[1].2 as f64, 0.8, epsilon = 1e-6);
    assert_eq!(engine.live_voices(), 2);
}

#[test]
fn test_clip_awaiting_decode_stays_silent() {
    let mut pending = make_clip(0.0, 5.0, 0.0, 5.0);
    pending.buffer = None;
    let ready = make_clip(0.0, 5.0, 0.0, 5.0);

    let (mut engine, timeline) = engine_with(vec![pending, ready]);
    engine.play(timeline, 1.0);

    // The undecoded clip is skipped; the rest of the timeline plays
    assert_eq!(engine.live_voices(), 1);
    assert!(engine.is_playing());
}

// === Session replacement ===

#[test]
fn test_play_supersedes_live_session() {
    init_logging();
    let (mut engine, timeline) = engine_with(vec![
        make_clip(0.0, 10.0, 0.0, 10.0),
        make_clip(2.0, 9.0, 0.0, 7.0),
    ]);

    engine.play(Arc::clone(&timeline), 3.0);
    let first_session = engine.device().scheduled_count();
    assert_eq!(first_session, 2);

    engine.device_mut().advance(1.0);
    engine.play(timeline, 5.0);

    // No audible overlap: every voice of the first session is stopped
    // before any voice of the second attaches
    let events = engine.device().events();
    let last_stop = events
        .iter()
        .rposition(|event| matches!(event, DeviceEvent::Stopped { .. }))
        .expect("first session was torn down");
    let first_new_schedule = events
        .iter()
        .enumerate()
        .filter(|(_, event)| matches!(event, DeviceEvent::Scheduled { .. }))
        .nth(first_session)
        .map(|(i, _)| i)
        .expect("second session scheduled");

    assert!(last_stop < first_new_schedule);
    assert_eq!(engine.live_voices(), 2);
    assert_relative_eq!(engine.current_time(), 5.0, epsilon = 1e-9);
}

// === Transport behavior ===

#[test]
fn test_pause_resume_offset_continuity() {
    let (mut engine, timeline) = engine_with(vec![make_clip(0.0, 10.0, 0.0, 10.0)]);
    engine.play(timeline, 1.0);
    engine.device_mut().advance(2.0);
    assert_relative_eq!(engine.current_time(), 3.0, epsilon = 1e-9);

    engine.pause();
    assert_relative_eq!(engine.current_time(), 3.0, epsilon = 1e-9);

    // Resume at the same device instant: position unchanged
    engine.resume();
    assert_relative_eq!(engine.current_time(), 3.0, epsilon = 1e-9);
    assert!(engine.is_playing());

    // Resuming schedules the clip's remainder from 3s in
    let windows = scheduled_windows(&engine.device().events());
    let last = windows.last().expect("resume scheduled a window");
    assert_relative_eq!(last.0, 3.0, epsilon = 1e-9);
    assert_relative_eq!(last.1, 7.0, epsilon = 1e-9);
}

#[test]
fn test_double_pause_and_double_stop_idempotent() {
    let (mut engine, timeline) = engine_with(vec![make_clip(0.0, 10.0, 0.0, 10.0)]);
    engine.play(timeline, 0.0);
    engine.device_mut().advance(1.5);

    engine.pause();
    let state_after_one = engine.state();
    let time_after_one = engine.current_time();
    engine.pause();
    assert_eq!(engine.state(), state_after_one);
    assert_relative_eq!(engine.current_time(), time_after_one, epsilon = 1e-9);

    engine.stop();
    engine.stop();
    assert_eq!(engine.state(), TransportState::Stopped);
}

#[test]
fn test_stop_when_idle_is_noop() {
    let mut engine: AudioEngine<OfflineDevice> = AudioEngine::new(OfflineDevice::new());
    engine.stop();
    assert_eq!(engine.state(), TransportState::Stopped);
    assert_eq!(engine.device().events().len(), 0);
}

#[test]
fn test_play_head_is_lazy_clock_arithmetic() {
    let (mut engine, timeline) = engine_with(vec![make_clip(0.0, 100.0, 0.0, 100.0)]);
    engine.play(timeline, 0.0);

    // No polling loop: the position is exactly the device clock delta,
    // however rarely it is sampled
    for step in [0.001, 0.1, 5.0, 30.0] {
        let before = engine.current_time();
        engine.device_mut().advance(step);
        assert_relative_eq!(engine.current_time(), before + step, epsilon = 1e-9);
    }
}

// === Timeline described in JSON ===

#[test]
fn test_json_timeline_plays_after_decode() {
    let json = r#"{
        "clips": [
            { "placement_start": 0.0, "placement_end": 4.0, "gain": 0.5 },
            { "placement_start": 2.0, "placement_end": 6.0 }
        ]
    }"#;

    let mut timeline: TimelineSnapshot = serde_json::from_str(json).expect("parse timeline");
    assert_eq!(timeline.len(), 2);
    // Nothing is schedulable until decode attaches buffers
    assert_eq!(timeline.schedulable_clips().count(), 0);

    let buffer = Arc::new(PcmBuffer::sine(220.0, 6.0, 48000).expect("buffer"));
    let ids: Vec<_> = timeline.clips().iter().map(|clip| clip.id).collect();
    for id in ids {
        timeline
            .get_mut(id)
            .expect("clip exists")
            .attach_buffer(Arc::clone(&buffer));
    }

    let mut engine = AudioEngine::new(OfflineDevice::new());
    engine.play(Arc::new(timeline), 2.5);
    assert_eq!(engine.live_voices(), 2);
}
