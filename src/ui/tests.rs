//! Unit tests for screen selection and screen drawing.

use super::*;
use crate::config::{Timing, MARQUEE_STEP_MS, SCREEN_WIDTH, VISUALIZER_SEED};
use crate::error::Error;
use crate::playback::PlaybackState;
use crate::testing::CaptureDisplay;

fn snapshot(state: PlaybackState, running: bool, overlay: bool) -> Snapshot<'static> {
    Snapshot {
        state,
        audio_running: running,
        volume_overlay: overlay,
        volume: 14,
        track: 0,
        track_path: "/music/a.mp3",
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Selection
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn volume_overlay_wins_over_everything() {
    for state in [PlaybackState::Paused, PlaybackState::Playing] {
        for running in [false, true] {
            assert_eq!(select_screen(state, running, true), Screen::VolumeOverlay);
        }
    }
}

#[test]
fn visualizer_needs_running_audio_and_playing_state() {
    assert_eq!(select_screen(PlaybackState::Playing, true, false), Screen::Visualizer);
    assert_eq!(select_screen(PlaybackState::Playing, false, false), Screen::Idle);
    assert_eq!(select_screen(PlaybackState::Paused, true, false), Screen::Idle);
    assert_eq!(select_screen(PlaybackState::Paused, false, false), Screen::Idle);
    assert_eq!(select_screen(PlaybackState::Sleeping, false, false), Screen::Idle);
}

// ═══════════════════════════════════════════════════════════════════════════
// Idle
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn idle_draws_dots_and_prompt_and_advances_phase() {
    let mut frame = FrameBuffer::new();
    let mut idle = IdleScreen::default();
    idle.draw(&mut frame);
    assert_eq!(idle.phase(), 4);

    // Wave band (y 20..45) and prompt line (y 52..62) are both lit.
    assert!(frame.lit_in(0, 20, SCREEN_WIDTH, 25) > 0);
    assert!(frame.lit_in(28, 52, 60, 10) > 0);

    let first = frame.clone();
    frame.blank();
    idle.draw(&mut frame);
    assert_ne!(first, frame);
}

// ═══════════════════════════════════════════════════════════════════════════
// Visualizer
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn visualizer_bars_are_smoothed_towards_targets() {
    let mut frame = FrameBuffer::new();
    let mut vis = VisualizerScreen::new(VISUALIZER_SEED, MARQUEE_STEP_MS);
    vis.draw(&mut frame, "a.mp3", 0, 0);

    // From zero, one frame reaches 30 % of a target in 6..40.
    for bar in vis.bars() {
        assert!(*bar >= 6.0 * 0.3 - 1e-3 && *bar < 40.0 * 0.3, "bar {bar}");
    }

    for n in 0..200 {
        frame.blank();
        vis.draw(&mut frame, "a.mp3", 0, n * 120);
    }
    for bar in vis.bars() {
        assert!(*bar >= 6.0 - 1e-3 && *bar < 40.0, "bar {bar}");
    }
}

#[test]
fn visualizer_is_deterministic_for_a_seed() {
    let mut a = VisualizerScreen::new(7, MARQUEE_STEP_MS);
    let mut b = VisualizerScreen::new(7, MARQUEE_STEP_MS);
    let (mut fa, mut fb) = (FrameBuffer::new(), FrameBuffer::new());
    a.draw(&mut fa, "x.mp3", 0, 0);
    b.draw(&mut fb, "x.mp3", 0, 0);
    assert_eq!(a.bars(), b.bars());
    assert_eq!(fa, fb);
}

#[test]
fn short_name_is_centred_and_still() {
    let mut m = Marquee::new(MARQUEE_STEP_MS);
    let name = "b.mp3";
    let expected = ((SCREEN_WIDTH - text_width(name)) / 2) as i32;
    assert_eq!(m.x_for(name, 0, 0), expected);
    assert_eq!(m.x_for(name, 0, 10_000), expected);
}

#[test]
fn long_name_scrolls_one_pixel_per_step_and_wraps() {
    // 25 chars * 6 px = 150 px > 128.
    let name = "a_really_long_track_name_";
    let width = text_width(name) as i32;
    let mut m = Marquee::new(200);

    assert_eq!(m.x_for(name, 0, 0), 0);
    assert_eq!(m.x_for(name, 0, 200), 0);
    assert_eq!(m.x_for(name, 0, 201), -1);
    assert_eq!(m.x_for(name, 0, 300), -1);
    assert_eq!(m.x_for(name, 0, 402), -2);

    let mut t = 402;
    let mut x = -2;
    while x > -width {
        t += 201;
        x = m.x_for(name, 0, t);
    }
    assert_eq!(x, -width);
    assert_eq!(m.x_for(name, 0, t + 201), 0);
}

#[test]
fn marquee_restarts_on_track_change() {
    let name = "a_really_long_track_name_";
    let mut m = Marquee::new(200);
    m.x_for(name, 0, 0);
    m.x_for(name, 0, 201);
    assert_eq!(m.x_for(name, 0, 402), -2);
    assert_eq!(m.x_for(name, 1, 403), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Volume overlay
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn gauge_fill_maps_volume_linearly() {
    assert_eq!(VolumeScreen::fill_width(0), 0);
    assert_eq!(VolumeScreen::fill_width(14), 70);
    assert_eq!(VolumeScreen::fill_width(21), 106);
    assert_eq!(VolumeScreen::fill_width(99), 106);
}

#[test]
fn volume_screen_draws_outline_fill_and_number() {
    let mut frame = FrameBuffer::new();
    VolumeScreen.draw(&mut frame, 21);
    // Gauge interior fully lit at max volume.
    assert_eq!(frame.lit_in(11, 25, 106, 8), 106 * 8);
    // Number below the gauge.
    assert!(frame.lit_in(50, 40, 12, 10) > 0);

    let mut empty = FrameBuffer::new();
    VolumeScreen.draw(&mut empty, 0);
    assert_eq!(empty.lit_in(11, 25, 106, 8), 0);
    // Outline only: 2 * 108 + 2 * 8 pixels.
    assert_eq!(empty.lit_in(10, 24, 108, 10), 2 * 108 + 2 * 8);
}

// ═══════════════════════════════════════════════════════════════════════════
// Renderer
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn renderer_presents_one_screen_per_call() {
    let display = CaptureDisplay::default();
    let mut r = Renderer::new(display.clone(), &Timing::default(), VISUALIZER_SEED);

    assert_eq!(r.render(&snapshot(PlaybackState::Paused, false, false), 0), Screen::Idle);
    assert_eq!(r.render(&snapshot(PlaybackState::Playing, true, false), 120), Screen::Visualizer);
    assert_eq!(r.render(&snapshot(PlaybackState::Playing, true, true), 240), Screen::VolumeOverlay);
    assert_eq!(display.presents(), 3);
    assert_eq!(r.current(), Some(Screen::VolumeOverlay));
    assert_eq!(display.last_frame().as_ref(), Some(r.frame()));
}

#[test]
fn renderer_blank_presents_empty_frame() {
    let display = CaptureDisplay::default();
    let mut r = Renderer::new(display.clone(), &Timing::default(), VISUALIZER_SEED);
    r.render(&snapshot(PlaybackState::Paused, false, false), 0);
    r.blank();
    assert!(display.last_frame().unwrap().is_blank());
    assert_eq!(r.current(), None);
}

#[test]
fn renderer_fault_shows_banner() {
    let display = CaptureDisplay::default();
    let mut r = Renderer::new(display.clone(), &Timing::default(), VISUALIZER_SEED);
    r.fault(Error::NoTracks);
    let frame = display.last_frame().unwrap();
    assert!(frame.lit_in(0, 4, 30, 10) > 0);
    assert!(frame.lit_in(0, 24, SCREEN_WIDTH, 10) > 0);
}

#[test]
fn show_fault_presents_without_renderer() {
    let mut display = CaptureDisplay::default();
    show_fault(&mut display, Error::StorageUnavailable);
    assert_eq!(display.presents(), 1);
    let frame = display.last_frame().unwrap();
    assert!(frame.lit_in(0, 44, SCREEN_WIDTH, 10) > 0);
}
