//! The three playback screens plus the boot fault screen.
//!
//! Each screen owns its animation state. Nothing is shared between them,
//! so switching screens simply lets the others' state drift.

use super::FrameBuffer;
use crate::clock::elapsed;
use crate::config::{SCREEN_WIDTH, VISUALIZER_BARS, VISUALIZER_DECAY, VOLUME_MAX, VOLUME_MIN};
use crate::error::Error;
use core::fmt::Write;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Glyph advance of `FONT_6X10`.
pub const CHAR_WIDTH: u32 = 6;

/// Top of the bottom text line.
const LABEL_Y: i32 = 52;

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

fn fill() -> PrimitiveStyle<BinaryColor> {
    PrimitiveStyle::with_fill(BinaryColor::On)
}

fn label(frame: &mut FrameBuffer, text: &str, x: i32, y: i32) {
    let _ = Text::with_baseline(text, Point::new(x, y), text_style(), Baseline::Top).draw(frame);
}

/// Width of `text` in pixels.
pub fn text_width(text: &str) -> u32 {
    text.chars().count() as u32 * CHAR_WIDTH
}

// ═══════════════════════════════════════════════════════════════════════════
// Idle
// ═══════════════════════════════════════════════════════════════════════════

/// Row of dots riding a sine wave, plus the "Press Play" prompt.
#[derive(Debug, Default)]
pub struct IdleScreen {
    phase: i32,
}

impl IdleScreen {
    const DOT_SPACING: usize = 8;
    const PHASE_STEP: i32 = 4;

    pub fn draw(&mut self, frame: &mut FrameBuffer) {
        for x in (0..SCREEN_WIDTH as i32).step_by(Self::DOT_SPACING) {
            let y = 32 + (libm::sinf(x.wrapping_add(self.phase) as f32 * 0.1) * 10.0) as i32;
            let _ = Circle::with_center(Point::new(x, y), 5)
                .into_styled(fill())
                .draw(frame);
        }
        label(frame, "Press Play", 28, LABEL_Y);
        self.phase = self.phase.wrapping_add(Self::PHASE_STEP);
    }

    pub fn phase(&self) -> i32 {
        self.phase
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Visualizer
// ═══════════════════════════════════════════════════════════════════════════

/// Horizontal scroller for names wider than the panel.
#[derive(Debug)]
pub struct Marquee {
    offset: u32,
    last_step_ms: u64,
    step_ms: u64,
    track: Option<usize>,
}

impl Marquee {
    pub const fn new(step_ms: u64) -> Self {
        Self {
            offset: 0,
            last_step_ms: 0,
            step_ms,
            track: None,
        }
    }

    /// Left edge for `text` of `track` at `now_ms`: centred if it fits,
    /// otherwise scrolled one pixel per step and wrapped once fully past.
    pub fn x_for(&mut self, text: &str, track: usize, now_ms: u64) -> i32 {
        if self.track != Some(track) {
            self.track = Some(track);
            self.offset = 0;
            self.last_step_ms = now_ms;
        }

        let width = text_width(text);
        if width <= SCREEN_WIDTH {
            return ((SCREEN_WIDTH - width) / 2) as i32;
        }

        if elapsed(now_ms, self.last_step_ms) > self.step_ms {
            self.offset += 1;
            if self.offset > width {
                self.offset = 0;
            }
            self.last_step_ms = now_ms;
        }
        -(self.offset as i32)
    }
}

/// Smoothed pseudo-random bars with the track name underneath.
#[derive(Debug)]
pub struct VisualizerScreen {
    bars: [f32; VISUALIZER_BARS],
    rng: SmallRng,
    marquee: Marquee,
}

impl VisualizerScreen {
    const BAR_WIDTH: u32 = 8;
    const BAR_PITCH: i32 = 12;
    const BAR_LEFT: i32 = 6;
    const BAR_BASE: i32 = 46;
    /// Bar targets are drawn from `MIN_TARGET..MAX_TARGET`.
    pub const MIN_TARGET: u32 = 6;
    pub const MAX_TARGET: u32 = 40;

    pub fn new(seed: u64, marquee_step_ms: u64) -> Self {
        Self {
            bars: [0.0; VISUALIZER_BARS],
            rng: SmallRng::seed_from_u64(seed),
            marquee: Marquee::new(marquee_step_ms),
        }
    }

    pub fn draw(&mut self, frame: &mut FrameBuffer, name: &str, track: usize, now_ms: u64) {
        for (i, bar) in self.bars.iter_mut().enumerate() {
            let target = self.rng.random_range(Self::MIN_TARGET..Self::MAX_TARGET) as f32;
            *bar = *bar * VISUALIZER_DECAY + target * (1.0 - VISUALIZER_DECAY);

            let h = *bar as i32;
            let x = Self::BAR_LEFT + i as i32 * Self::BAR_PITCH;
            let y = Self::BAR_BASE - h;
            let _ = Rectangle::new(Point::new(x, y), Size::new(Self::BAR_WIDTH, h as u32))
                .into_styled(fill())
                .draw(frame);
            let _ = Circle::with_center(Point::new(x + 4, y - 2), 5)
                .into_styled(fill())
                .draw(frame);
        }

        let x = self.marquee.x_for(name, track, now_ms);
        label(frame, name, x, LABEL_Y);
    }

    pub fn bars(&self) -> &[f32; VISUALIZER_BARS] {
        &self.bars
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Volume overlay
// ═══════════════════════════════════════════════════════════════════════════

/// Gauge outline, proportional fill and the numeric level.
#[derive(Debug, Default)]
pub struct VolumeScreen;

impl VolumeScreen {
    const GAUGE_X: i32 = 10;
    const GAUGE_Y: i32 = 24;
    const GAUGE_W: u32 = 108;
    const GAUGE_H: u32 = 10;

    /// Fill width for `volume`, mapped linearly onto the gauge interior.
    pub fn fill_width(volume: u8) -> u32 {
        let inner = Self::GAUGE_W - 2;
        let v = volume.clamp(VOLUME_MIN, VOLUME_MAX) - VOLUME_MIN;
        v as u32 * inner / (VOLUME_MAX - VOLUME_MIN) as u32
    }

    pub fn draw(&mut self, frame: &mut FrameBuffer, volume: u8) {
        let _ = Rectangle::new(
            Point::new(Self::GAUGE_X, Self::GAUGE_Y),
            Size::new(Self::GAUGE_W, Self::GAUGE_H),
        )
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(frame);

        let w = Self::fill_width(volume);
        if w > 0 {
            let _ = Rectangle::new(
                Point::new(Self::GAUGE_X + 1, Self::GAUGE_Y + 1),
                Size::new(w, Self::GAUGE_H - 2),
            )
            .into_styled(fill())
            .draw(frame);
        }

        let mut digits: heapless::String<4> = heapless::String::new();
        let _ = write!(digits, "{}", volume);
        label(frame, &digits, 50, 40);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Fault
// ═══════════════════════════════════════════════════════════════════════════

/// Boot failure banner. Shown once before the firmware halts.
pub fn draw_fault(frame: &mut FrameBuffer, error: Error) {
    label(frame, "ERROR", 0, 4);
    label(frame, error.message(), 0, 24);
    label(frame, "Power-cycle to retry", 0, 44);
}
