//! Application-wide constants and compile-time configuration.
//!
//! All gesture thresholds, screen cadence, volume range, catalog limits
//! and flash layout live here so they can be tuned in one place.

// Input gestures

/// Hold longer than this (ms) is a long press.
pub const LONG_PRESS_MS: u64 = 700;

/// Hold longer than this (ms) is a very-long press (sleep when paused).
pub const VERY_LONG_PRESS_MS: u64 = 3000;

/// Minimum time (ms) after any accepted release before another release
/// is classified. Shared by all three buttons.
pub const ACTION_LOCK_MS: u64 = 250;

/// Volume repeat-fire interval (ms) while a volume button is held.
/// 120 is snappy; up to ~220 gives a smoother ramp.
pub const VOLUME_REPEAT_MS: u64 = 120;

// Playback

/// Pause between stopping the decoder and opening the next stream (ms).
pub const RESTART_SETTLE_MS: u32 = 40;

/// Volume range accepted by the audio engine (inclusive).
pub const VOLUME_MIN: u8 = 0;
pub const VOLUME_MAX: u8 = 21;

/// Volume used when nothing is persisted yet.
pub const DEFAULT_VOLUME: u8 = 14;

/// Track index used when nothing is persisted yet.
pub const DEFAULT_TRACK: usize = 0;

// Catalog

/// Maximum number of tracks kept from the music directory.
pub const MAX_TRACKS: usize = 30;

/// Capacity of a stored track path, e.g. `/music/SONG.MP3`.
pub const MAX_PATH_LEN: usize = 64;

/// Directory scanned for tracks at boot.
pub const MUSIC_DIR: &str = "/music";

/// Accepted file suffix (compared case-insensitively).
pub const TRACK_EXTENSION: &str = ".mp3";

// Display

/// SSD1306 panel geometry.
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;

/// Screen refresh cadence (ms).
pub const RENDER_INTERVAL_MS: u64 = 120;

/// Marquee advances one pixel per this many ms.
pub const MARQUEE_STEP_MS: u64 = 200;

/// Number of visualizer bars.
pub const VISUALIZER_BARS: usize = 10;

/// Weight of the previous bar height when smoothing (0.0 - 1.0).
pub const VISUALIZER_DECAY: f32 = 0.7;

/// Seed for the visualizer's pseudo-random bar targets.
pub const VISUALIZER_SEED: u64 = 0x5EED_BA25;

// GPIO pin assignments (nRF52840-DK defaults)
//
//   Touch PLAY         → P0.03
//   Touch NEXT / VOL-  → P0.04
//   Touch PREV / VOL+  → P0.28
//   I²C SDA (OLED)     → P0.26
//   I²C SCL (OLED)     → P0.27
//   SD   SCK/MOSI/MISO → P1.15 / P1.13 / P1.14, CS → P1.12
//   VS1053 SCK/MOSI/MISO → P0.13 / P0.14 / P0.15
//   VS1053 XCS / XDCS / DREQ / XRESET → P0.16 / P0.17 / P0.19 / P0.20

/// I²C address of the OLED panel.
pub const OLED_I2C_ADDR: u8 = 0x3C;

// Settings storage

/// Flash page index where the settings area starts (4 KB per page on nRF52840).
pub const STORAGE_FLASH_PAGE_START: u32 = 252;

/// Number of flash pages reserved for settings.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;

/// Every timing knob used by the input, playback and render paths.
///
/// `Timing::default()` uses the constants above; a build can widen the
/// repeat interval (or anything else) without touching the logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub long_press_ms: u64,
    pub very_long_press_ms: u64,
    pub action_lock_ms: u64,
    pub volume_repeat_ms: u64,
    pub render_interval_ms: u64,
    pub marquee_step_ms: u64,
    pub restart_settle_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            long_press_ms: LONG_PRESS_MS,
            very_long_press_ms: VERY_LONG_PRESS_MS,
            action_lock_ms: ACTION_LOCK_MS,
            volume_repeat_ms: VOLUME_REPEAT_MS,
            render_interval_ms: RENDER_INTERVAL_MS,
            marquee_step_ms: MARQUEE_STEP_MS,
            restart_settle_ms: RESTART_SETTLE_MS,
        }
    }
}
