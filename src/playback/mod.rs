//! Playback subsystem - the state machine between buttons and the decoder.
//!
//! The [`PlaybackController`] is the single owner of playback state,
//! current track and volume. It drives an [`AudioEngine`] and writes every
//! track/volume change straight through to a [`SettingsStore`].
//!
//! ## States
//!
//! - **Paused**: boot state; nothing decoding (or decoder paused)
//! - **Playing**: decoder fed from the current track
//! - **Sleeping**: audio stopped, screen blank; terminal until reset

mod controller;


pub use controller::PlaybackController;

/// Commands the controller needs from the audio decoder.
///
/// All calls are synchronous and assumed to succeed; implementations log
/// their own faults. `service` must run often enough to keep the decoder
/// fed while not sleeping.
pub trait AudioEngine {
    /// Open `path` and start decoding from the beginning.
    fn start(&mut self, path: &str);
    /// Stop decoding and release the current stream.
    fn stop(&mut self);
    /// Toggle between paused and running.
    fn pause_resume(&mut self);
    /// Output level in `VOLUME_MIN..=VOLUME_MAX`.
    fn set_volume(&mut self, level: u8);
    /// True while a stream is open, unpaused and not yet exhausted.
    fn is_running(&self) -> bool;
    /// Move pending audio data into the decoder.
    fn service(&mut self);
}

/// Integers that survive a power cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingKey {
    /// Last played track index.
    Track,
    /// Output volume.
    Volume,
}

impl SettingKey {
    /// Map key used in flash.
    pub const fn id(self) -> u8 {
        match self {
            SettingKey::Track => 0x01,
            SettingKey::Volume => 0x02,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SettingKey::Track => "track",
            SettingKey::Volume => "vol",
        }
    }
}

/// Durable key-value store. Reads fall back to `default`; writes are
/// best-effort and unchecked.
pub trait SettingsStore {
    fn get_int(&mut self, key: SettingKey, default: i32) -> i32;
    fn put_int(&mut self, key: SettingKey, value: i32);
}

/// Playback state owned by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    Paused,
    Playing,
    Sleeping,
}

/// Direction of one volume step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VolumeDirection {
    Down,
    Up,
}

impl VolumeDirection {
    pub const fn index(self) -> usize {
        match self {
            VolumeDirection::Down => 0,
            VolumeDirection::Up => 1,
        }
    }
}
