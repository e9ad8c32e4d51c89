use super::{AudioEngine, PlaybackState, SettingKey, SettingsStore, VolumeDirection};
use crate::catalog::Catalog;
use crate::clock::elapsed;
use crate::config::{Timing, DEFAULT_TRACK, DEFAULT_VOLUME, VOLUME_MAX, VOLUME_MIN};
use crate::error::Error;
use crate::input::{ButtonRole, PressEvent, PressKind};
use embedded_hal::delay::DelayNs;

/// Owns playback state, current track and volume.
///
/// Transitions:
/// ```text
/// Paused  --tap / long / next / prev-->  Playing
/// Playing --tap-->                       Paused
/// Paused  --very long-->                 Sleeping
/// Playing --next / prev / end of track-> Playing (new track)
/// ```
/// Sleeping has no exit; every operation is ignored once there.
pub struct PlaybackController<A, S, D> {
    audio: A,
    store: S,
    delay: D,
    catalog: Catalog,
    timing: Timing,
    state: PlaybackState,
    track: usize,
    volume: u8,
    volume_overlay: bool,
    /// Last repeat step per volume pad, indexed by [`VolumeDirection::index`].
    last_volume_step_ms: [Option<u64>; 2],
    /// Engine running flag seen by the previous `tick`.
    was_running: bool,
    /// A stream has been handed to the engine since boot.
    loaded: bool,
}

impl<A, S, D> PlaybackController<A, S, D>
where
    A: AudioEngine,
    S: SettingsStore,
    D: DelayNs,
{
    /// Restore track and volume from `store` and apply the volume.
    ///
    /// Starts Paused with nothing loaded. A stored track index outside the
    /// catalog falls back to the first track; a stored volume outside the
    /// engine range is clamped.
    pub fn new(
        catalog: Catalog,
        mut audio: A,
        mut store: S,
        delay: D,
        timing: Timing,
    ) -> Result<Self, Error> {
        if catalog.is_empty() {
            return Err(Error::NoTracks);
        }

        let stored_track = store.get_int(SettingKey::Track, DEFAULT_TRACK as i32);
        let track = catalog.clamp_index(stored_track);
        if track as i32 != stored_track {
            warn!("Playback: stored track {} out of range, using {}", stored_track, track);
        }

        let stored_volume = store.get_int(SettingKey::Volume, DEFAULT_VOLUME as i32);
        let volume = stored_volume.clamp(VOLUME_MIN as i32, VOLUME_MAX as i32) as u8;
        if volume as i32 != stored_volume {
            warn!("Playback: stored volume {} clamped to {}", stored_volume, volume);
        }

        audio.set_volume(volume);
        info!("Playback: track {} volume {}", track, volume);

        Ok(Self {
            audio,
            store,
            delay,
            catalog,
            timing,
            state: PlaybackState::Paused,
            track,
            volume,
            volume_overlay: false,
            last_volume_step_ms: [None; 2],
            was_running: false,
            loaded: false,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_sleeping(&self) -> bool {
        self.state == PlaybackState::Sleeping
    }

    pub fn track(&self) -> usize {
        self.track
    }

    /// Path of the current track.
    pub fn track_path(&self) -> &str {
        self.catalog.path(self.track).unwrap_or("")
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Volume gauge should be on screen.
    pub fn volume_overlay(&self) -> bool {
        self.volume_overlay
    }

    pub fn audio_running(&self) -> bool {
        self.audio.is_running()
    }

    /// Feed the decoder. Skipped while sleeping.
    pub fn service_audio(&mut self) {
        if !self.is_sleeping() {
            self.audio.service();
        }
    }

    // -----------------------------------------------------------------------
    // Button dispatch
    // -----------------------------------------------------------------------

    /// Apply a classified release.
    pub fn handle_press(&mut self, event: PressEvent) {
        match (event.role, event.kind) {
            (ButtonRole::Play, PressKind::Tap) => self.on_play_tap(),
            (ButtonRole::Play, PressKind::Long) => self.on_play_long(),
            (ButtonRole::Play, PressKind::VeryLong) => self.on_play_very_long(),
            (ButtonRole::NextVolDown, kind) => {
                if kind == PressKind::Tap {
                    self.on_next_tap();
                }
                self.dismiss_volume_overlay();
            }
            (ButtonRole::PrevVolUp, kind) => {
                if kind == PressKind::Tap {
                    self.on_prev_tap();
                }
                self.dismiss_volume_overlay();
            }
        }
    }

    /// Apply a "held past long threshold" sample. Volume pads repeat-fire
    /// at most once per `volume_repeat_ms`, each pad on its own timer.
    pub fn handle_hold(&mut self, role: ButtonRole, now_ms: u64) {
        let direction = match role {
            ButtonRole::Play => return,
            ButtonRole::NextVolDown => VolumeDirection::Down,
            ButtonRole::PrevVolUp => VolumeDirection::Up,
        };
        if self.is_sleeping() {
            return;
        }
        let repeat_ms = self.timing.volume_repeat_ms;
        let last = &mut self.last_volume_step_ms[direction.index()];
        let due = last.map_or(true, |last| elapsed(now_ms, last) > repeat_ms);
        if due {
            *last = Some(now_ms);
            self.on_volume_step(direction);
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Toggle pause/resume. With nothing loaded (first tap after boot, or
    /// the stream ended under a pause) it starts the current track instead.
    pub fn on_play_tap(&mut self) {
        match self.state {
            PlaybackState::Sleeping => {}
            PlaybackState::Paused if !self.loaded => self.restart(),
            PlaybackState::Paused => {
                self.audio.pause_resume();
                self.state = PlaybackState::Playing;
                info!("Playback: resumed");
            }
            PlaybackState::Playing if !self.audio.is_running() => {
                // Stream ended before this pass's tick saw it.
                self.loaded = false;
                self.state = PlaybackState::Paused;
                info!("Playback: paused at end of track {}", self.track);
            }
            PlaybackState::Playing => {
                self.audio.pause_resume();
                self.state = PlaybackState::Paused;
                info!("Playback: paused");
            }
        }
    }

    /// Restart the current track from the beginning.
    pub fn on_play_long(&mut self) {
        if !self.is_sleeping() {
            self.restart();
        }
    }

    /// Sleep when paused. While playing this behaves like a long press.
    pub fn on_play_very_long(&mut self) {
        match self.state {
            PlaybackState::Sleeping => {}
            PlaybackState::Paused => self.sleep(),
            PlaybackState::Playing => self.restart(),
        }
    }

    pub fn on_next_tap(&mut self) {
        if !self.is_sleeping() {
            self.track = self.catalog.next_index(self.track);
            self.restart();
        }
    }

    pub fn on_prev_tap(&mut self) {
        if !self.is_sleeping() {
            self.track = self.catalog.prev_index(self.track);
            self.restart();
        }
    }

    /// One volume step, clamped to the engine range, applied and persisted.
    pub fn on_volume_step(&mut self, direction: VolumeDirection) {
        if self.is_sleeping() {
            return;
        }
        self.volume = match direction {
            VolumeDirection::Down => self.volume.saturating_sub(1).max(VOLUME_MIN),
            VolumeDirection::Up => (self.volume + 1).min(VOLUME_MAX),
        };
        self.audio.set_volume(self.volume);
        self.store.put_int(SettingKey::Volume, self.volume as i32);
        self.volume_overlay = true;
        debug!("Playback: volume {}", self.volume);
    }

    /// Hide the volume gauge (volume pad released).
    pub fn dismiss_volume_overlay(&mut self) {
        self.volume_overlay = false;
    }

    /// Auto-advance: the engine stopped on its own while we were playing.
    ///
    /// End of track and a stream fault look the same from here; both
    /// move on to the next track.
    pub fn tick(&mut self, audio_running: bool) {
        let was_running = core::mem::replace(&mut self.was_running, audio_running);
        if was_running && !audio_running && self.state == PlaybackState::Playing {
            info!("Playback: track {} ended", self.track);
            self.on_next_tap();
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn restart(&mut self) {
        let path = match self.catalog.path(self.track) {
            Some(path) => path,
            None => return,
        };
        self.audio.stop();
        self.delay.delay_ms(self.timing.restart_settle_ms);
        self.audio.start(path);
        self.loaded = true;
        self.state = PlaybackState::Playing;
        self.store.put_int(SettingKey::Track, self.track as i32);
        info!("Playback: playing {} ({})", self.track, path);
    }

    fn sleep(&mut self) {
        self.audio.stop();
        self.loaded = false;
        self.volume_overlay = false;
        self.state = PlaybackState::Sleeping;
        info!("Playback: sleeping");
    }
}
