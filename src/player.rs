//! The cooperative main loop.
//!
//! [`Player`] is the one context object owned by the firmware's loop. It
//! holds every piece of mutable state (button channels, playback state,
//! screen animation) and is advanced by calling [`Player::step`] as often
//! as possible. Nothing in a step blocks except the short settle delay of
//! a track restart.

use crate::catalog::Catalog;
use crate::clock::{elapsed, Clock};
use crate::config::{Timing, VISUALIZER_SEED};
use crate::error::Error;
use crate::input::{ButtonRole, ButtonSource, InputClassifier};
use crate::playback::{AudioEngine, PlaybackController, SettingsStore};
use crate::ui::{Display, Renderer, Screen, Snapshot};
use embedded_hal::delay::DelayNs;

/// Hardware collaborators handed to [`Player::boot`].
pub struct Parts<B, A, S, P, D, C> {
    pub buttons: B,
    pub audio: A,
    pub store: S,
    /// Used for the stop → start settle pause.
    pub delay: P,
    pub display: D,
    pub clock: C,
}

pub struct Player<B, A, S, P, D, C> {
    buttons: B,
    classifier: InputClassifier,
    controller: PlaybackController<A, S, P>,
    renderer: Renderer<D>,
    clock: C,
    timing: Timing,
    last_render_ms: u64,
}

impl<B, A, S, P, D, C> Player<B, A, S, P, D, C>
where
    B: ButtonSource,
    A: AudioEngine,
    S: SettingsStore,
    P: DelayNs,
    D: Display,
    C: Clock,
{
    /// Restore settings, apply volume and draw the first Idle frame.
    ///
    /// On failure the fault banner is left on the panel and the error is
    /// returned; the caller is expected to halt.
    pub fn boot(catalog: Catalog, parts: Parts<B, A, S, P, D, C>, timing: Timing) -> Result<Self, Error> {
        let now_ms = parts.clock.now_ms();
        let mut renderer = Renderer::new(parts.display, &timing, VISUALIZER_SEED ^ now_ms);

        let controller =
            match PlaybackController::new(catalog, parts.audio, parts.store, parts.delay, timing) {
                Ok(controller) => controller,
                Err(e) => {
                    error!("Boot failed: {}", e);
                    renderer.fault(e);
                    return Err(e);
                }
            };

        let mut player = Self {
            buttons: parts.buttons,
            classifier: InputClassifier::new(timing),
            controller,
            renderer,
            clock: parts.clock,
            timing,
            last_render_ms: now_ms,
        };
        player.render(now_ms);
        info!("Player ready");
        Ok(player)
    }

    /// One loop iteration: feed audio, poll pads, check for end of
    /// track, refresh the screen when due.
    pub fn step(&mut self) {
        self.controller.service_audio();

        let now_ms = self.clock.now_ms();
        let was_sleeping = self.controller.is_sleeping();
        let polls = self.classifier.poll_all(self.buttons.levels(), now_ms);
        for (role, poll) in ButtonRole::ALL.into_iter().zip(polls) {
            if poll.held_long {
                self.controller.handle_hold(role, now_ms);
            }
            if let Some(event) = poll.event {
                self.controller.handle_press(event);
            }
        }

        let running = self.controller.audio_running();
        self.controller.tick(running);

        if self.controller.is_sleeping() {
            if !was_sleeping {
                self.renderer.blank();
            }
            return;
        }

        let now_ms = self.clock.now_ms();
        if elapsed(now_ms, self.last_render_ms) >= self.timing.render_interval_ms {
            self.render(now_ms);
        }
    }

    fn render(&mut self, now_ms: u64) {
        self.last_render_ms = now_ms;
        let snapshot = Snapshot {
            state: self.controller.state(),
            audio_running: self.controller.audio_running(),
            volume_overlay: self.controller.volume_overlay(),
            volume: self.controller.volume(),
            track: self.controller.track(),
            track_path: self.controller.track_path(),
        };
        self.renderer.render(&snapshot, now_ms);
    }

    pub fn controller(&self) -> &PlaybackController<A, S, P> {
        &self.controller
    }

    /// Screen drawn by the last refresh, `None` while blanked.
    pub fn screen(&self) -> Option<Screen> {
        self.renderer.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{PlaybackState, SettingKey};
    use crate::testing::*;

    type TestPlayer =
        Player<MockButtons, MockAudio, MemoryStore, CountingDelay, CaptureDisplay, ManualClock>;

    struct Rig {
        buttons: MockButtons,
        audio: MockAudio,
        store: MemoryStore,
        display: CaptureDisplay,
        clock: ManualClock,
        player: TestPlayer,
    }

    impl Rig {
        fn new() -> Self {
            let (buttons, audio, store) = (MockButtons::default(), MockAudio::default(), MemoryStore::default());
            let (display, clock) = (CaptureDisplay::default(), ManualClock::default());
            let parts = Parts {
                buttons: buttons.clone(),
                audio: audio.clone(),
                store: store.clone(),
                delay: CountingDelay::default(),
                display: display.clone(),
                clock: clock.clone(),
            };
            let player = Player::boot(abc_catalog(), parts, Timing::default()).unwrap();
            Self { buttons, audio, store, display, clock, player }
        }

        fn step_at(&mut self, t: u64) {
            self.clock.set(t);
            self.player.step();
        }

        /// Touch at `at`, release at `at + held`, one step per edge.
        fn press(&mut self, role: ButtonRole, at: u64, held: u64) {
            self.buttons.set(role, true);
            self.step_at(at);
            self.buttons.set(role, false);
            self.step_at(at + held);
        }
    }

    #[test]
    fn boot_applies_volume_and_draws_idle() {
        let rig = Rig::new();
        assert_eq!(rig.audio.calls(), vec![AudioCall::SetVolume(14)]);
        assert_eq!(rig.display.presents(), 1);
        assert_eq!(rig.player.screen(), Some(Screen::Idle));
        assert_eq!(rig.player.controller().state(), PlaybackState::Paused);
    }

    #[test]
    fn every_step_services_audio() {
        let mut rig = Rig::new();
        for t in 1..=5 {
            rig.step_at(t);
        }
        assert_eq!(rig.audio.services(), 5);
    }

    #[test]
    fn refresh_is_throttled_to_render_interval() {
        let mut rig = Rig::new();
        for _ in 0..11 {
            rig.clock.advance(10);
            rig.player.step();
        }
        assert_eq!(rig.display.presents(), 1);
        rig.clock.advance(10);
        rig.player.step();
        assert_eq!(rig.display.presents(), 2);
    }

    #[test]
    fn play_tap_switches_to_visualizer() {
        let mut rig = Rig::new();
        rig.press(ButtonRole::Play, 1_000, 50);
        assert_eq!(rig.player.controller().state(), PlaybackState::Playing);
        assert!(rig.audio.calls().contains(&AudioCall::Start("/music/a.mp3".into())));

        rig.step_at(1_200);
        assert_eq!(rig.player.screen(), Some(Screen::Visualizer));
    }

    #[test]
    fn holding_volume_pad_shows_gauge_then_idle() {
        let mut rig = Rig::new();
        rig.buttons.set(ButtonRole::NextVolDown, true);
        for t in (1_000..2_000).step_by(10) {
            rig.step_at(t);
        }
        assert_eq!(rig.player.screen(), Some(Screen::VolumeOverlay));
        assert!(rig.player.controller().volume_overlay());

        rig.buttons.set(ButtonRole::NextVolDown, false);
        rig.step_at(2_000);
        // Steps at 1710, 1840 and 1970.
        assert_eq!(rig.player.controller().volume(), 11);
        assert_eq!(rig.store.get(SettingKey::Volume), Some(11));
        assert!(!rig.player.controller().volume_overlay());
        // Release was a long press, so the track did not change.
        assert_eq!(rig.player.controller().track(), 0);

        rig.step_at(2_100);
        assert_eq!(rig.player.screen(), Some(Screen::Idle));
    }

    #[test]
    fn very_long_press_sleeps_and_blanks_once() {
        let mut rig = Rig::new();
        rig.press(ButtonRole::Play, 1_000, 3_100);
        assert!(rig.player.controller().is_sleeping());
        assert_eq!(rig.player.screen(), None);
        assert!(rig.display.last_frame().unwrap().is_blank());

        let presents = rig.display.presents();
        let services = rig.audio.services();
        rig.press(ButtonRole::Play, 5_000, 50);
        rig.step_at(6_000);
        assert_eq!(rig.display.presents(), presents);
        assert_eq!(rig.audio.services(), services);
        assert!(rig.player.controller().is_sleeping());
    }

    #[test]
    fn finished_track_advances_inside_step() {
        let mut rig = Rig::new();
        rig.press(ButtonRole::Play, 1_000, 50);
        rig.step_at(1_100);
        rig.audio.clear();

        rig.audio.set_running(false);
        rig.step_at(1_200);
        assert_eq!(rig.player.controller().track(), 1);
        assert_eq!(
            rig.audio.calls(),
            vec![AudioCall::Stop, AudioCall::Start("/music/b.mp3".into())]
        );
        assert_eq!(rig.store.get(SettingKey::Track), Some(1));
    }
}
