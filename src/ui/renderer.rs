use super::{draw_fault, select_screen, Display, FrameBuffer, IdleScreen, Screen, Snapshot};
use super::{VisualizerScreen, VolumeScreen};
use crate::catalog::display_name;
use crate::config::Timing;
use crate::error::Error;

/// Owns the frame, the three screens and the panel.
pub struct Renderer<D> {
    display: D,
    frame: FrameBuffer,
    idle: IdleScreen,
    visualizer: VisualizerScreen,
    volume: VolumeScreen,
    current: Option<Screen>,
}

impl<D: Display> Renderer<D> {
    pub fn new(display: D, timing: &Timing, seed: u64) -> Self {
        Self {
            display,
            frame: FrameBuffer::new(),
            idle: IdleScreen::default(),
            visualizer: VisualizerScreen::new(seed, timing.marquee_step_ms),
            volume: VolumeScreen,
            current: None,
        }
    }

    /// Draw the selected screen from scratch and present it.
    pub fn render(&mut self, snapshot: &Snapshot<'_>, now_ms: u64) -> Screen {
        let screen = select_screen(snapshot.state, snapshot.audio_running, snapshot.volume_overlay);
        if self.current != Some(screen) {
            debug!("UI: {} -> {}", self.current, screen);
            self.current = Some(screen);
        }

        self.frame.blank();
        match screen {
            Screen::Idle => self.idle.draw(&mut self.frame),
            Screen::Visualizer => self.visualizer.draw(
                &mut self.frame,
                display_name(snapshot.track_path),
                snapshot.track,
                now_ms,
            ),
            Screen::VolumeOverlay => self.volume.draw(&mut self.frame, snapshot.volume),
        }
        self.display.present(&self.frame);
        screen
    }

    /// Present an empty frame (sleep).
    pub fn blank(&mut self) {
        self.frame.blank();
        self.current = None;
        self.display.present(&self.frame);
    }

    /// Present the boot fault banner.
    pub fn fault(&mut self, error: Error) {
        self.frame.blank();
        draw_fault(&mut self.frame, error);
        self.current = None;
        self.display.present(&self.frame);
    }

    /// Last composed frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn current(&self) -> Option<Screen> {
        self.current
    }
}
