//! User interface subsystem - three mutually exclusive OLED screens.
//!
//! Exactly one screen is drawn per refresh, picked by [`select_screen`]
//! from the playback state. Screens draw into a RAM [`FrameBuffer`] which
//! the [`Display`] then pushes to the panel.
//!
//! ## Screens
//!
//! - **Idle**: sine-wave dots and a "Press Play" prompt
//! - **Visualizer**: smoothed bars and the (scrolling) track name
//! - **VolumeOverlay**: gauge and number while a volume pad is held

mod framebuffer;
mod renderer;
mod screens;

#[cfg(test)]
mod tests;

pub use framebuffer::FrameBuffer;
pub use renderer::Renderer;
pub use screens::{draw_fault, text_width, IdleScreen, Marquee, VisualizerScreen, VolumeScreen};

use crate::error::Error;
use crate::playback::PlaybackState;

/// Push a finished frame to the panel.
pub trait Display {
    fn present(&mut self, frame: &FrameBuffer);
}

/// Screens (views) the UI can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Nothing playing.
    Idle,
    /// Audio running and not paused.
    Visualizer,
    /// A volume pad is being held.
    VolumeOverlay,
}

/// Everything a refresh needs from the playback side.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub state: PlaybackState,
    pub audio_running: bool,
    pub volume_overlay: bool,
    pub volume: u8,
    pub track: usize,
    pub track_path: &'a str,
}

/// Pick the screen: volume overlay, then visualizer, then idle.
pub fn select_screen(state: PlaybackState, audio_running: bool, volume_overlay: bool) -> Screen {
    if volume_overlay {
        Screen::VolumeOverlay
    } else if audio_running && state == PlaybackState::Playing {
        Screen::Visualizer
    } else {
        Screen::Idle
    }
}

/// Compose and present the fault banner on a bare panel, for failures
/// that happen before a [`Renderer`] exists.
pub fn show_fault<D: Display>(display: &mut D, error: Error) {
    let mut frame = FrameBuffer::new();
    draw_fault(&mut frame, error);
    display.present(&frame);
}
