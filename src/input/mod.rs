//! Touch button input - gesture classification.
//!
//! Three TTP223 touch pads (active-high, polled, no interrupts):
//!   - PLAY       - tap: play/pause, long: restart track, very long: sleep
//!   - NEXT       - tap: next track, hold: volume down
//!   - PREV       - tap: previous track, hold: volume up
//!
//! Raw levels are sampled once per loop iteration and fed to the
//! [`InputClassifier`], which turns falling edges into [`PressEvent`]s and
//! reports whether each pad is currently held past the long threshold.

mod classifier;


pub use classifier::{ButtonChannel, InputClassifier, Poll};

use embedded_hal::digital::InputPin;

/// What a physical button is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonRole {
    Play,
    /// Next track on tap, volume down while held.
    NextVolDown,
    /// Previous track on tap, volume up while held.
    PrevVolUp,
}

impl ButtonRole {
    /// Poll order; also the index into per-button arrays.
    pub const ALL: [ButtonRole; 3] = [ButtonRole::Play, ButtonRole::NextVolDown, ButtonRole::PrevVolUp];

    pub const fn index(self) -> usize {
        match self {
            ButtonRole::Play => 0,
            ButtonRole::NextVolDown => 1,
            ButtonRole::PrevVolUp => 2,
        }
    }
}

/// Gesture class of a completed press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    /// Released at or before the long threshold.
    Tap,
    /// Released after the long threshold.
    Long,
    /// Released after the very-long threshold.
    VeryLong,
}

/// A classified release, consumed immediately by the playback controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressEvent {
    pub role: ButtonRole,
    pub kind: PressKind,
    /// Time between the rising and falling edge (ms).
    pub duration_ms: u64,
}

/// Source of raw button levels, indexed like [`ButtonRole::ALL`].
pub trait ButtonSource {
    /// `true` = touched.
    fn levels(&mut self) -> [bool; 3];
}

/// Three GPIO inputs read as active-high levels.
pub struct ButtonPins<PLAY, NEXT, PREV> {
    play: PLAY,
    next: NEXT,
    prev: PREV,
}

impl<PLAY, NEXT, PREV> ButtonPins<PLAY, NEXT, PREV>
where
    PLAY: InputPin,
    NEXT: InputPin,
    PREV: InputPin,
{
    pub fn new(play: PLAY, next: NEXT, prev: PREV) -> Self {
        Self { play, next, prev }
    }
}

impl<PLAY, NEXT, PREV> ButtonSource for ButtonPins<PLAY, NEXT, PREV>
where
    PLAY: InputPin,
    NEXT: InputPin,
    PREV: InputPin,
{
    fn levels(&mut self) -> [bool; 3] {
        // A failed read counts as released.
        [
            self.play.is_high().unwrap_or(false),
            self.next.is_high().unwrap_or(false),
            self.prev.is_high().unwrap_or(false),
        ]
    }
}
