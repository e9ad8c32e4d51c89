//! Unified error type for touchplayer.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Every variant is a boot-time failure; the runtime loop has no
//! recoverable errors.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// SD card or filesystem could not be mounted, or the music
    /// directory does not exist.
    StorageUnavailable,

    /// The music directory holds no playable tracks.
    NoTracks,

    /// Flash settings area could not be opened.
    Settings,

    // Peripherals
    /// I²C transaction to the display failed during init.
    Display,

    /// The audio decoder did not come out of reset.
    Audio,
}

impl Error {
    /// Short text for the fault screen (fits 21 columns of FONT_6X10).
    pub const fn message(&self) -> &'static str {
        match self {
            Error::StorageUnavailable => "No SD card",
            Error::NoTracks => "No tracks in /music",
            Error::Settings => "Settings flash",
            Error::Display => "Display init",
            Error::Audio => "Decoder init",
        }
    }
}
