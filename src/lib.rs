//! Host-testable core of the touch MP3 player.
//!
//! Everything that decides *what* the player does lives here: gesture
//! classification, the playback state machine, the track catalog and the
//! three OLED screens. Hardware is reached only through small traits
//! ([`input::ButtonSource`], [`playback::AudioEngine`],
//! [`playback::SettingsStore`], [`ui::Display`], [`clock::Clock`]) so the
//! whole loop runs under `cargo test` on the host.
//!
//! The embedded binary (`src/main.rs`, feature `embedded`) supplies the
//! nRF52840 implementations of those traits.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod playback;
pub mod player;
pub mod ui;

#[cfg(test)]
mod testing;

pub use error::Error;
pub use player::{Parts, Player};
