//! nRF52840 implementations of the library's hardware traits.
//!
//! Only built into the firmware binary; the library never sees these.

pub mod clock;
pub mod flash;
pub mod oled;
pub mod sd;
pub mod vs1053;
