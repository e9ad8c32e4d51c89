//! Monotonic time source.
//!
//! The main loop busy-polls; every threshold (press duration, action
//! lock, repeat throttle, render cadence, marquee step) is an elapsed-time
//! comparison against a `Clock` reading, so tests can drive time by hand.

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since boot. Never goes backwards.
    fn now_ms(&self) -> u64;
}

/// Milliseconds from `since` to `now`, zero if `since` lies in the future.
pub fn elapsed(now_ms: u64, since_ms: u64) -> u64 {
    now_ms.saturating_sub(since_ms)
}
