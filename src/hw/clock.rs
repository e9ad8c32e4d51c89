//! Uptime clock backed by the embassy time driver (RTC1).

use embassy_time::Instant;
use touchplayer::clock::Clock;

pub struct Uptime;

impl Clock for Uptime {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
