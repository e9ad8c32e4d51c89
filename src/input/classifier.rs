use super::{ButtonRole, PressEvent, PressKind};
use crate::clock::elapsed;
use crate::config::Timing;

/// Edge-detection state for one pad.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonChannel {
    role: ButtonRole,
    /// Level seen on the previous poll.
    level: bool,
    /// Timestamp of the last rising edge.
    pressed_at_ms: u64,
}

impl ButtonChannel {
    pub const fn new(role: ButtonRole) -> Self {
        Self {
            role,
            level: false,
            pressed_at_ms: 0,
        }
    }

    pub fn role(&self) -> ButtonRole {
        self.role
    }

    /// Whether the pad was touched on the last poll.
    pub fn is_down(&self) -> bool {
        self.level
    }
}

/// Result of polling one pad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Poll {
    /// Set on an accepted release.
    pub event: Option<PressEvent>,
    /// Pad is down and has been for longer than the long threshold.
    /// True on every such poll, which is what drives repeat-fire.
    pub held_long: bool,
}

/// Debounced tap / long / very-long classifier for all three pads.
///
/// Releases are gated by one action lock shared by every pad: a release
/// within `action_lock_ms` of the previous accepted release produces no
/// event at all.
pub struct InputClassifier {
    channels: [ButtonChannel; 3],
    last_action_ms: Option<u64>,
    timing: Timing,
}

impl InputClassifier {
    pub fn new(timing: Timing) -> Self {
        Self {
            channels: ButtonRole::ALL.map(ButtonChannel::new),
            last_action_ms: None,
            timing,
        }
    }

    pub fn channel(&self, role: ButtonRole) -> &ButtonChannel {
        &self.channels[role.index()]
    }

    /// Poll every pad in [`ButtonRole::ALL`] order.
    pub fn poll_all(&mut self, levels: [bool; 3], now_ms: u64) -> [Poll; 3] {
        let mut out = [Poll::default(); 3];
        for role in ButtonRole::ALL {
            out[role.index()] = self.poll(role, levels[role.index()], now_ms);
        }
        out
    }

    /// Feed one raw level sample for `role`.
    pub fn poll(&mut self, role: ButtonRole, level: bool, now_ms: u64) -> Poll {
        let channel = &mut self.channels[role.index()];
        let was_down = channel.level;
        channel.level = level;

        match (was_down, level) {
            (false, true) => {
                channel.pressed_at_ms = now_ms;
                Poll::default()
            }
            (true, true) => Poll {
                event: None,
                held_long: elapsed(now_ms, channel.pressed_at_ms) > self.timing.long_press_ms,
            },
            (true, false) => {
                let duration_ms = elapsed(now_ms, channel.pressed_at_ms);
                Poll {
                    event: self.release(role, duration_ms, now_ms),
                    held_long: false,
                }
            }
            (false, false) => Poll::default(),
        }
    }

    fn release(&mut self, role: ButtonRole, duration_ms: u64, now_ms: u64) -> Option<PressEvent> {
        if let Some(last) = self.last_action_ms {
            if elapsed(now_ms, last) <= self.timing.action_lock_ms {
                debug!("Input: {} release dropped by action lock", role);
                return None;
            }
        }
        self.last_action_ms = Some(now_ms);

        let kind = self.classify(duration_ms);
        debug!("Input: {} {} ({} ms)", role, kind, duration_ms);
        Some(PressEvent {
            role,
            kind,
            duration_ms,
        })
    }

    fn classify(&self, duration_ms: u64) -> PressKind {
        if duration_ms > self.timing.very_long_press_ms {
            PressKind::VeryLong
        } else if duration_ms > self.timing.long_press_ms {
            PressKind::Long
        } else {
            PressKind::Tap
        }
    }
}
