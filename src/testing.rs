//! Host-side stand-ins for the hardware collaborators.
//!
//! Each mock is a cheap handle over shared state, so a test keeps a clone
//! to inspect after moving the original into the controller or player.

use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::input::{ButtonRole, ButtonSource};
use crate::playback::{AudioEngine, SettingKey, SettingsStore};
use crate::ui::{Display, FrameBuffer};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioCall {
    Start(String),
    Stop,
    PauseResume,
    SetVolume(u8),
}

#[derive(Default)]
struct AudioLog {
    calls: Vec<AudioCall>,
    running: bool,
    services: usize,
}

/// Records every command; `running` follows start/stop/pause.
#[derive(Clone, Default)]
pub struct MockAudio(Rc<RefCell<AudioLog>>);

impl MockAudio {
    pub fn calls(&self) -> Vec<AudioCall> {
        self.0.borrow().calls.clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().calls.clear();
    }

    /// Simulate the stream ending (or faulting).
    pub fn set_running(&self, running: bool) {
        self.0.borrow_mut().running = running;
    }

    pub fn services(&self) -> usize {
        self.0.borrow().services
    }
}

impl AudioEngine for MockAudio {
    fn start(&mut self, path: &str) {
        let mut log = self.0.borrow_mut();
        log.calls.push(AudioCall::Start(path.into()));
        log.running = true;
    }

    fn stop(&mut self) {
        let mut log = self.0.borrow_mut();
        log.calls.push(AudioCall::Stop);
        log.running = false;
    }

    fn pause_resume(&mut self) {
        let mut log = self.0.borrow_mut();
        log.calls.push(AudioCall::PauseResume);
        log.running = !log.running;
    }

    fn set_volume(&mut self, level: u8) {
        self.0.borrow_mut().calls.push(AudioCall::SetVolume(level));
    }

    fn is_running(&self) -> bool {
        self.0.borrow().running
    }

    fn service(&mut self) {
        self.0.borrow_mut().services += 1;
    }
}

/// In-memory settings with a write journal.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<SettingKey, i32>>>,
    writes: Rc<RefCell<Vec<(SettingKey, i32)>>>,
}

impl MemoryStore {
    pub fn with(pairs: &[(SettingKey, i32)]) -> Self {
        let store = Self::default();
        store.values.borrow_mut().extend(pairs.iter().copied());
        store
    }

    pub fn get(&self, key: SettingKey) -> Option<i32> {
        self.values.borrow().get(&key).copied()
    }

    pub fn writes(&self) -> Vec<(SettingKey, i32)> {
        self.writes.borrow().clone()
    }
}

impl SettingsStore for MemoryStore {
    fn get_int(&mut self, key: SettingKey, default: i32) -> i32 {
        self.get(key).unwrap_or(default)
    }

    fn put_int(&mut self, key: SettingKey, value: i32) {
        self.values.borrow_mut().insert(key, value);
        self.writes.borrow_mut().push((key, value));
    }
}

/// Pad levels set by the test.
#[derive(Clone, Default)]
pub struct MockButtons(Rc<Cell<[bool; 3]>>);

impl MockButtons {
    pub fn set(&self, role: ButtonRole, down: bool) {
        let mut levels = self.0.get();
        levels[role.index()] = down;
        self.0.set(levels);
    }
}

impl ButtonSource for MockButtons {
    fn levels(&mut self) -> [bool; 3] {
        self.0.get()
    }
}

/// Clock moved by hand.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<u64>>);

impl ManualClock {
    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// Delay that only adds up how long it was asked to wait.
#[derive(Clone, Default)]
pub struct CountingDelay(Rc<Cell<u64>>);

impl CountingDelay {
    pub fn total_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + ns as u64);
    }
}

/// Keeps a copy of the last presented frame.
#[derive(Clone, Default)]
pub struct CaptureDisplay {
    last: Rc<RefCell<Option<FrameBuffer>>>,
    presents: Rc<Cell<usize>>,
}

impl CaptureDisplay {
    pub fn presents(&self) -> usize {
        self.presents.get()
    }

    pub fn last_frame(&self) -> Option<FrameBuffer> {
        self.last.borrow().clone()
    }
}

impl Display for CaptureDisplay {
    fn present(&mut self, frame: &FrameBuffer) {
        *self.last.borrow_mut() = Some(frame.clone());
        self.presents.set(self.presents.get() + 1);
    }
}

pub fn abc_catalog() -> Catalog {
    Catalog::from_paths(["/music/a.mp3", "/music/b.mp3", "/music/c.mp3"]).unwrap()
}
