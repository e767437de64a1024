//! Thread-safe fakes shared by the integration tests.
//!
//! Each fake is a cheap handle over shared state; the test keeps one clone
//! and hands the other to the freeze worker.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use rofreeze::driver::CursorDriver;
use rofreeze::error::{CursorAccessError, HookRegistrationError};
use rofreeze::input::{Hotkey, HotkeyListener, KeyCallback};
use rofreeze::model::{StatusEvent, StatusKind};
use rofreeze::{FreezeConfig, Point, StatusBridge};

/// Generous upper bound for anything the worker should do "promptly".
pub const PATIENCE: Duration = Duration::from_secs(2);

pub fn fast_config() -> FreezeConfig {
    FreezeConfig::default().with_tick_interval(Duration::from_millis(1))
}

#[derive(Debug, Default)]
struct CursorInner {
    position: Point,
    writes: Vec<Point>,
    fail_reads: bool,
}

/// Simulated system cursor.
#[derive(Debug, Clone, Default)]
pub struct SharedCursor(Arc<Mutex<CursorInner>>);

impl SharedCursor {
    pub fn at(x: i32, y: i32) -> Self {
        let cursor = Self::default();
        cursor.move_to(x, y);
        cursor
    }

    /// The user (or a game) moves the mouse.
    pub fn move_to(&self, x: i32, y: i32) {
        self.0.lock().position = Point::new(x, y);
    }

    pub fn position(&self) -> Point {
        self.0.lock().position
    }

    pub fn writes(&self) -> usize {
        self.0.lock().writes.len()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.0.lock().fail_reads = fail;
    }
}

impl CursorDriver for SharedCursor {
    fn get_position(&mut self) -> Result<Point, CursorAccessError> {
        let inner = self.0.lock();
        if inner.fail_reads {
            return Err(CursorAccessError::Read("desktop switched".into()));
        }
        Ok(inner.position)
    }

    fn set_position(&mut self, position: Point) -> Result<(), CursorAccessError> {
        let mut inner = self.0.lock();
        inner.position = position;
        inner.writes.push(position);
        Ok(())
    }
}

#[derive(Default)]
struct HotkeysInner {
    callbacks: Vec<(Hotkey, KeyCallback)>,
    deny_code: Option<i32>,
    registrations: usize,
}

/// Simulated global hook.
#[derive(Clone, Default)]
pub struct SharedHotkeys(Arc<Mutex<HotkeysInner>>);

impl SharedHotkeys {
    /// A hook the OS refuses with `code`.
    pub fn denied(code: i32) -> Self {
        let hotkeys = Self::default();
        hotkeys.0.lock().deny_code = Some(code);
        hotkeys
    }

    /// Deliver a key press as the OS hook would.
    pub fn press(&self, key: Hotkey) {
        let inner = self.0.lock();
        for (registered, callback) in &inner.callbacks {
            if *registered == key {
                callback();
            }
        }
    }

    pub fn registered(&self) -> bool {
        !self.0.lock().callbacks.is_empty()
    }

    /// Successful `register` calls so far.
    pub fn registrations(&self) -> usize {
        self.0.lock().registrations
    }
}

impl HotkeyListener for SharedHotkeys {
    fn register(&mut self, key: Hotkey, callback: KeyCallback) -> Result<(), HookRegistrationError> {
        let mut inner = self.0.lock();
        if let Some(code) = inner.deny_code {
            return Err(HookRegistrationError::Denied { key, code });
        }
        inner.callbacks.push((key, callback));
        inner.registrations += 1;
        Ok(())
    }

    fn unregister_all(&mut self) {
        self.0.lock().callbacks.clear();
    }

    fn is_registered(&self) -> bool {
        self.registered()
    }
}

/// Collect statuses until one of `kind` arrives. Panics after [`PATIENCE`].
pub fn wait_for(bridge: &StatusBridge, kind: StatusKind) -> Vec<StatusEvent> {
    let deadline = Instant::now() + PATIENCE;
    let mut seen = Vec::new();
    while let Some(event) = bridge.recv_timeout(deadline.saturating_duration_since(Instant::now()))
    {
        let done = event.kind() == kind;
        seen.push(event);
        if done {
            return seen;
        }
    }
    panic!("no {kind:?} status within {PATIENCE:?}, saw {seen:?}");
}

/// Poll `condition` until it holds. Panics after [`PATIENCE`].
pub fn eventually(what: &str, condition: impl Fn() -> bool) {
    let deadline = Instant::now() + PATIENCE;
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        std::thread::sleep(Duration::from_millis(1));
    }
}
