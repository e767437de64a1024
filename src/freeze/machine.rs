//! Freeze state machine and enforcement tick.
//!
//! `FreezeMachine` is single-threaded: it is owned by the enforcement thread
//! and every mutation of the anchor and flags goes through `&mut self`.
//! Cursor and hotkey access are injected so the whole machine runs against
//! fakes in tests.

use crossbeam_channel::Sender;

use crate::config::FreezeConfig;
use crate::driver::CursorDriver;
use crate::error::HookRegistrationError;
use crate::events::{Command, StatusPublisher};
use crate::input::{Hotkey, HotkeyListener};
use crate::model::{Point, StatusEvent};

/// Observable machine state. `first_person_mode` is an orthogonal overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    /// Not enforcing.
    Idle,
    /// Loop active, cursor not pinned (no anchor yet, or first-person mode).
    Running,
    /// Loop active and the cursor is pinned to the anchor.
    Frozen,
}

pub struct FreezeMachine<C: CursorDriver, H: HotkeyListener> {
    cursor: C,
    hotkeys: H,
    status: StatusPublisher,
    key_sink: Sender<Command>,
    epsilon: u32,

    anchor: Option<Point>,
    running: bool,
    suppressing: bool,
    first_person_mode: bool,
    cursor_failing: bool,
}

impl<C: CursorDriver, H: HotkeyListener> FreezeMachine<C, H> {
    /// `key_sink` receives a [`Command::Key`] for every hotkey press.
    pub fn new(
        cursor: C,
        hotkeys: H,
        status: StatusPublisher,
        key_sink: Sender<Command>,
        config: &FreezeConfig,
    ) -> Self {
        Self {
            cursor,
            hotkeys,
            status,
            key_sink,
            epsilon: config.epsilon,
            anchor: None,
            running: false,
            suppressing: false,
            first_person_mode: false,
            cursor_failing: false,
        }
    }

    pub fn state(&self) -> MachineState {
        match (self.running, self.is_frozen()) {
            (false, _) => MachineState::Idle,
            (true, false) => MachineState::Running,
            (true, true) => MachineState::Frozen,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True only while running with an anchor and first-person mode off.
    pub fn is_frozen(&self) -> bool {
        self.suppressing && !self.first_person_mode
    }

    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    pub fn first_person_mode(&self) -> bool {
        self.first_person_mode
    }

    pub fn hotkeys_registered(&self) -> bool {
        self.hotkeys.is_registered()
    }

    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    pub fn hotkeys(&self) -> &H {
        &self.hotkeys
    }

    /// Register hotkeys and begin enforcing. No-op while already running.
    ///
    /// On registration failure every partial registration is released and the
    /// machine stays idle.
    pub fn start(&mut self) -> Result<(), HookRegistrationError> {
        if self.running {
            tracing::debug!("start ignored, already running");
            return Ok(());
        }
        self.ensure_hotkeys()?;

        self.running = true;
        self.suppressing = false;
        tracing::info!(anchor = ?self.anchor, "freeze loop started");
        self.status.publish(StatusEvent::running());
        Ok(())
    }

    /// Stop enforcing and release the hotkeys. Safe to call repeatedly;
    /// `Stopped` is published only when the loop was actually running.
    pub fn stop(&mut self) {
        if self.hotkeys.is_registered() {
            self.hotkeys.unregister_all();
            tracing::debug!("hotkeys released");
        }
        self.halt();
    }

    /// Capture the live cursor position as the anchor. Valid in any state.
    pub fn on_set_point_key(&mut self) {
        match self.cursor.get_position() {
            Ok(position) => self.set_anchor(position),
            Err(err) => tracing::warn!(%err, "could not capture anchor point"),
        }
    }

    /// Store `anchor`, replacing any previous one.
    pub fn set_anchor(&mut self, anchor: Point) {
        self.anchor = Some(anchor);
        tracing::info!(%anchor, "anchor point set");
        self.status.publish(StatusEvent::point_set(anchor));
    }

    /// Same `running` transition as `start`/`stop`.
    ///
    /// Stopping from the key keeps the hook installed so the key can start
    /// enforcement again; the UI stop releases it.
    pub fn on_toggle_key(&mut self) -> Result<(), HookRegistrationError> {
        if self.running {
            self.halt();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Apply a queued hotkey press. Presses that were queued before the
    /// hotkeys were released are dropped.
    pub fn on_key(&mut self, key: Hotkey) {
        if !self.hotkeys.is_registered() {
            tracing::debug!(%key, "ignoring hotkey queued before release");
            return;
        }
        tracing::debug!(%key, "hotkey pressed");
        match key {
            Hotkey::SetPoint => self.on_set_point_key(),
            Hotkey::Toggle => {
                if let Err(err) = self.on_toggle_key() {
                    tracing::error!(%err, "toggle key could not start the freeze loop");
                }
            }
        }
    }

    /// Takes effect on the next tick.
    pub fn set_first_person_mode(&mut self, enabled: bool) {
        if self.first_person_mode != enabled {
            tracing::info!(enabled, "first-person mode changed");
        }
        self.first_person_mode = enabled;
    }

    /// One enforcement step.
    ///
    /// Publishes `Frozen`/`Running...` when suppression engages or releases,
    /// then writes the anchor back if the cursor drifted beyond epsilon.
    /// Cursor access failures skip the rest of the tick.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        let engage = self.anchor.is_some() && !self.first_person_mode;
        if engage != self.suppressing {
            self.suppressing = engage;
            if engage {
                tracing::info!(anchor = ?self.anchor, "cursor frozen");
                self.status.publish(StatusEvent::frozen());
            } else {
                tracing::info!("cursor released");
                self.status.publish(StatusEvent::running());
            }
        }

        if self.first_person_mode {
            return;
        }

        let position = match self.cursor.get_position() {
            Ok(position) => position,
            Err(err) => {
                self.note_cursor_failure(&err);
                return;
            }
        };

        let Some(anchor) = self.anchor else {
            self.note_cursor_ok();
            return;
        };
        if !anchor.drifted(position, self.epsilon) {
            self.note_cursor_ok();
            return;
        }

        tracing::trace!(%position, %anchor, "restoring cursor");
        match self.cursor.set_position(anchor) {
            Ok(()) => self.note_cursor_ok(),
            Err(err) => self.note_cursor_failure(&err),
        }
    }

    fn ensure_hotkeys(&mut self) -> Result<(), HookRegistrationError> {
        if self.hotkeys.is_registered() {
            return Ok(());
        }
        for key in Hotkey::ALL {
            let sink = self.key_sink.clone();
            let callback = Box::new(move || {
                // Receiver gone means the worker is shutting down.
                let _ = sink.send(Command::Key(key));
            });
            if let Err(err) = self.hotkeys.register(key, callback) {
                tracing::error!(%err, "hotkey registration failed");
                self.hotkeys.unregister_all();
                return Err(err);
            }
        }
        tracing::debug!("hotkeys registered");
        Ok(())
    }

    fn halt(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.suppressing = false;
        tracing::info!("freeze loop stopped");
        self.status.publish(StatusEvent::stopped());
        true
    }

    fn note_cursor_failure(&mut self, err: &crate::error::CursorAccessError) {
        if !self.cursor_failing {
            self.cursor_failing = true;
            tracing::debug!(%err, "cursor access failing, retrying every tick");
        }
    }

    fn note_cursor_ok(&mut self) {
        if self.cursor_failing {
            self.cursor_failing = false;
            tracing::debug!("cursor access recovered");
        }
    }
}

impl<C: CursorDriver, H: HotkeyListener> Drop for FreezeMachine<C, H> {
    fn drop(&mut self) {
        if self.hotkeys.is_registered() {
            self.hotkeys.unregister_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::CursorAccessError;
    use crate::events::StatusBridge;
    use crate::input::KeyCallback;
    use crate::model::StatusKind;

    #[derive(Default)]
    struct FakeCursor {
        position: Point,
        writes: Vec<Point>,
        reads: usize,
        fail_reads: VecDeque<bool>,
    }

    impl CursorDriver for FakeCursor {
        fn get_position(&mut self) -> Result<Point, CursorAccessError> {
            self.reads += 1;
            if self.fail_reads.pop_front().unwrap_or(false) {
                return Err(CursorAccessError::Read("desktop switched".into()));
            }
            Ok(self.position)
        }

        fn set_position(&mut self, position: Point) -> Result<(), CursorAccessError> {
            self.writes.push(position);
            self.position = position;
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeHotkeys {
        callbacks: Vec<(Hotkey, KeyCallback)>,
        deny: Option<Hotkey>,
        releases: usize,
    }

    impl HotkeyListener for FakeHotkeys {
        fn register(
            &mut self,
            key: Hotkey,
            callback: KeyCallback,
        ) -> Result<(), HookRegistrationError> {
            if self.deny == Some(key) {
                return Err(HookRegistrationError::Denied { key, code: 1428 });
            }
            self.callbacks.push((key, callback));
            Ok(())
        }

        fn unregister_all(&mut self) {
            self.callbacks.clear();
            self.releases += 1;
        }

        fn is_registered(&self) -> bool {
            !self.callbacks.is_empty()
        }
    }

    impl FakeHotkeys {
        fn press(&self, key: Hotkey) {
            for (registered, callback) in &self.callbacks {
                if *registered == key {
                    callback();
                }
            }
        }
    }

    struct Rig {
        machine: FreezeMachine<FakeCursor, FakeHotkeys>,
        bridge: StatusBridge,
        keys: crossbeam_channel::Receiver<Command>,
    }

    fn rig() -> Rig {
        rig_with(FakeHotkeys::default(), FreezeConfig::default())
    }

    fn rig_with(hotkeys: FakeHotkeys, config: FreezeConfig) -> Rig {
        let bridge = StatusBridge::new();
        let (key_tx, keys) = crossbeam_channel::unbounded();
        let machine = FreezeMachine::new(
            FakeCursor::default(),
            hotkeys,
            bridge.publisher(),
            key_tx,
            &config,
        );
        Rig {
            machine,
            bridge,
            keys,
        }
    }

    fn kinds(bridge: &StatusBridge) -> Vec<StatusKind> {
        bridge.drain().iter().map(StatusEvent::kind).collect()
    }

    #[test]
    fn test_starts_idle() {
        let rig = rig();
        assert_eq!(rig.machine.state(), MachineState::Idle);
        assert_eq!(rig.machine.anchor(), None);
        assert!(!rig.machine.hotkeys_registered());
    }

    #[test]
    fn test_anchor_round_trip() {
        let mut rig = rig();
        rig.machine.set_anchor(Point::new(500, 300));
        assert_eq!(rig.machine.anchor(), Some(Point::new(500, 300)));
        rig.machine.set_anchor(Point::new(-20, 7));
        assert_eq!(rig.machine.anchor(), Some(Point::new(-20, 7)));
    }

    #[test]
    fn test_start_registers_hotkeys_and_reports_running() {
        let mut rig = rig();
        rig.machine.start().unwrap();

        assert_eq!(rig.machine.state(), MachineState::Running);
        assert!(rig.machine.hotkeys_registered());
        let registered: Vec<Hotkey> = rig
            .machine
            .hotkeys()
            .callbacks
            .iter()
            .map(|(key, _)| *key)
            .collect();
        assert_eq!(registered, vec![Hotkey::SetPoint, Hotkey::Toggle]);
        assert_eq!(rig.bridge.drain(), vec![StatusEvent::running()]);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut rig = rig();
        rig.machine.start().unwrap();
        rig.machine.start().unwrap();
        assert_eq!(rig.machine.hotkeys().callbacks.len(), 2);
        assert_eq!(kinds(&rig.bridge), vec![StatusKind::Running]);
    }

    #[test]
    fn test_hook_failure_leaves_machine_idle() {
        let hotkeys = FakeHotkeys {
            deny: Some(Hotkey::Toggle),
            ..Default::default()
        };
        let mut rig = rig_with(hotkeys, FreezeConfig::default());

        let err = rig.machine.start().unwrap_err();
        assert_eq!(
            err,
            HookRegistrationError::Denied {
                key: Hotkey::Toggle,
                code: 1428
            }
        );
        assert_eq!(rig.machine.state(), MachineState::Idle);
        assert!(!rig.machine.hotkeys_registered());
        assert_eq!(rig.machine.hotkeys().releases, 1);
        assert!(rig.bridge.drain().is_empty());
    }

    #[test]
    fn test_stop_twice_reports_stopped_once() {
        let mut rig = rig();
        rig.machine.start().unwrap();
        rig.machine.stop();
        rig.machine.stop();

        assert_eq!(rig.machine.state(), MachineState::Idle);
        assert!(!rig.machine.hotkeys_registered());
        assert_eq!(
            kinds(&rig.bridge),
            vec![StatusKind::Running, StatusKind::Stopped]
        );
    }

    #[test]
    fn test_stop_while_idle_is_silent() {
        let mut rig = rig();
        rig.machine.stop();
        assert!(rig.bridge.drain().is_empty());
    }

    #[test]
    fn test_running_without_anchor_reads_but_never_writes() {
        let mut rig = rig();
        rig.machine.start().unwrap();
        for _ in 0..5 {
            rig.machine.tick();
        }
        assert_eq!(rig.machine.state(), MachineState::Running);
        assert_eq!(rig.machine.cursor().reads, 5);
        assert!(rig.machine.cursor().writes.is_empty());
    }

    #[test]
    fn test_point_before_start_freezes_on_first_tick() {
        let mut rig = rig();
        rig.machine.set_anchor(Point::new(500, 300));
        rig.machine.start().unwrap();
        assert_eq!(rig.machine.state(), MachineState::Running);

        rig.machine.tick();

        assert_eq!(rig.machine.state(), MachineState::Frozen);
        assert!(rig.machine.is_frozen());
        assert_eq!(
            kinds(&rig.bridge),
            vec![StatusKind::PointSet, StatusKind::Running, StatusKind::Frozen]
        );
    }

    #[test]
    fn test_drift_is_written_back_next_tick() {
        let mut rig = rig();
        rig.machine.cursor.position = Point::new(500, 300);
        rig.machine.set_anchor(Point::new(500, 300));
        rig.machine.start().unwrap();
        rig.machine.tick();
        assert!(rig.machine.is_frozen());
        assert!(rig.machine.cursor().writes.is_empty());

        rig.machine.cursor.position = Point::new(510, 305);
        rig.machine.tick();

        assert_eq!(rig.machine.cursor().writes, vec![Point::new(500, 300)]);
        assert_eq!(rig.machine.cursor().position, Point::new(500, 300));
    }

    #[test]
    fn test_no_write_when_cursor_on_anchor() {
        let mut rig = rig();
        rig.machine.cursor.position = Point::new(40, 40);
        rig.machine.on_set_point_key();
        rig.machine.start().unwrap();
        for _ in 0..10 {
            rig.machine.tick();
        }
        assert!(rig.machine.cursor().writes.is_empty());
    }

    #[test]
    fn test_epsilon_tolerates_small_drift() {
        let config = FreezeConfig::default().with_epsilon(3);
        let mut rig = rig_with(FakeHotkeys::default(), config);
        rig.machine.set_anchor(Point::new(100, 100));
        rig.machine.start().unwrap();

        rig.machine.cursor.position = Point::new(103, 97);
        rig.machine.tick();
        assert!(rig.machine.cursor().writes.is_empty());

        rig.machine.cursor.position = Point::new(104, 100);
        rig.machine.tick();
        assert_eq!(rig.machine.cursor().writes, vec![Point::new(100, 100)]);
    }

    #[test]
    fn test_first_person_mode_mid_run_suppresses_corrections() {
        let mut rig = rig();
        rig.machine.cursor.position = Point::new(500, 300);
        rig.machine.set_anchor(Point::new(500, 300));
        rig.machine.start().unwrap();
        rig.machine.tick();
        assert!(rig.machine.is_frozen());
        rig.bridge.drain();

        rig.machine.set_first_person_mode(true);
        rig.machine.cursor.position = Point::new(600, 400);
        let reads_before = rig.machine.cursor().reads;
        rig.machine.tick();
        rig.machine.tick();

        assert!(rig.machine.cursor().writes.is_empty());
        assert_eq!(rig.machine.cursor().reads, reads_before);
        assert!(!rig.machine.is_frozen());
        assert_eq!(rig.machine.state(), MachineState::Running);
        assert_eq!(rig.bridge.drain(), vec![StatusEvent::running()]);
    }

    #[test]
    fn test_first_person_mode_unfreezes_before_the_next_tick() {
        let mut rig = rig();
        rig.machine.cursor.position = Point::new(500, 300);
        rig.machine.set_anchor(Point::new(500, 300));
        rig.machine.start().unwrap();
        rig.machine.tick();
        assert_eq!(rig.machine.state(), MachineState::Frozen);
        rig.bridge.drain();

        rig.machine.set_first_person_mode(true);

        assert!(!rig.machine.is_frozen());
        assert_eq!(rig.machine.state(), MachineState::Running);

        // The status transition still follows on the tick.
        assert!(rig.bridge.drain().is_empty());
        rig.machine.tick();
        assert_eq!(rig.bridge.drain(), vec![StatusEvent::running()]);
        assert!(rig.machine.cursor().writes.is_empty());
    }

    #[test]
    fn test_first_person_mode_never_writes_for_any_sequence() {
        let mut rig = rig();
        rig.machine.set_first_person_mode(true);
        rig.machine.set_anchor(Point::new(1, 1));
        rig.machine.start().unwrap();
        for i in 0..50 {
            rig.machine.cursor.position = Point::new(i * 7, i * 3);
            rig.machine.tick();
            if i % 10 == 0 {
                rig.machine.on_set_point_key();
            }
            if i == 25 {
                rig.machine.stop();
                rig.machine.start().unwrap();
            }
            assert!(!rig.machine.is_frozen());
        }
        assert!(rig.machine.cursor().writes.is_empty());
    }

    #[test]
    fn test_leaving_first_person_mode_refreezes() {
        let mut rig = rig();
        rig.machine.set_first_person_mode(true);
        rig.machine.set_anchor(Point::new(10, 10));
        rig.machine.start().unwrap();
        rig.machine.tick();
        assert_eq!(rig.machine.state(), MachineState::Running);

        rig.machine.set_first_person_mode(false);
        rig.machine.cursor.position = Point::new(50, 50);
        rig.machine.tick();

        assert_eq!(rig.machine.state(), MachineState::Frozen);
        assert_eq!(rig.machine.cursor().writes, vec![Point::new(10, 10)]);
    }

    #[test_log::test]
    fn test_cursor_read_failure_skips_one_tick() {
        let mut rig = rig();
        rig.machine.set_anchor(Point::new(0, 0));
        rig.machine.start().unwrap();
        rig.machine.cursor.position = Point::new(9, 9);
        rig.machine.cursor.fail_reads = VecDeque::from([true, true]);

        rig.machine.tick();
        rig.machine.tick();
        assert!(rig.machine.cursor().writes.is_empty());
        assert!(rig.machine.is_running());

        rig.machine.tick();
        assert_eq!(rig.machine.cursor().writes, vec![Point::new(0, 0)]);
    }

    #[test]
    fn test_set_point_failure_keeps_previous_anchor() {
        let mut rig = rig();
        rig.machine.set_anchor(Point::new(3, 4));
        rig.bridge.drain();
        rig.machine.cursor.fail_reads = VecDeque::from([true]);

        rig.machine.on_set_point_key();

        assert_eq!(rig.machine.anchor(), Some(Point::new(3, 4)));
        assert!(rig.bridge.drain().is_empty());
    }

    #[test]
    fn test_toggle_key_matches_start_and_stop() {
        let mut rig = rig();
        rig.machine.start().unwrap();
        rig.machine.set_anchor(Point::new(5, 5));
        rig.machine.tick();

        rig.machine.on_key(Hotkey::Toggle);
        assert_eq!(rig.machine.state(), MachineState::Idle);
        assert!(rig.machine.hotkeys_registered());

        rig.machine.on_key(Hotkey::Toggle);
        assert_eq!(rig.machine.state(), MachineState::Running);

        rig.machine.tick();
        assert_eq!(rig.machine.state(), MachineState::Frozen);
        assert_eq!(
            kinds(&rig.bridge),
            vec![
                StatusKind::Running,
                StatusKind::PointSet,
                StatusKind::Frozen,
                StatusKind::Stopped,
                StatusKind::Running,
                StatusKind::Frozen,
            ]
        );
    }

    #[test]
    fn test_ui_stop_after_toggle_stop_releases_hooks_silently() {
        let mut rig = rig();
        rig.machine.start().unwrap();
        rig.machine.on_key(Hotkey::Toggle);
        rig.bridge.drain();

        rig.machine.stop();

        assert!(!rig.machine.hotkeys_registered());
        assert!(rig.bridge.drain().is_empty());
    }

    #[test]
    fn test_key_queued_before_stop_cannot_restart() {
        let mut rig = rig();
        rig.machine.start().unwrap();
        rig.machine.stop();
        rig.bridge.drain();

        rig.machine.on_key(Hotkey::Toggle);
        rig.machine.on_key(Hotkey::SetPoint);

        assert_eq!(rig.machine.state(), MachineState::Idle);
        assert_eq!(rig.machine.anchor(), None);
        assert!(rig.bridge.drain().is_empty());
    }

    #[test]
    fn test_hotkey_callbacks_feed_the_command_queue() {
        let mut rig = rig();
        rig.machine.start().unwrap();

        rig.machine.hotkeys().press(Hotkey::SetPoint);
        rig.machine.hotkeys().press(Hotkey::Toggle);

        let received: Vec<&'static str> = rig
            .keys
            .try_iter()
            .map(|command| command.description())
            .collect();
        assert_eq!(received, vec!["set-point key", "toggle key"]);
    }

    #[test]
    fn test_running_never_reported_after_stop() {
        let mut rig = rig();
        let script = [true, true, false, true, false, false, true, false];
        for start in script {
            if start {
                rig.machine.start().unwrap();
            } else {
                rig.machine.stop();
            }
            rig.machine.tick();
        }
        assert!(!rig.machine.is_running());
        let last = rig.bridge.drain().pop().unwrap();
        assert_eq!(last.kind(), StatusKind::Stopped);
    }

    #[test]
    fn test_drop_releases_hotkeys() {
        let released = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));

        struct Tracking(std::sync::Arc<std::sync::atomic::AtomicBool>, bool);
        impl HotkeyListener for Tracking {
            fn register(&mut self, _: Hotkey, _: KeyCallback) -> Result<(), HookRegistrationError> {
                self.1 = true;
                Ok(())
            }
            fn unregister_all(&mut self) {
                self.1 = false;
                self.0.store(true, std::sync::atomic::Ordering::SeqCst);
            }
            fn is_registered(&self) -> bool {
                self.1
            }
        }

        let bridge = StatusBridge::new();
        let (key_tx, _keys) = crossbeam_channel::unbounded();
        let mut machine = FreezeMachine::new(
            FakeCursor::default(),
            Tracking(std::sync::Arc::clone(&released), false),
            bridge.publisher(),
            key_tx,
            &FreezeConfig::default(),
        );
        machine.start().unwrap();
        drop(machine);

        assert!(released.load(std::sync::atomic::Ordering::SeqCst));
    }
}
