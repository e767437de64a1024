//! The enforcement thread and its UI-side handle.
//!
//! [`FreezeTool`] is what the shell holds. Each call marshals a [`Command`]
//! onto the enforcement thread, which owns the [`FreezeMachine`] and is the
//! only thread that mutates it.

use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{never, select, tick, Receiver, Sender};

use super::machine::FreezeMachine;
use crate::config::FreezeConfig;
use crate::driver::CursorDriver;
use crate::error::FreezeError;
use crate::events::{Command, StatusPublisher};
use crate::input::HotkeyListener;

const WORKER_THREAD_NAME: &str = "rofreeze-enforcer";

/// Handle to the enforcement thread.
///
/// Dropping the handle stops enforcement, releases the hotkeys and joins the
/// thread.
pub struct FreezeTool {
    commands: Sender<Command>,
    worker: Option<JoinHandle<()>>,
}

impl FreezeTool {
    /// Spawn the enforcement thread. The tool starts idle.
    pub fn spawn<C, H>(
        cursor: C,
        hotkeys: H,
        status: StatusPublisher,
        config: FreezeConfig,
    ) -> Result<Self, FreezeError>
    where
        C: CursorDriver + 'static,
        H: HotkeyListener + 'static,
    {
        let (commands, inbox) = crossbeam_channel::unbounded();
        let machine = FreezeMachine::new(cursor, hotkeys, status, commands.clone(), &config);

        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || run(machine, inbox, config))
            .map_err(|err| FreezeError::WorkerSpawn(err.to_string()))?;

        tracing::debug!(tick = ?config.tick_interval, epsilon = config.epsilon, "freeze worker spawned");
        Ok(Self {
            commands,
            worker: Some(worker),
        })
    }

    /// Register hotkeys and start enforcing.
    ///
    /// Blocks until the enforcement thread has tried. A hook registration
    /// failure is returned here and the tool stays idle.
    pub fn start_tool(&self) -> Result<(), FreezeError> {
        let (reply, outcome) = crossbeam_channel::bounded(1);
        self.send(Command::Start { reply })?;
        outcome
            .recv()
            .map_err(|_| FreezeError::WorkerUnavailable)?
            .map_err(FreezeError::from)
    }

    /// Stop enforcing and release the hotkeys.
    ///
    /// Returns once the enforcement thread has stopped; no cursor write
    /// happens after this returns. Idempotent.
    pub fn stop_tool(&self) -> Result<(), FreezeError> {
        let (reply, done) = crossbeam_channel::bounded(1);
        self.send(Command::Stop { reply })?;
        done.recv().map_err(|_| FreezeError::WorkerUnavailable)
    }

    /// Change first-person pass-through; applied on the next tick.
    pub fn set_first_person_mode(&self, enabled: bool) -> Result<(), FreezeError> {
        self.send(Command::SetFirstPersonMode(enabled))
    }

    /// Capture the live cursor position as the anchor, as the set-point key does.
    pub fn capture_point(&self) -> Result<(), FreezeError> {
        self.send(Command::CapturePoint)
    }

    /// Stop, release hotkeys and join the enforcement thread. Idempotent.
    pub fn shutdown(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let _ = self.commands.send(Command::Shutdown);
        if worker.join().is_err() {
            tracing::error!("freeze worker panicked");
        }
        tracing::debug!("freeze worker joined");
    }

    fn send(&self, command: Command) -> Result<(), FreezeError> {
        if self.worker.is_none() {
            return Err(FreezeError::WorkerUnavailable);
        }
        self.commands
            .send(command)
            .map_err(|_| FreezeError::WorkerUnavailable)
    }
}

impl Drop for FreezeTool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run<C: CursorDriver, H: HotkeyListener>(
    mut machine: FreezeMachine<C, H>,
    inbox: Receiver<Command>,
    config: FreezeConfig,
) {
    let idle = never::<Instant>();
    let mut ticker: Option<Receiver<Instant>> = None;

    loop {
        let ticks = ticker.as_ref().unwrap_or(&idle);
        select! {
            recv(inbox) -> command => match command {
                Ok(Command::Shutdown) | Err(_) => break,
                Ok(command) => dispatch(&mut machine, command),
            },
            recv(ticks) -> _ => machine.tick(),
        }

        // Exactly one timer, alive only while running.
        match (machine.is_running(), ticker.is_some()) {
            (true, false) => ticker = Some(tick(config.tick_interval)),
            (false, true) => ticker = None,
            _ => {}
        }
    }

    machine.stop();
    tracing::debug!("freeze worker exiting");
}

fn dispatch<C: CursorDriver, H: HotkeyListener>(
    machine: &mut FreezeMachine<C, H>,
    command: Command,
) {
    tracing::trace!(command = command.description(), "dispatch");
    match command {
        Command::Start { reply } => {
            let _ = reply.send(machine.start());
        }
        Command::Stop { reply } => {
            machine.stop();
            let _ = reply.send(());
        }
        Command::Key(key) => machine.on_key(key),
        Command::CapturePoint => machine.on_set_point_key(),
        Command::SetFirstPersonMode(enabled) => machine.set_first_person_mode(enabled),
        Command::Shutdown => {}
    }
}
