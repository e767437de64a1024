//! Windows entry point.
//!
//! Wires the Win32 drivers into the freeze tool and hands it to the shell
//! window, which runs the message loop on this thread.

use anyhow::Context;
use tracing::info;
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};

use rofreeze::platform::windows::{
    run_shell, LowLevelKeyboardHook, ShellOptions, WakeTarget, Win32Cursor,
};
use rofreeze::{FreezeConfig, FreezeTool, StatusBridge};

pub fn run() -> anyhow::Result<()> {
    // Physical pixels everywhere, so cursor reads and writes agree.
    if let Err(err) = unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) }
    {
        tracing::warn!(%err, "could not enable per-monitor DPI awareness");
    }

    let config = FreezeConfig::from_env();
    info!(tick = ?config.tick_interval, epsilon = config.epsilon, "starting RoFreeze");

    let wake = WakeTarget::new();
    let bridge = StatusBridge::with_waker(wake.waker());
    let tool = FreezeTool::spawn(
        Win32Cursor::new(),
        LowLevelKeyboardHook::new(),
        bridge.publisher(),
        config,
    )
    .context("starting the freeze worker")?;

    run_shell(ShellOptions { tool, bridge, wake }).context("running the shell window")?;
    info!("RoFreeze exited");
    Ok(())
}
