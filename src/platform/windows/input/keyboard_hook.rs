//! `WH_KEYBOARD_LL` hook on a dedicated message-loop thread.
//!
//! Low-level hooks are called on the thread that installed them, and only
//! while that thread pumps messages. The hook thread does nothing else, so
//! key presses are seen even while the shell window is busy or unfocused.
//! Callbacks run on the hook thread; the ones installed by the freeze
//! machine only push a command onto a channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::bounded;
use parking_lot::{const_mutex, Mutex};
use tracing::{debug, info, warn};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, GetMessageW, PeekMessageW, PostThreadMessageW, SetWindowsHookExW,
    UnhookWindowsHookEx, KBDLLHOOKSTRUCT, MSG, PM_NOREMOVE, WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP,
    WM_QUIT, WM_SYSKEYDOWN, WM_SYSKEYUP, WM_USER,
};

use crate::error::HookRegistrationError;
use crate::input::{Hotkey, HotkeyListener, KeyCallback, PressFilter};
use crate::platform::windows::keep_pumping;

/// At most one low-level hook per process.
static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Callbacks keyed by virtual-key code, read by the hook procedure.
static CALLBACKS: Mutex<Vec<(u32, KeyCallback)>> = const_mutex(Vec::new());

static PRESSES: Mutex<PressFilter> = const_mutex(PressFilter::new());

/// Global hotkey listener backed by a low-level keyboard hook.
///
/// The hook is installed on the first `register` and removed by
/// `unregister_all` (or drop). Registering again afterwards reinstalls it.
#[derive(Default)]
pub struct LowLevelKeyboardHook {
    thread: Option<HookThread>,
    keys: Vec<Hotkey>,
}

struct HookThread {
    thread_id: u32,
    handle: JoinHandle<()>,
}

impl LowLevelKeyboardHook {
    pub fn new() -> Self {
        Self::default()
    }

    fn install(&mut self, first_key: Hotkey) -> Result<(), HookRegistrationError> {
        if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
            return Err(HookRegistrationError::AlreadyInstalled);
        }

        let (ready_tx, ready_rx) = bounded::<Result<u32, i32>>(1);
        let spawned = thread::Builder::new()
            .name("rofreeze-keyboard-hook".into())
            .spawn(move || hook_thread_main(ready_tx));

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                HOOK_INSTALLED.store(false, Ordering::SeqCst);
                return Err(HookRegistrationError::ThreadSpawn(e.to_string()));
            }
        };

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => {
                info!(thread_id, "keyboard hook installed");
                self.thread = Some(HookThread { thread_id, handle });
                Ok(())
            }
            Ok(Err(code)) => {
                let _ = handle.join();
                HOOK_INSTALLED.store(false, Ordering::SeqCst);
                Err(HookRegistrationError::Denied {
                    key: first_key,
                    code,
                })
            }
            Err(_) => {
                let _ = handle.join();
                HOOK_INSTALLED.store(false, Ordering::SeqCst);
                Err(HookRegistrationError::ThreadSpawn(
                    "hook thread exited before reporting".into(),
                ))
            }
        }
    }
}

impl HotkeyListener for LowLevelKeyboardHook {
    fn register(&mut self, key: Hotkey, callback: KeyCallback) -> Result<(), HookRegistrationError> {
        if self.thread.is_none() {
            self.install(key)?;
        }
        CALLBACKS.lock().push((key.vk_code(), callback));
        self.keys.push(key);
        debug!(%key, "hotkey registered");
        Ok(())
    }

    fn unregister_all(&mut self) {
        CALLBACKS.lock().clear();
        self.keys.clear();

        let Some(hook) = self.thread.take() else {
            return;
        };
        if let Err(e) = unsafe { PostThreadMessageW(hook.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }
        {
            warn!(error = %e, "could not signal keyboard hook thread");
        }
        if hook.handle.join().is_err() {
            warn!("keyboard hook thread panicked");
        }
        PRESSES.lock().clear();
        HOOK_INSTALLED.store(false, Ordering::SeqCst);
        info!("keyboard hook removed");
    }

    fn is_registered(&self) -> bool {
        self.thread.is_some()
    }
}

impl Drop for LowLevelKeyboardHook {
    fn drop(&mut self) {
        self.unregister_all();
    }
}

fn hook_thread_main(ready: crossbeam_channel::Sender<Result<u32, i32>>) {
    unsafe {
        let thread_id = GetCurrentThreadId();

        // Create the message queue before anyone can post WM_QUIT to it.
        let mut msg = MSG::default();
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);

        let hook = match SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), None, 0) {
            Ok(hook) => hook,
            Err(e) => {
                let _ = ready.send(Err(e.code().0));
                return;
            }
        };
        let _ = ready.send(Ok(thread_id));

        while keep_pumping(GetMessageW(&mut msg, None, 0, 0).0) {}

        let _ = UnhookWindowsHookEx(hook);
    }
}

/// Low-level keyboard hook procedure.
pub extern "system" fn keyboard_hook_proc(ncode: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe {
        if ncode >= 0 {
            let info = &*(lparam.0 as *const KBDLLHOOKSTRUCT);
            match wparam.0 as u32 {
                WM_KEYDOWN | WM_SYSKEYDOWN => key_down(info.vkCode),
                WM_KEYUP | WM_SYSKEYUP => PRESSES.lock().key_up(info.vkCode),
                _ => {}
            }
        }

        CallNextHookEx(None, ncode, wparam, lparam)
    }
}

fn key_down(vk: u32) {
    if !PRESSES.lock().key_down(vk) {
        return;
    }
    for (code, callback) in CALLBACKS.lock().iter() {
        if *code == vk {
            callback();
        }
    }
}
