//! Frameless shell window and its message loop.
//!
//! The shell is a pure presentation layer. It owns the [`FreezeTool`] handle,
//! forwards button clicks to it and repaints from [`ShellState`], which it
//! updates from its own start/stop results and from the status bridge. The
//! bridge wakes the UI thread by posting `WM_APP_STATUS` to the window.

use std::cell::RefCell;
use std::ffi::c_void;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};
use windows::core::w;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, EndPaint, InvalidateRect, ScreenToClient, PAINTSTRUCT,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW, LoadCursorW,
    PostMessageW, PostQuitMessage, RegisterClassW, ShowWindow, SystemParametersInfoW,
    TranslateMessage, CS_HREDRAW, CS_VREDRAW, HTCAPTION, HTCLIENT, IDC_ARROW, MSG,
    SPI_GETWORKAREA, SW_SHOW, SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS, WM_APP, WM_CLOSE,
    WM_DESTROY, WM_ERASEBKGND, WM_LBUTTONUP, WM_NCHITTEST, WM_PAINT, WNDCLASSW, WS_EX_APPWINDOW,
    WS_MINIMIZEBOX, WS_POPUP,
};

use crate::driver::{apply_window_effects, WindowEffects, WindowHandle};
use crate::events::StatusBridge;
use crate::freeze::FreezeTool;
use crate::model::layout::{hit_test, Control};
use crate::model::{
    ShellState, ACRYLIC_ALPHA, ACRYLIC_TINT, CORNER_RADIUS, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::platform::windows::compositor::DwmCompositor;
use crate::platform::windows::keep_pumping;

use super::paint;

/// Posted by the status bridge waker whenever a status is published.
pub const WM_APP_STATUS: u32 = WM_APP + 1;

/// Window the status bridge should wake. Zero until the shell exists.
#[derive(Debug, Clone, Default)]
pub struct WakeTarget(Arc<AtomicIsize>);

impl WakeTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waker for [`StatusBridge::with_waker`]. Safe to call from any thread.
    pub fn waker(&self) -> impl Fn() + Send + Sync + 'static {
        let target = Arc::clone(&self.0);
        move || {
            let raw = target.load(Ordering::Acquire);
            if raw != 0 {
                unsafe {
                    let _ = PostMessageW(
                        Some(HWND(raw as *mut c_void)),
                        WM_APP_STATUS,
                        WPARAM(0),
                        LPARAM(0),
                    );
                }
            }
        }
    }

    fn set(&self, hwnd: HWND) {
        self.0.store(hwnd.0 as isize, Ordering::Release);
    }

    fn clear(&self) {
        self.0.store(0, Ordering::Release);
    }
}

/// What the shell needs to run.
pub struct ShellOptions {
    pub tool: FreezeTool,
    pub bridge: StatusBridge,
    pub wake: WakeTarget,
}

struct ShellRuntime {
    options: ShellOptions,
    view: ShellState,
    effects: WindowEffects,
}

thread_local! {
    static SHELL: RefCell<Option<ShellRuntime>> = const { RefCell::new(None) };
}

/// Create the shell window and pump messages until it is closed.
///
/// The freeze tool is stopped and joined before this returns.
pub fn run_shell(options: ShellOptions) -> windows::core::Result<()> {
    unsafe {
        let instance = GetModuleHandleW(None)?;
        let class_name = w!("RoFreezeShell");

        let wc = WNDCLASSW {
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wndproc),
            hInstance: instance.into(),
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            lpszClassName: class_name,
            ..Default::default()
        };
        RegisterClassW(&wc);

        let (x, y) = centred_origin();
        let hwnd = CreateWindowExW(
            WS_EX_APPWINDOW,
            class_name,
            w!("RoFreeze"),
            WS_POPUP | WS_MINIMIZEBOX,
            x,
            y,
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            None,
            None,
            Some(instance.into()),
            None,
        )?;

        let effects = apply_window_effects(
            &DwmCompositor::new(),
            WindowHandle(hwnd.0 as isize),
            ACRYLIC_TINT,
            ACRYLIC_ALPHA,
            CORNER_RADIUS,
        );
        info!(
            translucent = effects.translucent,
            masked = effects.masked,
            "shell window created"
        );

        let wake = options.wake.clone();
        SHELL.with(|s| {
            *s.borrow_mut() = Some(ShellRuntime {
                options,
                view: ShellState::default(),
                effects,
            })
        });
        wake.set(hwnd);
        // Statuses published before the handle was known.
        let _ = PostMessageW(Some(hwnd), WM_APP_STATUS, WPARAM(0), LPARAM(0));

        let _ = ShowWindow(hwnd, SW_SHOW);

        let mut msg = MSG::default();
        while keep_pumping(GetMessageW(&mut msg, None, 0, 0).0) {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        wake.clear();
        // Normally already torn down by WM_DESTROY.
        if let Some(mut runtime) = SHELL.with(|s| s.borrow_mut().take()) {
            runtime.options.tool.shutdown();
        }
        Ok(())
    }
}

fn centred_origin() -> (i32, i32) {
    let mut area = RECT::default();
    let found = unsafe {
        SystemParametersInfoW(
            SPI_GETWORKAREA,
            0,
            Some(&mut area as *mut RECT as *mut c_void),
            SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
        )
    };
    if found.is_err() {
        warn!("work area unavailable, placing shell at the origin");
        return (0, 0);
    }
    (
        area.left + (area.right - area.left - WINDOW_WIDTH) / 2,
        area.top + (area.bottom - area.top - WINDOW_HEIGHT) / 2,
    )
}

fn with_shell<R>(f: impl FnOnce(&mut ShellRuntime) -> R) -> Option<R> {
    SHELL.with(|s| s.borrow_mut().as_mut().map(f))
}

fn repaint(hwnd: HWND) {
    unsafe {
        let _ = InvalidateRect(Some(hwnd), None, false);
    }
}

/// Lower 16 bits / upper 16 bits as signed screen coordinates.
fn point_from_lparam(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as u16 as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as i32;
    (x, y)
}

fn on_click(hwnd: HWND, control: Control) {
    match control {
        Control::Close => unsafe {
            let _ = DestroyWindow(hwnd);
        },
        Control::StartStop => {
            with_shell(|shell| {
                if shell.view.running {
                    match shell.options.tool.stop_tool() {
                        Ok(()) => shell.view.apply_stopped(),
                        Err(err) => warn!(%err, "stop failed"),
                    }
                } else {
                    let result = shell.options.tool.start_tool().map_err(|err| {
                        warn!(%err, "start failed");
                        err.to_string()
                    });
                    shell.view.apply_start_result(result);
                }
            });
            repaint(hwnd);
        }
        Control::FirstPersonToggle => {
            with_shell(|shell| {
                let enabled = !shell.view.first_person_mode;
                match shell.options.tool.set_first_person_mode(enabled) {
                    Ok(()) => {
                        shell.view.first_person_mode = enabled;
                        debug!(enabled, "first person mode toggled");
                    }
                    Err(err) => warn!(%err, "first person mode unchanged"),
                }
            });
            repaint(hwnd);
        }
    }
}

extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe {
        match msg {
            WM_NCHITTEST => {
                let (x, y) = point_from_lparam(lparam);
                let mut pt = POINT { x, y };
                let _ = ScreenToClient(hwnd, &mut pt);
                if hit_test(pt.x, pt.y).is_some() {
                    LRESULT(HTCLIENT as isize)
                } else {
                    LRESULT(HTCAPTION as isize)
                }
            }

            WM_LBUTTONUP => {
                let (x, y) = point_from_lparam(lparam);
                if let Some(control) = hit_test(x, y) {
                    on_click(hwnd, control);
                }
                LRESULT(0)
            }

            WM_APP_STATUS => {
                let changed = with_shell(|shell| {
                    let events = shell.options.bridge.drain();
                    for event in &events {
                        debug!(status = %event, "status received");
                        shell.view.apply_status(event);
                    }
                    !events.is_empty()
                });
                if changed == Some(true) {
                    repaint(hwnd);
                }
                LRESULT(0)
            }

            WM_PAINT => {
                let mut ps = PAINTSTRUCT::default();
                let hdc = BeginPaint(hwnd, &mut ps);
                with_shell(|shell| paint::paint(hdc, &shell.view, shell.effects));
                let _ = EndPaint(hwnd, &ps);
                LRESULT(0)
            }

            WM_ERASEBKGND => LRESULT(1),

            WM_CLOSE => {
                let _ = DestroyWindow(hwnd);
                LRESULT(0)
            }

            WM_DESTROY => {
                if let Some(mut runtime) = SHELL.with(|s| s.borrow_mut().take()) {
                    runtime.options.wake.clear();
                    if let Err(err) = runtime.options.tool.stop_tool() {
                        warn!(%err, "stop on close failed");
                    }
                    runtime.options.tool.shutdown();
                }
                info!("shell window closed");
                PostQuitMessage(0);
                LRESULT(0)
            }

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}
