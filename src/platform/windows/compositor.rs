//! DWM compositor effects.
//!
//! Translucency goes through the undocumented `SetWindowCompositionAttribute`
//! export of user32, resolved at runtime; when acrylic is refused the plain
//! blur-behind accent is tried. Rounded corners use the Windows 11 corner
//! preference and fall back to a window region on older systems.

use std::ffi::c_void;
use std::mem::size_of;

use tracing::debug;
use windows::core::{s, w};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Dwm::{
    DwmSetWindowAttribute, DWMWA_WINDOW_CORNER_PREFERENCE, DWMWCP_ROUND,
    DWM_WINDOW_CORNER_PREFERENCE,
};
use windows::Win32::Graphics::Gdi::{CreateRoundRectRgn, DeleteObject, SetWindowRgn};
use windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};
use windows::Win32::UI::WindowsAndMessaging::GetWindowRect;

use crate::driver::{Compositor, WindowHandle};
use crate::error::CompositorEffectError;
use crate::model::Rgba;

const WCA_ACCENT_POLICY: u32 = 19;
const ACCENT_ENABLE_BLURBEHIND: u32 = 3;
const ACCENT_ENABLE_ACRYLICBLURBEHIND: u32 = 4;
const ACCENT_FLAGS_DRAW_ALL_BORDERS: u32 = 0x1E0;

#[repr(C)]
struct AccentPolicy {
    accent_state: u32,
    accent_flags: u32,
    gradient_color: u32,
    animation_id: u32,
}

#[repr(C)]
struct WindowCompositionAttribData {
    attribute: u32,
    data: *mut c_void,
    size: usize,
}

type SetWindowCompositionAttributeFn =
    unsafe extern "system" fn(HWND, *mut WindowCompositionAttribData) -> i32;

/// Desktop Window Manager backed [`Compositor`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DwmCompositor;

impl DwmCompositor {
    pub fn new() -> Self {
        Self
    }
}

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.0 as *mut c_void)
}

fn set_composition_attribute() -> Option<SetWindowCompositionAttributeFn> {
    unsafe {
        let user32 = GetModuleHandleW(w!("user32.dll")).ok()?;
        let proc = GetProcAddress(user32, s!("SetWindowCompositionAttribute"))?;
        Some(std::mem::transmute::<
            unsafe extern "system" fn() -> isize,
            SetWindowCompositionAttributeFn,
        >(proc))
    }
}

fn apply_accent(
    set_attribute: SetWindowCompositionAttributeFn,
    window: HWND,
    accent_state: u32,
    gradient_color: u32,
) -> bool {
    let mut policy = AccentPolicy {
        accent_state,
        accent_flags: ACCENT_FLAGS_DRAW_ALL_BORDERS,
        gradient_color,
        animation_id: 0,
    };
    let mut data = WindowCompositionAttribData {
        attribute: WCA_ACCENT_POLICY,
        data: &mut policy as *mut AccentPolicy as *mut c_void,
        size: size_of::<AccentPolicy>(),
    };
    unsafe { set_attribute(window, &mut data) != 0 }
}

impl Compositor for DwmCompositor {
    fn apply_translucency(
        &self,
        window: WindowHandle,
        tint: Rgba,
        alpha: u8,
    ) -> Result<(), CompositorEffectError> {
        let set_attribute =
            set_composition_attribute().ok_or(CompositorEffectError::Unsupported {
                effect: "translucency",
            })?;
        let gradient = tint.with_alpha(alpha).to_abgr();

        if apply_accent(
            set_attribute,
            hwnd(window),
            ACCENT_ENABLE_ACRYLICBLURBEHIND,
            gradient,
        ) {
            return Ok(());
        }
        debug!("acrylic refused, trying blur-behind");
        if apply_accent(set_attribute, hwnd(window), ACCENT_ENABLE_BLURBEHIND, gradient) {
            return Ok(());
        }
        Err(CompositorEffectError::Failed {
            effect: "translucency",
            reason: "SetWindowCompositionAttribute returned FALSE".into(),
        })
    }

    fn apply_rounded_mask(
        &self,
        window: WindowHandle,
        radius: i32,
    ) -> Result<(), CompositorEffectError> {
        let window = hwnd(window);
        unsafe {
            let preference = DWMWCP_ROUND;
            let dwm = DwmSetWindowAttribute(
                window,
                DWMWA_WINDOW_CORNER_PREFERENCE,
                &preference as *const DWM_WINDOW_CORNER_PREFERENCE as *const c_void,
                size_of::<DWM_WINDOW_CORNER_PREFERENCE>() as u32,
            );
            if dwm.is_ok() {
                return Ok(());
            }
            debug!("corner preference unavailable, using a window region");

            let mut rect = RECT::default();
            GetWindowRect(window, &mut rect).map_err(|e| CompositorEffectError::Failed {
                effect: "rounded mask",
                reason: e.to_string(),
            })?;
            let width = rect.right - rect.left;
            let height = rect.bottom - rect.top;

            let region = CreateRoundRectRgn(0, 0, width + 1, height + 1, radius * 2, radius * 2);
            if region.is_invalid() {
                return Err(CompositorEffectError::Failed {
                    effect: "rounded mask",
                    reason: "CreateRoundRectRgn failed".into(),
                });
            }
            // On success the system owns the region.
            if SetWindowRgn(window, Some(region), true) == 0 {
                let _ = DeleteObject(region.into());
                return Err(CompositorEffectError::Failed {
                    effect: "rounded mask",
                    reason: "SetWindowRgn failed".into(),
                });
            }
        }
        Ok(())
    }
}
