//! Window compositor effects (translucency, rounded corners).
//!
//! Purely cosmetic. [`apply_window_effects`] is the boundary where failures
//! are logged and swallowed; the window then stays opaque or unmasked.

use crate::error::CompositorEffectError;
use crate::model::Rgba;

/// Raw native window handle (an `HWND` on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

/// Capability interface for desktop compositor effects.
pub trait Compositor {
    /// Blur-behind / acrylic with an RGB tint at `alpha`.
    fn apply_translucency(
        &self,
        window: WindowHandle,
        tint: Rgba,
        alpha: u8,
    ) -> Result<(), CompositorEffectError>;

    /// Clip the window to a rounded rectangle.
    fn apply_rounded_mask(
        &self,
        window: WindowHandle,
        radius: i32,
    ) -> Result<(), CompositorEffectError>;
}

/// Fallback for systems without a supported compositor.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCompositor;

impl Compositor for NoopCompositor {
    fn apply_translucency(
        &self,
        _window: WindowHandle,
        _tint: Rgba,
        _alpha: u8,
    ) -> Result<(), CompositorEffectError> {
        Err(CompositorEffectError::Unsupported {
            effect: "translucency",
        })
    }

    fn apply_rounded_mask(
        &self,
        _window: WindowHandle,
        _radius: i32,
    ) -> Result<(), CompositorEffectError> {
        Err(CompositorEffectError::Unsupported {
            effect: "rounded mask",
        })
    }
}

/// Which effects actually took hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowEffects {
    pub translucent: bool,
    pub masked: bool,
}

/// Apply both chrome effects, logging and continuing on failure.
pub fn apply_window_effects(
    compositor: &dyn Compositor,
    window: WindowHandle,
    tint: Rgba,
    alpha: u8,
    radius: i32,
) -> WindowEffects {
    let translucent = match compositor.apply_translucency(window, tint, alpha) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%err, "translucency unavailable, window stays opaque");
            false
        }
    };
    let masked = match compositor.apply_rounded_mask(window, radius) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%err, "rounded mask unavailable, window stays rectangular");
            false
        }
    };
    tracing::debug!(translucent, masked, "window effects applied");
    WindowEffects { translucent, masked }
}
