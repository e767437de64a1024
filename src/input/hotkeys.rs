//! Global hotkey bindings and the listener seam.
//!
//! Bindings are fixed: one key captures the anchor point, one toggles
//! enforcement. Platform listeners implement [`HotkeyListener`]; they deliver
//! presses through callbacks that must return immediately.

use std::fmt;

use crate::error::HookRegistrationError;
use crate::model::constants::*;

/// A fixed, process-wide hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hotkey {
    /// Capture the live cursor position as the anchor.
    SetPoint,
    /// Toggle enforcement.
    Toggle,
}

impl Hotkey {
    pub const ALL: [Hotkey; 2] = [Hotkey::SetPoint, Hotkey::Toggle];

    /// Virtual-key code the listener watches.
    pub fn vk_code(self) -> u32 {
        match self {
            Hotkey::SetPoint => VK_SET_POINT,
            Hotkey::Toggle => VK_TOGGLE,
        }
    }

    pub fn from_vk_code(vk: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.vk_code() == vk)
    }

    pub fn label(self) -> &'static str {
        match self {
            Hotkey::SetPoint => SET_POINT_KEY_LABEL,
            Hotkey::Toggle => TOGGLE_KEY_LABEL,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Hotkey::SetPoint => "set point",
            Hotkey::Toggle => "toggle",
        }
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.description())
    }
}

/// Invoked on the OS hook thread for every press of a registered key.
pub type KeyCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Focus-independent global key observation.
pub trait HotkeyListener: Send {
    /// Attach a global observer for `key`.
    fn register(&mut self, key: Hotkey, callback: KeyCallback)
        -> Result<(), HookRegistrationError>;

    /// Remove every observer and release the OS hook. Safe to call repeatedly.
    fn unregister_all(&mut self);

    /// True while at least one observer is attached.
    fn is_registered(&self) -> bool;
}

/// Turns raw key-down/key-up notifications into one event per physical press.
///
/// Keyboard hooks report auto-repeat as further key-downs; a held toggle key
/// would otherwise flip enforcement several times a second.
#[derive(Debug, Default)]
pub struct PressFilter {
    held: Vec<u32>,
}

impl PressFilter {
    pub const fn new() -> Self {
        Self { held: Vec::new() }
    }

    /// Returns true only for the first key-down after a key-up.
    pub fn key_down(&mut self, vk: u32) -> bool {
        if self.held.contains(&vk) {
            false
        } else {
            self.held.push(vk);
            true
        }
    }

    pub fn key_up(&mut self, vk: u32) {
        self.held.retain(|&held| held != vk);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vk_round_trip_for_all_bindings() {
        for key in Hotkey::ALL {
            assert_eq!(Hotkey::from_vk_code(key.vk_code()), Some(key));
        }
        assert_eq!(Hotkey::from_vk_code(0x41), None);
    }

    #[test]
    fn test_bindings_are_q_and_f3() {
        assert_eq!(Hotkey::SetPoint.vk_code(), 0x51);
        assert_eq!(Hotkey::Toggle.vk_code(), 0x72);
        assert_eq!(Hotkey::Toggle.to_string(), "F3 (toggle)");
    }

    #[test]
    fn test_press_filter_ignores_auto_repeat() {
        let mut filter = PressFilter::new();
        assert!(filter.key_down(VK_TOGGLE));
        assert!(!filter.key_down(VK_TOGGLE));
        assert!(!filter.key_down(VK_TOGGLE));
        filter.key_up(VK_TOGGLE);
        assert!(filter.key_down(VK_TOGGLE));
    }

    #[test]
    fn test_press_filter_tracks_keys_independently() {
        let mut filter = PressFilter::new();
        assert!(filter.key_down(VK_TOGGLE));
        assert!(filter.key_down(VK_SET_POINT));
        filter.key_up(VK_SET_POINT);
        assert!(!filter.key_down(VK_TOGGLE));
        assert!(filter.key_down(VK_SET_POINT));
        filter.clear();
        assert!(filter.key_down(VK_TOGGLE));
    }
}
