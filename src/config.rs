//! Runtime tunables for the enforcement loop.
//!
//! Nothing here is persisted. Defaults come from `model::constants` and can
//! be overridden per launch through environment variables:
//!
//! - `ROFREEZE_TICK_MS`: enforcement interval in milliseconds (1..=100)
//! - `ROFREEZE_EPSILON`: tolerated drift in pixels before correcting (0..=50)
//!
//! Hotkey bindings are fixed and cannot be configured.

use std::str::FromStr;
use std::time::Duration;

use crate::model::constants::*;

/// Enforcement loop tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreezeConfig {
    /// Delay between enforcement ticks.
    pub tick_interval: Duration,
    /// Drift (pixels, per axis) tolerated before the cursor is written back.
    pub epsilon: u32,
}

impl Default for FreezeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            epsilon: DEFAULT_EPSILON_PX,
        }
    }
}

impl FreezeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(ms) = parse_var::<u64>(&lookup, ENV_TICK_MS) {
            config.tick_interval = Duration::from_millis(ms.clamp(MIN_TICK_MS, MAX_TICK_MS));
        }
        if let Some(px) = parse_var::<u32>(&lookup, ENV_EPSILON) {
            config.epsilon = px.min(MAX_EPSILON_PX);
        }

        config
    }

    /// Builder-style override used by tests and embedders.
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval.max(Duration::from_millis(MIN_TICK_MS));
        self
    }

    pub fn with_epsilon(mut self, epsilon: u32) -> Self {
        self.epsilon = epsilon.min(MAX_EPSILON_PX);
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable override");
            None
        }
    }
}
