//! Status notifications published by the freeze loop.
//!
//! A [`StatusEvent`] is immutable once created. The UI learns about the
//! machine only through these values, in publication order.

use std::fmt;

use super::constants::*;
use super::point::Point;

/// Which transition produced a status event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Enforcement loop started, or suppression released while running.
    Running,
    /// Anchor point captured.
    PointSet,
    /// Suppression engaged: the cursor is pinned to the anchor.
    Frozen,
    /// Enforcement loop stopped.
    Stopped,
}

/// A human-readable status notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    kind: StatusKind,
    message: String,
}

impl StatusEvent {
    pub fn running() -> Self {
        Self::new(StatusKind::Running, MSG_RUNNING)
    }

    pub fn point_set(anchor: Point) -> Self {
        Self::new(StatusKind::PointSet, format!("Point set {anchor}"))
    }

    pub fn frozen() -> Self {
        Self::new(StatusKind::Frozen, MSG_FROZEN)
    }

    pub fn stopped() -> Self {
        Self::new(StatusKind::Stopped, MSG_STOPPED)
    }

    fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Visual state of the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeKind {
    #[default]
    Ready,
    Running,
    Frozen,
    Stopped,
    PointSet,
}

impl BadgeKind {
    /// Classify free-form status text the way the badge renders it.
    ///
    /// Matching is case-insensitive and checked in priority order, so
    /// "Freeze stopped" reads as frozen.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has = |needle: &str| lower.contains(needle);

        if has("frozen") || has("freeze") {
            BadgeKind::Frozen
        } else if has("running") || has("started") {
            BadgeKind::Running
        } else if has("stopped") {
            BadgeKind::Stopped
        } else if has("point set") || has("saved") {
            BadgeKind::PointSet
        } else {
            BadgeKind::Ready
        }
    }
}

impl From<StatusKind> for BadgeKind {
    fn from(kind: StatusKind) -> Self {
        match kind {
            StatusKind::Running => BadgeKind::Running,
            StatusKind::PointSet => BadgeKind::PointSet,
            StatusKind::Frozen => BadgeKind::Frozen,
            StatusKind::Stopped => BadgeKind::Stopped,
        }
    }
}
