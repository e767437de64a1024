//! Absolute screen coordinates.

use std::fmt;

/// An absolute desktop coordinate in integer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Largest per-axis distance to `other` (Chebyshev distance).
    pub fn drift_from(&self, other: Point) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }

    /// True when `other` is further than `epsilon` pixels away on either axis.
    pub fn drifted(&self, other: Point, epsilon: u32) -> bool {
        self.drift_from(other) > epsilon
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drift_is_largest_axis_delta() {
        let anchor = Point::new(500, 300);
        assert_eq!(anchor.drift_from(Point::new(510, 305)), 10);
        assert_eq!(anchor.drift_from(Point::new(497, 320)), 20);
        assert_eq!(anchor.drift_from(anchor), 0);
    }

    #[test]
    fn test_drift_handles_extreme_coordinates() {
        let a = Point::new(i32::MIN, 0);
        let b = Point::new(i32::MAX, 0);
        assert_eq!(a.drift_from(b), u32::MAX);
    }

    #[test]
    fn test_drifted_respects_epsilon() {
        let anchor = Point::new(0, 0);
        assert!(!anchor.drifted(Point::new(2, -2), 2));
        assert!(anchor.drifted(Point::new(3, 0), 2));
        assert!(anchor.drifted(Point::new(1, 0), 0));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Point::new(-12, 40).to_string(), "(-12, 40)");
    }
}
