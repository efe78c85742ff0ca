#![forbid(unsafe_code)]

//! Geometric primitives.

use std::ops::{Add, Sub};

/// A 2D point or displacement in screen pixels.
///
/// Screen coordinates: origin at top-left, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    /// The origin / zero displacement.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean length.
    #[inline]
    #[must_use]
    pub fn abs_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Componentwise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Componentwise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl Add for Vector {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f32, f32)> for Vector {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Margins along the screen border that the platform reserves for its own
/// navigation gestures.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Insets {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Insets {
    /// No reserved margins.
    pub const NONE: Self = Self {
        top: 0.0,
        bottom: 0.0,
        left: 0.0,
        right: 0.0,
    };

    /// Create insets from explicit margins.
    #[must_use]
    pub const fn new(top: f32, bottom: f32, left: f32, right: f32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}

impl Default for Insets {
    /// Margins used before the platform reports real values.
    fn default() -> Self {
        Self::new(100.0, 0.0, 100.0, 100.0)
    }
}

/// Screen size plus the reserved system gesture margins.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScreenGeometry {
    pub width: f32,
    pub height: f32,
    pub insets: Insets,
}

impl ScreenGeometry {
    /// Create a geometry with default insets.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            insets: Insets::default(),
        }
    }

    /// Replace the system gesture insets.
    #[must_use]
    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    /// Whether `point` lies in the top or bottom reserved margin.
    ///
    /// Left and right margins are ignored here so that edge swipes remain
    /// reachable.
    #[must_use]
    pub fn in_vertical_inset(&self, point: Vector) -> bool {
        point.y < self.insets.top || point.y > self.height - self.insets.bottom
    }

    /// Whether the box `[min, max]` touches any reserved margin.
    #[must_use]
    pub fn box_touches_insets(&self, min: Vector, max: Vector) -> bool {
        min.x < self.insets.left
            || min.y < self.insets.top
            || max.x > self.width - self.insets.right
            || max.y > self.height - self.insets.bottom
    }
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self::new(1080.0, 2340.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_arithmetic() {
        let a = Vector::new(3.0, -4.0);
        let b = Vector::new(1.0, 2.0);
        assert_eq!(a + b, Vector::new(4.0, -2.0));
        assert_eq!(a - b, Vector::new(2.0, -6.0));
        assert_eq!(a.abs_squared(), 25.0);
    }

    #[test]
    fn vector_componentwise_bounds() {
        let a = Vector::new(3.0, -4.0);
        let b = Vector::new(1.0, 2.0);
        assert_eq!(a.min(b), Vector::new(1.0, -4.0));
        assert_eq!(a.max(b), Vector::new(3.0, 2.0));
    }

    #[test]
    fn vertical_inset_ignores_left_and_right() {
        let screen = ScreenGeometry::new(1000.0, 2000.0);
        assert!(screen.in_vertical_inset(Vector::new(500.0, 50.0)));
        assert!(!screen.in_vertical_inset(Vector::new(10.0, 500.0)));
        assert!(!screen.in_vertical_inset(Vector::new(995.0, 500.0)));
        // default bottom inset is zero
        assert!(!screen.in_vertical_inset(Vector::new(500.0, 2000.0)));
        assert!(screen.in_vertical_inset(Vector::new(500.0, 2000.5)));
    }

    #[test]
    fn box_touches_every_side() {
        let screen = ScreenGeometry::new(1000.0, 2000.0);
        let inside = (Vector::new(200.0, 200.0), Vector::new(300.0, 300.0));
        assert!(!screen.box_touches_insets(inside.0, inside.1));
        assert!(screen.box_touches_insets(Vector::new(50.0, 200.0), inside.1));
        assert!(screen.box_touches_insets(inside.0, Vector::new(950.0, 300.0)));
        assert!(screen.box_touches_insets(Vector::new(200.0, 20.0), inside.1));
    }

    #[test]
    fn no_insets_never_touch() {
        let screen = ScreenGeometry::new(1000.0, 2000.0).with_insets(Insets::NONE);
        assert!(!screen.box_touches_insets(Vector::ZERO, Vector::new(1000.0, 2000.0)));
        assert!(!screen.in_vertical_inset(Vector::ZERO));
    }
}
