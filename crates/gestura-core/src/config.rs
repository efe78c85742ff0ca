#![forbid(unsafe_code)]

//! Classification parameters.
//!
//! Configuration is split by who owns it:
//!
//! - [`TouchMetrics`]: platform-derived slops and timeouts, cached per
//!   detector.
//! - [`ScreenGeometry`]: screen size and system gesture insets, updated on
//!   resize / inset changes.
//! - [`GesturePreferences`]: user toggles, re-read at every classification.
//!
//! [`ClassifierConfig`] groups the first two with the fixed shape thresholds.
//! The classifier reads all of it and never mutates it.

use std::time::Duration;

use crate::geometry::ScreenGeometry;

/// `tan(π/8)`: a displacement is horizontal when `|dy| < θ·|dx|`.
pub const DEFAULT_ANGULAR_THRESHOLD: f32 = std::f32::consts::SQRT_2 - 1.0;

/// Minimum bulge (pixels) of a path past its chord to count as a triangle.
pub const DEFAULT_MIN_TRIANGLE_HEIGHT: f32 = 250.0;

/// Density used by [`TouchMetrics::default`] (an xxhdpi phone).
pub const DEFAULT_DENSITY: f32 = 2.75;

// ---------------------------------------------------------------------------
// TouchMetrics
// ---------------------------------------------------------------------------

/// Platform-derived distances and timeouts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TouchMetrics {
    /// Movement (pixels) below which a contact is still a tap.
    pub touch_slop: f32,
    /// Maximum distance (pixels) between the two taps of a double tap.
    pub double_tap_slop: f32,
    /// Hold duration after which a stationary contact is a long press.
    #[cfg_attr(
        feature = "serde",
        serde(with = "serde_millis", rename = "long_press_timeout_ms")
    )]
    pub long_press_timeout: Duration,
    /// Maximum duration of a tap.
    #[cfg_attr(feature = "serde", serde(with = "serde_millis", rename = "tap_timeout_ms"))]
    pub tap_timeout: Duration,
    /// Maximum gap between a tap and the start of the next one.
    #[cfg_attr(
        feature = "serde",
        serde(with = "serde_millis", rename = "double_tap_timeout_ms")
    )]
    pub double_tap_timeout: Duration,
}

impl TouchMetrics {
    /// Platform default metrics scaled to a display `density`
    /// (physical pixels per density-independent pixel).
    #[must_use]
    pub fn from_density(density: f32) -> Self {
        Self {
            touch_slop: 8.0 * density,
            double_tap_slop: 100.0 * density,
            long_press_timeout: Duration::from_millis(400),
            tap_timeout: Duration::from_millis(100),
            double_tap_timeout: Duration::from_millis(300),
        }
    }

    /// Squared touch slop.
    #[inline]
    #[must_use]
    pub fn touch_slop_squared(&self) -> f32 {
        self.touch_slop * self.touch_slop
    }

    /// Squared double-tap slop.
    #[inline]
    #[must_use]
    pub fn double_tap_slop_squared(&self) -> f32 {
        self.double_tap_slop * self.double_tap_slop
    }
}

impl Default for TouchMetrics {
    fn default() -> Self {
        Self::from_density(DEFAULT_DENSITY)
    }
}

// ---------------------------------------------------------------------------
// GesturePreferences
// ---------------------------------------------------------------------------

/// User-controlled gesture toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GesturePreferences {
    /// Resolve multi-finger swipes to their double variants.
    pub double_swipe: bool,
    /// Resolve swipes inside the edge band to their edge variants.
    pub edge_swipe: bool,
    /// Width of the edge band as a percentage of the screen dimension.
    pub edge_width_percent: u8,
}

impl GesturePreferences {
    /// Edge band width as a fraction in `0.0..=1.0`.
    #[must_use]
    pub fn edge_width(&self) -> f32 {
        f32::from(self.edge_width_percent.min(100)) / 100.0
    }
}

impl Default for GesturePreferences {
    fn default() -> Self {
        Self {
            double_swipe: true,
            edge_swipe: true,
            edge_width_percent: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// ClassifierConfig
// ---------------------------------------------------------------------------

/// Everything the classifier needs apart from the user preferences.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassifierConfig {
    /// Tangent of the angle separating axis-aligned from diagonal motion.
    pub angular_threshold: f32,
    /// Minimum bulge (pixels) for a triangle variant.
    pub min_triangle_height: f32,
    pub metrics: TouchMetrics,
    pub screen: ScreenGeometry,
}

impl ClassifierConfig {
    /// Config for the given screen with default metrics.
    #[must_use]
    pub fn for_screen(screen: ScreenGeometry) -> Self {
        Self {
            screen,
            ..Self::default()
        }
    }

    /// Check every parameter is usable.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let m = &self.metrics;

        if !(m.touch_slop.is_finite() && m.touch_slop >= 0.0) {
            errors.push(format!("touch_slop must be >= 0, got {}", m.touch_slop));
        }
        if !(m.double_tap_slop.is_finite() && m.double_tap_slop >= 0.0) {
            errors.push(format!(
                "double_tap_slop must be >= 0, got {}",
                m.double_tap_slop
            ));
        }
        if m.long_press_timeout.is_zero() {
            errors.push("long_press_timeout must be > 0".to_string());
        }
        if m.tap_timeout > m.long_press_timeout {
            errors.push(format!(
                "tap_timeout ({:?}) must not exceed long_press_timeout ({:?})",
                m.tap_timeout, m.long_press_timeout
            ));
        }
        if !(self.screen.width > 0.0 && self.screen.height > 0.0) {
            errors.push(format!(
                "screen size must be positive, got {}x{}",
                self.screen.width, self.screen.height
            ));
        }
        let insets = &self.screen.insets;
        if [insets.top, insets.bottom, insets.left, insets.right]
            .iter()
            .any(|v| !(v.is_finite() && *v >= 0.0))
        {
            errors.push("insets must be finite and >= 0".to_string());
        }
        if !(self.angular_threshold > 0.0 && self.angular_threshold < 1.0) {
            errors.push(format!(
                "angular_threshold must be in (0, 1), got {}",
                self.angular_threshold
            ));
        }
        if !(self.min_triangle_height.is_finite() && self.min_triangle_height > 0.0) {
            errors.push(format!(
                "min_triangle_height must be > 0, got {}",
                self.min_triangle_height
            ));
        }

        errors
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            metrics: TouchMetrics::default(),
            screen: ScreenGeometry::default(),
            angular_threshold: DEFAULT_ANGULAR_THRESHOLD,
            min_triangle_height: DEFAULT_MIN_TRIANGLE_HEIGHT,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

#[cfg(feature = "serde")]
mod serde_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
