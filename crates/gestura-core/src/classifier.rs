#![forbid(unsafe_code)]

//! Gesture classification over a finished episode.
//!
//! [`GestureClassifier`] turns the [`PathTracker`] of a completed, uncancelled
//! episode into at most one [`Gesture`]. Apart from the rolling tap memory
//! (needed for double taps and tap combos) it is a pure function of its
//! input and configuration.
//!
//! # Decision procedure
//!
//! 1. Reject episodes where any path started in the top/bottom system inset.
//! 2. A single path that never left the touch slop is a tap candidate:
//!    long click, double click, or a remembered tap.
//! 3. Everything else is a swipe: the main path's displacement picks a base
//!    direction, then the variant chain runs in a fixed order:
//!    double → triangle → edge → tap combo.
//!
//! # Failure Modes
//!
//! Nothing here fails loudly. Divergent fingers, diagonal or too-short
//! motion, and inset starts all resolve to `None`.

use std::time::Duration;

use crate::config::{ClassifierConfig, GesturePreferences};
use crate::gesture::{Direction, Edge, Gesture, Side, Swipe};
use crate::geometry::Vector;
use crate::path::{PathTracker, PointerPath};

/// The most recent standalone tap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapRecord {
    /// When the tap's finger lifted.
    pub time: Duration,
    /// Where the finger lifted.
    pub location: Vector,
}

/// Classifies finished episodes.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: ClassifierConfig,
    last_tap: Option<TapRecord>,
}

impl GestureClassifier {
    /// Create a classifier with empty tap memory.
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            last_tap: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Replace the configuration. Tap memory is kept.
    pub fn set_config(&mut self, config: ClassifierConfig) {
        self.config = config;
    }

    #[inline]
    #[must_use]
    pub fn last_tap(&self) -> Option<TapRecord> {
        self.last_tap
    }

    /// Seed the tap memory, e.g. when restoring a classifier.
    pub fn set_last_tap(&mut self, tap: Option<TapRecord>) {
        self.last_tap = tap;
    }

    /// Whether `path` stayed within the touch slop and clear of every system
    /// inset.
    #[must_use]
    pub fn is_tap(&self, path: &PointerPath) -> bool {
        if self.config.screen.box_touches_insets(path.min(), path.max()) {
            return false;
        }
        path.size_squared() < self.config.metrics.touch_slop_squared()
    }

    /// Whether an elapsed long-press timer should commit `LONG_CLICK` for the
    /// live episode in `paths`.
    #[must_use]
    pub fn qualifies_for_long_press(&self, paths: &PathTracker) -> bool {
        paths.len() == 1 && paths.main_path().is_some_and(|path| self.is_tap(path))
    }

    /// Axis-aligned direction of `displacement`, if it is decisive.
    ///
    /// Motion within `angular_threshold` of an axis and longer than the touch
    /// slop along it resolves; diagonal or short motion does not.
    #[must_use]
    pub fn base_direction(&self, displacement: Vector) -> Option<Direction> {
        let slop = self.config.metrics.touch_slop;
        let threshold = self.config.angular_threshold;
        let abs_x = displacement.x.abs();
        let abs_y = displacement.y.abs();

        if threshold * abs_x > abs_y {
            if displacement.x > slop {
                Some(Direction::Right)
            } else if displacement.x < -slop {
                Some(Direction::Left)
            } else {
                None
            }
        } else if threshold * abs_y > abs_x {
            if displacement.y < -slop {
                Some(Direction::Up)
            } else if displacement.y > slop {
                Some(Direction::Down)
            } else {
                None
            }
        } else {
            None
        }
    }

    /// Classify a finished episode.
    ///
    /// `down_time` and `end_time` bound the episode; `preferences` is the
    /// snapshot to use for this episode only.
    pub fn classify(
        &mut self,
        paths: &PathTracker,
        down_time: Duration,
        end_time: Duration,
        preferences: &GesturePreferences,
    ) -> Option<Gesture> {
        let Some(main) = paths.main_path() else {
            tracing::trace!("no paths in episode");
            return None;
        };

        if paths
            .paths()
            .any(|path| self.config.screen.in_vertical_inset(path.start()))
        {
            tracing::debug!(reason = "system_inset", "episode ignored");
            return None;
        }

        if paths.len() == 1 && self.is_tap(main) {
            let duration = end_time.saturating_sub(down_time);
            return self.classify_tap(main, down_time, end_time, duration);
        }

        self.classify_swipe(paths, main, down_time, preferences)
    }

    fn classify_tap(
        &mut self,
        main: &PointerPath,
        down_time: Duration,
        end_time: Duration,
        duration: Duration,
    ) -> Option<Gesture> {
        let metrics = &self.config.metrics;

        if duration >= metrics.long_press_timeout {
            return Some(Gesture::LongClick);
        }
        if duration > metrics.tap_timeout {
            tracing::trace!(?duration, "touch too slow for a tap");
            return None;
        }

        let location = main.last();
        let is_double = self.last_tap.is_some_and(|tap| {
            down_time.saturating_sub(tap.time) < metrics.double_tap_timeout
                && (location - tap.location).abs_squared() < metrics.double_tap_slop_squared()
        });

        if is_double {
            // the first tap stays remembered
            return Some(Gesture::DoubleClick);
        }

        tracing::trace!(x = location.x, y = location.y, "tap recorded");
        self.last_tap = Some(TapRecord {
            time: end_time,
            location,
        });
        None
    }

    fn classify_swipe(
        &self,
        paths: &PathTracker,
        main: &PointerPath,
        down_time: Duration,
        preferences: &GesturePreferences,
    ) -> Option<Gesture> {
        let Some(direction) = self.base_direction(main.displacement()) else {
            tracing::debug!(reason = "no_direction", "episode ignored");
            return None;
        };
        let mut swipe = Swipe::new(direction);

        if preferences.double_swipe && paths.len() > 1 {
            let diverged = paths
                .paths()
                .any(|path| self.base_direction(path.displacement()) != Some(direction));
            if diverged {
                tracing::debug!(reason = "pointers_diverged", "episode ignored");
                return None;
            }
            swipe = swipe.doubled();
        }

        swipe = self.apply_triangle(swipe, main);

        if preferences.edge_swipe {
            swipe = self.apply_edge(swipe, main, preferences.edge_width());
        }

        let combo_window = self.config.metrics.double_tap_timeout.saturating_mul(2);
        let recent_tap = self
            .last_tap
            .is_some_and(|tap| down_time.saturating_sub(tap.time) < combo_window);
        if recent_tap {
            swipe = swipe.with_tap_combo();
        }

        Some(Gesture::Swipe(swipe))
    }

    /// Remap a swipe whose path bulged past its chord by more than the
    /// minimum triangle height.
    fn apply_triangle(&self, swipe: Swipe, main: &PointerPath) -> Swipe {
        let height = self.config.min_triangle_height;
        let (chord_min, chord_max) = main.chord_bounds();
        let (path_min, path_max) = (main.min(), main.max());

        let (lo_chord, hi_chord, lo_path, hi_path) = if swipe.direction().is_vertical() {
            (chord_min.x, chord_max.x, path_min.x, path_max.x)
        } else {
            (chord_min.y, chord_max.y, path_min.y, path_max.y)
        };

        if hi_chord + height < hi_path {
            swipe.with_bulge(Side::High)
        } else if lo_chord - height > lo_path {
            swipe.with_bulge(Side::Low)
        } else {
            swipe
        }
    }

    /// Remap a swipe performed entirely inside an edge band.
    fn apply_edge(&self, mut swipe: Swipe, main: &PointerPath, edge_width: f32) -> Swipe {
        let screen = &self.config.screen;
        let (min, max) = (main.min(), main.max());

        if max.x < edge_width * screen.width {
            swipe = swipe.with_edge(Edge::Left);
        } else if min.x > (1.0 - edge_width) * screen.width {
            swipe = swipe.with_edge(Edge::Right);
        }

        if max.y < edge_width * screen.height {
            swipe = swipe.with_edge(Edge::Top);
        } else if min.y > (1.0 - edge_width) * screen.height {
            swipe = swipe.with_edge(Edge::Bottom);
        }

        swipe
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
