#![forbid(unsafe_code)]

//! Per-episode pointer path tracking.
//!
//! [`PathTracker`] keeps one [`PointerPath`] per pointer id seen since the
//! episode began. It holds no policy: it only records where each contact
//! started, where it is now, and the bounding box of everywhere it has been.
//!
//! # Invariants
//!
//! 1. Ordinals are dense and assigned in arrival order: the first pointer is
//!    `0`, so a non-empty tracker always has exactly one main path.
//! 2. `min <= start, last <= max` componentwise for every path.
//! 3. Samples are folded strictly in delivery order; the bounding box covers
//!    batched history as well as primary positions.

use ahash::AHashMap;

use crate::event::{MotionEvent, PointerId};
use crate::geometry::Vector;

/// The trajectory summary of one contact.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerPath {
    ordinal: usize,
    start: Vector,
    last: Vector,
    min: Vector,
    max: Vector,
}

impl PointerPath {
    /// A path that has only been observed at `start`.
    #[must_use]
    pub fn new(ordinal: usize, start: Vector) -> Self {
        Self {
            ordinal,
            start,
            last: start,
            min: start,
            max: start,
        }
    }

    /// Fold one more observed position into the path.
    pub fn update(&mut self, position: Vector) {
        self.min = self.min.min(position);
        self.max = self.max.max(position);
        self.last = position;
    }

    /// Arrival order among the episode's pointers (0 = main pointer).
    #[inline]
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> Vector {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn last(&self) -> Vector {
        self.last
    }

    #[inline]
    #[must_use]
    pub fn min(&self) -> Vector {
        self.min
    }

    #[inline]
    #[must_use]
    pub fn max(&self) -> Vector {
        self.max
    }

    /// Net displacement from first contact to the latest position.
    #[must_use]
    pub fn displacement(&self) -> Vector {
        self.last - self.start
    }

    /// Squared diagonal of the bounding box: the total excursion.
    #[must_use]
    pub fn size_squared(&self) -> f32 {
        (self.max - self.min).abs_squared()
    }

    /// Componentwise bounds of the straight start→last chord.
    #[must_use]
    pub fn chord_bounds(&self) -> (Vector, Vector) {
        (self.start.min(self.last), self.start.max(self.last))
    }

    #[must_use]
    pub fn is_main(&self) -> bool {
        self.ordinal == 0
    }
}

/// The set of paths of the current episode.
#[derive(Debug, Clone, Default)]
pub struct PathTracker {
    paths: AHashMap<PointerId, PointerPath>,
}

impl PathTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every path; the next pointer becomes the main pointer.
    pub fn reset(&mut self) {
        self.paths.clear();
    }

    /// Register `id` at `position` unless it is already tracked.
    ///
    /// Returns the ordinal of the (new or existing) path.
    pub fn add_pointer(&mut self, id: PointerId, position: Vector) -> usize {
        let ordinal = self.paths.len();
        self.paths
            .entry(id)
            .or_insert_with(|| PointerPath::new(ordinal, position))
            .ordinal
    }

    /// Fold `position` into the path of `id`, creating it if needed.
    pub fn sample(&mut self, id: PointerId, position: Vector) {
        self.add_pointer(id, position);
        if let Some(path) = self.paths.get_mut(&id) {
            path.update(position);
        }
    }

    /// Fold every pointer sample of `event`, history first. A pointer first
    /// seen here starts at its current position.
    pub fn fold_event(&mut self, event: &MotionEvent) {
        for pointer in &event.pointers {
            self.add_pointer(pointer.id, pointer.position);
            for position in pointer.positions() {
                self.sample(pointer.id, position);
            }
        }
    }

    /// The path of the first pointer to touch down.
    #[must_use]
    pub fn main_path(&self) -> Option<&PointerPath> {
        self.paths.values().find(|path| path.is_main())
    }

    #[must_use]
    pub fn get(&self, id: PointerId) -> Option<&PointerPath> {
        self.paths.get(&id)
    }

    /// Iterate all paths in unspecified order.
    pub fn paths(&self) -> impl Iterator<Item = &PointerPath> {
        self.paths.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
