#![forbid(unsafe_code)]

//! Canonical pointer input events.
//!
//! [`MotionEvent`] mirrors what touch platforms deliver to a view: a masked
//! action, the episode's down time, the event time and one sample per active
//! pointer. Platforms batch intermediate positions between two dispatches;
//! those arrive as per-pointer `history` and must be folded in order before
//! the primary position.
//!
//! All timestamps are offsets from an arbitrary monotonic epoch (for example
//! the platform uptime clock), never wall-clock time.

use std::time::Duration;

use crate::geometry::Vector;

/// Platform-assigned pointer identifier, stable for the lifetime of a contact.
pub type PointerId = u32;

/// Masked action of a [`MotionEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MotionAction {
    /// First finger touched down; starts a new episode.
    Down,
    /// An additional finger touched down.
    PointerDown,
    /// One or more pointers moved.
    Move,
    /// A non-last finger lifted.
    PointerUp,
    /// The last finger lifted; ends the episode.
    Up,
    /// The platform took the gesture away; ends the episode without a result.
    Cancel,
}

impl MotionAction {
    /// Returns true for actions that terminate an episode.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

/// One pointer's position within a [`MotionEvent`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerSample {
    pub id: PointerId,
    /// Primary (most recent) position.
    pub position: Vector,
    /// Batched intermediate positions, oldest first.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub history: Vec<Vector>,
}

impl PointerSample {
    /// Create a sample without history.
    #[must_use]
    pub fn new(id: PointerId, position: Vector) -> Self {
        Self {
            id,
            position,
            history: Vec::new(),
        }
    }

    /// Iterate every position in delivery order: history first, then the
    /// primary position.
    pub fn positions(&self) -> impl Iterator<Item = Vector> + '_ {
        self.history
            .iter()
            .copied()
            .chain(std::iter::once(self.position))
    }
}

/// A single pointer dispatch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionEvent {
    pub action: MotionAction,
    /// When the first finger of the current episode touched down.
    pub down_time: Duration,
    /// When this event happened.
    pub event_time: Duration,
    pub pointers: Vec<PointerSample>,
}

impl MotionEvent {
    /// Create an event without pointers.
    #[must_use]
    pub fn new(action: MotionAction, down_time: Duration, event_time: Duration) -> Self {
        Self {
            action,
            down_time,
            event_time,
            pointers: Vec::with_capacity(2),
        }
    }

    /// Builder: add a pointer at `position`.
    #[must_use]
    pub fn with_pointer(mut self, id: PointerId, position: Vector) -> Self {
        self.pointers.push(PointerSample::new(id, position));
        self
    }

    /// Builder: add a pointer with batched history preceding `position`.
    #[must_use]
    pub fn with_history(
        mut self,
        id: PointerId,
        history: impl IntoIterator<Item = Vector>,
        position: Vector,
    ) -> Self {
        self.pointers.push(PointerSample {
            id,
            position,
            history: history.into_iter().collect(),
        });
        self
    }

    /// Time elapsed since the episode's first touch.
    #[must_use]
    pub fn episode_duration(&self) -> Duration {
        self.event_time.saturating_sub(self.down_time)
    }
}
