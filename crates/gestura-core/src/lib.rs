#![forbid(unsafe_code)]

//! Core: pointer paths, gesture taxonomy, and touch gesture classification.
//!
//! # Role in Gestura
//! `gestura-core` is the deterministic heart of the workspace. It turns a
//! stream of [`MotionEvent`]s into at most one [`Gesture`] per touch episode
//! and never touches a clock, a thread, or the filesystem.
//!
//! # Primary responsibilities
//! - **PathTracker**: per-pointer start, last position and bounding box.
//! - **GestureClassifier**: tap, long press, double tap and the swipe
//!   variant chain (double, triangle, edge, tap combo).
//! - **GestureDetector**: episode lifecycle and long-press timer commands.
//! - **Gesture**: the closed taxonomy with stable `action.*` ids.
//!
//! # How it fits in the system
//! The runtime (`gestura-runtime`) owns the event queue and the long-press
//! timer, feeds events to a [`GestureDetector`] and forwards the emitted
//! gestures to the application.

pub mod classifier;
pub mod config;
pub mod detector;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod path;

pub use classifier::{GestureClassifier, TapRecord};
pub use config::{ClassifierConfig, GesturePreferences, TouchMetrics};
pub use detector::{Detection, EpisodeId, GestureDetector, Phase, TimerCommand};
pub use event::{MotionAction, MotionEvent, PointerId, PointerSample};
pub use geometry::{Insets, ScreenGeometry, Vector};
pub use gesture::{Direction, Edge, Gesture, Modifier, Side, Swipe};
pub use path::{PathTracker, PointerPath};
