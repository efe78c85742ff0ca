#![forbid(unsafe_code)]

//! Runtime around the Gestura detector.
//!
//! `gestura-core` classifies episodes synchronously and only *asks* for a
//! long-press timer. This crate supplies everything that needs threads,
//! clocks, or files:
//!
//! - [`GestureLoop`]: single-consumer queue draining motion events and timer
//!   expirations into a [`GestureDetector`](gestura_core::GestureDetector).
//! - [`OneShot`]: cancellable one-shot timer thread.
//! - [`PreferenceStore`]: live preferences shared with a settings UI.
//! - [`Settings`]: TOML/JSON configuration files.
//! - [`trace`]: JSONL recording and virtual-clock replay.
//! - [`logging`]: `tracing-subscriber` setup driven by `GESTURA_LOG`.
//!
//! # Example
//!
//! ```no_run
//! use gestura_runtime::{Detected, GestureLoop, PreferenceStore};
//! use gestura_core::GestureDetector;
//!
//! let handle = GestureLoop::spawn(
//!     GestureDetector::default(),
//!     PreferenceStore::default(),
//!     |d: Detected| println!("{}", d.gesture.name()),
//! )?;
//! let input = handle.sender();
//! // feed platform events with `input.motion(event)`
//! # drop(input);
//! let stats = handle.shutdown()?;
//! println!("{} gestures", stats.gestures);
//! # Ok::<(), gestura_runtime::LoopError>(())
//! ```

pub mod dispatcher;
pub mod launch;
pub mod logging;
pub mod preferences;
pub mod settings;
pub mod timer;
pub mod trace;

pub use dispatcher::{GestureLoop, Input, InputSender, LoopError, LoopHandle, LoopStats};
pub use launch::{Detected, GestureSink};
pub use logging::LogFormat;
pub use preferences::PreferenceStore;
pub use settings::{Settings, SettingsError};
pub use timer::{CancellationSource, CancellationToken, OneShot};
pub use trace::{
    ReplayedGesture, Replayer, SCHEMA_VERSION, TraceError, TraceFile, TraceRecord, TraceWriter,
    replay, replay_events,
};
