#![forbid(unsafe_code)]

//! The single-consumer gesture loop.
//!
//! [`GestureLoop`] owns a [`GestureDetector`] and drains one queue of
//! [`Input`]s: motion events from the platform, screen changes, and
//! long-press expirations posted by its own [`OneShot`] timers. Because the
//! timer reports through the same queue, the long-press/lift race is decided
//! by queue order on the loop thread and needs no lock:
//!
//! - a timer that fires after the lift carries a stale episode id and is
//!   discarded by the detector;
//! - a timer that fires before the lift emits `LONG_CLICK` and the lift is
//!   then a no-op.
//!
//! # Lifecycle
//!
//! [`GestureLoop::run`] returns when it receives [`Input::Shutdown`] or when
//! every [`InputSender`] has been dropped. [`GestureLoop::spawn`] runs it on a
//! dedicated thread.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use gestura_core::{EpisodeId, Gesture, GestureDetector, MotionEvent, ScreenGeometry, TimerCommand};

use crate::launch::{Detected, GestureSink};
use crate::preferences::PreferenceStore;
use crate::timer::OneShot;

/// Messages consumed by the gesture loop.
#[derive(Debug, Clone)]
pub enum Input {
    Motion(MotionEvent),
    /// The long-press timer armed for `episode` elapsed.
    LongPressElapsed { episode: EpisodeId },
    /// Screen size or system insets changed.
    Screen(ScreenGeometry),
    Shutdown,
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub motion_events: u64,
    pub gestures: u64,
    pub timers_armed: u64,
    /// Timer expirations that produced no gesture (stale or moved finger).
    pub stale_timeouts: u64,
}

/// Errors from driving the loop.
#[derive(Debug)]
pub enum LoopError {
    /// The loop has exited; the input was not delivered.
    Disconnected,
    /// The loop thread could not be started.
    Spawn(std::io::Error),
    /// The loop thread panicked.
    Panicked,
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "gesture loop is not running"),
            Self::Spawn(e) => write!(f, "failed to spawn gesture loop: {e}"),
            Self::Panicked => write!(f, "gesture loop panicked"),
        }
    }
}

impl std::error::Error for LoopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            Self::Disconnected | Self::Panicked => None,
        }
    }
}

// ---------------------------------------------------------------------------
// InputSender
// ---------------------------------------------------------------------------

/// Producer handle for the loop's queue.
///
/// When the last clone is dropped the loop shuts down after draining what
/// was already queued.
pub struct InputSender {
    tx: mpsc::Sender<Input>,
    live: Arc<AtomicUsize>,
}

impl InputSender {
    fn new(tx: mpsc::Sender<Input>) -> Self {
        Self {
            tx,
            live: Arc::new(AtomicUsize::new(1)),
        }
    }

    pub fn send(&self, input: Input) -> Result<(), LoopError> {
        self.tx.send(input).map_err(|_| LoopError::Disconnected)
    }

    pub fn motion(&self, event: MotionEvent) -> Result<(), LoopError> {
        self.send(Input::Motion(event))
    }

    pub fn screen(&self, screen: ScreenGeometry) -> Result<(), LoopError> {
        self.send(Input::Screen(screen))
    }

    pub fn shutdown(&self) -> Result<(), LoopError> {
        self.send(Input::Shutdown)
    }
}

impl Clone for InputSender {
    fn clone(&self) -> Self {
        self.live.fetch_add(1, Ordering::AcqRel);
        Self {
            tx: self.tx.clone(),
            live: Arc::clone(&self.live),
        }
    }
}

impl Drop for InputSender {
    fn drop(&mut self) {
        if self.live.fetch_sub(1, Ordering::AcqRel) == 1 {
            let _ = self.tx.send(Input::Shutdown);
        }
    }
}

impl fmt::Debug for InputSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputSender")
            .field("live", &self.live.load(Ordering::Acquire))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// GestureLoop
// ---------------------------------------------------------------------------

/// Drives a detector from a queue and forwards gestures to a sink.
pub struct GestureLoop<S> {
    detector: GestureDetector,
    preferences: PreferenceStore,
    sink: S,
    rx: mpsc::Receiver<Input>,
    /// Handed to timers only; does not keep the loop alive.
    timer_tx: mpsc::Sender<Input>,
    timer: Option<(EpisodeId, OneShot)>,
    stats: LoopStats,
}

impl<S: GestureSink> GestureLoop<S> {
    /// Create a loop and the first sender for its queue.
    pub fn new(
        detector: GestureDetector,
        preferences: PreferenceStore,
        sink: S,
    ) -> (Self, InputSender) {
        let (tx, rx) = mpsc::channel();
        let sender = InputSender::new(tx.clone());
        let this = Self {
            detector,
            preferences,
            sink,
            rx,
            timer_tx: tx,
            timer: None,
            stats: LoopStats::default(),
        };
        (this, sender)
    }

    #[must_use]
    pub fn detector(&self) -> &GestureDetector {
        &self.detector
    }

    #[must_use]
    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Process inputs until shutdown. Returns the final counters.
    pub fn run(mut self) -> LoopStats {
        tracing::debug!("gesture loop started");
        while let Ok(input) = self.rx.recv() {
            if !self.handle(input) {
                break;
            }
        }
        self.disarm_any();
        tracing::debug!(stats = ?self.stats, "gesture loop stopped");
        self.stats
    }

    /// Handle a single input. Returns `false` on shutdown.
    pub fn handle(&mut self, input: Input) -> bool {
        match input {
            Input::Motion(event) => {
                self.stats.motion_events += 1;
                self.detector.set_preferences(self.preferences.load());
                let detection = self.detector.on_motion_event(&event);
                if let Some(command) = detection.timer {
                    self.apply_timer(command, &event);
                }
                if let Some(gesture) = detection.gesture {
                    self.emit(gesture);
                }
            }
            Input::LongPressElapsed { episode } => {
                if self.timer.as_ref().is_some_and(|(armed, _)| *armed == episode) {
                    self.timer = None;
                }
                match self.detector.on_long_press_timeout(episode) {
                    Some(gesture) => self.emit(gesture),
                    None => self.stats.stale_timeouts += 1,
                }
            }
            Input::Screen(screen) => {
                tracing::debug!(width = screen.width, height = screen.height, "screen updated");
                self.detector.set_screen(screen);
            }
            Input::Shutdown => return false,
        }
        true
    }

    fn emit(&mut self, gesture: Gesture) {
        self.stats.gestures += 1;
        self.sink.launch(Detected {
            gesture,
            episode: self.detector.episode(),
        });
    }

    fn apply_timer(&mut self, command: TimerCommand, event: &MotionEvent) {
        match command {
            TimerCommand::Arm { episode, deadline } => {
                self.disarm_any();
                let delay = deadline.saturating_sub(event.event_time);
                let tx = self.timer_tx.clone();
                match OneShot::spawn(delay, move || {
                    let _ = tx.send(Input::LongPressElapsed { episode });
                }) {
                    Ok(timer) => {
                        self.stats.timers_armed += 1;
                        tracing::trace!(episode, ?delay, "long-press timer armed");
                        self.timer = Some((episode, timer));
                    }
                    Err(e) => {
                        // lift-time detection still reports LONG_CLICK
                        tracing::warn!(episode, error = %e, "failed to arm long-press timer");
                    }
                }
            }
            TimerCommand::Disarm { episode } => {
                if self.timer.as_ref().is_some_and(|(armed, _)| *armed == episode) {
                    self.disarm_any();
                }
            }
        }
    }

    fn disarm_any(&mut self) {
        if let Some((episode, timer)) = self.timer.take() {
            tracing::trace!(episode, "long-press timer disarmed");
            timer.cancel();
        }
    }
}

impl<S: GestureSink + Send + 'static> GestureLoop<S> {
    /// Run the loop on a dedicated thread.
    pub fn spawn(
        detector: GestureDetector,
        preferences: PreferenceStore,
        sink: S,
    ) -> Result<LoopHandle, LoopError> {
        let (this, sender) = Self::new(detector, preferences, sink);
        let thread = thread::Builder::new()
            .name("gestura-loop".into())
            .spawn(move || this.run())
            .map_err(LoopError::Spawn)?;
        Ok(LoopHandle { sender, thread })
    }
}

/// Handle to a loop running on its own thread.
#[derive(Debug)]
pub struct LoopHandle {
    sender: InputSender,
    thread: thread::JoinHandle<LoopStats>,
}

impl LoopHandle {
    /// A new producer for the loop's queue.
    pub fn sender(&self) -> InputSender {
        self.sender.clone()
    }

    /// Request shutdown and wait for the loop to exit.
    pub fn shutdown(self) -> Result<LoopStats, LoopError> {
        // already exited is fine: join reports the outcome
        let _ = self.sender.shutdown();
        drop(self.sender);
        self.thread.join().map_err(|_| LoopError::Panicked)
    }
}
