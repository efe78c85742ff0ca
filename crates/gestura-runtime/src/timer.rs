#![forbid(unsafe_code)]

//! Cancellable one-shot timers.
//!
//! [`OneShot`] runs a callback once after a delay on its own thread unless it
//! is cancelled first. It is the only timing primitive the gesture loop needs:
//! the long-press timer is armed on first touch and disarmed when the episode
//! resolves.
//!
//! Cancellation is cooperative. A timer that already fired cannot be recalled;
//! callers that race a timer against other input must be able to discard a
//! late callback (the gesture loop does this with episode ids).
//!
//! # Example
//!
//! ```
//! use gestura_runtime::timer::OneShot;
//! use std::sync::mpsc;
//! use std::time::Duration;
//!
//! let (tx, rx) = mpsc::channel();
//! let timer = OneShot::spawn(Duration::from_millis(5), move || {
//!     let _ = tx.send("fired");
//! })
//! .expect("spawn timer");
//! assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok("fired"));
//! assert!(timer.has_fired());
//! ```

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use web_time::{Duration, Instant};

/// The waiting side of a timer: observes cancellation.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<CancellationInner>,
}

/// The control side of a timer: requests cancellation.
///
/// Dropping the source does **not** cancel its tokens.
pub struct CancellationSource {
    inner: Arc<CancellationInner>,
}

struct CancellationInner {
    cancelled: AtomicBool,
    notify: (Mutex<()>, Condvar),
}

impl CancellationSource {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancellationInner {
                cancelled: AtomicBool::new(false),
                notify: (Mutex::new(()), Condvar::new()),
            }),
        }
    }

    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Request cancellation and wake every waiting token.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        let (lock, cvar) = &self.inner.notify;
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Block until cancellation or until `duration` elapsed.
    ///
    /// Returns `true` if cancelled, `false` on timeout. Spurious wakeups are
    /// absorbed.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        let (lock, cvar) = &self.inner.notify;
        let mut guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        let start = Instant::now();
        let mut remaining = duration;
        loop {
            if self.is_cancelled() {
                return true;
            }
            let (next, result) = cvar
                .wait_timeout(guard, remaining)
                .unwrap_or_else(|e| e.into_inner());
            guard = next;
            if self.is_cancelled() {
                return true;
            }
            if result.timed_out() {
                return false;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            remaining = duration - elapsed;
        }
    }
}

/// A callback scheduled to run once after a delay.
///
/// Dropping the handle cancels the timer without joining its thread.
pub struct OneShot {
    source: CancellationSource,
    fired: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl OneShot {
    /// Schedule `fire` to run after `delay`.
    pub fn spawn<F>(delay: Duration, fire: F) -> io::Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let source = CancellationSource::new();
        let token = source.token();
        let fired = Arc::new(AtomicBool::new(false));
        let fired_flag = Arc::clone(&fired);

        let thread = thread::Builder::new()
            .name("gestura-timer".into())
            .spawn(move || {
                if token.wait_timeout(delay) {
                    return;
                }
                fired_flag.store(true, Ordering::Release);
                fire();
            })?;

        Ok(Self {
            source,
            fired,
            thread: Some(thread),
        })
    }

    /// Cancel the timer. Has no effect once it fired.
    pub fn cancel(&self) {
        self.source.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.source.is_cancelled()
    }

    /// Whether the callback started running.
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Cancel and wait for the timer thread to exit.
    pub fn cancel_and_join(mut self) {
        self.source.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for OneShot {
    fn drop(&mut self) {
        self.source.cancel();
    }
}

impl std::fmt::Debug for OneShot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneShot")
            .field("cancelled", &self.is_cancelled())
            .field("fired", &self.has_fired())
            .finish()
    }
}
