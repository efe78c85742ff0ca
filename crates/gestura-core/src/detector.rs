#![forbid(unsafe_code)]

//! Synchronous gesture detector.
//!
//! [`GestureDetector`] owns the per-episode state (path tracker, episode id,
//! phase) and the classifier. It never sleeps and never spawns: timing is
//! expressed as [`TimerCommand`]s that the caller executes, and an elapsed
//! long-press timer is reported back through
//! [`GestureDetector::on_long_press_timeout`].
//!
//! # Episode lifecycle
//!
//! ```text
//!            Down                 Up (classify)
//!   Idle ─────────────▶ Active ─────────────────▶ Idle
//!    ▲                   │  │
//!    └──── Cancel ───────┘  │ long-press timeout (qualifies)
//!                           ▼
//!                       LongPressed ──Up──▶ Idle (nothing emitted)
//! ```
//!
//! # Invariants
//!
//! 1. At most one gesture is emitted per episode.
//! 2. A timeout carrying a stale episode id never emits.
//! 3. Every `Arm` is followed by exactly one `Disarm` for the same episode,
//!    or superseded by the `Arm` of the next episode.

use std::time::Duration;

use crate::classifier::GestureClassifier;
use crate::config::{ClassifierConfig, GesturePreferences};
use crate::event::{MotionAction, MotionEvent};
use crate::geometry::ScreenGeometry;
use crate::gesture::Gesture;
use crate::path::PathTracker;

/// Monotonically increasing episode identifier.
pub type EpisodeId = u64;

/// Instruction for the long-press timer owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start the timer for `episode`, replacing any armed timer.
    Arm {
        episode: EpisodeId,
        /// Absolute deadline on the event clock.
        deadline: Duration,
    },
    /// Stop the timer for `episode` if it is still armed.
    Disarm { episode: EpisodeId },
}

/// Result of feeding one event to the detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Detection {
    pub gesture: Option<Gesture>,
    pub timer: Option<TimerCommand>,
}

impl Detection {
    const NONE: Self = Self {
        gesture: None,
        timer: None,
    };

    fn timer(command: TimerCommand) -> Self {
        Self {
            gesture: None,
            timer: Some(command),
        }
    }
}

/// Where the current episode stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No finger down.
    Idle,
    /// Tracking an episode that may still emit.
    Active,
    /// `LONG_CLICK` already emitted; waiting for the last finger to lift.
    LongPressed,
}

/// Turns a motion stream into gestures.
#[derive(Debug, Clone)]
pub struct GestureDetector {
    classifier: GestureClassifier,
    tracker: PathTracker,
    preferences: GesturePreferences,
    episode: EpisodeId,
    phase: Phase,
    down_time: Duration,
}

impl GestureDetector {
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            classifier: GestureClassifier::new(config),
            tracker: PathTracker::new(),
            preferences: GesturePreferences::default(),
            episode: 0,
            phase: Phase::Idle,
            down_time: Duration::ZERO,
        }
    }

    /// Builder: set the initial preferences.
    #[must_use]
    pub fn with_preferences(mut self, preferences: GesturePreferences) -> Self {
        self.preferences = preferences;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        self.classifier.config()
    }

    pub fn set_config(&mut self, config: ClassifierConfig) {
        self.classifier.set_config(config);
    }

    /// Apply a new screen size or inset set (rotation, resize).
    pub fn set_screen(&mut self, screen: ScreenGeometry) {
        let mut config = *self.classifier.config();
        config.screen = screen;
        self.classifier.set_config(config);
    }

    #[must_use]
    pub fn preferences(&self) -> GesturePreferences {
        self.preferences
    }

    /// Preferences used by the next classification.
    pub fn set_preferences(&mut self, preferences: GesturePreferences) {
        self.preferences = preferences;
    }

    #[must_use]
    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    #[must_use]
    pub fn tracker(&self) -> &PathTracker {
        &self.tracker
    }

    /// Id of the current (or most recent) episode; `0` before the first.
    #[must_use]
    pub fn episode(&self) -> EpisodeId {
        self.episode
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Feed one motion event.
    pub fn on_motion_event(&mut self, event: &MotionEvent) -> Detection {
        match event.action {
            MotionAction::Down => self.begin_episode(event),
            _ if self.phase == Phase::Idle => {
                tracing::trace!(action = ?event.action, "event outside episode ignored");
                Detection::NONE
            }
            MotionAction::PointerDown | MotionAction::Move | MotionAction::PointerUp => {
                if self.phase == Phase::Active {
                    self.tracker.fold_event(event);
                }
                Detection::NONE
            }
            MotionAction::Cancel => {
                tracing::debug!(episode = self.episode, reason = "cancelled", "episode dropped");
                self.phase = Phase::Idle;
                Detection::timer(TimerCommand::Disarm {
                    episode: self.episode,
                })
            }
            MotionAction::Up => self.end_episode(event),
        }
    }

    /// Report that the long-press timer armed for `episode` elapsed.
    pub fn on_long_press_timeout(&mut self, episode: EpisodeId) -> Option<Gesture> {
        if episode != self.episode || self.phase != Phase::Active {
            tracing::trace!(episode, current = self.episode, "stale long-press timeout");
            return None;
        }
        if !self.classifier.qualifies_for_long_press(&self.tracker) {
            tracing::trace!(episode, "long-press timeout without stationary touch");
            return None;
        }
        self.phase = Phase::LongPressed;
        let gesture = Gesture::LongClick;
        tracing::info!(gesture = %gesture, episode, "detected gesture");
        Some(gesture)
    }

    fn begin_episode(&mut self, event: &MotionEvent) -> Detection {
        if self.phase == Phase::Active {
            tracing::debug!(episode = self.episode, reason = "missing_up", "episode dropped");
        }
        self.episode += 1;
        self.phase = Phase::Active;
        self.down_time = event.down_time;
        self.tracker.reset();
        self.tracker.fold_event(event);

        Detection::timer(TimerCommand::Arm {
            episode: self.episode,
            deadline: self
                .down_time
                .saturating_add(self.config().metrics.long_press_timeout),
        })
    }

    fn end_episode(&mut self, event: &MotionEvent) -> Detection {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let disarm = TimerCommand::Disarm {
            episode: self.episode,
        };

        if phase != Phase::Active {
            return Detection::timer(disarm);
        }

        self.tracker.fold_event(event);
        let gesture = self.classifier.classify(
            &self.tracker,
            self.down_time,
            event.event_time,
            &self.preferences,
        );

        match gesture {
            Some(gesture) => {
                tracing::info!(gesture = %gesture, episode = self.episode, "detected gesture");
            }
            None => tracing::trace!(episode = self.episode, "episode produced no gesture"),
        }

        Detection {
            gesture,
            timer: Some(disarm),
        }
    }
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Insets, Vector};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn ev(action: MotionAction, down: u64, at: u64, points: &[(u32, f32, f32)]) -> MotionEvent {
        points.iter().fold(
            MotionEvent::new(action, ms(down), ms(at)),
            |event, &(id, x, y)| event.with_pointer(id, Vector::new(x, y)),
        )
    }

    fn detector() -> GestureDetector {
        GestureDetector::new(ClassifierConfig::for_screen(ScreenGeometry::new(
            1000.0, 2000.0,
        )))
    }

    /// Feed events and collect every emitted gesture name.
    fn run(det: &mut GestureDetector, events: &[MotionEvent]) -> Vec<&'static str> {
        events
            .iter()
            .filter_map(|e| det.on_motion_event(e).gesture)
            .map(Gesture::name)
            .collect()
    }

    #[test]
    fn down_arms_and_up_disarms() {
        let mut det = detector();
        let down = det.on_motion_event(&ev(MotionAction::Down, 10, 10, &[(0, 500.0, 1000.0)]));
        assert_eq!(
            down.timer,
            Some(TimerCommand::Arm {
                episode: 1,
                deadline: ms(410)
            })
        );
        assert_eq!(det.phase(), Phase::Active);

        let up = det.on_motion_event(&ev(MotionAction::Up, 10, 50, &[(0, 500.0, 1000.0)]));
        assert_eq!(up.timer, Some(TimerCommand::Disarm { episode: 1 }));
        assert_eq!(det.phase(), Phase::Idle);
    }

    #[test]
    fn straight_swipe_down() {
        let mut det = detector();
        let got = run(
            &mut det,
            &[
                ev(MotionAction::Down, 0, 0, &[(0, 500.0, 800.0)]),
                ev(MotionAction::Move, 0, 40, &[(0, 500.0, 950.0)]),
                ev(MotionAction::Move, 0, 80, &[(0, 500.0, 1100.0)]),
                ev(MotionAction::Up, 0, 120, &[(0, 500.0, 1200.0)]),
            ],
        );
        assert_eq!(got, ["SWIPE_DOWN"]);
    }

    #[test]
    fn bulging_swipe_is_larger() {
        let mut det = detector();
        let got = run(
            &mut det,
            &[
                ev(MotionAction::Down, 0, 0, &[(0, 500.0, 800.0)]),
                ev(MotionAction::Move, 0, 60, &[(0, 800.0, 1000.0)]),
                ev(MotionAction::Up, 0, 120, &[(0, 500.0, 1200.0)]),
            ],
        );
        assert_eq!(got, ["SWIPE_LARGER"]);
    }

    #[test]
    fn history_counts_towards_the_bulge() {
        let mut det = detector();
        let down = ev(MotionAction::Down, 0, 0, &[(0, 500.0, 800.0)]);
        let batched = MotionEvent::new(MotionAction::Move, ms(0), ms(80)).with_history(
            0,
            [Vector::new(700.0, 900.0), Vector::new(800.0, 1000.0)],
            Vector::new(600.0, 1100.0),
        );
        let up = ev(MotionAction::Up, 0, 120, &[(0, 500.0, 1200.0)]);
        assert_eq!(run(&mut det, &[down, batched, up]), ["SWIPE_LARGER"]);
    }

    #[test]
    fn two_finger_swipes() {
        let mut det = detector();
        let together = run(
            &mut det,
            &[
                ev(MotionAction::Down, 0, 0, &[(0, 400.0, 1400.0)]),
                ev(MotionAction::PointerDown, 0, 10, &[(0, 400.0, 1400.0), (1, 600.0, 1400.0)]),
                ev(MotionAction::Move, 0, 80, &[(0, 400.0, 1000.0), (1, 600.0, 1000.0)]),
                ev(MotionAction::PointerUp, 0, 140, &[(0, 400.0, 900.0), (1, 600.0, 900.0)]),
                ev(MotionAction::Up, 0, 150, &[(0, 400.0, 900.0)]),
            ],
        );
        assert_eq!(together, ["SWIPE_UP_DOUBLE"]);

        let apart = run(
            &mut det,
            &[
                ev(MotionAction::Down, 1000, 1000, &[(0, 400.0, 1400.0)]),
                ev(MotionAction::PointerDown, 1000, 1010, &[(0, 400.0, 1400.0), (1, 600.0, 1400.0)]),
                ev(MotionAction::Move, 1000, 1080, &[(0, 400.0, 900.0), (1, 300.0, 1400.0)]),
                ev(MotionAction::Up, 1000, 1150, &[(0, 400.0, 900.0)]),
            ],
        );
        assert!(apart.is_empty());
    }

    #[test]
    fn tap_then_swipe_is_combo() {
        let config = ClassifierConfig::for_screen(
            ScreenGeometry::new(1000.0, 2000.0).with_insets(Insets::NONE),
        );
        let mut det = GestureDetector::new(config).with_preferences(GesturePreferences {
            edge_swipe: false,
            ..GesturePreferences::default()
        });
        let got = run(
            &mut det,
            &[
                ev(MotionAction::Down, 0, 0, &[(0, 50.0, 50.0)]),
                ev(MotionAction::Up, 0, 40, &[(0, 50.0, 50.0)]),
                ev(MotionAction::Down, 190, 190, &[(0, 500.0, 500.0)]),
                ev(MotionAction::Up, 190, 300, &[(0, 500.0, 900.0)]),
            ],
        );
        assert_eq!(got, ["TAP_AND_SWIPE_DOWN"]);
    }

    #[test]
    fn long_press_timer_emits_once() {
        let mut det = detector();
        det.on_motion_event(&ev(MotionAction::Down, 0, 0, &[(0, 500.0, 1000.0)]));
        assert_eq!(det.on_long_press_timeout(1), Some(Gesture::LongClick));
        assert_eq!(det.phase(), Phase::LongPressed);
        // a second delivery and the final lift stay silent
        assert_eq!(det.on_long_press_timeout(1), None);
        let up = det.on_motion_event(&ev(MotionAction::Up, 0, 900, &[(0, 500.0, 1000.0)]));
        assert_eq!(up.gesture, None);
        assert_eq!(up.timer, Some(TimerCommand::Disarm { episode: 1 }));
    }

    #[test]
    fn late_up_without_timer_still_long_clicks() {
        let mut det = detector();
        let got = run(
            &mut det,
            &[
                ev(MotionAction::Down, 0, 0, &[(0, 500.0, 1000.0)]),
                ev(MotionAction::Up, 0, 600, &[(0, 502.0, 1001.0)]),
            ],
        );
        assert_eq!(got, ["LONG_CLICK"]);
        // the timer message that raced the lift is now stale
        assert_eq!(det.on_long_press_timeout(1), None);
    }

    #[test]
    fn stale_timer_from_previous_episode_is_ignored() {
        let mut det = detector();
        det.on_motion_event(&ev(MotionAction::Down, 0, 0, &[(0, 500.0, 1000.0)]));
        det.on_motion_event(&ev(MotionAction::Up, 0, 50, &[(0, 500.0, 1000.0)]));
        det.on_motion_event(&ev(MotionAction::Down, 500, 500, &[(0, 500.0, 1000.0)]));
        assert_eq!(det.on_long_press_timeout(1), None);
        assert_eq!(det.on_long_press_timeout(2), Some(Gesture::LongClick));
    }

    #[test]
    fn moving_finger_never_long_presses() {
        let mut det = detector();
        det.on_motion_event(&ev(MotionAction::Down, 0, 0, &[(0, 500.0, 1000.0)]));
        det.on_motion_event(&ev(MotionAction::Move, 0, 200, &[(0, 500.0, 1200.0)]));
        assert_eq!(det.on_long_press_timeout(1), None);
        assert_eq!(det.phase(), Phase::Active);
    }

    #[test]
    fn cancel_suppresses_everything() {
        let mut det = detector();
        det.on_motion_event(&ev(MotionAction::Down, 0, 0, &[(0, 500.0, 800.0)]));
        det.on_motion_event(&ev(MotionAction::Move, 0, 60, &[(0, 500.0, 1100.0)]));
        let cancel = det.on_motion_event(&ev(MotionAction::Cancel, 0, 70, &[]));
        assert_eq!(cancel.timer, Some(TimerCommand::Disarm { episode: 1 }));
        assert_eq!(det.on_long_press_timeout(1), None);
        let up = det.on_motion_event(&ev(MotionAction::Up, 0, 120, &[(0, 500.0, 1200.0)]));
        assert_eq!(up, Detection::default());
    }

    #[test]
    fn events_before_down_are_ignored() {
        let mut det = detector();
        let got = det.on_motion_event(&ev(MotionAction::Move, 0, 10, &[(0, 1.0, 1.0)]));
        assert_eq!(got, Detection::default());
        assert!(det.tracker().is_empty());
        assert_eq!(det.episode(), 0);
    }

    #[test]
    fn missing_up_starts_fresh_episode() {
        let mut det = detector();
        det.on_motion_event(&ev(MotionAction::Down, 0, 0, &[(0, 500.0, 800.0)]));
        det.on_motion_event(&ev(MotionAction::Move, 0, 50, &[(0, 500.0, 1300.0)]));
        let down = det.on_motion_event(&ev(MotionAction::Down, 300, 300, &[(4, 200.0, 900.0)]));
        assert!(matches!(down.timer, Some(TimerCommand::Arm { episode: 2, .. })));
        assert_eq!(det.tracker().len(), 1);
        assert!(det.tracker().get(4).is_some_and(|p| p.is_main()));
    }

    #[test]
    fn preferences_apply_to_next_classification() {
        let mut det = detector();
        let swipe = [
            ev(MotionAction::Down, 0, 0, &[(0, 60.0, 800.0)]),
            ev(MotionAction::Up, 0, 120, &[(0, 60.0, 1300.0)]),
        ];
        assert_eq!(run(&mut det, &swipe), ["SWIPE_DOWN_LEFT_EDGE"]);

        det.set_preferences(GesturePreferences {
            edge_swipe: false,
            ..det.preferences()
        });
        assert_eq!(run(&mut det, &swipe), ["SWIPE_DOWN"]);
    }

    #[test]
    fn set_screen_updates_geometry() {
        let mut det = detector();
        det.set_screen(ScreenGeometry::new(2000.0, 1000.0));
        assert_eq!(det.config().screen.width, 2000.0);
        assert_eq!(det.config().metrics, ClassifierConfig::default().metrics);
    }
}
