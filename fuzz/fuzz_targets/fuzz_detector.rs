#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use gestura_core::{
    EpisodeId, GestureDetector, GesturePreferences, MotionAction, MotionEvent, Phase,
    TimerCommand, Vector,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Step {
    Down { x: i16, y: i16 },
    PointerDown { id: u8, x: i16, y: i16 },
    Move { id: u8, history: Vec<(i16, i16)>, x: i16, y: i16 },
    /// Unconstrained floats, including NaN and infinities.
    RawMove { id: u8, x: f32, y: f32 },
    PointerUp { id: u8 },
    Up,
    Cancel,
    Wait { ms: u16 },
    /// Deliver the armed timer, or a stale one.
    Timeout { stale: bool },
    Prefs { double_swipe: bool, edge_swipe: bool, edge_width_percent: u8 },
}

#[derive(Debug, Arbitrary)]
struct Session {
    steps: Vec<Step>,
}

fn v(x: i16, y: i16) -> Vector {
    Vector::new(f32::from(x).abs() * 0.1, f32::from(y).abs() * 0.1)
}

fuzz_target!(|session: Session| {
    let mut detector = GestureDetector::default();
    let mut now = Duration::ZERO;
    let mut down = Duration::ZERO;
    let mut armed: Option<EpisodeId> = None;
    let mut emitted: Vec<EpisodeId> = Vec::new();

    for step in session.steps.into_iter().take(512) {
        let event = move |action| MotionEvent::new(action, down, now);
        let detection = match step {
            Step::Down { x, y } => {
                down = now;
                detector.on_motion_event(
                    &MotionEvent::new(MotionAction::Down, down, now).with_pointer(0, v(x, y)),
                )
            }
            Step::PointerDown { id, x, y } => detector.on_motion_event(
                &event(MotionAction::PointerDown).with_pointer(u32::from(id % 5), v(x, y)),
            ),
            Step::Move { id, history, x, y } => detector.on_motion_event(
                &event(MotionAction::Move).with_history(
                    u32::from(id % 5),
                    history.into_iter().take(16).map(|(hx, hy)| v(hx, hy)),
                    v(x, y),
                ),
            ),
            Step::RawMove { id, x, y } => detector.on_motion_event(
                &event(MotionAction::Move).with_pointer(u32::from(id % 5), Vector::new(x, y)),
            ),
            Step::PointerUp { id } => detector.on_motion_event(
                &event(MotionAction::PointerUp).with_pointer(u32::from(id % 5), Vector::ZERO),
            ),
            Step::Up => detector.on_motion_event(&event(MotionAction::Up)),
            Step::Cancel => detector.on_motion_event(&event(MotionAction::Cancel)),
            Step::Wait { ms } => {
                now += Duration::from_millis(u64::from(ms));
                continue;
            }
            Step::Timeout { stale } => {
                let episode = match (armed, stale) {
                    (Some(episode), false) => episode,
                    (Some(episode), true) => episode.wrapping_sub(1),
                    (None, _) => detector.episode(),
                };
                if let Some(gesture) = detector.on_long_press_timeout(episode) {
                    assert_eq!(episode, detector.episode(), "stale timeout emitted {gesture}");
                    emitted.push(episode);
                }
                continue;
            }
            Step::Prefs {
                double_swipe,
                edge_swipe,
                edge_width_percent,
            } => {
                detector.set_preferences(GesturePreferences {
                    double_swipe,
                    edge_swipe,
                    edge_width_percent,
                });
                continue;
            }
        };

        match detection.timer {
            Some(TimerCommand::Arm { episode, .. }) => armed = Some(episode),
            Some(TimerCommand::Disarm { episode }) => {
                if armed == Some(episode) {
                    armed = None;
                }
            }
            None => {}
        }
        if detection.gesture.is_some() {
            emitted.push(detector.episode());
            assert_ne!(detector.phase(), Phase::Active, "episode still active after emitting");
        }
    }

    let total = emitted.len();
    emitted.dedup();
    assert_eq!(emitted.len(), total, "an episode emitted more than one gesture");
});
