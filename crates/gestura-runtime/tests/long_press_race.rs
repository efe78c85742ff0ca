//! End-to-end timing of the long-press timer against the real loop thread.

use std::sync::mpsc;
use std::time::Duration;

use gestura_core::{ClassifierConfig, Gesture, GestureDetector, MotionAction, MotionEvent, Vector};
use gestura_runtime::{Detected, GestureLoop, Input, PreferenceStore};

fn ev(action: MotionAction, down: u64, at: u64, x: f32, y: f32) -> MotionEvent {
    MotionEvent::new(action, Duration::from_millis(down), Duration::from_millis(at))
        .with_pointer(0, Vector::new(x, y))
}

fn detector(long_press_ms: u64) -> GestureDetector {
    let mut config = ClassifierConfig::default();
    config.metrics.long_press_timeout = Duration::from_millis(long_press_ms);
    GestureDetector::new(config)
}

#[test]
fn held_touch_fires_long_click_before_lift() {
    let (tx, rx) = mpsc::channel::<Detected>();
    let handle =
        GestureLoop::spawn(detector(80), PreferenceStore::default(), tx).expect("spawn loop");
    let input = handle.sender();

    input
        .motion(ev(MotionAction::Down, 0, 0, 500.0, 1000.0))
        .expect("down");
    let detected = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("long click from timer");
    assert_eq!(detected.gesture, Gesture::LongClick);
    assert_eq!(detected.episode, 1);

    // the lift after a long press emits nothing more
    input
        .motion(ev(MotionAction::Up, 0, 2_000, 500.0, 1000.0))
        .expect("up");
    drop(input);
    let stats = handle.shutdown().expect("join");
    assert_eq!(stats.gestures, 1);
    assert_eq!(stats.timers_armed, 1);
    assert!(rx.try_recv().is_err());
}

#[test]
fn quick_swipe_disarms_the_timer() {
    let (tx, rx) = mpsc::channel::<Detected>();
    let handle =
        GestureLoop::spawn(detector(80), PreferenceStore::default(), tx).expect("spawn loop");
    let input = handle.sender();

    input
        .motion(ev(MotionAction::Down, 0, 0, 500.0, 1500.0))
        .expect("down");
    input
        .motion(ev(MotionAction::Up, 0, 60, 500.0, 900.0))
        .expect("up");

    let detected = rx.recv_timeout(Duration::from_secs(5)).expect("swipe");
    assert_eq!(detected.gesture.name(), "SWIPE_UP");

    // well past the timer delay: no late long click
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    drop(input);
    let stats = handle.shutdown().expect("join");
    assert_eq!(stats.gestures, 1);
    assert_eq!(stats.motion_events, 2);
}

#[test]
fn late_timeout_after_lift_is_discarded() {
    let mut seen = Vec::new();
    let (mut gesture_loop, _input) = GestureLoop::new(
        detector(400),
        PreferenceStore::default(),
        |d: Detected| seen.push(d),
    );

    assert!(gesture_loop.handle(Input::Motion(ev(MotionAction::Down, 0, 0, 500.0, 1000.0))));
    assert!(gesture_loop.handle(Input::Motion(ev(MotionAction::Up, 0, 120, 500.0, 1000.0))));
    // timer thread lost the race and posted after the lift
    assert!(gesture_loop.handle(Input::LongPressElapsed { episode: 1 }));
    assert!(!gesture_loop.handle(Input::Shutdown));

    let stats = gesture_loop.stats();
    assert_eq!(stats.gestures, 0);
    assert_eq!(stats.stale_timeouts, 1);
    drop(gesture_loop);
    assert!(seen.is_empty());
}

#[test]
fn dropping_every_sender_stops_the_loop() {
    let (tx, _rx) = mpsc::channel::<Gesture>();
    let (gesture_loop, input) = GestureLoop::new(detector(400), PreferenceStore::default(), tx);
    let extra = input.clone();
    let thread = std::thread::spawn(move || gesture_loop.run());
    drop(input);
    drop(extra);
    let stats = thread.join().expect("loop thread");
    assert_eq!(stats.motion_events, 0);
}
