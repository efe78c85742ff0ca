//! Serde representation of gestures and configuration.

use gestura_core::{ClassifierConfig, Direction, Edge, Gesture, GesturePreferences, Swipe};

#[test]
fn gestures_serialize_as_ids() {
    let edge = Gesture::from(Swipe::new(Direction::Left).with_edge(Edge::Bottom));
    assert_eq!(
        serde_json::to_string(&edge).expect("serialize"),
        "\"action.left_bottom\""
    );
    assert_eq!(
        serde_json::to_string(&Gesture::LongClick).expect("serialize"),
        "\"action.long_click\""
    );
}

#[test]
fn every_id_deserializes() {
    for gesture in Gesture::ALL {
        let json = serde_json::to_string(&gesture).expect("serialize");
        let back: Gesture = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, gesture);
    }
}

#[test]
fn unknown_id_is_an_error() {
    let err = serde_json::from_str::<Gesture>("\"action.slash\"").expect_err("unknown id");
    assert!(err.to_string().contains("action.slash"), "{err}");
}

#[test]
fn metrics_use_millisecond_fields() {
    let json = serde_json::to_value(ClassifierConfig::default()).expect("serialize");
    assert_eq!(json["metrics"]["long_press_timeout_ms"], 400);
    assert_eq!(json["metrics"]["tap_timeout_ms"], 100);
    assert_eq!(json["metrics"]["double_tap_timeout_ms"], 300);
}

#[test]
fn partial_preferences_fill_defaults() {
    let prefs: GesturePreferences =
        serde_json::from_str(r#"{ "edge_swipe": false }"#).expect("deserialize");
    assert!(!prefs.edge_swipe);
    assert!(prefs.double_swipe);
    assert_eq!(prefs.edge_width_percent, 15);
}
