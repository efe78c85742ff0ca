#![no_main]

use gestura_core::GestureDetector;
use gestura_runtime::{TraceFile, replay};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed input must come back as an error, never a panic.
    let Ok(trace) = TraceFile::from_bytes(data) else {
        return;
    };
    let mut detector = GestureDetector::default();
    let replayed = replay(&mut detector, &trace);

    let mut episodes: Vec<_> = replayed.iter().map(|r| r.episode).collect();
    let total = episodes.len();
    episodes.dedup();
    assert_eq!(episodes.len(), total, "episode emitted twice");
});
