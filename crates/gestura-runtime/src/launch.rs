#![forbid(unsafe_code)]

//! Output side of the gesture loop.
//!
//! A [`GestureSink`] receives every gesture the loop detects, in completion
//! order. Resolving a gesture to an action and launching it is the
//! application's job.

use std::sync::mpsc;

use gestura_core::{EpisodeId, Gesture};

/// A detected gesture with the episode it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detected {
    pub gesture: Gesture,
    pub episode: EpisodeId,
}

/// Receives detected gestures.
pub trait GestureSink {
    fn launch(&mut self, detected: Detected);
}

impl<F> GestureSink for F
where
    F: FnMut(Detected),
{
    fn launch(&mut self, detected: Detected) {
        self(detected);
    }
}

impl GestureSink for mpsc::Sender<Detected> {
    fn launch(&mut self, detected: Detected) {
        if self.send(detected).is_err() {
            tracing::warn!(gesture = %detected.gesture, "gesture receiver dropped");
        }
    }
}

impl GestureSink for mpsc::Sender<Gesture> {
    fn launch(&mut self, detected: Detected) {
        if self.send(detected.gesture).is_err() {
            tracing::warn!(gesture = %detected.gesture, "gesture receiver dropped");
        }
    }
}

impl GestureSink for Vec<Detected> {
    fn launch(&mut self, detected: Detected) {
        self.push(detected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestura_core::Direction;

    fn detected(episode: EpisodeId) -> Detected {
        Detected {
            gesture: Gesture::swipe(Direction::Up),
            episode,
        }
    }

    #[test]
    fn closure_sink() {
        let mut seen = Vec::new();
        let mut sink = |d: Detected| seen.push(d.episode);
        sink.launch(detected(1));
        sink.launch(detected(2));
        assert_eq!(seen, [1, 2]);
    }

    #[test]
    fn channel_sinks() {
        let (tx, rx) = mpsc::channel::<Gesture>();
        let mut sink = tx;
        sink.launch(detected(3));
        assert_eq!(rx.recv(), Ok(Gesture::swipe(Direction::Up)));

        let (tx, rx) = mpsc::channel::<Detected>();
        let mut sink = tx;
        drop(rx);
        // a dropped receiver is logged, not fatal
        sink.launch(detected(4));
    }
}
