#![forbid(unsafe_code)]

//! Motion trace recording and deterministic replay.
//!
//! Records motion events and screen changes with millisecond timestamps to a
//! JSONL file (optionally gzip-compressed). [`replay`] feeds a trace through a
//! [`GestureDetector`] on a virtual clock, so long-press timing is exact and
//! reproducible.
//!
//! # Format
//!
//! Each line is a JSON object tagged by `event`. The first line is always a
//! `trace_header`; a `trace_summary` line is appended by
//! [`TraceWriter::finish`].
//!
//! ```text
//! {"event":"trace_header","schema_version":"gesture-trace-v1","session_name":"demo","screen":{...}}
//! {"event":"motion","ts_ms":0,"down_ms":0,"action":"down","pointers":[{"id":0,"position":{"x":500.0,"y":800.0}}]}
//! {"event":"motion","ts_ms":120,"down_ms":0,"action":"up","pointers":[...]}
//! {"event":"trace_summary","total_events":2,"total_duration_ms":120}
//! ```
//!
//! # Virtual clock
//!
//! A long-press timer armed during replay fires when the next record's
//! timestamp reaches its deadline, or at the end of the trace.

use std::fmt;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use gestura_core::{
    EpisodeId, Gesture, GestureDetector, MotionAction, MotionEvent, PointerSample,
    ScreenGeometry, TimerCommand,
};
use serde::{Deserialize, Serialize};

/// Current schema version for trace files.
pub const SCHEMA_VERSION: &str = "gesture-trace-v1";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A single line of a trace file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum TraceRecord {
    #[serde(rename = "trace_header")]
    Header {
        schema_version: String,
        session_name: String,
        screen: ScreenGeometry,
    },

    #[serde(rename = "motion")]
    Motion {
        ts_ms: u64,
        down_ms: u64,
        action: MotionAction,
        pointers: Vec<PointerSample>,
    },

    /// Screen size or insets changed.
    #[serde(rename = "screen")]
    Screen { ts_ms: u64, screen: ScreenGeometry },

    #[serde(rename = "trace_summary")]
    Summary {
        total_events: u64,
        total_duration_ms: u64,
    },
}

impl TraceRecord {
    /// Capture a motion event.
    #[must_use]
    pub fn from_motion(event: &MotionEvent) -> Self {
        Self::Motion {
            ts_ms: millis(event.event_time),
            down_ms: millis(event.down_time),
            action: event.action,
            pointers: event.pointers.clone(),
        }
    }

    /// The motion event this record captured, if it is a motion record.
    #[must_use]
    pub fn to_motion(&self) -> Option<MotionEvent> {
        match self {
            Self::Motion {
                ts_ms,
                down_ms,
                action,
                pointers,
            } => Some(MotionEvent {
                action: *action,
                down_time: Duration::from_millis(*down_ms),
                event_time: Duration::from_millis(*ts_ms),
                pointers: pointers.clone(),
            }),
            _ => None,
        }
    }

    /// Timestamp of event records.
    #[must_use]
    pub fn ts_ms(&self) -> Option<u64> {
        match self {
            Self::Motion { ts_ms, .. } | Self::Screen { ts_ms, .. } => Some(*ts_ms),
            Self::Header { .. } | Self::Summary { .. } => None,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when reading or writing traces.
#[derive(Debug)]
pub enum TraceError {
    Io(io::Error),
    /// A line is not a valid record.
    Json {
        line: usize,
        source: serde_json::Error,
    },
    /// The first record is not a `trace_header`.
    MissingHeader,
    /// The header names a schema this version cannot read.
    UnsupportedSchema(String),
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json { line, source } => write!(f, "invalid record on line {line}: {source}"),
            Self::MissingHeader => write!(f, "trace does not start with a trace_header record"),
            Self::UnsupportedSchema(v) => {
                write!(f, "unsupported trace schema `{v}` (expected `{SCHEMA_VERSION}`)")
            }
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json { source, .. } => Some(source),
            Self::MissingHeader | Self::UnsupportedSchema(_) => None,
        }
    }
}

impl From<io::Error> for TraceError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// TraceWriter
// ---------------------------------------------------------------------------

/// Writes trace records as JSONL.
pub struct TraceWriter<W: Write> {
    writer: BufWriter<W>,
    event_count: u64,
    first_ts_ms: Option<u64>,
    last_ts_ms: u64,
}

impl TraceWriter<std::fs::File> {
    /// Create a writer for an uncompressed `.jsonl` file.
    pub fn plain(
        path: impl AsRef<Path>,
        session_name: &str,
        screen: ScreenGeometry,
    ) -> Result<Self, TraceError> {
        let file = std::fs::File::create(path)?;
        Self::from_writer(file, session_name, screen)
    }
}

impl TraceWriter<flate2::write::GzEncoder<std::fs::File>> {
    /// Create a writer for a gzip-compressed `.jsonl.gz` file.
    pub fn gzip(
        path: impl AsRef<Path>,
        session_name: &str,
        screen: ScreenGeometry,
    ) -> Result<Self, TraceError> {
        let file = std::fs::File::create(path)?;
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::fast());
        Self::from_writer(encoder, session_name, screen)
    }
}

impl<W: Write> TraceWriter<W> {
    /// Wrap any writer and emit the header line.
    pub fn from_writer(
        writer: W,
        session_name: &str,
        screen: ScreenGeometry,
    ) -> Result<Self, TraceError> {
        let mut this = Self {
            writer: BufWriter::new(writer),
            event_count: 0,
            first_ts_ms: None,
            last_ts_ms: 0,
        };
        this.write_line(&TraceRecord::Header {
            schema_version: SCHEMA_VERSION.to_string(),
            session_name: session_name.to_string(),
            screen,
        })?;
        Ok(this)
    }

    pub fn record_motion(&mut self, event: &MotionEvent) -> Result<(), TraceError> {
        self.write_record(&TraceRecord::from_motion(event))
    }

    pub fn record_screen(
        &mut self,
        at: Duration,
        screen: ScreenGeometry,
    ) -> Result<(), TraceError> {
        self.write_record(&TraceRecord::Screen {
            ts_ms: millis(at),
            screen,
        })
    }

    /// Write an event record. Header and summary records are managed by the
    /// writer and rejected here.
    pub fn write_record(&mut self, record: &TraceRecord) -> Result<(), TraceError> {
        let Some(ts) = record.ts_ms() else {
            return Err(TraceError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                "header and summary records are written by the trace writer",
            )));
        };
        self.write_line(record)?;
        self.first_ts_ms.get_or_insert(ts);
        self.last_ts_ms = ts;
        self.event_count += 1;
        Ok(())
    }

    #[inline]
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Write the summary line, flush, and return the underlying writer.
    pub fn finish(mut self) -> Result<W, TraceError> {
        let total_duration_ms = self
            .first_ts_ms
            .map_or(0, |first| self.last_ts_ms.saturating_sub(first));
        self.write_line(&TraceRecord::Summary {
            total_events: self.event_count,
            total_duration_ms,
        })?;
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| TraceError::Io(e.into_error()))
    }

    fn write_line(&mut self, record: &TraceRecord) -> Result<(), TraceError> {
        serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TraceFile
// ---------------------------------------------------------------------------

/// A parsed trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFile {
    records: Vec<TraceRecord>,
}

impl TraceFile {
    /// Read and parse a trace file, gzip or plain.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Parse a trace from raw bytes. Gzip is detected by its magic bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, TraceError> {
        let text = if data.starts_with(&GZIP_MAGIC) {
            let mut decoded = Vec::new();
            flate2::read::GzDecoder::new(data).read_to_end(&mut decoded)?;
            decoded
        } else {
            data.to_vec()
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(text.as_slice()).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| TraceError::Json {
                line: index + 1,
                source,
            })?;
            records.push(record);
        }

        match records.first() {
            Some(TraceRecord::Header { schema_version, .. }) if schema_version != SCHEMA_VERSION => {
                Err(TraceError::UnsupportedSchema(schema_version.clone()))
            }
            Some(TraceRecord::Header { .. }) => Ok(Self { records }),
            _ => Err(TraceError::MissingHeader),
        }
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    #[must_use]
    pub fn session_name(&self) -> &str {
        match self.records.first() {
            Some(TraceRecord::Header { session_name, .. }) => session_name,
            _ => "",
        }
    }

    /// Screen geometry at the start of the trace.
    #[must_use]
    pub fn screen(&self) -> Option<ScreenGeometry> {
        match self.records.first()? {
            TraceRecord::Header { screen, .. } => Some(*screen),
            _ => None,
        }
    }

    /// All motion events in recorded order.
    #[must_use]
    pub fn motion_events(&self) -> Vec<MotionEvent> {
        self.records.iter().filter_map(TraceRecord::to_motion).collect()
    }

    /// Event count from the summary, if the trace was finished.
    #[must_use]
    pub fn total_events(&self) -> Option<u64> {
        match self.records.last()? {
            TraceRecord::Summary { total_events, .. } => Some(*total_events),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// A gesture produced during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayedGesture {
    pub gesture: Gesture,
    pub episode: EpisodeId,
    /// Virtual time of emission.
    pub at: Duration,
}

/// Drives a detector with a virtual long-press timer.
#[derive(Debug)]
pub struct Replayer<'a> {
    detector: &'a mut GestureDetector,
    pending: Option<(EpisodeId, Duration)>,
    emitted: Vec<ReplayedGesture>,
}

impl<'a> Replayer<'a> {
    pub fn new(detector: &'a mut GestureDetector) -> Self {
        Self {
            detector,
            pending: None,
            emitted: Vec::new(),
        }
    }

    /// Fire the pending timer if its deadline is not after `now`.
    pub fn advance_to(&mut self, now: Duration) {
        let Some((episode, deadline)) = self.pending else {
            return;
        };
        if deadline > now {
            return;
        }
        self.pending = None;
        if let Some(gesture) = self.detector.on_long_press_timeout(episode) {
            self.emitted.push(ReplayedGesture {
                gesture,
                episode,
                at: deadline,
            });
        }
    }

    pub fn motion(&mut self, event: &MotionEvent) {
        self.advance_to(event.event_time);
        let detection = self.detector.on_motion_event(event);
        match detection.timer {
            Some(TimerCommand::Arm { episode, deadline }) => {
                self.pending = Some((episode, deadline));
            }
            Some(TimerCommand::Disarm { episode }) => {
                if self.pending.is_some_and(|(armed, _)| armed == episode) {
                    self.pending = None;
                }
            }
            None => {}
        }
        if let Some(gesture) = detection.gesture {
            self.emitted.push(ReplayedGesture {
                gesture,
                episode: self.detector.episode(),
                at: event.event_time,
            });
        }
    }

    pub fn screen(&mut self, at: Duration, screen: ScreenGeometry) {
        self.advance_to(at);
        self.detector.set_screen(screen);
    }

    pub fn record(&mut self, record: &TraceRecord) {
        match record {
            TraceRecord::Header { screen, .. } => self.detector.set_screen(*screen),
            TraceRecord::Motion { .. } => {
                if let Some(event) = record.to_motion() {
                    self.motion(&event);
                }
            }
            TraceRecord::Screen { ts_ms, screen } => {
                self.screen(Duration::from_millis(*ts_ms), *screen);
            }
            TraceRecord::Summary { .. } => {}
        }
    }

    /// Let any pending timer run out and return everything emitted.
    pub fn finish(mut self) -> Vec<ReplayedGesture> {
        if let Some((_, deadline)) = self.pending {
            self.advance_to(deadline);
        }
        self.emitted
    }
}

/// Replay a whole trace. The header's screen geometry replaces the
/// detector's.
pub fn replay(detector: &mut GestureDetector, trace: &TraceFile) -> Vec<ReplayedGesture> {
    let mut replayer = Replayer::new(detector);
    for record in trace.records() {
        replayer.record(record);
    }
    let emitted = replayer.finish();
    tracing::debug!(
        session = trace.session_name(),
        gestures = emitted.len(),
        "trace replayed"
    );
    emitted
}

/// Replay bare motion events without a trace file.
pub fn replay_events<'e>(
    detector: &mut GestureDetector,
    events: impl IntoIterator<Item = &'e MotionEvent>,
) -> Vec<ReplayedGesture> {
    let mut replayer = Replayer::new(detector);
    for event in events {
        replayer.motion(event);
    }
    replayer.finish()
}
