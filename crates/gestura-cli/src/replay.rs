use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use gestura_core::{EpisodeId, Gesture};
use gestura_runtime::{ReplayedGesture, TraceFile, replay};
use serde::Serialize;

use crate::error::{CliError, Result};
use crate::util::{ensure_exists, load_settings};

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Trace file (`.jsonl`, optionally gzip-compressed).
    pub trace: PathBuf,

    /// Settings file (`.toml` or `.json`); defaults apply when omitted.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Emit one JSON document instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayLine {
    pub episode: EpisodeId,
    pub at_ms: u64,
    pub gesture: Gesture,
    pub name: &'static str,
}

impl From<ReplayedGesture> for ReplayLine {
    fn from(replayed: ReplayedGesture) -> Self {
        Self {
            episode: replayed.episode,
            at_ms: u64::try_from(replayed.at.as_millis()).unwrap_or(u64::MAX),
            gesture: replayed.gesture,
            name: replayed.gesture.name(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub session: String,
    pub motion_events: usize,
    pub gestures: Vec<ReplayLine>,
}

pub fn replay_trace(args: &ReplayArgs) -> Result<ReplayReport> {
    let settings = load_settings(args.settings.as_deref())?;
    ensure_exists(&args.trace)?;
    let trace = TraceFile::open(&args.trace).map_err(|source| CliError::Trace {
        path: args.trace.clone(),
        source,
    })?;

    let mut detector = settings.detector();
    let gestures: Vec<ReplayLine> = replay(&mut detector, &trace)
        .into_iter()
        .map(ReplayLine::from)
        .collect();
    tracing::info!(
        trace = %args.trace.display(),
        gestures = gestures.len(),
        "replay finished"
    );

    Ok(ReplayReport {
        session: trace.session_name().to_string(),
        motion_events: trace.motion_events().len(),
        gestures,
    })
}

pub fn run_replay(args: ReplayArgs, out: &mut dyn Write) -> Result<()> {
    let report = replay_trace(&args)?;
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "session `{}`: {} motion events, {} gestures",
        report.session,
        report.motion_events,
        report.gestures.len()
    )?;
    for line in &report.gestures {
        writeln!(
            out,
            "{:>8} ms  #{:<4} {:<26} {}",
            line.at_ms,
            line.episode,
            line.name,
            line.gesture.id()
        )?;
    }
    Ok(())
}
