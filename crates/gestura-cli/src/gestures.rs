use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use gestura_core::Gesture;
use serde::Serialize;

use crate::error::Result;
use crate::util::load_settings;

#[derive(Debug, Clone, Args)]
pub struct GesturesArgs {
    /// Evaluate the enabled column against these settings.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Emit a JSON array instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GestureRow {
    pub id: &'static str,
    pub name: &'static str,
    pub enabled: bool,
}

pub fn gesture_rows(args: &GesturesArgs) -> Result<Vec<GestureRow>> {
    let preferences = load_settings(args.settings.as_deref())?.preferences;
    Ok(Gesture::ALL
        .iter()
        .map(|gesture| GestureRow {
            id: gesture.id(),
            name: gesture.name(),
            enabled: gesture.is_enabled(&preferences),
        })
        .collect())
}

pub fn run_gestures(args: GesturesArgs, out: &mut dyn Write) -> Result<()> {
    let rows = gesture_rows(&args)?;
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }
    for row in &rows {
        let mark = if row.enabled { "on" } else { "off" };
        writeln!(out, "{:<26} {:<22} {mark}", row.name, row.id)?;
    }
    Ok(())
}
