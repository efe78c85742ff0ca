use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use crate::error::{CliError, Result};
use crate::util::read_settings;

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Settings file to validate (`.toml` or `.json`).
    pub settings: PathBuf,

    /// Print the effective settings as JSON on success.
    #[arg(long)]
    pub json: bool,
}

pub fn run_check(args: CheckArgs, out: &mut dyn Write) -> Result<()> {
    let settings = read_settings(&args.settings)?;
    let problems = settings.validate();
    if !problems.is_empty() {
        return Err(CliError::Invalid {
            path: args.settings,
            problems,
        });
    }

    if args.json {
        let report = serde_json::json!({
            "status": "ok",
            "path": args.settings.display().to_string(),
            "settings": settings,
        });
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    let metrics = &settings.classifier.metrics;
    let screen = &settings.classifier.screen;
    writeln!(out, "ok: {}", args.settings.display())?;
    writeln!(
        out,
        "  touch slop {} px, double-tap slop {} px",
        metrics.touch_slop, metrics.double_tap_slop
    )?;
    writeln!(
        out,
        "  long press {} ms, tap {} ms, double tap {} ms",
        metrics.long_press_timeout.as_millis(),
        metrics.tap_timeout.as_millis(),
        metrics.double_tap_timeout.as_millis()
    )?;
    writeln!(out, "  screen {}x{}", screen.width, screen.height)?;
    Ok(())
}
