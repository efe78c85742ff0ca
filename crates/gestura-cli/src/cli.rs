use std::io::Write;

use clap::{Parser, Subcommand};
use gestura_runtime::LogFormat;
use gestura_runtime::logging;

use crate::check::{CheckArgs, run_check};
use crate::error::Result;
use crate::gestures::{GesturesArgs, run_gestures};
use crate::replay::{ReplayArgs, run_replay};

#[derive(Debug, Parser)]
#[command(
    name = "gestura",
    about = "Touch gesture classification toolkit: replay traces, inspect the taxonomy, check settings",
    version
)]
pub struct Cli {
    /// Log classification decisions (overridden by GESTURA_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to stderr as JSON lines.
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a recorded trace and print every detected gesture.
    Replay(ReplayArgs),

    /// List the gesture taxonomy with launcher ids.
    Gestures(GesturesArgs),

    /// Validate a settings file.
    Check(CheckArgs),
}

impl Cli {
    /// Whether the selected command produces JSON on stdout.
    #[must_use]
    pub fn wants_json(&self) -> bool {
        match &self.command {
            Commands::Replay(args) => args.json,
            Commands::Gestures(args) => args.json,
            Commands::Check(args) => args.json,
        }
    }

    fn init_logging(&self) {
        let format = if self.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        };
        let default = if self.verbose { "debug" } else { "warn" };
        logging::init(format, default);
    }
}

/// Install logging for `cli` and run it against stdout.
pub fn run_with_stdout(cli: Cli) -> Result<()> {
    cli.init_logging();
    let stdout = std::io::stdout();
    run(cli, &mut stdout.lock())
}

pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Replay(args) => run_replay(args, out),
        Commands::Gestures(args) => run_gestures(args, out),
        Commands::Check(args) => run_check(args, out),
    }
}
