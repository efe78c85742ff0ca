use std::path::PathBuf;

use gestura_runtime::{SettingsError, TraceError};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("path does not exist: {}", path.display())]
    MissingPath { path: PathBuf },

    #[error("invalid settings in {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: SettingsError,
    },

    #[error("{} problem(s) in {}:\n  {}", problems.len(), path.display(), problems.join("\n  "))]
    Invalid {
        path: PathBuf,
        problems: Vec<String>,
    },

    #[error("cannot read trace {}: {source}", path.display())]
    Trace {
        path: PathBuf,
        #[source]
        source: TraceError,
    },

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code: 1 for rejected input, 2 for unreadable input.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Invalid { .. } => 1,
            Self::MissingPath { .. }
            | Self::Settings { .. }
            | Self::Trace { .. }
            | Self::Json(_)
            | Self::Io(_) => 2,
        }
    }
}
