use std::path::Path;

use gestura_runtime::Settings;

use crate::error::{CliError, Result};

pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::MissingPath {
            path: path.to_path_buf(),
        })
    }
}

/// Settings from `path`, or the defaults when no file is given. Files that
/// fail validation are rejected.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let settings = read_settings(path)?;
    let problems = settings.validate();
    if problems.is_empty() {
        Ok(settings)
    } else {
        Err(CliError::Invalid {
            path: path.to_path_buf(),
            problems,
        })
    }
}

/// Parse a settings file without validating it.
pub fn read_settings(path: &Path) -> Result<Settings> {
    ensure_exists(path)?;
    Settings::from_path(path).map_err(|source| CliError::Settings {
        path: path.to_path_buf(),
        source,
    })
}
