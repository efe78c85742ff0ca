#![forbid(unsafe_code)]

//! Settings files.
//!
//! [`Settings`] bundles the classifier configuration and the user's gesture
//! preferences so a deployment can tune thresholds without a rebuild. Files
//! are TOML or JSON; every field is optional and falls back to its default.
//!
//! ```toml
//! # gestura.toml
//! [classifier]
//! min_triangle_height = 300.0
//!
//! [classifier.metrics]
//! touch_slop = 24.0
//! long_press_timeout_ms = 500
//!
//! [classifier.screen]
//! width = 1080.0
//! height = 2400.0
//!
//! [preferences]
//! edge_swipe = false
//! ```
//!
//! ```rust,ignore
//! let settings = Settings::from_path("gestura.toml")?;
//! let settings = Settings::from_json_str(json)?;
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use gestura_core::{ClassifierConfig, GestureDetector, GesturePreferences, TouchMetrics};
use serde::{Deserialize, Serialize};

/// Classifier configuration plus gesture preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display density; when set, metrics not given explicitly are derived
    /// from it instead of the default density.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<f32>,
    pub classifier: ClassifierConfig,
    pub preferences: GesturePreferences,
}

impl Settings {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        let table: toml::Table = toml::from_str(s).map_err(SettingsError::Toml)?;
        let value = toml::Value::Table(table);
        let density = value.get("density").and_then(toml::Value::as_float);
        let mut settings: Self = value.clone().try_into().map_err(SettingsError::Toml)?;
        if let Some(density) = density {
            let explicit = |key: &str| {
                value
                    .get("classifier")
                    .and_then(|c| c.get("metrics"))
                    .and_then(|m| m.get(key))
                    .is_some()
            };
            settings.apply_density(density as f32, explicit);
        }
        Ok(settings)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        let value: serde_json::Value = serde_json::from_str(s).map_err(SettingsError::Json)?;
        let density = value.get("density").and_then(serde_json::Value::as_f64);
        let explicit = |key: &str| value.pointer(&format!("/classifier/metrics/{key}")).is_some();
        let mut settings: Self =
            serde_json::from_value(value.clone()).map_err(SettingsError::Json)?;
        if let Some(density) = density {
            settings.apply_density(density as f32, explicit);
        }
        Ok(settings)
    }

    /// Load a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = read(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = read(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load a file, picking the format from its extension (`.toml`/`.json`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::from_toml_file(path),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_file(path),
            _ => Err(SettingsError::UnknownFormat(path.to_path_buf())),
        }
    }

    /// Load a file and reject it unless [`validate`](Self::validate) passes.
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let settings = Self::from_path(path)?;
        let errors = settings.validate();
        if errors.is_empty() {
            Ok(settings)
        } else {
            Err(SettingsError::Validation(errors))
        }
    }

    /// Check every parameter. An empty list means the settings are usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.classifier.validate();
        if let Some(density) = self.density {
            if !(density.is_finite() && density > 0.0) {
                errors.push(format!("density must be > 0, got {density}"));
            }
        }
        if self.preferences.edge_width_percent > 100 {
            errors.push(format!(
                "edge_width_percent must be <= 100, got {}",
                self.preferences.edge_width_percent
            ));
        }
        errors
    }

    /// A detector configured from these settings.
    #[must_use]
    pub fn detector(&self) -> GestureDetector {
        GestureDetector::new(self.classifier).with_preferences(self.preferences)
    }

    /// Serialize as TOML.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(SettingsError::TomlSer)
    }

    fn apply_density(&mut self, density: f32, explicit: impl Fn(&str) -> bool) {
        self.density = Some(density);
        let scaled = TouchMetrics::from_density(density);
        let metrics = &mut self.classifier.metrics;
        if !explicit("touch_slop") {
            metrics.touch_slop = scaled.touch_slop;
        }
        if !explicit("double_tap_slop") {
            metrics.double_tap_slop = scaled.double_tap_slop;
        }
    }
}

fn read(path: &Path) -> Result<String, SettingsError> {
    std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading settings.
#[derive(Debug)]
pub enum SettingsError {
    /// I/O error reading a file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// TOML parse error.
    Toml(toml::de::Error),
    /// TOML serialization error.
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// The file extension is neither `.toml` nor `.json`.
    UnknownFormat(PathBuf),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::TomlSer(e) => write!(f, "TOML serialization error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::UnknownFormat(path) => write!(
                f,
                "unsupported settings format: {} (expected .toml or .json)",
                path.display()
            ),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Toml(e) => Some(e),
            Self::TomlSer(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::UnknownFormat(_) | Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_validates_clean() {
        assert!(Settings::default().validate().is_empty());
    }

    #[test]
    fn partial_toml_preserves_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [classifier.metrics]
            long_press_timeout_ms = 550

            [preferences]
            edge_swipe = false
            "#,
        )
        .expect("parse");

        let defaults = ClassifierConfig::default();
        assert_eq!(
            settings.classifier.metrics.long_press_timeout,
            Duration::from_millis(550)
        );
        assert_eq!(settings.classifier.metrics.touch_slop, defaults.metrics.touch_slop);
        assert_eq!(settings.classifier.screen, defaults.screen);
        assert!(!settings.preferences.edge_swipe);
        assert!(settings.preferences.double_swipe);
    }

    #[test]
    fn json_matches_toml() {
        let toml = Settings::from_toml_str(
            "[classifier.screen]\nwidth = 720.0\nheight = 1600.0\n",
        )
        .expect("toml");
        let json = Settings::from_json_str(
            r#"{ "classifier": { "screen": { "width": 720.0, "height": 1600.0 } } }"#,
        )
        .expect("json");
        assert_eq!(toml, json);
        assert_eq!(json.classifier.screen.width, 720.0);
    }

    #[test]
    fn density_scales_unset_slops() {
        let settings = Settings::from_toml_str(
            "density = 2.0\n[classifier.metrics]\ndouble_tap_slop = 150.0\n",
        )
        .expect("parse");
        assert_eq!(settings.density, Some(2.0));
        assert_eq!(settings.classifier.metrics.touch_slop, 16.0);
        assert_eq!(settings.classifier.metrics.double_tap_slop, 150.0);

        let json = Settings::from_json_str(r#"{ "density": 2.0 }"#).expect("json");
        assert_eq!(json.classifier.metrics.double_tap_slop, 200.0);
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut settings = Settings::default();
        settings.classifier.angular_threshold = 0.0;
        settings.preferences.edge_width_percent = 120;
        settings.density = Some(-1.0);
        let errors = settings.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
    }

    #[test]
    fn malformed_input_is_typed() {
        assert!(matches!(
            Settings::from_toml_str("[classifier"),
            Err(SettingsError::Toml(_))
        ));
        assert!(matches!(
            Settings::from_json_str("{"),
            Err(SettingsError::Json(_))
        ));
        assert!(matches!(
            Settings::from_json_str(r#"{ "preferences": { "edge_swipe": 3 } }"#),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn from_path_dispatches_on_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let toml_path = dir.path().join("gestura.toml");
        std::fs::write(&toml_path, "[preferences]\ndouble_swipe = false\n").expect("write");
        assert!(!Settings::from_path(&toml_path).expect("toml").preferences.double_swipe);

        let json_path = dir.path().join("gestura.JSON");
        std::fs::write(&json_path, r#"{ "preferences": { "edge_width_percent": 20 } }"#)
            .expect("write");
        assert_eq!(
            Settings::from_path(&json_path).expect("json").preferences.edge_width_percent,
            20
        );

        let yaml = dir.path().join("gestura.yaml");
        assert!(matches!(
            Settings::from_path(&yaml),
            Err(SettingsError::UnknownFormat(_))
        ));
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Settings::from_path(&missing),
            Err(SettingsError::Io { .. })
        ));
    }

    #[test]
    fn load_validated_rejects_bad_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[classifier]\nmin_triangle_height = -5.0\n").expect("write");
        let err = Settings::load_validated(&path).expect_err("invalid");
        assert!(err.to_string().contains("min_triangle_height"), "{err}");
    }

    #[test]
    fn toml_output_round_trips() {
        let mut settings = Settings::default();
        settings.preferences.edge_width_percent = 25;
        let text = settings.to_toml_string().expect("serialize");
        assert_eq!(Settings::from_toml_str(&text).expect("parse"), settings);
    }
}
