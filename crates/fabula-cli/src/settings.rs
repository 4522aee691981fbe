use std::path::{Path, PathBuf};

use fabula_generate::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file picked up from the working directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "fabula.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings decode error: {0}")]
    Decode(#[from] toml::de::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub locale: String,
    pub seed: Option<u64>,
    pub locale_files: Vec<PathBuf>,
    pub max_reference_depth: usize,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            seed: None,
            locale_files: Vec::new(),
            max_reference_depth: DEFAULT_MAX_DEPTH,
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(source)?;
        if settings.max_reference_depth == 0 {
            return Err(SettingsError::Invalid(
                "max_reference_depth must be at least 1".to_string(),
            ));
        }
        Ok(settings)
    }

    /// Apply command-line overrides; flags win over file values.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(locale) = overrides.locale {
            self.locale = locale;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self.locale_files.extend(overrides.locale_files);
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
    }
}

#[derive(Debug, Default)]
pub struct Overrides {
    pub locale: Option<String>,
    pub seed: Option<u64>,
    pub locale_files: Vec<PathBuf>,
    pub log_level: Option<String>,
}

/// Load settings from `path`, or from [`DEFAULT_SETTINGS_FILE`] when present.
///
/// An explicit path must exist; the implicit one is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let implicit = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if !implicit.exists() {
                return Ok(Settings::default());
            }
            implicit
        }
    };
    let content = std::fs::read_to_string(&path)?;
    Settings::from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let settings = Settings::from_toml_str("").expect("parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.max_reference_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn file_values_are_read() {
        let settings = Settings::from_toml_str(
            r#"
locale = "nb_no"
seed = 42
locale_files = ["extra.toml"]
max_reference_depth = 16
log_level = "debug"
"#,
        )
        .expect("parse");
        assert_eq!(settings.locale, "nb_no");
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.locale_files, vec![PathBuf::from("extra.toml")]);
        assert_eq!(settings.max_reference_depth, 16);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, SettingsError::Decode(_)));
    }

    #[test]
    fn zero_depth_is_invalid() {
        let err = Settings::from_toml_str("max_reference_depth = 0").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn flags_override_file_values() {
        let mut settings = Settings::from_toml_str("locale = \"nb_no\"\nseed = 1").expect("parse");
        settings.apply_overrides(Overrides {
            locale: Some("en".to_string()),
            seed: None,
            locale_files: vec![PathBuf::from("overlay.json")],
            log_level: Some("trace".to_string()),
        });
        assert_eq!(settings.locale, "en");
        assert_eq!(settings.seed, Some(1));
        assert_eq!(settings.locale_files, vec![PathBuf::from("overlay.json")]);
        assert_eq!(settings.log_level, "trace");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_settings(Some(Path::new("/nonexistent/fabula.toml"))).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
