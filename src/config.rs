//! Generator configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! output_dir = "site"
//! octaves = 3
//! modes = ["major", "harmonic_minor"]
//!
//! [page]
//! title = "Scales"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::renderer::KeyboardSpec;
use crate::scale::Mode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A stylesheet or script pulled into the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalResource {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crossorigin: Option<String>,
}

impl ExternalResource {
    fn pinned(url: &str, integrity: &str) -> Self {
        Self {
            url: url.to_string(),
            integrity: Some(integrity.to_string()),
            crossorigin: Some("anonymous".to_string()),
        }
    }
}

/// Index page settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub title: String,
    /// Site-local stylesheet linked before the external ones.
    pub local_stylesheet: Option<String>,
    pub stylesheets: Vec<ExternalResource>,
    pub scripts: Vec<ExternalResource>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Piano Scales".to_string(),
            local_stylesheet: Some("style.css".to_string()),
            stylesheets: vec![ExternalResource::pinned(
                "https://cdn.jsdelivr.net/npm/bootstrap@3.4.1/dist/css/bootstrap.min.css",
                "sha384-HSMxcRTRxnN+Bdg0JdbxYKrThecOKuH5zCYotlSAcp1+c8xmyTe9GYg1l9a69psu",
            )],
            scripts: vec![
                ExternalResource::pinned(
                    "https://cdn.jsdelivr.net/npm/jquery@3.6.0/dist/jquery.min.js",
                    "sha256-/xUj+3OJU5yExlq6GSYGSHk7tPXikynS7ogEvDej/m4=",
                ),
                ExternalResource::pinned(
                    "https://cdn.jsdelivr.net/npm/bootstrap@3.4.1/dist/js/bootstrap.min.js",
                    "sha384-aJ21OjlMXNL5UyIl/XNwTMqvzeRMZH2w8c5cRVpzpU8Y5bApTppSuUkhZXN0VxHd",
                ),
            ],
        }
    }
}

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory receiving `<mode>/<root>.svg`, the index and the manifest.
    pub output_dir: PathBuf,
    pub index_file: String,
    /// Write a JSON manifest of every diagram next to the index.
    pub manifest: bool,
    pub manifest_file: String,
    /// Octave of every root in the root list.
    pub root_octave: i32,
    /// First octave drawn on each keyboard.
    pub first_octave: i32,
    /// Number of octaves drawn on each keyboard.
    pub octaves: u32,
    /// Modes to render, in page order.
    pub modes: Vec<Mode>,
    /// Write the scale's notes under each keyboard.
    pub caption: bool,
    pub page: PageConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            index_file: "index.html".to_string(),
            manifest: true,
            manifest_file: "scales.json".to_string(),
            root_octave: 4,
            first_octave: 4,
            octaves: 2,
            modes: Mode::ALL.to_vec(),
            caption: false,
            page: PageConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load a TOML config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.octaves == 0 {
            return Err(ConfigError::Invalid("octaves must be at least 1".into()));
        }
        if self.modes.is_empty() {
            return Err(ConfigError::Invalid("at least one mode is required".into()));
        }
        for (name, file) in [("index_file", &self.index_file), ("manifest_file", &self.manifest_file)] {
            if file.is_empty() || file.contains(['/', '\\']) {
                return Err(ConfigError::Invalid(format!("{name} must be a plain file name")));
            }
        }
        Ok(())
    }

    pub fn keyboard(&self) -> KeyboardSpec {
        KeyboardSpec::new(self.first_octave, self.octaves)
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(&self.index_file)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(&self.manifest_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_render_two_octaves_of_every_mode() {
        let config = GeneratorConfig::default();
        assert_eq!(config.octaves, 2);
        assert_eq!(config.first_octave, 4);
        assert_eq!(config.modes, Mode::ALL.to_vec());
        assert!(config.validate().is_ok());
        assert_eq!(config.keyboard().width(), 322.0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GeneratorConfig = toml::from_str(
            r#"
            octaves = 3
            modes = ["major", "melodic_minor"]

            [page]
            title = "Scales"
            "#,
        )
        .unwrap();
        assert_eq!(config.octaves, 3);
        assert_eq!(config.modes, vec![Mode::Major, Mode::MelodicMinor]);
        assert_eq!(config.page.title, "Scales");
        assert_eq!(config.page.scripts.len(), 2);
        assert_eq!(config.index_file, "index.html");
    }

    #[test]
    fn toml_round_trip() {
        let config = GeneratorConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: GeneratorConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let config = GeneratorConfig {
            octaves: 0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = GeneratorConfig {
            index_file: "../index.html".into(),
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = GeneratorConfig::load(Path::new("/nonexistent/scales.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
