//! Engine configuration
//!
//! Loaded from TOML or YAML; every field has a default so partial files
//! are accepted.
//!
//! ```toml
//! [source]
//! extensions = ["java", "kt"]
//! language = "java"
//!
//! [reconcile]
//! include_notes = false
//!
//! [logging]
//! filter = "umltrace=debug"
//! json = true
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use umltrace_source::Language;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Source collection
    pub source: SourceConfig,
    /// Reconciliation heuristics
    pub reconcile: ReconcileConfig,
    /// Logging output
    pub logging: LoggingConfig,
}

impl TraceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With source file extensions
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// With a forced source language
    #[inline]
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.source.language = Some(language);
        self
    }

    /// With note messages in the content heuristic or not
    #[inline]
    #[must_use]
    pub fn with_include_notes(mut self, include_notes: bool) -> Self {
        self.reconcile.include_notes = include_notes;
        self
    }

    /// With logging configuration
    #[inline]
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Decode TOML
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML for this shape.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Decode YAML
    ///
    /// # Errors
    /// Returns error if the text is not valid YAML for this shape.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // an empty document decodes to null, not to the defaults
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a `.toml`, `.yml` or `.yaml` file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, has another extension or
    /// does not decode.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("yml" | "yaml") => Self::from_yaml_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

/// Source collection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Extensions collected from a directory, without the dot
    pub extensions: Vec<String>,
    /// Language forced on every file instead of detection by extension
    pub language: Option<Language>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["java".to_string()],
            language: None,
        }
    }
}

/// Reconciliation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Whether note messages take part in the design→code content heuristic
    pub include_notes: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            include_notes: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// With filter directives
    #[inline]
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// With JSON output
    #[inline]
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = TraceConfig::new();
        assert_eq!(config.source.extensions, vec!["java"]);
        assert_eq!(config.source.language, None);
        assert!(config.reconcile.include_notes);
        assert_eq!(config.logging.filter, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = TraceConfig::from_toml_str(
            "[source]\nlanguage = \"rust\"\n\n[reconcile]\ninclude_notes = false\n",
        )
        .unwrap();
        assert_eq!(config.source.language, Some(Language::Rust));
        assert_eq!(config.source.extensions, vec!["java"]);
        assert!(!config.reconcile.include_notes);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn yaml_matches_builder() {
        let yaml = "source:\n  extensions: [java, kt]\nlogging:\n  filter: debug\n  json: true\n";
        let expected = TraceConfig::new()
            .with_extensions(["java", "kt"])
            .with_logging(LoggingConfig::default().with_filter("debug").with_json(true));
        assert_eq!(TraceConfig::from_yaml_str(yaml).unwrap(), expected);
        assert_eq!(TraceConfig::from_yaml_str("  \n").unwrap(), TraceConfig::default());
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(matches!(
            TraceConfig::from_toml_str("[source\n"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            TraceConfig::from_yaml_str("source: [unclosed"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_selects_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("trace.toml");
        std::fs::write(&toml_path, "[reconcile]\ninclude_notes = false\n").unwrap();
        let yaml_path = dir.path().join("trace.YAML");
        std::fs::write(&yaml_path, "reconcile:\n  include_notes: false\n").unwrap();

        let expected = TraceConfig::new().with_include_notes(false);
        assert_eq!(TraceConfig::load(&toml_path).unwrap(), expected);
        assert_eq!(TraceConfig::load(&yaml_path).unwrap(), expected);

        assert!(matches!(
            TraceConfig::load(dir.path().join("trace.ini")),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            TraceConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
