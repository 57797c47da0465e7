//! Error types for umltrace Core
//!
//! Aggregates the failures of every stage a round runs through:
//! - Use-case grammar violations
//! - Source collection and parsing
//! - Semantic matcher output
//! - Configuration loading and logging setup

use std::path::PathBuf;
use umltrace_reconcile::ReconcileError;
use umltrace_source::SourceError;
use umltrace_usecase::GrammarError;

/// Main umltrace error type
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// Requirement text does not follow the use-case grammar
    #[error("use case rejected: {0}")]
    UseCase(#[from] GrammarError),

    /// Source files could not be collected or parsed
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Trace links could not be obtained
    #[error("reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialised
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed YAML
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Extension is neither `.toml` nor `.yml`/`.yaml`
    #[error("unsupported config format: {path}")]
    UnsupportedFormat {
        /// File path
        path: PathBuf,
    },
}

impl TraceError {
    /// Check if the error came from the requirement text itself
    #[inline]
    #[must_use]
    pub fn is_grammar_violation(&self) -> bool {
        matches!(self, TraceError::UseCase(_))
    }
}

/// Result type for umltrace Core
pub type TraceResult<T> = Result<T, TraceError>;
