//! Error types for source loading and parsing

use crate::language::Language;
use std::path::PathBuf;

/// Errors while loading or parsing source files
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// No grammar for the file and none forced by configuration
    #[error("no supported language for '{path}'")]
    UnsupportedLanguage {
        /// File name as given
        path: String,
    },

    /// Grammar could not be loaded into the parser
    #[error("parser initialization failed for {language}: {message}")]
    ParserInit {
        /// Requested language
        language: Language,
        /// Message from tree-sitter
        message: String,
    },

    /// Parser returned no tree
    #[error("failed to parse '{path}'")]
    ParseFailed {
        /// File name as given
        path: String,
    },

    /// Reading a file failed
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("failed to walk {path}: {source}")]
    Walk {
        /// Root of the walk
        path: PathBuf,
        /// Underlying error
        #[source]
        source: walkdir::Error,
    },
}

impl SourceError {
    /// Create unsupported-language error
    pub fn unsupported(path: impl Into<String>) -> Self {
        Self::UnsupportedLanguage { path: path.into() }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_file() {
        let err = SourceError::unsupported("README");
        assert_eq!(err.to_string(), "no supported language for 'README'");

        let err = SourceError::io_error(
            "src/Main.java",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("src/Main.java"));
    }
}
