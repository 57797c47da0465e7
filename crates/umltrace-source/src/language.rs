//! Languages with a bundled tree-sitter grammar

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Programming language support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Java
    Java,
    /// Rust
    Rust,
    /// TypeScript
    TypeScript,
    /// Python
    Python,
    /// Go
    Go,
}

impl Language {
    /// All supported languages
    pub const ALL: [Language; 5] = [
        Language::Java,
        Language::Rust,
        Language::TypeScript,
        Language::Python,
        Language::Go,
    ];

    /// Get file extensions for this language
    #[inline]
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Java => &["java"],
            Language::Rust => &["rs"],
            Language::TypeScript => &["ts", "tsx"],
            Language::Python => &["py"],
            Language::Go => &["go"],
        }
    }

    /// Detect language from file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|lang| lang.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Detect language from a file name or path
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get tree-sitter grammar
    #[must_use]
    pub fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            Language::Java => tree_sitter_java::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Java => "Java",
            Language::Rust => "Rust",
            Language::TypeScript => "TypeScript",
            Language::Python => "Python",
            Language::Go => "Go",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_from_extension() {
        assert_eq!(Language::from_extension("java"), Some(Language::Java));
        assert_eq!(Language::from_extension(".tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("JAVA"), Some(Language::Java));
        assert_eq!(Language::from_extension("unknown"), None);
    }

    #[test]
    fn language_from_path() {
        assert_eq!(
            Language::from_path("src/main/java/com/example/Main.java"),
            Some(Language::Java)
        );
        assert_eq!(Language::from_path("Makefile"), None);
    }
}
