//! Source files and bundles
//!
//! A bundle is the unit the design→code pass reconciles against. It is
//! built either from model output that concatenates files behind
//! `=== File: <name> ===` marker lines, or from a directory on disk.

use crate::error::{SourceError, SourceResult};
use crate::language::Language;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use walkdir::WalkDir;

static FILE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^=== File: (?P<name>.+?) ===\s*$").expect("file marker pattern is valid")
});

/// One source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// File name or relative path
    pub filename: String,
    /// Full text
    pub content: String,
}

impl SourceFile {
    /// Create source file
    #[inline]
    #[must_use]
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Language detected from the file extension
    #[inline]
    #[must_use]
    pub fn language(&self) -> Option<Language> {
        Language::from_path(&self.filename)
    }
}

/// Ordered set of source files
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceBundle {
    files: Vec<SourceFile>,
}

impl SourceBundle {
    /// Create empty bundle
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Split marked text into files
    ///
    /// Content between a marker and the next one (or the end) belongs to
    /// the marked file and is trimmed. Text before the first marker is
    /// ignored.
    #[must_use]
    pub fn from_marked_text(text: &str) -> Self {
        let markers: Vec<_> = FILE_MARKER.captures_iter(text).collect();
        let files = markers
            .iter()
            .enumerate()
            .filter_map(|(i, caps)| {
                let whole = caps.get(0)?;
                let end = markers
                    .get(i + 1)
                    .and_then(|next| next.get(0))
                    .map_or(text.len(), |m| m.start());
                Some(SourceFile::new(
                    caps["name"].trim(),
                    text[whole.end()..end].trim(),
                ))
            })
            .collect::<Vec<_>>();

        tracing::debug!(files = files.len(), "source bundle extracted from marked text");
        Self { files }
    }

    /// Collect files under `root` whose extension is listed
    ///
    /// File names are paths relative to `root` with `/` separators, and
    /// the bundle is sorted by them. Content is decoded lossily.
    ///
    /// # Errors
    /// Returns error if the directory cannot be walked or a file cannot
    /// be read.
    pub fn from_dir(root: impl AsRef<Path>, extensions: &[String]) -> SourceResult<Self> {
        let root = root.as_ref();
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|source| SourceError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let wanted = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| extensions.iter().any(|want| want.trim_start_matches('.') == ext));
            if !wanted {
                continue;
            }

            let bytes = std::fs::read(path).map_err(|e| SourceError::io_error(path, e))?;
            let relative = path.strip_prefix(root).unwrap_or(path);
            let filename = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push(SourceFile::new(filename, String::from_utf8_lossy(&bytes)));
        }

        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        tracing::debug!(root = %root.display(), files = files.len(), "source bundle loaded");
        Ok(Self { files })
    }

    /// Add a file
    pub fn push(&mut self, file: SourceFile) {
        self.files.push(file);
    }

    /// Files in bundle order
    #[inline]
    #[must_use]
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Iterate over files
    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    /// Number of files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the bundle has no files
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<SourceFile> for SourceBundle {
    fn from_iter<I: IntoIterator<Item = SourceFile>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for SourceBundle {
    type Item = SourceFile;
    type IntoIter = std::vec::IntoIter<SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_marked_text() {
        let text = "Here you go.\n=== File: Foo.java ===\npublic class Foo {}\n\n=== File: util/Bar.java ===\n\nclass Bar {}\n";
        let bundle = SourceBundle::from_marked_text(text);

        assert_eq!(
            bundle.files(),
            &[
                SourceFile::new("Foo.java", "public class Foo {}"),
                SourceFile::new("util/Bar.java", "class Bar {}"),
            ]
        );
        assert_eq!(bundle.files()[0].language(), Some(Language::Java));
    }

    #[test]
    fn marked_text_without_markers_is_empty() {
        assert!(SourceBundle::from_marked_text("class Foo {}").is_empty());
    }

    #[test]
    fn loads_directory_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("com/example")).unwrap();
        std::fs::write(dir.path().join("com/example/Zeta.java"), "class Zeta {}").unwrap();
        std::fs::write(dir.path().join("Alpha.java"), "class Alpha {}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let bundle = SourceBundle::from_dir(dir.path(), &["java".to_string()]).unwrap();
        let names: Vec<&str> = bundle.iter().map(|f| f.filename.as_str()).collect();

        assert_eq!(names, vec!["Alpha.java", "com/example/Zeta.java"]);
        assert_eq!(bundle.files()[0].content, "class Alpha {}");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            SourceBundle::from_dir(&missing, &["java".to_string()]),
            Err(SourceError::Walk { .. })
        ));
    }
}
