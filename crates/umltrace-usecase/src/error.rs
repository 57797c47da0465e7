//! Error types for use-case grammar validation
//!
//! Validation either yields a complete [`RequirementDocument`](crate::RequirementDocument)
//! or exactly one [`GrammarError`] pointing at the first offending line.

use crate::document::Section;
use std::fmt;

/// Marker used as `actual` when the document ends before the grammar does
pub const END_OF_DOCUMENT: &str = "<end of document>";

/// What the validator was looking for when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expected {
    /// A section header such as `Actors:`
    Header(Section),
    /// The fixed description sentence
    DescriptionTemplate,
    /// An entry condition line carrying `IS` or `HAS`
    EntryConditionToken,
    /// A flow-of-events line starting with `<integer>.`
    NumberedStep,
    /// At least one line of content for the section
    Content(Section),
    /// Nothing after the quality requirements
    EndOfDocument,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header(section) => write!(f, "'{}'", section.header()),
            Self::DescriptionTemplate => f.write_str(
                "'The goal of this use case is to allow <actor> to <action> in order to <value>'",
            ),
            Self::EntryConditionToken => f.write_str("an entry condition containing 'IS' or 'HAS'"),
            Self::NumberedStep => f.write_str("a numbered step '<integer>.'"),
            Self::Content(section) => write!(f, "content for section '{}'", section.label()),
            Self::EndOfDocument => f.write_str("end of document"),
        }
    }
}

/// Grammar violation in a requirement document
///
/// `line` is 1-based and refers to the original text, blank lines included.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: expected {expected}, found '{actual}'")]
pub struct GrammarError {
    /// 1-based line number in the original text
    pub line: usize,
    /// Token or construct the grammar required
    pub expected: Expected,
    /// Trimmed content of the offending line
    pub actual: String,
}

impl GrammarError {
    /// Create grammar error at a line
    #[inline]
    pub fn new(line: usize, expected: Expected, actual: impl Into<String>) -> Self {
        Self {
            line,
            expected,
            actual: actual.into(),
        }
    }

    /// Create grammar error for a document that ended too early
    #[inline]
    #[must_use]
    pub fn end_of_document(line: usize, expected: Expected) -> Self {
        Self::new(line, expected, END_OF_DOCUMENT)
    }

    /// Whether the failure was caused by premature end of input
    #[inline]
    #[must_use]
    pub fn at_end_of_document(&self) -> bool {
        self.actual == END_OF_DOCUMENT
    }
}

/// Result type alias for use-case operations
pub type UseCaseResult<T> = Result<T, GrammarError>;
