//! Error types for reconciliation

use umltrace_source::SourceError;

/// Errors raised while obtaining the inputs of a reconciliation pass
///
/// Missing coverage is never an error; it is the normal report output.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The semantic matcher could not produce links
    #[error("semantic matcher failed: {0}")]
    Matcher(String),

    /// Matcher output is not the expected trace-link JSON
    #[error("malformed trace links: {0}")]
    MalformedLinks(#[from] serde_json::Error),

    /// Source parsing failed
    #[error("source error: {0}")]
    Source(#[from] SourceError),
}

impl ReconcileError {
    /// Create matcher error
    pub fn matcher(message: impl Into<String>) -> Self {
        Self::Matcher(message.into())
    }
}

/// Result type for reconciliation
pub type ReconcileResult<T> = Result<T, ReconcileError>;
