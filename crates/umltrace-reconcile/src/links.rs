//! Trace links and the semantic matcher boundary
//!
//! Whether a diagram element covers a requirement item is decided outside
//! this crate, typically by a model. [`SemanticMatcher`] is the interface
//! the requirement→design pass consumes; [`JsonTraceLinks`] adapts
//! already-resolved matcher output in its JSON form.

use crate::error::ReconcileResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use umltrace_diagram::{ClassDiagram, SequenceDiagram};
use umltrace_usecase::{RequirementId, RequirementItem};

/// Diagram a trace link points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    /// Class diagram
    Class,
    /// Sequence diagram
    Sequence,
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramKind::Class => f.write_str("class"),
            DiagramKind::Sequence => f.write_str("sequence"),
        }
    }
}

/// Association from one requirement item to diagram elements
///
/// Empty `element_ids` means the matcher found no coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceLink {
    /// Linked requirement
    pub requirement_id: RequirementId,
    /// Diagram the elements belong to
    pub diagram_kind: DiagramKind,
    /// Class ids, participant ids or message ids
    pub element_ids: Vec<String>,
}

impl TraceLink {
    /// Create link
    #[must_use]
    pub fn new(
        requirement_id: RequirementId,
        diagram_kind: DiagramKind,
        element_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            requirement_id,
            diagram_kind,
            element_ids: element_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if the link names at least one element
    #[inline]
    #[must_use]
    pub fn is_covered(&self) -> bool {
        !self.element_ids.is_empty()
    }
}

/// Both parsed design diagrams of one iteration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignDiagrams {
    /// Class diagram
    pub class_diagram: ClassDiagram,
    /// Sequence diagram
    pub sequence_diagram: SequenceDiagram,
}

/// Decides which diagram elements cover which requirement items
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait SemanticMatcher {
    /// Produce trace links of `kind` for `items` against `design`
    ///
    /// # Errors
    /// Returns error if links cannot be obtained or decoded.
    fn link(
        &self,
        items: &[RequirementItem],
        kind: DiagramKind,
        design: &DesignDiagrams,
    ) -> ReconcileResult<Vec<TraceLink>>;
}

#[derive(Debug, Deserialize)]
struct RawLink {
    requirement: String,
    #[serde(default)]
    links: Vec<serde_json::Value>,
}

/// Matcher over JSON links already produced elsewhere
///
/// Accepts `[{"requirement": "req_0", "links": ["Foo", "m3"]}]`, optionally
/// wrapped in a Markdown code fence. Non-string link entries are kept in
/// their JSON text form.
#[derive(Debug, Clone, Default)]
pub struct JsonTraceLinks {
    class: String,
    sequence: String,
}

impl JsonTraceLinks {
    /// Create from the class and sequence matcher outputs
    #[must_use]
    pub fn new(class: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            sequence: sequence.into(),
        }
    }

    /// Decode one matcher output
    ///
    /// # Errors
    /// Returns [`ReconcileError::MalformedLinks`](crate::ReconcileError::MalformedLinks)
    /// if the text is not a JSON array of link objects.
    pub fn parse(text: &str, kind: DiagramKind) -> ReconcileResult<Vec<TraceLink>> {
        let raw: Vec<RawLink> = serde_json::from_str(strip_code_fence(text))?;
        let links = raw
            .into_iter()
            .filter_map(|link| match link.requirement.parse::<RequirementId>() {
                Ok(id) => Some(TraceLink::new(
                    id,
                    kind,
                    link.links.into_iter().map(|v| match v {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    }),
                )),
                Err(e) => {
                    tracing::warn!(error = %e, "trace link skipped");
                    None
                }
            })
            .collect::<Vec<_>>();
        tracing::debug!(%kind, links = links.len(), "trace links decoded");
        Ok(links)
    }
}

impl SemanticMatcher for JsonTraceLinks {
    fn link(
        &self,
        _items: &[RequirementItem],
        kind: DiagramKind,
        _design: &DesignDiagrams,
    ) -> ReconcileResult<Vec<TraceLink>> {
        match kind {
            DiagramKind::Class => Self::parse(&self.class, kind),
            DiagramKind::Sequence => Self::parse(&self.sequence, kind),
        }
    }
}

/// Text inside a surrounding ```` ``` ```` fence, or the trimmed text
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string, e.g. ```json
    let body = body.split_once('\n').map_or("", |(_, rest)| rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
