//! Requirement→design pass

use crate::links::{DiagramKind, TraceLink};
use serde::{Deserialize, Serialize};
use umltrace_usecase::RequirementItem;

/// Requirement items without design coverage, per diagram kind
///
/// Both lists keep the original item order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MissingLinkReport {
    /// Items no class-diagram element covers
    pub class_diagram: Vec<RequirementItem>,
    /// Items no sequence-diagram element covers
    pub sequence_diagram: Vec<RequirementItem>,
}

impl MissingLinkReport {
    /// Missing items for one diagram kind
    #[inline]
    #[must_use]
    pub fn missing(&self, kind: DiagramKind) -> &[RequirementItem] {
        match kind {
            DiagramKind::Class => &self.class_diagram,
            DiagramKind::Sequence => &self.sequence_diagram,
        }
    }

    /// Labelled item texts for one diagram kind, e.g. `Actors: Student`
    #[must_use]
    pub fn missing_texts(&self, kind: DiagramKind) -> Vec<String> {
        self.missing(kind).iter().map(RequirementItem::content).collect()
    }

    /// Check if every item is covered in both diagrams
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.class_diagram.is_empty() && self.sequence_diagram.is_empty()
    }
}

/// Items lacking a covering link, per diagram kind
///
/// An item is missing for a kind when no link of that kind names it, or
/// every such link has empty `element_ids`. Links of both kinds may be
/// passed together.
#[must_use]
pub fn missing_requirement_links(items: &[RequirementItem], links: &[TraceLink]) -> MissingLinkReport {
    let covered = |item: &RequirementItem, kind: DiagramKind| {
        links
            .iter()
            .any(|l| l.requirement_id == item.id && l.diagram_kind == kind && l.is_covered())
    };

    let mut report = MissingLinkReport::default();
    for item in items {
        if !covered(item, DiagramKind::Class) {
            report.class_diagram.push(item.clone());
        }
        if !covered(item, DiagramKind::Sequence) {
            report.sequence_diagram.push(item.clone());
        }
    }

    tracing::info!(
        items = items.len(),
        missing_class = report.class_diagram.len(),
        missing_sequence = report.sequence_diagram.len(),
        "requirement to design reconciled"
    );
    report
}
