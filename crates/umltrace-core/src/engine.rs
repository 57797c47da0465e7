//! Traceability rounds
//!
//! One round of the outer design loop is two passes:
//!
//! 1. Design round: validate and itemize the use case, ask the matcher for
//!    trace links against both diagrams, reduce them to missing items.
//! 2. Code round: parse the source bundle and link every design element
//!    to it.
//!
//! The engine owns no state between rounds. Iteration limits and the
//! decision to call the model again belong to the caller; the outcomes
//! only say whether another iteration is required.

use crate::config::TraceConfig;
use crate::error::TraceResult;
use serde::Serialize;
use std::path::Path;
use umltrace_diagram::extract_diagrams;
use umltrace_reconcile::{
    missing_requirement_links, CodeReconciler, CodeTraceReport, CodeTraceability, DesignDiagrams,
    DiagramKind, MissingLinkReport, SemanticMatcher, TraceLink,
};
use umltrace_source::{parse_bundle, SourceBundle, SourceParser, TreeSitterSourceParser};
use umltrace_usecase::{RequirementItem, UseCaseValidator};

/// Result of the requirement→design pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRound {
    /// Items of the validated use case
    pub items: Vec<RequirementItem>,
    /// Links returned by the matcher for both diagram kinds
    pub links: Vec<TraceLink>,
    /// Items without coverage
    pub missing: MissingLinkReport,
}

impl DesignRound {
    /// Check if every item is covered by both diagrams
    #[inline]
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Result of the design→code pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeRound {
    /// Record for every design element
    pub traceability: CodeTraceability,
    /// Unlinked and incomplete elements only
    pub report: CodeTraceReport,
}

impl CodeRound {
    /// Check if every design element is implemented
    #[inline]
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.traceability.is_converged()
    }
}

/// Both passes of one iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundOutcome {
    /// Diagrams both passes ran against
    pub design: DesignDiagrams,
    /// Requirement→design result
    pub design_round: DesignRound,
    /// Design→code result
    pub code_round: CodeRound,
}

impl RoundOutcome {
    /// Check if no further iteration is required
    #[inline]
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.design_round.is_converged() && self.code_round.is_converged()
    }
}

/// Facade running traceability rounds with one configuration
#[derive(Debug, Clone)]
pub struct TraceEngine<P = TreeSitterSourceParser> {
    config: TraceConfig,
    parser: P,
}

impl TraceEngine {
    /// Create engine with the tree-sitter source parser
    #[must_use]
    pub fn new(config: TraceConfig) -> Self {
        let parser = match config.source.language {
            Some(language) => TreeSitterSourceParser::with_language(language),
            None => TreeSitterSourceParser::new(),
        };
        Self { config, parser }
    }
}

impl Default for TraceEngine {
    fn default() -> Self {
        Self::new(TraceConfig::default())
    }
}

impl<P: SourceParser> TraceEngine<P> {
    /// Create engine with another source parser
    #[inline]
    #[must_use]
    pub fn with_parser(config: TraceConfig, parser: P) -> Self {
        Self { config, parser }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Validate a use case and itemize it
    ///
    /// # Errors
    /// Returns error if the text violates the use-case grammar.
    pub fn requirement_items(&self, use_case: &str) -> TraceResult<Vec<RequirementItem>> {
        let document = UseCaseValidator::new().validate(use_case)?;
        Ok(document.itemize())
    }

    /// Parse the class and sequence diagrams out of a model response
    ///
    /// A missing diagram parses as empty.
    #[must_use]
    pub fn extract_design(&self, response: &str) -> DesignDiagrams {
        let extracted = extract_diagrams(response);
        let class_diagram = extracted.class_diagram().unwrap_or_else(|| {
            tracing::warn!("response carries no class diagram");
            Default::default()
        });
        let sequence_diagram = extracted.sequence_diagram().unwrap_or_else(|| {
            tracing::warn!("response carries no sequence diagram");
            Default::default()
        });
        if !class_diagram.others.is_empty() || !sequence_diagram.others.is_empty() {
            tracing::warn!(
                class_others = class_diagram.others.len(),
                sequence_others = sequence_diagram.others.len(),
                "diagrams contain unrecognised lines"
            );
        }
        DesignDiagrams {
            class_diagram,
            sequence_diagram,
        }
    }

    /// Collect the configured source files under `root`
    ///
    /// # Errors
    /// Returns error if the directory cannot be walked or read.
    pub fn load_sources(&self, root: impl AsRef<Path>) -> TraceResult<SourceBundle> {
        Ok(SourceBundle::from_dir(root, &self.config.source.extensions)?)
    }

    /// Run the requirement→design pass
    ///
    /// # Errors
    /// Returns error if the use case is invalid or the matcher fails.
    pub fn design_round(
        &self,
        use_case: &str,
        design: &DesignDiagrams,
        matcher: &dyn SemanticMatcher,
    ) -> TraceResult<DesignRound> {
        let span = tracing::info_span!("design_round");
        let _guard = span.enter();

        let items = self.requirement_items(use_case)?;
        let mut links = matcher.link(&items, DiagramKind::Class, design)?;
        links.extend(matcher.link(&items, DiagramKind::Sequence, design)?);
        let missing = missing_requirement_links(&items, &links);

        tracing::info!(
            items = items.len(),
            links = links.len(),
            converged = missing.is_empty(),
            "design round complete"
        );
        Ok(DesignRound {
            items,
            links,
            missing,
        })
    }

    /// Run the design→code pass
    ///
    /// # Errors
    /// Returns error if a source file fails to parse.
    pub fn code_round(&self, design: &DesignDiagrams, sources: &SourceBundle) -> TraceResult<CodeRound> {
        let span = tracing::info_span!("code_round", files = sources.len());
        let _guard = span.enter();

        let parsed = parse_bundle(&self.parser, sources)?;
        let traceability = CodeReconciler::new()
            .with_include_notes(self.config.reconcile.include_notes)
            .reconcile(design, &parsed);
        let report = traceability.report(design);

        tracing::info!(
            class_gaps = report.class_diagram.len(),
            sequence_gaps = report.sequence_diagram.len(),
            converged = traceability.is_converged(),
            "code round complete"
        );
        Ok(CodeRound {
            traceability,
            report,
        })
    }

    /// Run both passes against the diagrams in `response`
    ///
    /// # Errors
    /// Returns error if either pass fails.
    pub fn run_round(
        &self,
        use_case: &str,
        response: &str,
        sources: &SourceBundle,
        matcher: &dyn SemanticMatcher,
    ) -> TraceResult<RoundOutcome> {
        let design = self.extract_design(response);
        let design_round = self.design_round(use_case, &design, matcher)?;
        let code_round = self.code_round(&design, sources)?;
        Ok(RoundOutcome {
            design,
            design_round,
            code_round,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umltrace_reconcile::{JsonTraceLinks, MockSemanticMatcher, ReconcileError};
    use umltrace_source::{DeclarationIndex, Language, MockSourceParser, SourceError};
    use umltrace_test_utils::fixtures;

    #[test]
    fn engine_honours_forced_language() {
        let engine = TraceEngine::new(TraceConfig::new().with_language(Language::Go));
        assert_eq!(engine.parser.language(), Some(Language::Go));
        assert_eq!(TraceEngine::default().parser.language(), None);
    }

    #[test]
    fn extract_design_tolerates_missing_diagrams() {
        let engine = TraceEngine::default();
        let design = engine.extract_design("no diagrams here");
        assert!(design.class_diagram.is_empty());
        assert!(design.sequence_diagram.is_empty());

        let design = engine.extract_design(&fixtures::model_response());
        assert_eq!(design.class_diagram.len(), 3);
        assert_eq!(design.sequence_diagram.nodes.len(), 3);
    }

    #[test]
    fn grammar_violation_stops_design_round() {
        let matcher = MockSemanticMatcher::new();
        let err = TraceEngine::default()
            .design_round("Actors: Bob", &DesignDiagrams::default(), &matcher)
            .unwrap_err();
        assert!(err.is_grammar_violation());
    }

    #[test]
    fn matcher_failure_propagates() {
        let mut matcher = MockSemanticMatcher::new();
        matcher
            .expect_link()
            .times(1)
            .returning(|_, _, _| Err(ReconcileError::matcher("model unavailable")));

        let err = TraceEngine::default()
            .design_round(fixtures::USE_CASE, &DesignDiagrams::default(), &matcher)
            .unwrap_err();
        assert!(err.to_string().contains("model unavailable"));
    }

    #[test]
    fn design_round_converges_when_all_items_linked() {
        let links = (0..10)
            .map(|i| format!(r#"{{"requirement": "req_{i}", "links": ["Catalogue"]}}"#))
            .collect::<Vec<_>>()
            .join(",");
        let json = format!("[{links}]");
        let matcher = JsonTraceLinks::new(json.clone(), json);

        let round = TraceEngine::default()
            .design_round(fixtures::USE_CASE, &DesignDiagrams::default(), &matcher)
            .unwrap();
        assert_eq!(round.items.len(), 10);
        assert_eq!(round.links.len(), 20);
        assert!(round.is_converged());
    }

    #[test]
    fn source_parse_failure_propagates() {
        let mut parser = MockSourceParser::new();
        parser
            .expect_parse()
            .returning(|file| Err(SourceError::ParseFailed { path: file.filename.clone() }));
        let engine = TraceEngine::with_parser(TraceConfig::new(), parser);

        let result = engine.code_round(&fixtures_design(), &fixtures::source_bundle());
        assert!(result.is_err());
    }

    #[test]
    fn code_round_uses_parser_output() {
        let mut parser = MockSourceParser::new();
        parser.expect_parse().returning(|_| Ok(DeclarationIndex::new()));
        let engine = TraceEngine::with_parser(TraceConfig::new(), parser);

        let round = engine
            .code_round(&fixtures_design(), &fixtures::source_bundle())
            .unwrap();
        // nothing declared, so every class is unlinked
        assert!(round.traceability.classes.iter().all(|r| r.linked_file.is_none()));
        assert_eq!(round.report.class_diagram.len(), 3);
        assert!(!round.is_converged());
    }

    fn fixtures_design() -> DesignDiagrams {
        DesignDiagrams {
            class_diagram: fixtures::class_diagram(),
            sequence_diagram: fixtures::sequence_diagram(),
        }
    }
}
