//! Structurally validated use-case document
//!
//! A [`RequirementDocument`] can only be obtained through the grammar
//! validator, so every instance satisfies the section order and the
//! per-section line rules. It is immutable once built.

use crate::error::UseCaseResult;
use crate::itemizer::{RequirementItem, RequirementItemizer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sections of a use-case document, in grammar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// `UsecaseName:`
    Name,
    /// `Description:`
    Description,
    /// `Actors:`
    Actors,
    /// `Entry Conditions:`
    EntryConditions,
    /// `Flow of Events:`
    FlowOfEvents,
    /// `Exit Conditions:`
    ExitConditions,
    /// `Quality Requirement:`
    QualityRequirements,
}

impl Section {
    /// All sections in the order the grammar requires them
    pub const ORDER: [Section; 7] = [
        Section::Name,
        Section::Description,
        Section::Actors,
        Section::EntryConditions,
        Section::FlowOfEvents,
        Section::ExitConditions,
        Section::QualityRequirements,
    ];

    /// Canonical header, including the trailing colon
    #[inline]
    #[must_use]
    pub fn header(&self) -> &'static str {
        match self {
            Section::Name => "UsecaseName:",
            Section::Description => "Description:",
            Section::Actors => "Actors:",
            Section::EntryConditions => "Entry Conditions:",
            Section::FlowOfEvents => "Flow of Events:",
            Section::ExitConditions => "Exit Conditions:",
            Section::QualityRequirements => "Quality Requirement:",
        }
    }

    /// Human-readable label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.header().trim_end_matches(':')
    }

    /// Recognize a section header at the start of a line
    ///
    /// Matching ignores case, whitespace, `_` and `-` in the header word, so
    /// `Use Case Name:` and `Entry conditions:` are both accepted.
    /// Returns the section and whatever follows the colon, trimmed.
    #[must_use]
    pub fn split_header(line: &str) -> Option<(Section, &str)> {
        let (head, rest) = line.split_once(':')?;
        let key: String = head
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        let section = match key.as_str() {
            "usecasename" | "usecase" => Section::Name,
            "description" => Section::Description,
            "actors" | "actor" => Section::Actors,
            "entryconditions" | "entrycondition" => Section::EntryConditions,
            "flowofevents" | "flowofevent" => Section::FlowOfEvents,
            "exitconditions" | "exitcondition" => Section::ExitConditions,
            "qualityrequirement" | "qualityrequirements" => Section::QualityRequirements,
            _ => return None,
        };
        Some((section, rest.trim()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Description sentence split into its template slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Full sentence as written
    pub text: String,
    /// `<actor>` slot
    pub actor: String,
    /// `<action>` slot
    pub action: String,
    /// `<value>` slot
    pub value: String,
}

/// One numbered flow-of-events line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
    /// Leading step number, saturating at `u64::MAX`
    pub number: u64,
    /// Full line, number included
    pub text: String,
}

/// Grammar-valid use case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementDocument {
    name: String,
    description: Description,
    actors: Vec<String>,
    entry_conditions: Vec<String>,
    flow_of_events: Vec<FlowStep>,
    exit_conditions: Vec<String>,
    quality_requirements: Vec<String>,
}

impl RequirementDocument {
    /// Validate requirement text against the use-case grammar
    ///
    /// # Errors
    /// Returns the first grammar violation found.
    #[inline]
    pub fn parse(text: &str) -> UseCaseResult<Self> {
        crate::grammar::UseCaseValidator::new().validate(text)
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_sections(
        name: String,
        description: Description,
        actors: Vec<String>,
        entry_conditions: Vec<String>,
        flow_of_events: Vec<FlowStep>,
        exit_conditions: Vec<String>,
        quality_requirements: Vec<String>,
    ) -> Self {
        Self {
            name,
            description,
            actors,
            entry_conditions,
            flow_of_events,
            exit_conditions,
            quality_requirements,
        }
    }

    /// Use-case name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description sentence
    #[inline]
    #[must_use]
    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Actors in document order
    #[inline]
    #[must_use]
    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    /// Entry conditions in document order
    #[inline]
    #[must_use]
    pub fn entry_conditions(&self) -> &[String] {
        &self.entry_conditions
    }

    /// Flow-of-events steps in document order
    #[inline]
    #[must_use]
    pub fn flow_of_events(&self) -> &[FlowStep] {
        &self.flow_of_events
    }

    /// Exit conditions in document order
    #[inline]
    #[must_use]
    pub fn exit_conditions(&self) -> &[String] {
        &self.exit_conditions
    }

    /// Quality requirement lines in document order
    #[inline]
    #[must_use]
    pub fn quality_requirements(&self) -> &[String] {
        &self.quality_requirements
    }

    /// Split into addressable requirement items
    #[inline]
    #[must_use]
    pub fn itemize(&self) -> Vec<RequirementItem> {
        RequirementItemizer::new().itemize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_recognition_is_lenient_on_spelling() {
        assert_eq!(
            Section::split_header("Use Case Name: Login"),
            Some((Section::Name, "Login"))
        );
        assert_eq!(
            Section::split_header("entry conditions:"),
            Some((Section::EntryConditions, ""))
        );
        assert_eq!(
            Section::split_header("Quality Requirements:  fast "),
            Some((Section::QualityRequirements, "fast"))
        );
    }

    #[test]
    fn non_headers_are_rejected() {
        assert_eq!(Section::split_header("1. The user clicks: OK"), None);
        assert_eq!(Section::split_header("no colon here"), None);
    }

    #[test]
    fn labels_strip_colon() {
        assert_eq!(Section::FlowOfEvents.label(), "Flow of Events");
        assert_eq!(Section::ORDER.len(), 7);
    }
}
