//! Requirement itemizer
//!
//! Splits a validated use case into atomic [`RequirementItem`]s. Emission
//! order is description, actors, entry conditions, flow steps, exit
//! conditions, quality lines; ids are assigned `req_0, req_1, …` in that
//! order. The use-case name is not an item.

use crate::document::{RequirementDocument, Section};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ID_PREFIX: &str = "req_";

/// Positional requirement identifier, rendered as `req_<index>`
///
/// Only stable within one itemization run of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequirementId(usize);

impl RequirementId {
    /// Create id for a 0-based position
    #[inline]
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// 0-based position in the item list
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ID_PREFIX}{}", self.0)
    }
}

/// Error for strings that are not `req_<index>`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid requirement id: '{0}'")]
pub struct InvalidRequirementId(pub String);

impl FromStr for RequirementId {
    type Err = InvalidRequirementId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_prefix(ID_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .map(Self)
            .ok_or_else(|| InvalidRequirementId(s.to_string()))
    }
}

impl TryFrom<String> for RequirementId {
    type Error = InvalidRequirementId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequirementId> for String {
    fn from(id: RequirementId) -> Self {
        id.to_string()
    }
}

/// One addressable atomic requirement fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequirementItem {
    /// Positional id
    pub id: RequirementId,
    /// Section the item came from
    pub category: Section,
    /// Line text as written
    pub text: String,
}

impl RequirementItem {
    /// Text prefixed with its section label, e.g. `Actors: Student`
    #[inline]
    #[must_use]
    pub fn content(&self) -> String {
        format!("{}: {}", self.category.label(), self.text)
    }
}

/// Stateless itemizer
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementItemizer;

impl RequirementItemizer {
    /// Create new itemizer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Itemize a validated document
    #[must_use]
    pub fn itemize(&self, doc: &RequirementDocument) -> Vec<RequirementItem> {
        let sections: [(Section, Vec<&str>); 6] = [
            (Section::Description, vec![doc.description().text.as_str()]),
            (Section::Actors, doc.actors().iter().map(String::as_str).collect()),
            (
                Section::EntryConditions,
                doc.entry_conditions().iter().map(String::as_str).collect(),
            ),
            (
                Section::FlowOfEvents,
                doc.flow_of_events().iter().map(|s| s.text.as_str()).collect(),
            ),
            (
                Section::ExitConditions,
                doc.exit_conditions().iter().map(String::as_str).collect(),
            ),
            (
                Section::QualityRequirements,
                doc.quality_requirements().iter().map(String::as_str).collect(),
            ),
        ];

        let items: Vec<RequirementItem> = sections
            .into_iter()
            .flat_map(|(category, lines)| lines.into_iter().map(move |text| (category, text)))
            .enumerate()
            .map(|(index, (category, text))| RequirementItem {
                id: RequirementId::new(index),
                category,
                text: text.to_string(),
            })
            .collect();

        tracing::debug!(items = items.len(), use_case = %doc.name(), "requirements itemized");
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn document(actors: &[&str], steps: usize) -> RequirementDocument {
        let mut text = String::from(
            "UsecaseName: Demo\n\
             Description: The goal of this use case is to allow a clerk to file a form in order to keep records\n",
        );
        text.push_str(&format!("Actors: {}\n", actors.join(", ")));
        text.push_str("Entry Conditions:\nThe clerk IS authenticated\n");
        text.push_str("Flow of Events:\n");
        for n in 1..=steps {
            text.push_str(&format!("{n}. Step number {n}\n"));
        }
        text.push_str("Exit Conditions:\nThe form is stored\n");
        text.push_str("Quality Requirement:\nStorage is durable\nResponse under 1s\n");
        RequirementDocument::parse(&text).unwrap()
    }

    #[test]
    fn emits_items_in_section_order() {
        let items = document(&["Clerk", "Archive"], 2).itemize();
        let categories: Vec<Section> = items.iter().map(|i| i.category).collect();

        assert_eq!(
            categories,
            vec![
                Section::Description,
                Section::Actors,
                Section::Actors,
                Section::EntryConditions,
                Section::FlowOfEvents,
                Section::FlowOfEvents,
                Section::ExitConditions,
                Section::QualityRequirements,
                Section::QualityRequirements,
            ]
        );
        assert_eq!(items[0].id.to_string(), "req_0");
        assert_eq!(items[2].text, "Archive");
        assert_eq!(items[4].text, "1. Step number 1");
        assert!(items.iter().all(|i| i.category != Section::Name));
    }

    #[test]
    fn content_prefixes_label() {
        let items = document(&["Clerk"], 1).itemize();
        assert_eq!(items[1].content(), "Actors: Clerk");
    }

    #[test]
    fn requirement_id_parses_and_serializes() {
        let id: RequirementId = "req_12".parse().unwrap();
        assert_eq!(id.index(), 12);
        assert!("req_x".parse::<RequirementId>().is_err());
        assert!("12".parse::<RequirementId>().is_err());
        assert_eq!(String::from(id), "req_12");
    }

    proptest! {
        #[test]
        fn itemization_is_deterministic(actor_count in 1usize..6, steps in 1usize..12) {
            let names: Vec<String> = (0..actor_count).map(|i| format!("Actor{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let doc = document(&refs, steps);

            let first = doc.itemize();
            let second = RequirementItemizer::new().itemize(&doc);
            prop_assert_eq!(&first, &second);

            // description + actors + 1 entry + steps + 1 exit + 2 quality
            prop_assert_eq!(first.len(), 1 + actor_count + 1 + steps + 1 + 2);
            for (index, item) in first.iter().enumerate() {
                prop_assert_eq!(item.id.index(), index);
            }
        }
    }
}
