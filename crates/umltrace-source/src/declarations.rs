//! Declaration names collected from one source file

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of a collected declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    /// Class, interface, enum, record, struct or trait
    Type,
    /// Method, constructor or function
    Method,
    /// Field or property
    Field,
}

/// Declared names of one file, grouped by kind
///
/// Names are file-scoped: a field found anywhere in the file counts for
/// every type declared in it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeclarationIndex {
    types: BTreeSet<String>,
    methods: BTreeSet<String>,
    fields: BTreeSet<String>,
}

impl DeclarationIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration
    pub fn insert(&mut self, kind: DeclarationKind, name: impl Into<String>) {
        let name = name.into();
        if name.is_empty() {
            return;
        }
        match kind {
            DeclarationKind::Type => self.types.insert(name),
            DeclarationKind::Method => self.methods.insert(name),
            DeclarationKind::Field => self.fields.insert(name),
        };
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, kind: DeclarationKind, name: impl Into<String>) -> Self {
        self.insert(kind, name);
        self
    }

    /// Check for a type declaration
    #[inline]
    #[must_use]
    pub fn declares_type(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    /// Check for a method declaration
    #[inline]
    #[must_use]
    pub fn declares_method(&self, name: &str) -> bool {
        self.methods.contains(name)
    }

    /// Check for a field declaration
    #[inline]
    #[must_use]
    pub fn declares_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// Type names, sorted
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    /// Method names, sorted
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(String::as_str)
    }

    /// Field names, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Total number of names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len() + self.methods.len() + self.fields.len()
    }

    /// Check if nothing was collected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_query_by_kind() {
        let index = DeclarationIndex::new()
            .with(DeclarationKind::Type, "Foo")
            .with(DeclarationKind::Field, "bar")
            .with(DeclarationKind::Method, "baz")
            .with(DeclarationKind::Method, "");

        assert!(index.declares_type("Foo"));
        assert!(index.declares_field("bar"));
        assert!(!index.declares_method("bar"));
        assert!(index.declares_method("baz"));
        assert_eq!(index.len(), 3);
    }
}
