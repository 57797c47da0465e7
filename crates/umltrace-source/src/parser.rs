//! Syntax-aware declaration extraction
//!
//! [`SourceParser`] is the boundary the design→code pass calls through.
//! [`TreeSitterSourceParser`] implements it with the bundled grammars,
//! walking the syntax tree and recording type, method and field names.

use crate::bundle::{SourceBundle, SourceFile};
use crate::declarations::{DeclarationIndex, DeclarationKind};
use crate::error::{SourceError, SourceResult};
use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Extracts declaration names from one source file
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait SourceParser {
    /// Parse one file into its declaration index
    ///
    /// # Errors
    /// Returns [`SourceError::UnsupportedLanguage`] when the file cannot be
    /// handled, or a parser error.
    fn parse(&self, file: &SourceFile) -> SourceResult<DeclarationIndex>;
}

/// A source file with its extracted declarations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSource {
    /// The file
    pub file: SourceFile,
    /// Declarations found in it
    pub declarations: DeclarationIndex,
}

impl ParsedSource {
    /// Pair a file with its declarations
    #[inline]
    #[must_use]
    pub fn new(file: SourceFile, declarations: DeclarationIndex) -> Self {
        Self { file, declarations }
    }
}

/// Parse every file in a bundle, preserving order
///
/// Files in unsupported languages keep an empty index so that the
/// filename and content heuristics still see them.
///
/// # Errors
/// Returns the first parser error other than an unsupported language.
pub fn parse_bundle(
    parser: &dyn SourceParser,
    bundle: &SourceBundle,
) -> SourceResult<Vec<ParsedSource>> {
    bundle
        .iter()
        .map(|file| match parser.parse(file) {
            Ok(declarations) => Ok(ParsedSource::new(file.clone(), declarations)),
            Err(SourceError::UnsupportedLanguage { path }) => {
                tracing::warn!(file = %path, "no grammar for file, declarations skipped");
                Ok(ParsedSource::new(file.clone(), DeclarationIndex::new()))
            }
            Err(e) => Err(e),
        })
        .collect()
}

/// Syntax node kinds that carry a declaration name
struct NodeKinds {
    types: &'static [&'static str],
    methods: &'static [&'static str],
    fields: &'static [&'static str],
}

impl NodeKinds {
    fn for_language(language: Language) -> Self {
        match language {
            Language::Java => Self {
                types: &[
                    "class_declaration",
                    "interface_declaration",
                    "enum_declaration",
                    "record_declaration",
                ],
                methods: &["method_declaration", "constructor_declaration"],
                fields: &["field_declaration", "constant_declaration"],
            },
            Language::Rust => Self {
                types: &["struct_item", "enum_item", "trait_item", "union_item", "type_item"],
                methods: &["function_item", "function_signature_item"],
                fields: &["field_declaration"],
            },
            Language::TypeScript => Self {
                types: &[
                    "class_declaration",
                    "abstract_class_declaration",
                    "interface_declaration",
                    "enum_declaration",
                    "type_alias_declaration",
                ],
                methods: &[
                    "method_definition",
                    "method_signature",
                    "abstract_method_signature",
                    "function_declaration",
                ],
                fields: &["public_field_definition", "property_signature"],
            },
            Language::Python => Self {
                types: &["class_definition"],
                methods: &["function_definition"],
                fields: &["assignment"],
            },
            Language::Go => Self {
                types: &["type_spec"],
                methods: &["method_declaration", "function_declaration"],
                fields: &["field_declaration"],
            },
        }
    }
}

/// Tree-sitter backed [`SourceParser`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterSourceParser {
    language: Option<Language>,
}

impl TreeSitterSourceParser {
    /// Create parser that detects the language per file
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { language: None }
    }

    /// Create parser that treats every file as `language`
    #[inline]
    #[must_use]
    pub fn with_language(language: Language) -> Self {
        Self {
            language: Some(language),
        }
    }

    /// Forced language, if any
    #[inline]
    #[must_use]
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Parse source text in a known language
    ///
    /// # Errors
    /// Returns error if the grammar cannot be loaded or parsing yields no tree.
    pub fn parse_source(
        &self,
        filename: &str,
        source: &str,
        language: Language,
    ) -> SourceResult<DeclarationIndex> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .map_err(|e| SourceError::ParserInit {
                language,
                message: e.to_string(),
            })?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| SourceError::ParseFailed {
                path: filename.to_string(),
            })?;

        let kinds = NodeKinds::for_language(language);
        let mut index = DeclarationIndex::new();
        collect(&tree.root_node(), source.as_bytes(), language, &kinds, &mut index);

        tracing::debug!(
            file = filename,
            %language,
            declarations = index.len(),
            "source declarations extracted"
        );
        Ok(index)
    }
}

impl SourceParser for TreeSitterSourceParser {
    fn parse(&self, file: &SourceFile) -> SourceResult<DeclarationIndex> {
        let language = self
            .language
            .or_else(|| file.language())
            .ok_or_else(|| SourceError::unsupported(&file.filename))?;
        self.parse_source(&file.filename, &file.content, language)
    }
}

fn text<'a>(node: &tree_sitter::Node<'_>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

fn collect(
    node: &tree_sitter::Node<'_>,
    source: &[u8],
    language: Language,
    kinds: &NodeKinds,
    index: &mut DeclarationIndex,
) {
    let kind = node.kind();
    if kinds.types.contains(&kind) {
        if let Some(name) = node.child_by_field_name("name") {
            index.insert(DeclarationKind::Type, text(&name, source));
        }
    } else if kinds.methods.contains(&kind) {
        if let Some(name) = node.child_by_field_name("name") {
            index.insert(DeclarationKind::Method, text(&name, source));
        }
    } else if kinds.fields.contains(&kind) {
        for name in field_names(node, source, language) {
            index.insert(DeclarationKind::Field, name);
        }
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect(&child, source, language, kinds, index);
    }
}

/// Names declared by a field node
fn field_names<'a>(node: &tree_sitter::Node<'_>, source: &'a [u8], language: Language) -> Vec<&'a str> {
    let mut cursor = node.walk();
    match language {
        // int a, b = 2;
        Language::Java => node
            .children_by_field_name("declarator", &mut cursor)
            .filter_map(|d| d.child_by_field_name("name"))
            .map(|n| text(&n, source))
            .collect(),
        Language::Python => python_attribute(node, source).into_iter().collect(),
        // Go allows `X, Y int`
        _ => node
            .children_by_field_name("name", &mut cursor)
            .map(|n| text(&n, source))
            .collect(),
    }
}

/// `self.x = ...` anywhere, or `x = ...` / `x: T` directly in a class body
fn python_attribute<'a>(assignment: &tree_sitter::Node<'_>, source: &'a [u8]) -> Option<&'a str> {
    let left = assignment.child_by_field_name("left")?;
    match left.kind() {
        "attribute" => {
            let object = left.child_by_field_name("object")?;
            (text(&object, source) == "self")
                .then(|| left.child_by_field_name("attribute"))
                .flatten()
                .map(|attr| text(&attr, source))
        }
        "identifier" => {
            let in_class_body = assignment
                .parent()
                .and_then(|stmt| stmt.parent())
                .and_then(|block| block.parent())
                .is_some_and(|owner| owner.kind() == "class_definition");
            in_class_body.then(|| text(&left, source))
        }
        _ => None,
    }
}
