//! Testing utilities for the umltrace workspace
//!
//! Shared fixtures describing one small library-loan system end to end:
//! a use case, its design diagrams and a partial Java implementation.

#![allow(missing_docs)]

pub mod fixtures {
    use umltrace_diagram::{ClassDiagram, SequenceDiagram};
    use umltrace_source::{DeclarationIndex, DeclarationKind, ParsedSource, SourceBundle, SourceFile};
    use umltrace_usecase::{RequirementDocument, RequirementItem};

    /// Valid use case yielding ten requirement items
    pub const USE_CASE: &str = "\
UsecaseName: BorrowBook
Description: The goal of this use case is to allow a member to borrow a book in order to read it at home

Actors: Member, Librarian
Entry Conditions:
The member IS registered
The book HAS an available copy
Flow of Events:
1. The member searches the catalogue
2. The system reserves the copy
3. The librarian confirms the loan
Exit Conditions:
The loan is recorded
Quality Requirement:
Checkout completes within two seconds
";

    pub const CLASS_DIAGRAM: &str = "\
@startuml
class Catalogue {
  +books : List<Book>
  +search(title : String) : List<Book>
}
class Book {
  -isbn : String
  -title : String
}
class Loan {
  +member : Member
  +record() : void
}
@enduml";

    pub const SEQUENCE_DIAGRAM: &str = "\
@startuml
actor Member
participant \"Catalogue\" as C
participant \"Loan Service\" as LS
Member -> C : search(title)
C --> Member : books
loop each copy
  alt available
    Member -> LS : borrow(book)
  else reserved
    LS --> Member : waitlist
  end
end
@enduml";

    /// Java implementation: `Catalogue` complete, `Book` lacks `title`, no `Loan`
    pub const SOURCE_BUNDLE: &str = "\
=== File: Book.java ===
public class Book {
    private String isbn;
}
=== File: Catalogue.java ===
import java.util.List;

public class Catalogue {
    private List<Book> books;

    public List<Book> search(String title) {
        return books;
    }
}
";

    pub fn use_case_document() -> RequirementDocument {
        RequirementDocument::parse(USE_CASE).unwrap()
    }

    pub fn requirement_items() -> Vec<RequirementItem> {
        use_case_document().itemize()
    }

    /// Both diagrams wrapped in prose, as a model would answer
    pub fn model_response() -> String {
        format!(
            "Here is the class diagram:\n\n{CLASS_DIAGRAM}\n\nAnd the sequence diagram:\n\n{SEQUENCE_DIAGRAM}\n"
        )
    }

    pub fn class_diagram() -> ClassDiagram {
        ClassDiagram::parse(CLASS_DIAGRAM)
    }

    pub fn sequence_diagram() -> SequenceDiagram {
        SequenceDiagram::parse(SEQUENCE_DIAGRAM)
    }

    pub fn source_bundle() -> SourceBundle {
        SourceBundle::from_marked_text(SOURCE_BUNDLE)
    }

    /// Sources with hand-written declarations, independent of tree-sitter
    pub fn parsed_sources() -> Vec<ParsedSource> {
        let bundle = source_bundle();
        let declarations = |file: &SourceFile| match file.filename.as_str() {
            "Book.java" => DeclarationIndex::new()
                .with(DeclarationKind::Type, "Book")
                .with(DeclarationKind::Field, "isbn"),
            "Catalogue.java" => DeclarationIndex::new()
                .with(DeclarationKind::Type, "Catalogue")
                .with(DeclarationKind::Field, "books")
                .with(DeclarationKind::Method, "search"),
            _ => DeclarationIndex::new(),
        };
        bundle
            .iter()
            .map(|file| ParsedSource::new(file.clone(), declarations(file)))
            .collect()
    }
}
