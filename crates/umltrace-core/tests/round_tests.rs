use pretty_assertions::assert_eq;
use umltrace_core::{TraceConfig, TraceEngine};
use umltrace_diagram::{BlockKind, ClassDiagram, MessageKind, SequenceDiagram, Visibility};
use umltrace_reconcile::{
    missing_requirement_links, DesignDiagrams, DiagramKind, JsonTraceLinks, MissingMember,
    SequenceGap, TraceLink,
};
use umltrace_source::SourceBundle;
use umltrace_test_utils::fixtures;
use umltrace_usecase::RequirementId;

#[test]
fn test_full_round_on_library_fixture() {
    let class_links = r#"[
        {"requirement": "req_0", "links": ["Catalogue", "Loan"]},
        {"requirement": "req_1", "links": ["Loan"]}
    ]"#;
    let sequence_links = r#"```json
[{"requirement": "req_0", "links": ["m1", "m3"]}, {"requirement": "req_1", "links": []}]
```"#;
    let matcher = JsonTraceLinks::new(class_links, sequence_links);
    let engine = TraceEngine::new(TraceConfig::new());

    let outcome = engine
        .run_round(
            fixtures::USE_CASE,
            &fixtures::model_response(),
            &fixtures::source_bundle(),
            &matcher,
        )
        .unwrap();

    // requirement→design
    let missing = &outcome.design_round.missing;
    let class_missing: Vec<usize> = missing.class_diagram.iter().map(|i| i.id.index()).collect();
    let sequence_missing: Vec<usize> = missing.sequence_diagram.iter().map(|i| i.id.index()).collect();
    assert_eq!(class_missing, (2..10).collect::<Vec<_>>());
    assert_eq!(sequence_missing, (1..10).collect::<Vec<_>>());

    // design→code
    let report = &outcome.code_round.report;
    let gaps: Vec<&str> = report.class_diagram.iter().map(|g| g.node.id.as_str()).collect();
    assert_eq!(gaps, vec!["Book", "Loan"]);

    let book = &report.class_diagram[0];
    assert_eq!(book.linked_file.as_deref(), Some("Book.java"));
    assert_eq!(book.missing_members.len(), 1);
    assert!(matches!(&book.missing_members[0], MissingMember::Attribute(a) if a.name == "title"));
    assert_eq!(report.class_diagram[1].linked_file, None);

    let sequence_gaps: Vec<String> = report
        .sequence_diagram
        .iter()
        .map(|gap| match gap {
            SequenceGap::Participant(node) => node.id.clone(),
            SequenceGap::Message(message) => message.id.to_string(),
        })
        .collect();
    assert_eq!(sequence_gaps, vec!["Member", "LS", "m3", "m4"]);

    assert!(!outcome.is_converged());
}

#[test]
fn test_class_with_missing_method_is_linked_but_incomplete() {
    let design = DesignDiagrams {
        class_diagram: ClassDiagram::parse("class Foo { +bar : int \n +baz() : void }"),
        sequence_diagram: SequenceDiagram::default(),
    };
    let sources = SourceBundle::from_marked_text("=== File: Foo.java ===\nclass Foo {\n    int bar;\n}\n");

    let round = TraceEngine::default().code_round(&design, &sources).unwrap();
    let record = &round.traceability.classes[0];
    assert_eq!(record.element_id, "Foo");
    assert_eq!(record.linked_file.as_deref(), Some("Foo.java"));
    assert!(!record.linked);

    let gap = &round.report.class_diagram[0];
    assert_eq!(gap.missing_members.len(), 1);
    match &gap.missing_members[0] {
        MissingMember::Method(method) => {
            assert_eq!(method.name, "baz");
            assert_eq!(method.return_type, "void");
        }
        other => panic!("expected method, got {other:?}"),
    }
}

#[test]
fn test_class_body_attribute_and_method() {
    let diagram = ClassDiagram::parse("class Foo {\n  attr1 : int\n  doStuff(x : int) : bool\n}");
    assert_eq!(diagram.len(), 1);

    let foo = diagram.node("Foo").unwrap();
    assert_eq!(foo.attributes.len(), 1);
    assert_eq!(foo.attributes[0].name, "attr1");
    assert_eq!(foo.attributes[0].ty, "int");
    assert_eq!(foo.methods.len(), 1);

    let method = &foo.methods[0];
    assert_eq!(method.name, "doStuff");
    assert_eq!(method.parameters.len(), 1);
    assert_eq!(method.parameters[0].name, "x");
    assert_eq!(method.parameters[0].ty, "int");
    assert_eq!(method.return_type, "bool");
    assert_eq!(method.visibility, Visibility::Public);
}

#[test]
fn test_async_message() {
    let diagram = SequenceDiagram::parse("Alice ->> Bob : hello()");
    assert_eq!(diagram.messages.len(), 1);

    let message = &diagram.messages[0];
    assert_eq!(message.kind, MessageKind::Async);
    assert_eq!(message.sender, "Alice");
    assert_eq!(message.receiver, "Bob");
    assert_eq!(message.text, "hello()");
}

#[test]
fn test_unmatched_end_is_a_no_op() {
    let with_end = SequenceDiagram::parse("A -> B : one\nend\nloop again\nB -> A : two\nend\nend");
    let without = SequenceDiagram::parse("A -> B : one\nloop again\nB -> A : two\nend");
    assert_eq!(with_end.control_flows, without.control_flows);
    assert_eq!(with_end.messages, without.messages);
    assert!(with_end.others.is_empty());
}

#[test]
fn test_alt_nested_in_loop() {
    let diagram = SequenceDiagram::parse(
        "loop retry\n  A -> B : try\n  alt ok\n    B --> A : done\n  else failed\n    B --> A : error\n  end\nend",
    );
    assert_eq!(diagram.control_flows.len(), 1);

    let outer = &diagram.control_flows[0];
    assert_eq!(outer.kind, BlockKind::Loop);
    assert_eq!(outer.branches.len(), 1);

    let nested = &outer.branches[0].nested_control_flows;
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0].kind, BlockKind::Alt);
    assert_eq!(nested[0].branches.len(), 2);
    assert_eq!(nested[0].branches[1].condition, "failed");
}

#[test]
fn test_empty_sequence_link_reports_item_there_only() {
    let items = fixtures::requirement_items();
    let first = &items[..1];
    let links = vec![
        TraceLink::new(RequirementId::new(0), DiagramKind::Class, ["Catalogue"]),
        TraceLink::new(RequirementId::new(0), DiagramKind::Sequence, Vec::<String>::new()),
    ];

    let report = missing_requirement_links(first, &links);
    assert!(report.class_diagram.is_empty());
    assert_eq!(
        report.missing_texts(DiagramKind::Sequence),
        vec![items[0].content()]
    );
}

#[test]
fn test_sources_loaded_from_directory() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir_all(dir.path().join("src/model"))?;
    std::fs::write(
        dir.path().join("src/model/Catalogue.java"),
        "public class Catalogue { private java.util.List<Book> books; public java.util.List<Book> search(String title) { return books; } }",
    )?;
    std::fs::write(dir.path().join("src/model/Book.kt"), "class Book(val isbn: String, val title: String)")?;
    std::fs::write(dir.path().join("README.md"), "Book Loan Catalogue")?;

    let engine = TraceEngine::new(TraceConfig::new().with_extensions(["java", "kt"]));
    let bundle = engine.load_sources(dir.path())?;
    let names: Vec<&str> = bundle.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["src/model/Book.kt", "src/model/Catalogue.java"]);

    let design = DesignDiagrams {
        class_diagram: fixtures::class_diagram(),
        sequence_diagram: fixtures::sequence_diagram(),
    };
    let round = engine.code_round(&design, &bundle)?;

    // no Kotlin grammar, so Book is never declared
    let catalogue = round.traceability.record("Catalogue").unwrap();
    assert!(catalogue.linked);
    assert_eq!(catalogue.linked_file.as_deref(), Some("src/model/Catalogue.java"));
    assert_eq!(round.traceability.record("Book").unwrap().linked_file, None);
    Ok(())
}

#[test]
fn test_notes_excluded_by_config() {
    let design = DesignDiagrams {
        class_diagram: ClassDiagram::default(),
        sequence_diagram: SequenceDiagram::parse("participant Catalogue\nnote over Catalogue : cached for an hour"),
    };
    let sources = fixtures::source_bundle();

    let with_notes = TraceEngine::default().code_round(&design, &sources).unwrap();
    assert!(!with_notes.is_converged());

    let engine = TraceEngine::new(TraceConfig::new().with_include_notes(false));
    let without = engine.code_round(&design, &sources).unwrap();
    assert!(without.traceability.messages.is_empty());
    assert!(without.is_converged());
}
