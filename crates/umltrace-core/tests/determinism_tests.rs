use proptest::prelude::*;
use umltrace_core::{TraceConfig, TraceEngine};
use umltrace_reconcile::JsonTraceLinks;
use umltrace_test_utils::fixtures;
use umltrace_usecase::RequirementDocument;

fn word() -> impl Strategy<Value = String> {
    "[a-z]{2,8}"
}

fn line() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..5).prop_map(|words| words.join(" "))
}

prop_compose! {
    fn use_case()(
        actors in prop::collection::vec("[A-Z][a-z]{2,8}", 1..4),
        entries in prop::collection::vec(line(), 1..4),
        steps in prop::collection::vec(line(), 1..6),
        exits in prop::collection::vec(line(), 1..3),
        quality in prop::collection::vec(line(), 1..3),
        blank_after_actors in any::<bool>(),
    ) -> String {
        let mut text = String::from("UsecaseName: Generated\n");
        text.push_str("Description: The goal of this use case is to allow a user to act in order to gain value\n");
        text.push_str(&format!("Actors: {}\n", actors.join(", ")));
        if blank_after_actors {
            text.push('\n');
        }
        text.push_str("Entry Conditions:\n");
        for entry in &entries {
            text.push_str(&format!("the {entry} IS ready\n"));
        }
        text.push_str("Flow of Events:\n");
        for (i, step) in steps.iter().enumerate() {
            text.push_str(&format!("{}. {step}\n", i + 1));
        }
        text.push_str("Exit Conditions:\n");
        for exit in &exits {
            text.push_str(&format!("{exit}\n"));
        }
        text.push_str("Quality Requirement:\n");
        for q in &quality {
            text.push_str(&format!("{q}\n"));
        }
        text
    }
}

proptest! {
    #[test]
    fn itemization_is_deterministic(text in use_case()) {
        let first = RequirementDocument::parse(&text).unwrap().itemize();
        let second = RequirementDocument::parse(&text).unwrap().itemize();
        prop_assert_eq!(&first, &second);

        let ids: Vec<String> = first.iter().map(|item| item.id.to_string()).collect();
        let expected: Vec<String> = (0..first.len()).map(|i| format!("req_{i}")).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn rounds_are_reproducible(covered in prop::collection::vec(any::<bool>(), 10)) {
        let links = covered
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let elements = if *c { r#"["Catalogue"]"# } else { "[]" };
                format!(r#"{{"requirement": "req_{i}", "links": {elements}}}"#)
            })
            .collect::<Vec<_>>()
            .join(",");
        let json = format!("[{links}]");
        let matcher = JsonTraceLinks::new(json.clone(), json);
        let engine = TraceEngine::new(TraceConfig::new());

        let run = || {
            engine
                .run_round(
                    fixtures::USE_CASE,
                    &fixtures::model_response(),
                    &fixtures::source_bundle(),
                    &matcher,
                )
                .unwrap()
        };
        let first = run();
        let second = run();
        prop_assert_eq!(&first, &second);

        let uncovered = covered.iter().filter(|c| !**c).count();
        prop_assert_eq!(first.design_round.missing.class_diagram.len(), uncovered);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
