//! Decoding tests for the analysis document contract.

use sopflow_core::procedure::Element;
use sopflow_parser::{
    DEFAULT_TITLE,
    error::{ErrorCode, ParseError},
    parse,
};

fn codes_and_paths(err: &ParseError) -> Vec<(Option<ErrorCode>, Option<String>)> {
    err.diagnostics()
        .iter()
        .map(|diag| (diag.code(), diag.path().map(str::to_string)))
        .collect()
}

#[test]
fn test_full_document() {
    let source = r#"{
        "title": "Customer Support Triage",
        "elements": [
            {"type": "step", "text": "Receive customer support email"},
            {
                "type": "decision",
                "text": "Check if the issue is billing-related",
                "decision": {
                    "question": "Is the issue billing-related?",
                    "branches": [
                        {"condition_label": "Yes", "steps": [{"type": "step", "text": "Assign to Billing Queue"}]},
                        {"condition_label": "No", "steps": [{"type": "step", "text": "Assign to General Support Queue"}]}
                    ]
                }
            },
            {"type": "step", "text": "Send acknowledgment email to customer"}
        ]
    }"#;

    let procedure = parse(source).expect("valid document");

    assert_eq!(procedure.title(), "Customer Support Triage");
    assert_eq!(procedure.elements().len(), 3);

    let Element::Decision(decision) = &procedure.elements()[1] else {
        panic!("second element should be a decision");
    };
    assert_eq!(decision.question(), "Is the issue billing-related?");
    assert_eq!(decision.branches().len(), 2);
    assert_eq!(decision.branches()[0].condition_label(), "Yes");
    assert_eq!(
        decision.branches()[1].steps(),
        &[Element::step("Assign to General Support Queue")]
    );
}

#[test]
fn test_missing_optional_fields_default() {
    let source = r#"{
        "elements": [
            {"type": "step"},
            {"type": "decision", "text": "Urgent?", "decision": {"branches": [{"steps": []}, {}]}}
        ]
    }"#;

    let procedure = parse(source).expect("optional fields may be missing");

    assert_eq!(procedure.title(), DEFAULT_TITLE);
    assert_eq!(procedure.elements()[0], Element::step(""));

    let Element::Decision(decision) = &procedure.elements()[1] else {
        panic!("second element should be a decision");
    };
    // The question falls back to the element text
    assert_eq!(decision.question(), "Urgent?");
    assert_eq!(decision.branches().len(), 2);
    assert!(
        decision
            .branches()
            .iter()
            .all(|b| b.condition_label().is_empty() && b.steps().is_empty())
    );
}

#[test]
fn test_empty_document() {
    let procedure = parse("{}").expect("empty object is a valid document");
    assert!(procedure.elements().is_empty());
}

#[test]
fn test_missing_type_is_an_error() {
    let source = r#"{"elements": [{"type": "step", "text": "ok"}, {"text": "no type"}]}"#;

    let err = parse(source).unwrap_err();

    assert_eq!(
        codes_and_paths(&err),
        [(Some(ErrorCode::E200), Some("elements[1]".to_string()))]
    );
}

#[test]
fn test_unknown_type_is_an_error() {
    let source = r#"{"elements": [{"type": "loop", "text": "repeat"}]}"#;

    let err = parse(source).unwrap_err();

    assert_eq!(
        codes_and_paths(&err),
        [(Some(ErrorCode::E201), Some("elements[0].type".to_string()))]
    );
}

#[test]
fn test_decision_without_structure_is_an_error() {
    let source = r#"{"elements": [{"type": "decision", "text": "Approved?"}]}"#;

    let err = parse(source).unwrap_err();

    assert_eq!(
        codes_and_paths(&err),
        [(Some(ErrorCode::E202), Some("elements[0]".to_string()))]
    );
}

#[test]
fn test_nested_error_reports_full_path() {
    let source = r#"{
        "elements": [
            {"type": "step", "text": "first"},
            {
                "type": "decision",
                "decision": {
                    "question": "Q?",
                    "branches": [
                        {"condition_label": "Yes", "steps": [
                            {"type": "step", "text": "fine"},
                            {"type": "step", "text": "fine"},
                            {"text": "missing type"}
                        ]}
                    ]
                }
            }
        ]
    }"#;

    let err = parse(source).unwrap_err();

    assert_eq!(
        codes_and_paths(&err),
        [(
            Some(ErrorCode::E200),
            Some("elements[1].decision.branches[0].steps[2]".to_string())
        )]
    );
}

#[test]
fn test_all_structural_errors_reported_together() {
    let source = r#"{"elements": [{"text": "a"}, {"type": "decision"}, 42]}"#;

    let err = parse(source).unwrap_err();

    assert_eq!(
        codes_and_paths(&err),
        [
            (Some(ErrorCode::E200), Some("elements[0]".to_string())),
            (Some(ErrorCode::E202), Some("elements[1]".to_string())),
            (Some(ErrorCode::E204), Some("elements[2]".to_string())),
        ]
    );
}

#[test]
fn test_wrong_field_type_is_not_coerced() {
    let source = r#"{"elements": [{"type": "decision", "decision": {"branches": "yes"}}]}"#;

    let err = parse(source).unwrap_err();

    assert_eq!(
        codes_and_paths(&err),
        [(
            Some(ErrorCode::E203),
            Some("elements[0].decision.branches".to_string())
        )]
    );
}

#[test]
fn test_non_object_root() {
    let err = parse("[1, 2, 3]").unwrap_err();
    assert_eq!(codes_and_paths(&err), [(Some(ErrorCode::E101), None)]);
}

#[test]
fn test_step_with_decision_is_a_warning_only() {
    let source = r#"{"elements": [{"type": "step", "text": "x", "decision": {}}]}"#;

    let procedure = parse(source).expect("warnings do not reject the document");
    assert_eq!(procedure.elements(), &[Element::step("x")]);
}

mod proptest_tests {
    use proptest::prelude::*;

    use sopflow_parser::{parse, strip_code_fences};

    proptest! {
        #[test]
        fn parse_never_panics(source in ".*") {
            let _ = parse(&source);
        }

        #[test]
        fn fenced_and_bare_documents_decode_alike(title in "[A-Za-z ]{0,20}") {
            let bare = format!(r#"{{"title": "{title}", "elements": [{{"type": "step", "text": "s"}}]}}"#);
            let fenced = format!("```json\n{bare}\n```");

            let from_bare = parse(strip_code_fences(&bare)).expect("bare document decodes");
            let from_fenced = parse(strip_code_fences(&fenced)).expect("fenced document decodes");
            prop_assert_eq!(from_bare, from_fenced);
        }
    }
}
