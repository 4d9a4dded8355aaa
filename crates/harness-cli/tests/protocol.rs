//! Integration test: drive the command loop in memory, line by line, the
//! way the orchestrator drives a harness process.

use harness_cli::{serve, ReplaySource, Session};
use harness_core::ProtocolError;
use proptest::prelude::*;
use serde_json::{json, Value};

const DRAFT_2020: &str = "https://json-schema.org/draft/2020-12/schema";

/// Feed `lines` through a fresh session; return what was written and the
/// loop's result.
fn drive(lines: &[String]) -> (Vec<Value>, Result<(), ProtocolError>) {
    let mut session = Session::new();
    let mut source = ReplaySource::from_text(&lines.join("\n"));
    let mut out = Vec::new();
    let result = serve(&mut session, &mut source, &mut out);
    let text = String::from_utf8(out).unwrap();
    let responses = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (responses, result)
}

fn line(value: Value) -> String {
    value.to_string()
}

fn start() -> String {
    line(json!({"cmd": "start", "version": 1}))
}

fn dialect(uri: &str) -> String {
    line(json!({"cmd": "dialect", "dialect": uri}))
}

fn stop() -> String {
    line(json!({"cmd": "stop"}))
}

#[test]
fn end_to_end_scenario() {
    let (responses, result) = drive(&[
        start(),
        dialect(DRAFT_2020),
        line(json!({
            "cmd": "run",
            "seq": 1,
            "case": {
                "description": "type",
                "schema": {"type": "string"},
                "tests": [
                    {"description": "a string", "instance": "x"},
                    {"description": "a number", "instance": 5}
                ]
            }
        })),
        stop(),
    ]);
    result.unwrap();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["version"], 1);
    assert_eq!(responses[1], json!({"ok": true}));
    assert_eq!(
        responses[2],
        json!({"seq": 1, "results": [{"valid": true}, {"valid": false}]})
    );
}

#[test]
fn start_announces_stable_dialect_list() {
    let (first, _) = drive(&[start()]);
    let (second, _) = drive(&[start()]);
    let dialects = &first[0]["implementation"]["dialects"];
    assert!(!dialects.as_array().unwrap().is_empty());
    assert_eq!(dialects, &second[0]["implementation"]["dialects"]);
    assert!(dialects
        .as_array()
        .unwrap()
        .contains(&Value::String(DRAFT_2020.into())));
}

#[test]
fn dialect_before_start_writes_nothing() {
    let (responses, result) = drive(&[dialect(DRAFT_2020)]);
    assert!(responses.is_empty());
    assert!(matches!(result, Err(ProtocolError::NotStarted { .. })));
}

#[test]
fn run_before_start_writes_nothing() {
    let (responses, result) = drive(&[line(json!({
        "cmd": "run", "seq": 1,
        "case": {"description": "d", "schema": {}, "tests": []}
    }))]);
    assert!(responses.is_empty());
    assert!(matches!(result, Err(ProtocolError::NotStarted { .. })));
}

#[test]
fn run_before_dialect_is_fatal_after_ack() {
    let (responses, result) = drive(&[
        start(),
        line(json!({
            "cmd": "run", "seq": 1,
            "case": {"description": "d", "schema": {}, "tests": []}
        })),
    ]);
    assert_eq!(responses.len(), 1, "only the start ack is written");
    assert!(matches!(result, Err(ProtocolError::DialectNotSelected)));
}

#[test]
fn malformed_command_aborts_without_output() {
    let (responses, result) = drive(&[start(), line(json!({"cmd": "dialect"})), stop()]);
    assert_eq!(responses.len(), 1);
    assert!(matches!(result, Err(ProtocolError::Decode(_))));
}

#[test]
fn unknown_command_aborts() {
    let (_, result) = drive(&[start(), line(json!({"cmd": "restart"}))]);
    assert!(matches!(result, Err(ProtocolError::Decode(_))));
}

#[test]
fn unknown_version_aborts() {
    let (responses, result) = drive(&[line(json!({"cmd": "start", "version": 2}))]);
    assert!(responses.is_empty());
    assert!(matches!(result, Err(ProtocolError::UnknownVersion { .. })));
}

#[test]
fn unknown_dialect_aborts() {
    let (responses, result) = drive(&[start(), dialect("https://example.com/nope")]);
    assert_eq!(responses.len(), 1);
    assert!(matches!(result, Err(ProtocolError::UnknownDialect(_))));
}

#[test]
fn stop_ends_loop_and_ignores_the_rest() {
    let (responses, result) = drive(&[start(), stop(), line(json!({"cmd": "garbage"}))]);
    result.unwrap();
    assert_eq!(responses.len(), 1);
}

#[test]
fn empty_line_ends_loop_silently() {
    let (responses, result) = drive(&[start(), String::new(), dialect(DRAFT_2020)]);
    result.unwrap();
    assert_eq!(responses.len(), 1);
}

#[test]
fn null_line_is_skipped() {
    let (responses, result) = drive(&[start(), "null".to_string(), dialect(DRAFT_2020)]);
    result.unwrap();
    assert_eq!(responses.len(), 2);
}

#[test]
fn registry_reference_validates() {
    let case = json!({
        "description": "remote ref",
        "schema": {
            "$schema": DRAFT_2020,
            "properties": {"n": {"$ref": "http://localhost:1234/draft2020-12/integer.json"}}
        },
        "registry": {
            "http://localhost:1234/draft2020-12/integer.json": {
                "$schema": DRAFT_2020,
                "type": "integer"
            }
        },
        "tests": [
            {"description": "integer is valid", "instance": {"n": 1}},
            {"description": "string is invalid", "instance": {"n": "a"}}
        ]
    });
    let (responses, result) = drive(&[
        start(),
        dialect(DRAFT_2020),
        line(json!({"cmd": "run", "seq": "r1", "case": case})),
    ]);
    result.unwrap();
    assert_eq!(
        responses[2],
        json!({"seq": "r1", "results": [{"valid": true}, {"valid": false}]})
    );
}

#[test]
fn removing_registry_entry_never_yields_false_positive() {
    let case = json!({
        "description": "remote ref",
        "schema": {"$ref": "http://localhost:1234/draft2020-12/integer.json"},
        "tests": [{"description": "integer", "instance": 1}]
    });
    let (responses, result) = drive(&[
        start(),
        dialect(DRAFT_2020),
        line(json!({"cmd": "run", "seq": 5, "case": case})),
    ]);
    result.unwrap();
    let outcome = &responses[2];
    assert_eq!(outcome["seq"], 5);
    if outcome.get("errored").is_none() {
        assert_eq!(outcome["results"], json!([{"valid": false}]));
    }
}

#[test]
fn failing_unsupported_case_is_skipped() {
    let case = json!({
        "description": "ignore unrecognized optional vocabulary",
        "schema": {"type": 12},
        "tests": [
            {"description": "string value", "instance": "foobar"},
            {"description": "number value", "instance": 20}
        ]
    });
    let (responses, result) = drive(&[
        start(),
        dialect(DRAFT_2020),
        line(json!({"cmd": "run", "seq": 3, "case": case})),
    ]);
    result.unwrap();
    assert_eq!(
        responses[2],
        json!({"seq": 3, "skipped": true, "message": "We do not support optional vocabularies"})
    );
}

#[test]
fn failing_case_is_errored_and_loop_continues() {
    let broken = json!({
        "description": "broken",
        "schema": {"type": 12},
        "tests": [{"description": "one", "instance": 1}]
    });
    let fine = json!({
        "description": "fine",
        "schema": {},
        "tests": [{"description": "one", "instance": 1}]
    });
    let (responses, result) = drive(&[
        start(),
        dialect(DRAFT_2020),
        line(json!({"cmd": "run", "seq": 1, "case": broken})),
        line(json!({"cmd": "run", "seq": 2, "case": fine})),
        stop(),
    ]);
    result.unwrap();
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[2]["seq"], 1);
    assert_eq!(responses[2]["errored"], true);
    assert!(responses[2]["context"]["message"].is_string());
    assert!(responses[2]["context"]["traceback"].is_string());
    assert_eq!(responses[3], json!({"seq": 2, "results": [{"valid": true}]}));
}

#[test]
fn looping_refs_are_errored_and_loop_continues() {
    let looping = json!({
        "description": "looping refs",
        "schema": {
            "$defs": {"a": {"$ref": "#/$defs/b"}, "b": {"$ref": "#/$defs/a"}},
            "$ref": "#/$defs/a"
        },
        "tests": [{"description": "one", "instance": 1}]
    });
    let fine = json!({
        "description": "fine",
        "schema": {"type": "integer"},
        "tests": [{"description": "one", "instance": 1}]
    });
    let (responses, result) = drive(&[
        start(),
        dialect(DRAFT_2020),
        line(json!({"cmd": "run", "seq": 1, "case": looping})),
        line(json!({"cmd": "run", "seq": 2, "case": fine})),
        stop(),
    ]);
    result.unwrap();
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[2]["errored"], true);
    let message = responses[2]["context"]["message"].as_str().unwrap();
    assert!(message.contains("$ref cycle"), "{message}");
    assert_eq!(responses[3], json!({"seq": 2, "results": [{"valid": true}]}));
}

#[test]
fn identical_case_twice_gives_identical_results() {
    let case = json!({
        "description": "enum",
        "schema": {"enum": [1, "a", null]},
        "tests": [
            {"description": "1", "instance": 1},
            {"description": "b", "instance": "b"},
            {"description": "null", "instance": null}
        ]
    });
    let (responses, result) = drive(&[
        start(),
        dialect(DRAFT_2020),
        line(json!({"cmd": "run", "seq": 1, "case": case.clone()})),
        line(json!({"cmd": "run", "seq": 1, "case": case})),
    ]);
    result.unwrap();
    assert_eq!(responses[2], responses[3]);
    assert_eq!(
        responses[2]["results"],
        json!([{"valid": true}, {"valid": false}, {"valid": true}])
    );
}

#[test]
fn format_policy_follows_selected_dialect() {
    let case = json!({
        "description": "email format",
        "schema": {"format": "email"},
        "tests": [{"description": "not an email", "instance": "nope"}]
    });
    let (responses, result) = drive(&[
        start(),
        dialect("http://json-schema.org/draft-07/schema#"),
        line(json!({"cmd": "run", "seq": 1, "case": case.clone()})),
        dialect(DRAFT_2020),
        line(json!({"cmd": "run", "seq": 2, "case": case})),
    ]);
    result.unwrap();
    assert_eq!(responses[2]["results"], json!([{"valid": false}]));
    assert_eq!(responses[4]["results"], json!([{"valid": true}]));
}

fn seq_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        any::<u32>().prop_map(|n| json!(f64::from(n) + 0.5)),
        "[ -~]{0,24}".prop_map(Value::String),
        Just(Value::Null),
        prop::collection::vec("[a-z]{1,6}", 0..4).prop_map(|v| json!(v)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The outcome's seq is the input's seq, whatever its shape.
    #[test]
    fn seq_round_trips(seq in seq_value()) {
        let (responses, result) = drive(&[
            start(),
            dialect(DRAFT_2020),
            line(json!({
                "cmd": "run",
                "seq": seq.clone(),
                "case": {"description": "d", "schema": {}, "tests": [{"description": "t", "instance": 0}]}
            })),
        ]);
        prop_assert!(result.is_ok());
        prop_assert_eq!(&responses[2]["seq"], &seq);
    }
}
