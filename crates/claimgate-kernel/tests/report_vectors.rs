//! Integration tests: run report vectors end to end.
//!
//! Each fixture in tests/fixtures/ has:
//! - case.json: `{"report": <wire document>}`
//! - expect.json: where the pipeline stopped and what it produced
//!
//! A report that fails at the wire boundary never reaches the validator, so
//! parse-stage expectations carry only the error category and path.

use claimgate_kernel::gate::{GatePolicy, decide};
use claimgate_kernel::structure::validate;
use claimgate_kernel::wire::parse_report;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load(path: &Path) -> Value {
    let name = path.display();
    let raw = std::fs::read_to_string(path).unwrap_or_else(|e| panic!("cannot read {name}: {e}"));
    serde_json::from_str(&raw).unwrap_or_else(|e| panic!("cannot parse {name}: {e}"))
}

fn run_pipeline(case: &Value) -> Value {
    let report = match parse_report(&case["report"]) {
        Ok(report) => report,
        Err(err) => {
            return json!({
                "stage": "parse",
                "category": err.category(),
                "path": err.path(),
            });
        }
    };
    let structure = validate(&report);
    let decision = decide(&report, &structure, &GatePolicy::default());
    json!({
        "stage": "gate",
        "structureResult": structure.result,
        "failureClasses": structure.failure_classes,
        "decision": decision,
    })
}

fn run_fixture(name: &str) {
    let dir = fixtures_dir().join(name);
    let case = load(&dir.join("case.json"));
    let expected = load(&dir.join("expect.json"));

    let result = run_pipeline(&case);
    assert_eq!(
        result,
        expected,
        "\n\nFixture: {name}\n\nGot:\n{}\n\nExpected:\n{}\n",
        serde_json::to_string_pretty(&result).unwrap(),
        serde_json::to_string_pretty(&expected).unwrap(),
    );

    // Same input, same outcome.
    assert_eq!(
        run_pipeline(&case),
        result,
        "fixture {name} is not deterministic"
    );
}

#[test]
fn golden_derived_with_evidence() {
    run_fixture("golden_derived_with_evidence");
}

#[test]
fn adversarial_lowercase_label() {
    run_fixture("adversarial_lowercase_label");
}

#[test]
fn adversarial_invisible_evidence_id() {
    run_fixture("adversarial_invisible_evidence_id");
}

#[test]
fn adversarial_duplicate_claim_owner() {
    run_fixture("adversarial_duplicate_claim_owner");
}

#[test]
fn golden_speculative_without_evidence() {
    run_fixture("golden_speculative_without_evidence");
}

#[test]
fn adversarial_zero_claims() {
    run_fixture("adversarial_zero_claims");
}

#[test]
fn adversarial_source_kind_mismatch() {
    run_fixture("adversarial_source_kind_mismatch");
}
