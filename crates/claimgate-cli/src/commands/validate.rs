use crate::support::{load_report_or_exit, print_json_or_exit};
use claimgate_kernel::structure::{StructureReport, validate};
use serde_json::json;
use std::path::PathBuf;

pub fn run(report_path: PathBuf, json_output: bool) {
    let report = load_report_or_exit(&report_path, json_output);
    let structure = validate(&report);

    if json_output {
        let payload = json!({
            "schema": 1,
            "reportPath": report_path.display().to_string(),
            "reportId": report.report_id().map(|id| id.as_str()),
            "checkKind": structure.check_kind,
            "result": structure.result,
            "failureClasses": structure.failure_classes,
            "findings": structure.findings,
            "summary": structure.summary,
        });
        print_json_or_exit(&payload);
    } else {
        render_text(&structure);
    }

    if !structure.is_valid() {
        std::process::exit(1);
    }
}

pub(crate) fn render_text(structure: &StructureReport) {
    let summary = &structure.summary;
    println!(
        "[structure] {} (claims={}, steps={}, evidence={}, findings={})",
        if structure.is_valid() { "OK" } else { "FAIL" },
        summary.claim_count,
        summary.step_count,
        summary.evidence_count,
        summary.finding_count
    );
    for finding in &structure.findings {
        println!("  - {finding}");
    }
}
