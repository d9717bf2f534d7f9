use crate::support::{load_report_or_exit, print_json_or_exit};
use claimgate_kernel::gate::{DEFAULT_UNSUPPORTED_SAMPLE_LIMIT, GatePolicy, decide, support_summary};
use claimgate_kernel::structure::validate;
use claimgate_log::RunLogger;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

pub struct Args {
    pub report: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub run_id: Option<String>,
    pub unsupported_sample_limit: Option<usize>,
    pub json: bool,
}

pub fn run(args: Args) {
    let report = load_report_or_exit(&args.report, args.json);
    let structure = validate(&report);
    let policy = GatePolicy {
        unsupported_sample_limit: args
            .unsupported_sample_limit
            .unwrap_or(DEFAULT_UNSUPPORTED_SAMPLE_LIMIT),
    };
    let decision = decide(&report, &structure, &policy);
    let support = support_summary(&report);
    info!(
        report = %args.report.display(),
        can_finalize = decision.is_final_eligible(),
        reasons = decision.reasons().len(),
        "finalization decided"
    );

    let digest = args.log_dir.as_ref().map(|dir| {
        let logger = RunLogger::new(dir, args.run_id.clone());
        logger
            .log_finalization(&report, &structure, &decision)
            .unwrap_or_else(|e| {
                eprintln!("error: failed to write finalization log: {e}");
                std::process::exit(1);
            })
    });

    if args.json {
        let payload = json!({
            "schema": 1,
            "reportPath": args.report.display().to_string(),
            "reportId": report.report_id().map(|id| id.as_str()),
            "canFinalize": decision.is_final_eligible(),
            "decision": decision,
            "policy": policy,
            "structure": {
                "result": structure.result,
                "failureClasses": structure.failure_classes,
            },
            "support": {
                "totalClaims": support.total_claims,
                "nonSpeculativeClaims": support.non_speculative,
                "unsupportedClaims": support.unsupported.len(),
                "unsupportedClaimRate": support.rate(),
            },
            "reportDigest": digest,
        });
        print_json_or_exit(&payload);
    } else {
        if decision.is_final_eligible() {
            println!("[finalize] FINAL-ELIGIBLE");
        } else {
            println!("[finalize] BLOCKED ({} reasons)", decision.reasons().len());
            for reason in decision.reasons() {
                println!("  {reason}");
            }
        }
        if let Some(digest) = &digest {
            println!("logged: {digest}");
        }
    }

    if !decision.is_final_eligible() {
        std::process::exit(1);
    }
}
