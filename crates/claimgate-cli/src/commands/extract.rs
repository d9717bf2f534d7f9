use crate::support::{print_json_or_exit, read_text_or_exit};
use claimgate_extract::extract_claims;
use claimgate_log::{RunLogger, input_hash};
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;

pub struct Args {
    pub input: PathBuf,
    pub latex: Vec<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub run_id: Option<String>,
    pub json: bool,
}

pub fn run(args: Args) {
    let text = read_text_or_exit(&args.input);
    let latex_blocks = args
        .latex
        .iter()
        .map(|path| read_text_or_exit(path))
        .collect::<Vec<_>>();
    let drafts = extract_claims(&text, latex_blocks.as_slice());
    debug!(
        input = %args.input.display(),
        latex_blocks = latex_blocks.len(),
        drafts = drafts.len(),
        "extracted claim drafts"
    );

    if let Some(dir) = &args.log_dir {
        RunLogger::new(dir, args.run_id.clone())
            .log_extraction(&text, &drafts)
            .unwrap_or_else(|e| {
                eprintln!("error: failed to write extraction log: {e}");
                std::process::exit(1);
            });
    }

    if args.json {
        let payload = json!({
            "schema": 1,
            "inputPath": args.input.display().to_string(),
            "inputHash": input_hash(&text),
            "claimCount": drafts.len(),
            "claims": drafts,
        });
        print_json_or_exit(&payload);
        return;
    }

    println!("[extract] {} claim draft(s)", drafts.len());
    for draft in &drafts {
        match draft.claim_span() {
            Some((start, end)) => println!(
                "  - [{}] {} ({start}..{end})",
                draft.suggested_label(),
                draft.statement()
            ),
            None => println!("  - [{}] {}", draft.suggested_label(), draft.statement()),
        }
    }
}
