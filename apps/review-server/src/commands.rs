//! Offline subcommands: `check` and `correct`

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use correction_client::{request_correction, CorrectionError, GeminiClient};
use review_engine::ReviewEngine;
use shared_types::DocumentSet;
use tracing::{info, warn};

use crate::api::{FailedDocument, ReviewResponse};
use crate::report;
use crate::ServiceArgs;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// PDF files to review
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print the result as JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CorrectArgs {
    /// PDF file to correct
    pub file: PathBuf,

    #[command(flatten)]
    pub service: ServiceArgs,
}

/// Review PDF files on disk.
///
/// Unreadable files are reported and skipped; the rest are still reviewed.
/// Findings are not treated as failures.
pub fn check(engine: &ReviewEngine, args: &CheckArgs) -> anyhow::Result<()> {
    let mut documents = DocumentSet::new();
    let mut failures = Vec::new();

    for path in &args.files {
        let name = display_name(path);
        match shared_pdf::extract_file(path) {
            Ok(text) => {
                if documents.insert(name.clone(), text).is_some() {
                    warn!("{} given more than once; keeping the last copy", name);
                }
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                failures.push(FailedDocument {
                    name,
                    error: e.to_string(),
                });
            }
        }
    }

    info!("Reviewing {} of {} files", documents.len(), args.files.len());
    let outcome = engine.review(&documents);

    if args.json {
        let response = ReviewResponse::from_outcome(&outcome).with_failures(failures);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", report::render(&outcome));
        if !failures.is_empty() {
            println!("\nCould not read:");
            for failure in &failures {
                println!("  [??] {}: {}", failure.name, failure.error);
            }
        }
    }

    Ok(())
}

/// Print a suggested correction for one PDF
pub fn correct(args: &CorrectArgs) -> anyhow::Result<()> {
    let text = shared_pdf::extract_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let config = args.service.correction_config();
    let client = GeminiClient::new();

    match request_correction(&client, &config, &text) {
        Ok(corrected) => {
            println!("{}", corrected);
            Ok(())
        }
        Err(CorrectionError::MissingCredential) => {
            anyhow::bail!("No API key configured; pass --api-key or set GEMINI_API_KEY")
        }
        Err(e) => Err(e.into()),
    }
}

/// File name used to identify a record
fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
