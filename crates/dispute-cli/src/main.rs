//! Dispute CLI: file a dispute request from the command line.
//!
//! Configuration comes from the environment (DISPUTE_ENDPOINT_URL and the
//! DISPUTE_STORAGE_* variables), optionally through a `.env` file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use dispute_cli::{
    describe_fields, init_tracing, load_attachment, load_form, preview_paths, OutcomeReport,
};
use dispute_core::constants::ATTACHMENT_ADVICE;
use dispute_core::DisputeConfig;
use dispute_services::SubmissionPipeline;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dispute", about = "File logistics dispute requests")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a dispute with its supporting files
    Submit {
        /// JSON object with the form values, keyed by field name
        #[arg(long, value_name = "FILE")]
        form: PathBuf,
        /// File to attach (repeat for several files)
        #[arg(long = "attach", value_name = "FILE")]
        attachments: Vec<PathBuf>,
    },
    /// Preview the storage paths of a submission without uploading anything
    Paths {
        /// Bill of lading or container number
        #[arg(long)]
        shipment: String,
        /// File names, in attachment order
        files: Vec<String>,
    },
    /// List the form fields
    Fields,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Submit { form, attachments } => {
            let config = DisputeConfig::from_env()
                .context("Failed to load configuration. Set DISPUTE_ENDPOINT_URL")?;
            let pipeline = SubmissionPipeline::from_config(&config).await?;

            let json = tokio::fs::read_to_string(&form)
                .await
                .with_context(|| format!("Failed to read {}", form.display()))?;
            let mut dispute = load_form(&json)?;

            let mut selection = Vec::with_capacity(attachments.len());
            for path in &attachments {
                selection.push(load_attachment(path).await?);
            }
            dispute.add_files(&mut selection)?;

            if let Some(blocker) = dispute.submit_blocker() {
                tracing::warn!(%blocker, "Form is incomplete");
            }

            let outcome = pipeline.submit(&mut dispute).await?;
            print_json(&OutcomeReport::from(&outcome))?;

            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Paths { shipment, files } => {
            print_json(&preview_paths(&shipment, &files))?;
        }
        Commands::Fields => {
            print_json(&serde_json::json!({
                "fields": describe_fields(),
                "attachmentAdvice": ATTACHMENT_ADVICE,
            }))?;
        }
    }

    Ok(())
}
