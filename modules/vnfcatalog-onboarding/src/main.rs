use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vnfcatalog_onboarding::{OnboardConfig, Onboarder, SubmissionOutcome, SubmissionRequest};

#[derive(Parser)]
#[command(name = "onboard-vnfd", about = "Onboard a VNF descriptor into the VNF catalog")]
struct Cli {
    /// Catalog entry name
    #[arg(long)]
    name: String,

    /// Catalog entry description
    #[arg(long)]
    description: Option<String>,

    /// TOSCA template file to upload (.yaml or .csar)
    #[arg(long, conflicts_with = "raw", required_unless_present = "raw")]
    file: Option<PathBuf>,

    /// TOSCA YAML given directly
    #[arg(long)]
    raw: Option<String>,
}

impl Cli {
    async fn into_request(self) -> Result<SubmissionRequest> {
        let request = match (self.file, self.raw) {
            (Some(path), _) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                SubmissionRequest::file(self.name, file_name, bytes)
            }
            (None, raw) => SubmissionRequest::raw(self.name, raw.unwrap_or_default()),
        };

        Ok(match self.description {
            Some(description) => request.with_description(description),
            None => request,
        })
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = OnboardConfig::from_env()?;
    let request = cli.into_request().await?;

    let onboarder = Onboarder::from_config(&config);
    match onboarder.submit(request).await {
        SubmissionOutcome::Success(onboarded) => {
            println!("{}", onboarded.descriptor);
            Ok(ExitCode::SUCCESS)
        }
        SubmissionOutcome::Failure(message) => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
    }
}
