//! Ingest command - runs one local file through the ingestion pipeline

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::api::types::UploadResponse;
use crate::domain::RawDocument;
use crate::infrastructure::logging;

/// Arguments for the ingest command
#[derive(Args, Clone, Debug)]
pub struct IngestArgs {
    /// Path to a pdf, txt or docx file
    pub path: PathBuf,

    /// Keep embedding vectors in the printed result
    #[arg(long)]
    pub include_embeddings: bool,
}

/// Ingest the file and print the upload result as JSON
pub async fn run(args: IngestArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    logging::init_logging(&config.logging);

    let services = crate::create_services(&config).await?;

    let filename = args
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .context("Path has no usable file name")?
        .to_string();

    let bytes = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("Failed to read {}", args.path.display()))?;

    info!(filename = %filename, size = bytes.len(), "Ingesting file");

    let result = services
        .ingestion
        .ingest(RawDocument::new(filename, bytes))
        .await?;

    let mut response = UploadResponse::from(result);

    if !args.include_embeddings {
        for chunk in &mut response.chunks {
            chunk.embedding = None;
        }
    }

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
