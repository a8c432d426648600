//! CLI module for the document search service
//!
//! - `serve`: HTTP API server
//! - `ingest`: ingest one local file and print the result
//! - `search`: run one query and print the ranked passages

pub mod ingest;
pub mod search;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// RAG document search - ingest documents and query them by meaning
#[derive(Parser)]
#[command(name = "rag-docsearch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Ingest a local document
    Ingest(ingest::IngestArgs),

    /// Search indexed documents
    Search(search::SearchArgs),
}

/// Load `.env` and the layered configuration
fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    AppConfig::load().context("Failed to load configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_command() {
        let cli = Cli::try_parse_from(["rag-docsearch", "search", "안전 수칙", "--max-results", "3"])
            .unwrap();

        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "안전 수칙");
                assert_eq!(args.max_results, Some(3));
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_parse_ingest_command() {
        let cli = Cli::try_parse_from(["rag-docsearch", "ingest", "docs/manual.pdf"]).unwrap();

        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.path.to_str(), Some("docs/manual.pdf"));
                assert!(!args.include_embeddings);
            }
            _ => panic!("expected ingest command"),
        }
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["rag-docsearch"]).is_err());
    }
}
