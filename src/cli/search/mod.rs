//! Search command - runs one query against the index

use clap::Args;

use crate::infrastructure::logging;

/// Arguments for the search command
#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// Natural-language query
    pub query: String,

    /// Number of passages to return (1-20, default 5)
    #[arg(long)]
    pub max_results: Option<usize>,
}

/// Run the query and print the search response as JSON
pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    logging::init_logging(&config.logging);

    let services = crate::create_services(&config).await?;

    let response = services
        .retrieval
        .search(&args.query, args.max_results)
        .await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
