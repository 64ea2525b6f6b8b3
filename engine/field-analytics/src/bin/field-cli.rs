//! # Field CLI Binary
//!
//! Command-line interface for querying DFS contest field analytics.

use anyhow::Result;
use clap::Parser;
use field_analytics::cli::{Cli, CliHandler};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load the contest, build indices, apply the requested window
    let handler = CliHandler::new(&cli.contest, |total| cli.window(total), cli.json).await?;

    // Handle command
    handler.handle_command(cli.command)?;

    Ok(())
}
