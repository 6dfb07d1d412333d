//! versioned-api - serve the reference versioned routes or print them

mod cli;
mod reference;
mod report;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Cli::parse().execute().await
}
