//! CLI argument parsing

use crate::{reference, report};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing::info;
use verroute::prelude::*;

/// Reference versioned API
#[derive(Parser, Debug)]
#[command(name = "versioned-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the reference routes
    Serve(ServeArgs),

    /// Print the routes each API version serves
    Routes {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind, overriding VERROUTE_HOST and VERROUTE_PORT
    #[arg(short, long)]
    addr: Option<String>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Serve(args) => serve(args).await,
            Commands::Routes { json } => print_routes(json),
        }
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    load_dotenv();
    let config = ServerConfig::from_env().context("failed to read VERROUTE_* settings")?;

    let mut logging = LoggingConfig::default();
    if let Some(filter) = &config.log {
        logging = logging.filter(filter.clone());
    }
    init_logging(&logging);

    let addr = args.addr.unwrap_or_else(|| config.addr());
    println!("{} http://{}", style("serving on").green(), addr);

    VersionedApi::new()
        .layer(TracingLayer::new())
        .routes(reference::routes())
        .run_until(&addr, shutdown_signal())
        .await
        .map_err(|err| anyhow::anyhow!(err))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
}

fn print_routes(json: bool) -> anyhow::Result<()> {
    let tables = reference::named_routes()
        .compile()
        .context("reference routes failed to compile")?;
    let report = report::build(&tables);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let mut text = String::new();
        report::render_text(&report, &mut text)?;
        print!("{}", text);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["versioned-api", "serve", "--addr", "0.0.0.0:9000"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve(ServeArgs { addr: Some(ref a) }) if a == "0.0.0.0:9000"
        ));

        let cli = Cli::try_parse_from(["versioned-api", "routes", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Routes { json: true }));
    }
}
