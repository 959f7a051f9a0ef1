//! CLI entry point for metsaregister

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use metsaregister::cli::{self, Commands};

/// Query the Estonian forest registry and export results as GeoJSON
#[derive(Parser)]
#[command(name = "metsaregister")]
#[command(author, version)]
#[command(about = "Query the Estonian forest registry and export results as GeoJSON")]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::List => cli::cmd_list().await?,
        Commands::QueryLayer { aoi, layer_id, out } => {
            cli::cmd_query_layer(&aoi, layer_id, &out).await?;
        }
        Commands::ForestStands { aoi, out, wait } => {
            cli::cmd_forest_stands(&aoi, &out, wait).await?;
        }
        Commands::ForestNotifications { aoi, out, wait } => {
            cli::cmd_forest_notifications(&aoi, &out, wait).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
