use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use pricewatch::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for pricewatch::AppCommand {
    fn from(cmd: Commands) -> pricewatch::AppCommand {
        match cmd {
            Commands::Track { urls } => pricewatch::AppCommand::Track { urls },
            Commands::Record {
                name,
                price,
                date,
                url,
            } => pricewatch::AppCommand::Record {
                name,
                price,
                date,
                url,
            },
            Commands::Summary => pricewatch::AppCommand::Summary,
            Commands::History { name } => pricewatch::AppCommand::History { name },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch today's prices for all tracked products
    Track {
        /// Extra product URL to fetch (repeatable)
        #[arg(long = "url")]
        urls: Vec<String>,
    },
    /// Record a price by hand
    Record {
        /// Product name
        name: String,
        /// Price in whole rupees
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        price: u64,
        /// Date of the observation (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Product URL to register alongside the price
        #[arg(long)]
        url: Option<String>,
    },
    /// Display latest prices of tracked products
    Summary,
    /// Display the price history and chart of a product
    History {
        /// Product name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => pricewatch::cli::setup::setup(),
        Some(cmd) => pricewatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
