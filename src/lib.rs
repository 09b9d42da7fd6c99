pub mod cli;
pub mod core;
pub mod providers;
pub mod store;
pub mod tracker;

use crate::core::config::AppConfig;
use crate::store::{HistoryStore, ProductRegistry};
use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

pub enum AppCommand {
    /// Fetch configured products and any extra URLs, recording today's prices
    Track { urls: Vec<String> },
    Record {
        name: String,
        price: u64,
        date: Option<NaiveDate>,
        url: Option<String>,
    },
    Summary,
    History { name: String },
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Price tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_path = config.default_data_path()?;
    debug!("Using data directory {}", data_path.display());
    let store = HistoryStore::new(&data_path);
    let registry = ProductRegistry::new(&data_path);

    match command {
        AppCommand::Track { urls } => {
            cli::track::run(&config, &urls, &store, &registry, today()).await
        }
        AppCommand::Record {
            name,
            price,
            date,
            url,
        } => cli::record::run(
            &store,
            &registry,
            &name,
            price,
            date.unwrap_or_else(today),
            url.as_deref(),
        )
        .map(|_| ()),
        AppCommand::Summary => cli::summary::run(&registry, &store),
        AppCommand::History { name } => cli::history::run(&store, &name),
    }
}
