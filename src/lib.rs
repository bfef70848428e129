pub mod aggregator;
pub mod cli;
pub mod core;
pub mod directions;
pub mod error;
pub mod rates;
pub mod store;

use crate::aggregator::DirectionAggregator;
use crate::core::config::AppConfig;
use crate::core::icons::SiteIconResolver;
use crate::store::MemoryStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    /// Best offering per exchange for a pair
    Best {
        valute_from: String,
        valute_to: String,
        city: Option<String>,
        json: bool,
    },
    /// Per-city catalog for a pair
    Catalog {
        valute_from: String,
        valute_to: String,
        json: bool,
    },
}

/// Wires the dataset-backed store and icon resolver described by `config`.
pub fn build_aggregator(config: &AppConfig) -> Result<DirectionAggregator> {
    let dataset_path = config.dataset_path()?;
    let store = Arc::new(MemoryStore::load_from_path(&dataset_path)?);
    let icons = Arc::new(SiteIconResolver::new(&config.site));

    Ok(DirectionAggregator::from_store(store, icons)
        .with_only_active_bankomats(config.bankomats.only_active))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Exchange aggregator starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let aggregator = build_aggregator(&config)?;

    match command {
        AppCommand::Best {
            valute_from,
            valute_to,
            city,
            json,
        } => {
            cli::directions::run_best(
                &aggregator,
                &valute_from,
                &valute_to,
                city.as_deref(),
                json,
            )
            .await
        }
        AppCommand::Catalog {
            valute_from,
            valute_to,
            json,
        } => cli::directions::run_catalog(&aggregator, &valute_from, &valute_to, json).await,
    }
}
