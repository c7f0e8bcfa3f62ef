pub mod cli;
pub mod core;
pub mod providers;
pub mod store;
pub mod sync;

use crate::core::config::AppConfig;
use crate::core::store::OrderStore;
use crate::providers::cbr::CbrRateProvider;
use crate::providers::google_sheets::{GoogleSheetsSource, SheetCredentials};
use crate::providers::telegram::TelegramNotifier;
use crate::store::DiskOrderStore;
use crate::sync::{Reconciler, SpreadsheetReader};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Sync { dry_run: bool },
    List,
    Notify,
}

/// Wires the configured spreadsheet, rate feed and store into a [`Reconciler`].
pub fn build_reconciler(config: &AppConfig, store: Arc<dyn OrderStore>) -> Result<Reconciler> {
    let credentials = SheetCredentials::load_from_path(&config.sheet.credentials_file)?;
    let source = GoogleSheetsSource::new(
        &config.sheet.base_url,
        credentials,
        config.sheet.timeout(),
        config.sheet.retries,
    );
    let rates = CbrRateProvider::new(&config.rates.base_url, config.rates.timeout());
    let reader = SpreadsheetReader::new(
        Arc::new(source),
        Arc::new(rates),
        &config.sheet.sheet_id,
        &config.sheet.range,
        &config.rates.currency,
    );
    Ok(Reconciler::new(reader, store))
}

fn open_store(config: &AppConfig) -> Result<Arc<DiskOrderStore>> {
    let data_path = config.data_path()?;
    std::fs::create_dir_all(&data_path)
        .with_context(|| format!("Failed to create data directory: {}", data_path.display()))?;
    let store = DiskOrderStore::open(&data_path)
        .with_context(|| format!("Failed to open order store at {}", data_path.display()))?;
    Ok(Arc::new(store))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ordersync starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        sheet_id = %config.sheet.sheet_id,
        range = %config.sheet.range,
        currency = %config.rates.currency,
        "Loaded config"
    );

    let store = open_store(&config)?;

    match command {
        AppCommand::Sync { dry_run } => {
            let reconciler = build_reconciler(&config, store)?;
            cli::sync::run(&reconciler, &config.rates.currency, dry_run).await
        }
        AppCommand::List => cli::list::run(store.as_ref()).await,
        AppCommand::Notify => {
            let telegram = config
                .telegram
                .as_ref()
                .context("The notify command needs a telegram section in the config")?;
            let notifier = TelegramNotifier::new(
                &telegram.base_url,
                &telegram.token,
                &telegram.chat_id,
                telegram.timeout(),
            );
            cli::notify::run(store.as_ref(), &notifier).await
        }
    }
}
