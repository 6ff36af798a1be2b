pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::config::AppConfig;
use crate::core::history::ConversionHistory;
use crate::core::rate::RateResolver;
use crate::providers::CoinGeckoProvider;
use crate::store::{KeyValueStore, disk::DiskStore, memory::MemoryStore};

/// Application command, decoupled from the clap surface in main.
pub enum AppCommand {
    Convert {
        amount: f64,
        from: String,
        to: String,
        watch: bool,
    },
    Ticker {
        watch: bool,
    },
    Chart {
        coin: String,
    },
    Calc {
        expression: String,
        into: Option<(String, String)>,
    },
    History,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("coinvert starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = CoinGeckoProvider::new(&config.provider)?;
    let history = ConversionHistory::new(open_store());

    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            watch,
        } => {
            let from = from.to_uppercase();
            let to = to.to_uppercase();
            let resolver = RateResolver::new(provider, config.cache_duration());
            if watch {
                cli::convert::watch(
                    &resolver,
                    &history,
                    amount,
                    &from,
                    &to,
                    config.update_interval(),
                )
                .await
            } else {
                cli::convert::run(&resolver, &history, amount, &from, &to).await
            }
        }
        AppCommand::Ticker { watch } => {
            if watch {
                cli::ticker::watch(&provider, config.update_interval()).await
            } else {
                cli::ticker::run(&provider).await
            }
        }
        AppCommand::Chart { coin } => cli::chart::run(&provider, &coin).await,
        AppCommand::Calc { expression, into } => {
            let into = into
                .as_ref()
                .map(|(from, to)| (from.to_uppercase(), to.to_uppercase()));
            let resolver = RateResolver::new(provider, config.cache_duration());
            cli::calc::run(
                &resolver,
                &history,
                &expression,
                into.as_ref().map(|(from, to)| (from.as_str(), to.as_str())),
            )
            .await
        }
        AppCommand::History => cli::history::run(&history).await,
    }
}

/// Opens the durable store under the data directory, degrading to an
/// in-memory store when that fails; conversions still work, history just
/// stops surviving restarts.
fn open_store() -> Arc<dyn KeyValueStore> {
    let disk = AppConfig::default_data_path()
        .and_then(|path| DiskStore::open(&path.join("store"), "history"));
    match disk {
        Ok(store) => Arc::new(store),
        Err(e) => {
            debug!(error = %e, "Durable store unavailable, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    }
}
