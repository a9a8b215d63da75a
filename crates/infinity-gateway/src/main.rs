//! Command-line interface and HTTP gateway for Infinity

mod cli;
mod commands;
mod handlers;
mod server;
mod state;
#[cfg(test)]
mod testing;

use clap::Parser;
use cli::{Cli, Command};
use commands::{AnalyzeArgs, PrefsUpdate};
use infinity_analysis::AnalysisConfig;
use infinity_history::HistoryStore;
use infinity_market::MarketConfig;
use infinity_utils::{Config, LogFormat};
use state::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    let mut config = Config::from_env()?;
    if args.json_logs {
        config.log_format = LogFormat::Json;
    }
    if let Some(path) = args.history {
        config.history_path = path;
    }

    infinity_utils::init_tracing_with(config.log_format);
    info!(environment = %config.environment, "Starting {}", config.app_name);

    let state = AppState::from_config(&MarketConfig::from_env()?, AnalysisConfig::from_env())?;

    match args.command {
        Command::Serve { listen } => {
            server::serve(state, listen.unwrap_or(config.listen_addr)).await?;
        }
        Command::Quote { symbol } => {
            let mut store = HistoryStore::open(&config.history_path)?;
            let quote = commands::quote(&state, &mut store, symbol.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Command::Analyze {
            symbol,
            timeframe,
            high,
            low,
            prompt,
        } => {
            let mut store = HistoryStore::open(&config.history_path)?;
            let args = AnalyzeArgs {
                symbol,
                timeframe,
                high,
                low,
                prompt,
            };
            let result = commands::analyze(&state, &mut store, args).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::History { kind, clear } => {
            let mut store = HistoryStore::open(&config.history_path)?;
            let entries = commands::history(&mut store, kind, clear)?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        Command::Prefs {
            account_size,
            risk_percent,
            calculator,
        } => {
            let mut store = HistoryStore::open(&config.history_path)?;
            let update = PrefsUpdate {
                account_size,
                risk_percent,
                calculator,
            };
            commands::prefs(&mut store, update)?;
            println!("{}", serde_json::to_string_pretty(store.preferences())?);
        }
    }

    Ok(())
}
