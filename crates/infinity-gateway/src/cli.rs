//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "infinity")]
#[command(about = "Market data and AI trading analysis gateway", long_about = None)]
#[command(version)]
pub struct Cli {
    /// History file (overrides INFINITY_HISTORY_PATH)
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP gateway
    Serve {
        /// Listen address (overrides INFINITY_LISTEN_ADDR)
        #[arg(long)]
        listen: Option<SocketAddr>,
    },

    /// Fetch a quote and record it
    Quote {
        /// Instrument code, e.g. XAUUSD
        symbol: Option<String>,
    },

    /// Request an AI analysis and record it
    Analyze {
        #[arg(long, default_value = "XAUUSD")]
        symbol: String,

        #[arg(long, default_value = "H1")]
        timeframe: String,

        /// Swing high for Fibonacci levels
        #[arg(long, allow_hyphen_values = true)]
        high: Option<String>,

        /// Swing low for Fibonacci levels
        #[arg(long, allow_hyphen_values = true)]
        low: Option<String>,

        /// Free-text instruction
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Show or clear recorded history
    History {
        #[arg(value_enum, default_value_t = HistoryKind::Calculations)]
        kind: HistoryKind,

        /// Remove every entry of this kind
        #[arg(long)]
        clear: bool,
    },

    /// Show or update default preferences
    Prefs {
        #[arg(long)]
        account_size: Option<f64>,

        #[arg(long)]
        risk_percent: Option<f64>,

        /// Calculator shown first, e.g. fibonacci
        #[arg(long)]
        calculator: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Calculations,
    Analyses,
}
