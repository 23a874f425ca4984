//! # boardworks-quote
//!
//! Command-line host for the Boardworks quoting engine.
//!
//! ## Module Organization
//! ```text
//! boardworks_quote/
//! ├── lib.rs          ◄─── CLI definition, logging, run()
//! ├── commands.rs     ◄─── price / eta / product-eta / cart
//! ├── config.rs       ◄─── QuoteConfig: defaults → quote.toml → env
//! └── error.rs        ◄─── QuoteError with machine-readable codes
//! ```
//!
//! ## Usage
//! ```text
//! boardworks-quote price board.json --catalog catalog.json --quantity 2
//! boardworks-quote eta board.json --today 2026-10-19
//! boardworks-quote product-eta
//! boardworks-quote cart cart.json
//! boardworks-quote --config quote.toml config
//! ```
//!
//! Reports go to stdout as pretty JSON. Logs go to stderr and follow
//! `RUST_LOG`.

pub mod commands;
pub mod config;
pub mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use boardworks_core::material::StaticCatalog;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::QuoteConfig;
use error::{QuoteError, QuoteResult};

#[derive(Parser, Debug)]
#[command(name = "boardworks-quote")]
#[command(about = "Price custom boards and estimate delivery dates", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Pricing and lead-time config (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Material catalog (JSON object keyed by material)
    #[arg(long, global = true, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Date to estimate from, defaults to the local date
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Price a saved board
    Price {
        /// Saved board JSON
        board: PathBuf,

        /// Number of identical boards to charge for
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },

    /// Estimate delivery for a saved board
    Eta {
        /// Saved board JSON
        board: PathBuf,
    },

    /// Estimate delivery for an in-stock product
    ProductEta,

    /// Estimate delivery for a whole cart
    Cart {
        /// Cart JSON: an array of items, or `{ "items": [...] }`
        cart: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

/// Parses arguments, runs one command, and maps failures to exit code 1.
pub fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error[{}]: {}", err.code(), err);
            ExitCode::FAILURE
        }
    }
}

/// Runs a parsed command and prints its report.
pub fn execute(cli: Cli) -> QuoteResult<()> {
    let config = QuoteConfig::load(cli.config)?;
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    debug!(%today, "Estimating from date");

    match cli.command {
        Command::Price { board, quantity } => {
            let catalog = load_catalog(cli.catalog.as_deref())?;
            let report = commands::price(&config, &catalog, &read_json(&board)?, quantity)?;
            print_json(&report)
        }
        Command::Eta { board } => print_json(&commands::eta(&config, &read_json(&board)?, today)?),
        Command::ProductEta => print_json(&commands::product_eta(&config, today)),
        Command::Cart { cart } => print_json(&commands::cart(&config, &read_json(&cart)?, today)?),
        Command::Config => print_json(&config),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=boardworks_core=trace` - Trace the engine only
/// - Default: INFO, DEBUG for boardworks crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,boardworks=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json(path: &Path) -> QuoteResult<Value> {
    let contents = std::fs::read_to_string(path).map_err(|source| QuoteError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| QuoteError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn load_catalog(path: Option<&Path>) -> QuoteResult<StaticCatalog> {
    let Some(path) = path else {
        debug!("No catalog given, every material prices at the default");
        return Ok(StaticCatalog::new());
    };

    let raw = read_json(path)?;
    let catalog: StaticCatalog = serde_json::from_value(raw).map_err(|source| QuoteError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(?path, materials = catalog.len(), "Loaded material catalog");
    Ok(catalog)
}

fn print_json<T: Serialize>(value: &T) -> QuoteResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
