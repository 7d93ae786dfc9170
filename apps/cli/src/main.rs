//! QFinance command line: the spreadsheet query functions as subcommands.
//!
//! Every query prints the value a cell would show: a number, `N/A`, or a
//! short error message. Those are results, so the exit code stays 0.

mod config;
mod main_lib;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use qfinance_core::utils::dates::DateInput;

use config::Config;
use main_lib::{build_state, init_tracing, load_settings, AppState};

#[derive(Parser)]
#[command(name = "qf", version, about = "Historical price and dividend lookups")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the version.
    Version,
    /// List the data sources tried for a category, in order.
    Sources { category: String },
    /// Opening price on a date.
    Open(PriceArgs),
    /// Closing price on a date.
    Close(PriceArgs),
    /// Day high.
    High(PriceArgs),
    /// Day low.
    Low(PriceArgs),
    /// Day volume.
    Volume(PriceArgs),
    /// Trailing twelve month dividend total ending on a date.
    Dividend {
        symbol: String,
        /// Serial number, YYYY-MM-DD or M/D/YY
        date: String,
    },
    /// Cache maintenance.
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(clap::Args)]
struct PriceArgs {
    symbol: String,
    /// stock, etf, mutf, index, or "" for unspecified
    category: String,
    /// Serial number, YYYY-MM-DD or M/D/YY
    date: String,
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Record counts per family.
    Stats,
    /// Write the cache as flat CSV files.
    Export { dir: PathBuf },
    /// Load flat CSV cache files.
    Import { dir: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?;
    let settings = load_settings(&config)?;
    init_tracing(&settings.log_level, &config.log_format);

    if let Commands::Version = cli.command {
        println!("{}", qfinance_core::constants::VERSION);
        return Ok(());
    }

    let state = build_state(&config, &settings)?;
    run(&state, cli.command).await
}

async fn run(state: &AppState, command: Commands) -> anyhow::Result<()> {
    let queries = &state.queries;
    match command {
        Commands::Version => println!("{}", queries.get_version()),
        Commands::Sources { category } => {
            println!("{}", queries.get_configured_sources(&category).join(", "))
        }
        Commands::Open(args) => {
            let value = queries
                .get_opening_price(&args.symbol, &args.category, &DateInput::from_arg(&args.date))
                .await;
            println!("{}", value);
        }
        Commands::Close(args) => {
            let value = queries
                .get_closing_price(&args.symbol, &args.category, &DateInput::from_arg(&args.date))
                .await;
            println!("{}", value);
        }
        Commands::High(args) => {
            let value = queries
                .get_high_price(&args.symbol, &args.category, &DateInput::from_arg(&args.date))
                .await;
            println!("{}", value);
        }
        Commands::Low(args) => {
            let value = queries
                .get_low_price(&args.symbol, &args.category, &DateInput::from_arg(&args.date))
                .await;
            println!("{}", value);
        }
        Commands::Volume(args) => {
            let value = queries
                .get_day_volume(&args.symbol, &args.category, &DateInput::from_arg(&args.date))
                .await;
            println!("{}", value);
        }
        Commands::Dividend { symbol, date } => {
            let value = queries
                .get_ttm_dividend(&symbol, &DateInput::from_arg(&date))
                .await;
            println!("{}", value);
        }
        Commands::Cache { command } => run_cache(state, command)?,
    }
    Ok(())
}

fn run_cache(state: &AppState, command: CacheCommands) -> anyhow::Result<()> {
    let stats = match command {
        CacheCommands::Stats => state.cache.stats()?,
        CacheCommands::Export { dir } => state.cache.export_csv(&dir)?,
        CacheCommands::Import { dir } => state.cache.import_csv(&dir)?,
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_command() {
        let cli = Cli::parse_from(["qf", "close", "IBM", "etf", "43434"]);
        match cli.command {
            Commands::Close(args) => {
                assert_eq!(args.symbol, "IBM");
                assert_eq!(DateInput::from_arg(&args.date), DateInput::Serial(43434.0));
            }
            _ => panic!("expected close"),
        }
    }

    #[test]
    fn test_parse_empty_category_and_cache_command() {
        let cli = Cli::parse_from(["qf", "open", "IBM", "", "2018-11-30"]);
        assert!(matches!(cli.command, Commands::Open(ref a) if a.category.is_empty()));

        let cli = Cli::parse_from(["qf", "cache", "export", "/tmp/out"]);
        assert!(matches!(
            cli.command,
            Commands::Cache { command: CacheCommands::Export { .. } }
        ));
    }
}
