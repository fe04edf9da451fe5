use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-stats")]
#[command(about = "Load city weather observations from CSV and summarise them")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "SQLite database path [default: weather.db]"
    )]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a CSV file, skipping rows that cannot be used
    Load {
        #[arg(help = "CSV file with date, city, temperature_c, humidity, rainfall_mm columns")]
        csv_file: PathBuf,

        #[arg(long, help = "Delete existing observations before loading")]
        truncate: bool,

        #[arg(long, help = "Rows per insert batch")]
        batch_size: Option<usize>,

        #[arg(short, long, help = "Hide the progress spinner")]
        quiet: bool,
    },

    /// Import an uploaded CSV document; fails if the document cannot be parsed
    Upload {
        #[arg(help = "CSV file to import, or '-' for stdin")]
        file: PathBuf,
    },

    /// Aggregate observations into daily, monthly and extreme statistics
    Dashboard {
        #[arg(long, help = "Case-insensitive city filter")]
        city: Option<String>,

        #[arg(long, help = "Inclusive start date (YYYY-MM-DD)")]
        start: Option<String>,

        #[arg(long, help = "Inclusive end date (YYYY-MM-DD)")]
        end: Option<String>,

        #[arg(long, help = "Print the chart payload as JSON")]
        json: bool,

        #[arg(long, requires = "json", help = "Pretty-print JSON output")]
        pretty: bool,
    },

    /// List the distinct cities in the store
    Cities,

    /// Display a summary of the store
    Info,
}
