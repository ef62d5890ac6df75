use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use tipmanager::importers::ALL;

pub mod formatters;
pub mod help;
pub mod runner;

#[derive(Parser)]
#[command(name = "tipmanager")]
#[command(
    version,
    about = "TipManager betting-tips analyser with grouped ROI tables and Excel export"
)]
#[command(
    long_about = "Load the \"Tips Enviadas\" sheet of a TipManager export, filter it by tournament, tip, win-rate and date, and produce profit/ROI tables per championship, matchup, win-rate, player and team as a styled Excel workbook."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to a config file (default: $XDG_CONFIG_HOME/tipmanager/config.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter a tips file, print the summary and write the analysis workbook
    Report {
        /// Path to the TipManager export (.xlsx, .xls, .ods)
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output workbook path (default from config: Analise_TipManager.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fill colour for positive cells (#RRGGBB)
        #[arg(long)]
        positive_color: Option<String>,

        /// Fill colour for negative cells (#RRGGBB)
        #[arg(long)]
        negative_color: Option<String>,

        /// Show the summary only, don't write the workbook
        #[arg(short, long)]
        dry_run: bool,
    },

    /// List the tournaments, tips and default ranges found in a tips file
    Options {
        /// Path to the TipManager export (.xlsx, .xls, .ods)
        file: PathBuf,
    },

    /// Start an interactive session on a tips file
    Interactive {
        /// Path to the TipManager export (.xlsx, .xls, .ods)
        file: PathBuf,
    },
}

/// Filter flags shared by the report command
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct FilterArgs {
    /// Tournament to keep, or "Todos"
    #[arg(long, default_value = ALL)]
    pub tournament: String,

    /// Tip to keep (case-insensitive), or "Todos"
    #[arg(long, default_value = ALL)]
    pub tip: String,

    /// Minimum Winrate 1, as a fraction (default: lowest in file)
    #[arg(long)]
    pub winrate_min: Option<Decimal>,

    /// Maximum Winrate 1, as a fraction (default: 1)
    #[arg(long)]
    pub winrate_max: Option<Decimal>,

    /// First settlement date, YYYY-MM-DD (default: earliest in file)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last settlement date, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}
