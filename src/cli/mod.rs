//! Command-line parsing for the INEGI indicator client.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! client and calculation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::calc::poverty::{DEFAULT_MIN_SALARY, DEFAULT_WORKING_DAYS};
use crate::data::inegi::{DEFAULT_GEOGRAPHY, DEFAULT_LOCALE};
use crate::domain::Period;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "inegi", version, about = "INEGI indicator client and poverty-line calculator")]
pub struct Cli {
    /// API token. Falls back to INEGI_TOKEN (environment or .env).
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Response language (`es` or `en`).
    #[arg(long, global = true, default_value = DEFAULT_LOCALE)]
    pub locale: String,

    /// Geographic area code (`0700` is national).
    #[arg(long = "geo", global = true, default_value = DEFAULT_GEOGRAPHY)]
    pub geography: String,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch an economic indicator (BIE bank).
    Economic(IndicatorArgs),
    /// Fetch a socio-demographic indicator (BISE bank).
    Socio(IndicatorArgs),
    /// Inflation-adjust a peso amount between two months.
    Actualize(ActualizeArgs),
    /// Compare a minimum-wage monthly income against an actualized poverty line.
    Poverty(PovertyArgs),
}

#[derive(Debug, Args, Clone)]
pub struct IndicatorArgs {
    /// Numeric indicator code from the INEGI catalogue (e.g. 628208).
    pub code: u64,

    /// Request the full history instead of the latest observation only.
    #[arg(long)]
    pub history: bool,

    /// Export the table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Print the table as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Options shared by both calculators.
#[derive(Debug, Args, Clone)]
pub struct RangeArgs {
    /// Start period (YYYY/MM). Its month selects the inflation observations.
    #[arg(long)]
    pub start: Period,

    /// End period (YYYY/MM). Defaults to the current month.
    #[arg(long)]
    pub end: Option<Period>,

    /// Apply only the first matching inflation observation, newest first.
    #[arg(long)]
    pub first_match: bool,

    /// Print the result as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ActualizeArgs {
    /// Peso amount at the start period.
    #[arg(long)]
    pub amount: f64,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PovertyArgs {
    /// Poverty line in pesos at the start period.
    #[arg(long)]
    pub poverty_line: f64,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Working days per month.
    #[arg(long, default_value_t = DEFAULT_WORKING_DAYS)]
    pub working_days: u32,

    /// Daily minimum wage in pesos.
    #[arg(long, default_value_t = DEFAULT_MIN_SALARY)]
    pub min_salary: f64,
}
