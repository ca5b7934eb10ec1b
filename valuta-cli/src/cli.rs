//! Command-line arguments for `valuta`.
//!
//! Every option can also be set through the environment variable shown in `--help`.

use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use valuta::{DEFAULT_MAX_IN_FLIGHT, DEFAULT_WINDOW_DAYS, ReportFormat};
use valuta_cbr::DEFAULT_BASE_URL;

/// Summarize central-bank exchange rates over a window of days.
///
/// Fetches one daily bulletin per calendar day ending at `--as-of`, then prints the
/// highest rate, the lowest rate, and the average over every currency in every bulletin.
#[derive(Debug, Parser)]
#[command(name = "valuta", author, version, about)]
pub struct Cli {
    /// Base URL of the daily bulletin service.
    #[arg(long, env = "VALUTA_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Number of calendar days to fetch, ending at the as-of date.
    #[arg(
        long,
        env = "VALUTA_DAYS",
        default_value_t = DEFAULT_WINDOW_DAYS,
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    pub days: u32,

    /// Last day of the window (YYYY-MM-DD). Defaults to today in local time.
    #[arg(long, env = "VALUTA_AS_OF")]
    pub as_of: Option<NaiveDate>,

    /// Overall deadline in seconds; 0 disables it.
    #[arg(long, env = "VALUTA_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Maximum number of days fetched at the same time.
    #[arg(long, env = "VALUTA_WORKERS", default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    pub workers: usize,

    /// Per-request HTTP timeout in seconds; 0 disables it.
    #[arg(long, env = "VALUTA_REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Skip days that fail to fetch or parse instead of aborting.
    #[arg(long)]
    pub lenient: bool,

    /// Output format for the summary.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Supported summary formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Three human-readable lines.
    Text,
    /// A JSON object.
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Seconds to an optional duration, with zero meaning "no limit".
pub const fn seconds(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}
