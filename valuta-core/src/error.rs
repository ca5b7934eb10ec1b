use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;

/// Transport-level failure while fetching a single day's bulletin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The remote service answered with a non-success status.
    #[error("bad status code: {status}")]
    Status {
        /// HTTP status code returned by the service.
        status: u16,
    },

    /// The request could not be sent or no response arrived (connect, DNS, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The response arrived but its body could not be read in full.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The configured base URL cannot be used to build a request.
    #[error("invalid base url '{url}': {msg}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        msg: String,
    },

    /// The fetch observed cancellation and gave up before completing.
    #[error("fetch cancelled")]
    Cancelled,
}

/// Failure turning raw bulletin bytes into rate records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The declared character encoding is unknown or the bytes do not decode with it.
    #[error("cannot decode bulletin: {0}")]
    Encoding(String),

    /// The document is not well-formed or lacks required structure.
    #[error("malformed bulletin: {0}")]
    Xml(String),

    /// The as-of date attribute is not a `DD.MM.YYYY` date.
    #[error("invalid bulletin date '{value}'")]
    InvalidDate {
        /// The raw attribute value.
        value: String,
    },

    /// The nominal of a currency entry is not a non-negative integer.
    #[error("invalid nominal '{value}' for currency {currency}")]
    InvalidNominal {
        /// Currency name as published.
        currency: String,
        /// The raw nominal text.
        value: String,
    },

    /// The value of a currency entry is not a decimal number.
    #[error("invalid value '{value}' for currency {currency}")]
    InvalidValue {
        /// Currency name as published.
        currency: String,
        /// The raw value text.
        value: String,
    },

    /// The nominal of a currency entry is zero, so no per-unit rate exists.
    #[error("nominal is zero for currency {currency}")]
    ZeroNominal {
        /// Currency name as published.
        currency: String,
    },
}

/// Unified error type for a valuta run.
///
/// Per-day failures carry the requested date; terminal conditions (no data,
/// cancellation, deadline) carry what is needed to explain them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValutaError {
    /// Fetching the bulletin for `date` failed.
    #[error("failed to get bulletin for {date}: {source}")]
    Fetch {
        /// The requested calendar day.
        date: NaiveDate,
        /// Underlying transport failure.
        #[source]
        source: FetchError,
    },

    /// Parsing the bulletin fetched for `date` failed.
    #[error("failed to parse bulletin for {date}: {source}")]
    Parse {
        /// The requested calendar day.
        date: NaiveDate,
        /// Underlying parse failure.
        #[source]
        source: ParseError,
    },

    /// Every day completed but not a single rate record was collected.
    #[error("no data collected after {window_days} days")]
    NoData {
        /// The requested window size.
        window_days: u32,
    },

    /// The run was cancelled from outside before it could finish.
    #[error("operation cancelled")]
    Cancelled,

    /// The run exceeded its overall deadline.
    #[error("deadline of {deadline:?} exceeded")]
    DeadlineExceeded {
        /// The configured deadline.
        deadline: Duration,
    },

    /// Invalid input argument or configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A day unit panicked or was torn down unexpectedly.
    #[error("worker task failed: {0}")]
    Task(String),

    /// The reporter could not write the summary.
    #[error("failed to report summary: {0}")]
    Report(String),
}

impl ValutaError {
    /// Helper: wrap a transport failure with the day it happened on.
    #[must_use]
    pub fn fetch(date: NaiveDate, source: FetchError) -> Self {
        Self::Fetch { date, source }
    }

    /// Helper: wrap a parse failure with the day it happened on.
    #[must_use]
    pub fn parse(date: NaiveDate, source: ParseError) -> Self {
        Self::Parse { date, source }
    }

    /// The requested day a per-day failure belongs to, if any.
    #[must_use]
    pub const fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Fetch { date, .. } | Self::Parse { date, .. } => Some(*date),
            _ => None,
        }
    }

    /// True for external cancellation and for an exceeded deadline.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded { .. })
    }
}

