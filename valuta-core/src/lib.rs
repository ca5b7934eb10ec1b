//! valuta-core
//!
//! Core types, traits, and utilities shared across the valuta workspace.
//!
//! - `types`: the rate record and the aggregate summary.
//! - `connector`: the fetcher, parser, and reporter contracts a pipeline is built from.
//! - `summary`: the order-independent aggregator over collected records.
//! - `window`: derivation of the calendar days covered by a run.
//!
//! Async runtime (Tokio)
//! ---------------------
//! Fetchers observe cancellation through `tokio_util::sync::CancellationToken`, so
//! implementations of `connector::BulletinFetcher` are expected to run under a Tokio
//! 1.x runtime.
#![warn(missing_docs)]

/// Run configuration and failure policies.
pub mod config;
/// Fetcher, parser, and reporter contracts.
pub mod connector;
/// Error taxonomy for transport, parsing, and orchestration.
pub mod error;
/// Aggregation of rate records into max/min/average.
pub mod summary;
/// Rate record and aggregate summary data types.
pub mod types;
/// Calendar window derivation.
pub mod window;

pub use config::{
    DEFAULT_DEADLINE, DEFAULT_MAX_IN_FLIGHT, DEFAULT_WINDOW_DAYS, FailurePolicy, ValutaConfig,
};
pub use connector::{BulletinFetcher, BulletinParser, Reporter};
pub use error::{FetchError, ParseError, ValutaError};
pub use summary::summarize;
pub use types::{AggregateSummary, RateRecord, WindowReport};
pub use window::window_dates;

pub use tokio_util::sync::CancellationToken;
