//! Valuta collects daily exchange-rate bulletins over a window of days and summarizes them.
//!
//! Overview
//! - `Valuta` drives one unit of work per calendar day: fetch, parse, merge.
//! - A semaphore caps the number of units in flight; excess days queue for a slot.
//! - Failure policy:
//!   - `FailFast` (default): the first failing day is recorded, every other unit is
//!     cancelled, and the run returns that error with the day attached.
//!   - `SkipDay`: failing days are logged and listed in the `WindowReport`; the run
//!     continues with the rest.
//! - An overall deadline (default 10s) and an optional external `CancellationToken`
//!   abort the run; both surface as errors, never as a partial summary.
//! - A successful run with no records fails with `NoData`; the reporter is only called
//!   with a real summary.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use valuta::Valuta;
//!
//! let valuta = Valuta::builder()
//!     .fetcher(Arc::new(fetcher))
//!     .parser(Arc::new(parser))
//!     .max_in_flight(4)
//!     .build()?;
//! let summary = valuta.run(30, as_of).await?;
//! println!("{}", valuta::render_text(&summary));
//! ```
#![warn(missing_docs)]

mod core;
mod pipeline;
/// Summary renderers and the console reporter.
pub mod report;

pub use crate::core::{Valuta, ValutaBuilder};
pub use report::{ConsoleReporter, ReportFormat, render_json, render_text};

pub use valuta_core::{
    AggregateSummary, BulletinFetcher, BulletinParser, CancellationToken, DEFAULT_DEADLINE,
    DEFAULT_MAX_IN_FLIGHT, DEFAULT_WINDOW_DAYS, FailurePolicy, FetchError, ParseError, RateRecord,
    Reporter, ValutaConfig, ValutaError, WindowReport,
};
