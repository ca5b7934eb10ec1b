//! valuta-cbr
//!
//! Day fetcher and bulletin parser for the Central Bank of Russia `XML_daily` service.
//!
//! The fetcher only moves bytes; the parser only interprets them. Both plug into the
//! `valuta` orchestrator through the `valuta_core::connector` traits.
#![warn(missing_docs)]

/// HTTP day fetcher.
pub mod fetcher;
/// XML bulletin parser.
pub mod parser;

pub use fetcher::{CbrFetcher, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
pub use parser::CbrParser;
