// Shared fixtures for the orchestrator tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use valuta::{Valuta, ValutaBuilder};
use valuta_cbr::CbrParser;
use valuta_mock::{MockFetcher, bulletin_xml};

pub const USD: &str = "US Dollar";
pub const EUR: &str = "Euro";

/// A day in October 2025.
pub fn oct(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
}

/// Single-currency bulletin dated `date`.
pub fn usd_bulletin(date: NaiveDate, value: &str) -> Vec<u8> {
    bulletin_xml(date, &[(USD, 1, value)])
}

/// Builder wired to `fetcher` and the real bulletin parser.
pub fn valuta_with(fetcher: &Arc<MockFetcher>) -> ValutaBuilder {
    Valuta::builder()
        .fetcher(fetcher.clone())
        .parser(Arc::new(CbrParser::new()))
}
