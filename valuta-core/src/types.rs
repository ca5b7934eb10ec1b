use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ValutaError};

/// One currency's per-unit rate as published in a single bulletin.
///
/// Records are immutable once built and do not remember which requested day
/// produced them: `date` is the bulletin's own as-of date, which for non-trading
/// days is usually the previous business day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    name: String,
    rate: f64,
    date: NaiveDate,
}

impl RateRecord {
    /// Build a record from an already per-unit rate.
    pub fn new(name: impl Into<String>, rate: f64, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            rate,
            date,
        }
    }

    /// Build a record from a published `value` quoted per `nominal` units.
    ///
    /// # Errors
    /// Returns `ParseError::ZeroNominal` when `nominal` is zero.
    pub fn from_nominal(
        name: impl Into<String>,
        value: f64,
        nominal: u32,
        date: NaiveDate,
    ) -> Result<Self, ParseError> {
        let name = name.into();
        if nominal == 0 {
            return Err(ParseError::ZeroNominal { currency: name });
        }
        Ok(Self::new(name, value / f64::from(nominal), date))
    }

    /// Currency or instrument name as published.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price of one unit in the reference currency.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// The bulletin's as-of date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Statistics over every record collected in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    /// Record with the highest rate.
    pub max: RateRecord,
    /// Record with the lowest rate.
    pub min: RateRecord,
    /// Arithmetic mean of all rates.
    pub average: f64,
    /// Number of records the statistics were computed from.
    pub count: usize,
}

/// Raw outcome of collecting a window, before aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowReport {
    /// Every record contributed by every successful day, in no particular order.
    pub records: Vec<RateRecord>,
    /// Per-day failures that were skipped under `FailurePolicy::SkipDay`.
    pub skipped: Vec<ValutaError>,
}
