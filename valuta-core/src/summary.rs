use std::cmp::Ordering;

use crate::error::ValutaError;
use crate::types::{AggregateSummary, RateRecord};

/// Reduce `records` to their maximum, minimum, and average rate.
///
/// The result does not depend on the order of `records`:
/// - equal extreme rates resolve to the earliest `date`, then the smallest `name`;
/// - the mean sums rates in ascending order before dividing by the count.
///
/// Only a fully tied pair (same rate, date, and name) can pick either record, and
/// such records are indistinguishable.
///
/// # Errors
/// Returns `InvalidArg` for an empty slice; callers check for emptiness first.
pub fn summarize(records: &[RateRecord]) -> Result<AggregateSummary, ValutaError> {
    let Some(first) = records.first() else {
        return Err(ValutaError::InvalidArg(
            "cannot summarize an empty set of rate records".into(),
        ));
    };

    let mut max = first;
    let mut min = first;
    for r in &records[1..] {
        if displaces(r, max, Ordering::Greater) {
            max = r;
        }
        if displaces(r, min, Ordering::Less) {
            min = r;
        }
    }

    let mut rates: Vec<f64> = records.iter().map(RateRecord::rate).collect();
    rates.sort_by(f64::total_cmp);
    let sum: f64 = rates.iter().sum();
    #[allow(clippy::cast_precision_loss)]
    let average = sum / records.len() as f64;

    Ok(AggregateSummary {
        max: max.clone(),
        min: min.clone(),
        average,
        count: records.len(),
    })
}

// Among equal rates the earlier date, then the smaller name, takes the slot.
fn displaces(candidate: &RateRecord, current: &RateRecord, wanted: Ordering) -> bool {
    match candidate.rate().total_cmp(&current.rate()) {
        Ordering::Equal => (candidate.date(), candidate.name()) < (current.date(), current.name()),
        other => other == wanted,
    }
}
