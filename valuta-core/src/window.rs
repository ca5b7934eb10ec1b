use chrono::{Days, NaiveDate};

use crate::error::ValutaError;

/// Calendar days covered by a window of `window_days` ending at `as_of`, walking backward.
///
/// Returns `[as_of, as_of - 1, ..., as_of - (window_days - 1)]`; an empty vector for a
/// zero-day window.
///
/// # Errors
/// Returns `InvalidArg` if the window reaches past the earliest representable date.
pub fn window_dates(as_of: NaiveDate, window_days: u32) -> Result<Vec<NaiveDate>, ValutaError> {
    (0..window_days)
        .map(|back| {
            as_of
                .checked_sub_days(Days::new(u64::from(back)))
                .ok_or_else(|| {
                    ValutaError::InvalidArg(format!(
                        "window of {window_days} days before {as_of} is out of range"
                    ))
                })
        })
        .collect()
}
