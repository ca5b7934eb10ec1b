use async_trait::async_trait;
use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use crate::error::{FetchError, ParseError, ValutaError};
use crate::types::{AggregateSummary, RateRecord};

/// Source of raw daily bulletins.
///
/// Implementations must:
/// - return an empty body (not an error) when the source has nothing for `date`;
/// - treat any non-success response status as a transport failure;
/// - watch `cancel` and return `FetchError::Cancelled` promptly once it fires instead of
///   finishing the network call.
#[async_trait]
pub trait BulletinFetcher: Send + Sync {
    /// Stable identifier, recorded on the run span.
    fn name(&self) -> &'static str;

    /// Fetch the raw bulletin published for `date`.
    async fn fetch(&self, date: NaiveDate, cancel: &CancellationToken)
    -> Result<Vec<u8>, FetchError>;
}

/// Decoder turning a raw bulletin into rate records.
///
/// A well-formed bulletin without currency entries yields an empty vector.
pub trait BulletinParser: Send + Sync {
    /// Parse `bytes` into the records they contain.
    ///
    /// # Errors
    /// Fails on malformed structure, an unparseable as-of date, a non-numeric value,
    /// or a zero nominal.
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RateRecord>, ParseError>;
}

impl<F> BulletinParser for F
where
    F: Fn(&[u8]) -> Result<Vec<RateRecord>, ParseError> + Send + Sync,
{
    fn parse(&self, bytes: &[u8]) -> Result<Vec<RateRecord>, ParseError> {
        self(bytes)
    }
}

/// Sink for a finished summary.
pub trait Reporter: Send + Sync {
    /// Render `summary` to wherever this reporter writes.
    ///
    /// # Errors
    /// Returns `ValutaError::Report` if the output cannot be written.
    fn report(&self, summary: &AggregateSummary) -> Result<(), ValutaError>;
}
