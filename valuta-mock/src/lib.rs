//! valuta-mock
//!
//! Deterministic test doubles for exercising the valuta orchestrator without a network.
#![warn(missing_docs)]

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use valuta_core::{
    AggregateSummary, BulletinFetcher, CancellationToken, FetchError, Reporter, ValutaError,
};

/// Instruction for how the fetcher should behave for a given date.
#[derive(Debug, Clone)]
pub enum DayBehavior {
    /// Return the provided body.
    Return(Vec<u8>),
    /// Fail with the provided transport error.
    Fail(FetchError),
    /// Block until cancelled (simulates a stalled request).
    Hang,
}

type Responder = Arc<dyn Fn(NaiveDate) -> Result<Vec<u8>, FetchError> + Send + Sync>;

/// Scriptable in-memory `BulletinFetcher`.
///
/// Resolution order for a date: explicit rule, then the responder closure, then the
/// fallback behavior (an empty body unless overridden).
pub struct MockFetcher {
    rules: HashMap<NaiveDate, DayBehavior>,
    responder: Option<Responder>,
    fallback: DayBehavior,
    delay: Duration,
    day_delays: HashMap<NaiveDate, Duration>,
    calls: Mutex<Vec<NaiveDate>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockFetcher {
    /// Start building a mock fetcher.
    #[must_use]
    pub fn builder() -> MockFetcherBuilder {
        MockFetcherBuilder::default()
    }

    /// Dates `fetch` was called with, in call order.
    pub fn calls(&self) -> Vec<NaiveDate> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `fetch` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Highest number of `fetch` calls that were in progress at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn behavior_for(&self, date: NaiveDate) -> DayBehavior {
        if let Some(rule) = self.rules.get(&date) {
            return rule.clone();
        }
        if let Some(f) = &self.responder {
            return match f(date) {
                Ok(body) => DayBehavior::Return(body),
                Err(e) => DayBehavior::Fail(e),
            };
        }
        self.fallback.clone()
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl<'a> InFlightGuard<'a> {
    fn enter(current: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = current.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self(current)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BulletinFetcher for MockFetcher {
    fn name(&self) -> &'static str {
        "valuta-mock"
    }

    async fn fetch(
        &self,
        date: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(date);
        let _guard = InFlightGuard::enter(&self.in_flight, &self.peak_in_flight);

        let delay = self.day_delays.get(&date).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(FetchError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
        }

        match self.behavior_for(date) {
            DayBehavior::Return(body) => Ok(body),
            DayBehavior::Fail(e) => Err(e),
            DayBehavior::Hang => {
                cancel.cancelled().await;
                Err(FetchError::Cancelled)
            }
        }
    }
}

/// Builder for [`MockFetcher`].
pub struct MockFetcherBuilder {
    rules: HashMap<NaiveDate, DayBehavior>,
    responder: Option<Responder>,
    fallback: DayBehavior,
    delay: Duration,
    day_delays: HashMap<NaiveDate, Duration>,
}

impl Default for MockFetcherBuilder {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
            responder: None,
            fallback: DayBehavior::Return(Vec::new()),
            delay: Duration::ZERO,
            day_delays: HashMap::new(),
        }
    }
}

impl MockFetcherBuilder {
    /// Return `body` for `date`.
    #[must_use]
    pub fn returns(mut self, date: NaiveDate, body: impl Into<Vec<u8>>) -> Self {
        self.rules.insert(date, DayBehavior::Return(body.into()));
        self
    }

    /// Fail `date` with `error`.
    #[must_use]
    pub fn fails(mut self, date: NaiveDate, error: FetchError) -> Self {
        self.rules.insert(date, DayBehavior::Fail(error));
        self
    }

    /// Stall `date` until cancellation.
    #[must_use]
    pub fn hangs(mut self, date: NaiveDate) -> Self {
        self.rules.insert(date, DayBehavior::Hang);
        self
    }

    /// Behavior for dates without an explicit rule or responder.
    #[must_use]
    pub fn fallback(mut self, behavior: DayBehavior) -> Self {
        self.fallback = behavior;
        self
    }

    /// Compute the outcome for dates without an explicit rule.
    #[must_use]
    pub fn responder<F>(mut self, f: F) -> Self
    where
        F: Fn(NaiveDate) -> Result<Vec<u8>, FetchError> + Send + Sync + 'static,
    {
        self.responder = Some(Arc::new(f));
        self
    }

    /// Latency applied to every call before its outcome is produced.
    #[must_use]
    pub const fn delay(mut self, d: Duration) -> Self {
        self.delay = d;
        self
    }

    /// Latency for one date, overriding [`Self::delay`].
    #[must_use]
    pub fn delay_for(mut self, date: NaiveDate, d: Duration) -> Self {
        self.day_delays.insert(date, d);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> MockFetcher {
        MockFetcher {
            rules: self.rules,
            responder: self.responder,
            fallback: self.fallback,
            delay: self.delay,
            day_delays: self.day_delays,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }
}

/// Reporter that keeps every summary it receives.
#[derive(Default)]
pub struct RecordingReporter {
    seen: Mutex<Vec<AggregateSummary>>,
    fail_with: Option<String>,
}

impl RecordingReporter {
    /// A reporter that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A reporter whose every call fails with `msg` (after recording the summary).
    #[must_use]
    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            fail_with: Some(msg.into()),
        }
    }

    /// Summaries reported so far.
    pub fn summaries(&self) -> Vec<AggregateSummary> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `report` calls so far.
    pub fn call_count(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, summary: &AggregateSummary) -> Result<(), ValutaError> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary.clone());
        match &self.fail_with {
            Some(msg) => Err(ValutaError::Report(msg.clone())),
            None => Ok(()),
        }
    }
}

/// Build a `ValCurs` bulletin dated `date` holding `(name, nominal, value)` entries.
///
/// `value` is written verbatim, so either decimal separator can be exercised.
#[must_use]
pub fn bulletin_xml(date: NaiveDate, entries: &[(&str, u32, &str)]) -> Vec<u8> {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ValCurs Date=\"{}\" name=\"Foreign Currency Market\">\n",
        date.format("%d.%m.%Y")
    );
    for (i, (name, nominal, value)) in entries.iter().enumerate() {
        let _ = writeln!(
            xml,
            "  <Valute ID=\"R{i:05}\"><Nominal>{nominal}</Nominal><Name>{name}</Name><Value>{value}</Value></Valute>"
        );
    }
    xml.push_str("</ValCurs>\n");
    xml.into_bytes()
}
