use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use valuta_core::{
    AggregateSummary, BulletinFetcher, BulletinParser, CancellationToken, FailurePolicy, Reporter,
    ValutaConfig, ValutaError, WindowReport, summarize, window_dates,
};

use crate::pipeline;

/// Orchestrator that fetches, parses, and summarizes a window of daily bulletins.
pub struct Valuta {
    pub(crate) fetcher: Arc<dyn BulletinFetcher>,
    pub(crate) parser: Arc<dyn BulletinParser>,
    pub(crate) reporter: Option<Arc<dyn Reporter>>,
    pub(crate) cfg: ValutaConfig,
}

/// Builder for constructing a `Valuta` orchestrator with custom configuration.
pub struct ValutaBuilder {
    fetcher: Option<Arc<dyn BulletinFetcher>>,
    parser: Option<Arc<dyn BulletinParser>>,
    reporter: Option<Arc<dyn Reporter>>,
    cfg: ValutaConfig,
}

impl Default for ValutaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ValutaBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Defaults: at most 10 days in flight, a 10s overall deadline, fail-fast.
    /// A fetcher and a parser must be registered before [`build`](Self::build).
    #[must_use]
    pub fn new() -> Self {
        Self {
            fetcher: None,
            parser: None,
            reporter: None,
            cfg: ValutaConfig::default(),
        }
    }

    /// Register the day fetcher.
    #[must_use]
    pub fn fetcher(mut self, fetcher: Arc<dyn BulletinFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Register the bulletin parser.
    #[must_use]
    pub fn parser(mut self, parser: Arc<dyn BulletinParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Register a reporter called with the summary of every successful `run`.
    ///
    /// Without one, `run` only returns the summary.
    #[must_use]
    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub const fn config(mut self, cfg: ValutaConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Maximum number of days fetched and parsed at the same time.
    ///
    /// Independent of the window size: with a 90-day window and a ceiling of 10, the
    /// remaining 80 days wait for a free slot.
    #[must_use]
    pub const fn max_in_flight(mut self, n: usize) -> Self {
        self.cfg.max_in_flight = n;
        self
    }

    /// Overall deadline for one run, covering every day's fetch and parse.
    ///
    /// When exceeded, outstanding units are torn down and the run fails with
    /// `DeadlineExceeded`.
    #[must_use]
    pub const fn deadline(mut self, deadline: Duration) -> Self {
        self.cfg.deadline = Some(deadline);
        self
    }

    /// Run without an overall deadline; only cancellation and failures end a run early.
    #[must_use]
    pub const fn no_deadline(mut self) -> Self {
        self.cfg.deadline = None;
        self
    }

    /// Select what happens when a single day fails.
    #[must_use]
    pub const fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.cfg.failure_policy = policy;
        self
    }

    /// Build the `Valuta` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no fetcher or parser is registered, or if
    /// `max_in_flight` is zero.
    pub fn build(self) -> Result<Valuta, ValutaError> {
        let fetcher = self.fetcher.ok_or_else(|| {
            ValutaError::InvalidArg("no fetcher registered; add one via fetcher(...)".into())
        })?;
        let parser = self.parser.ok_or_else(|| {
            ValutaError::InvalidArg("no parser registered; add one via parser(...)".into())
        })?;
        if self.cfg.max_in_flight == 0 {
            return Err(ValutaError::InvalidArg(
                "max_in_flight must be at least 1".into(),
            ));
        }

        Ok(Valuta {
            fetcher,
            parser,
            reporter: self.reporter,
            cfg: self.cfg,
        })
    }
}

impl Valuta {
    /// Start building a new `Valuta` instance.
    #[must_use]
    pub fn builder() -> ValutaBuilder {
        ValutaBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &ValutaConfig {
        &self.cfg
    }

    /// Summarize the `window_days` days ending at `as_of` (inclusive) and report the result.
    ///
    /// # Errors
    /// See [`run_with_cancellation`](Self::run_with_cancellation).
    pub async fn run(
        &self,
        window_days: u32,
        as_of: NaiveDate,
    ) -> Result<AggregateSummary, ValutaError> {
        self.run_with_cancellation(window_days, as_of, &CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), aborting as soon as `cancel` fires.
    ///
    /// Behavior:
    /// - Collects the window (see [`collect`](Self::collect)).
    /// - An empty collection fails with `NoData` naming `window_days`.
    /// - Otherwise the records are summarized and handed to the reporter, if any.
    ///
    /// # Errors
    /// Returns the first per-day failure (with its date), `NoData`, `Cancelled`,
    /// `DeadlineExceeded`, or a reporter failure. The reporter is never called on error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "valuta::run",
            skip(self, cancel),
            fields(fetcher = self.fetcher.name(), max_in_flight = self.cfg.max_in_flight),
            err(level = "debug"),
        )
    )]
    pub async fn run_with_cancellation(
        &self,
        window_days: u32,
        as_of: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<AggregateSummary, ValutaError> {
        let window = self.collect(window_days, as_of, cancel).await?;
        if window.records.is_empty() {
            return Err(ValutaError::NoData { window_days });
        }

        let summary = summarize(&window.records)?;
        if let Some(reporter) = &self.reporter {
            reporter.report(&summary)?;
        }
        Ok(summary)
    }

    /// Fetch and parse every day of the window without summarizing or reporting.
    ///
    /// Behavior and trade-offs:
    /// - Days are derived backward from `as_of`: `as_of`, `as_of - 1`, ...
    /// - Records are returned in completion order, which is unspecified.
    /// - Under `SkipDay`, failed days are listed in `skipped` instead of failing.
    /// - A zero-day window yields an empty report.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the window reaches before the earliest representable
    /// date, the first per-day failure under `FailFast`, `Cancelled` if `cancel` fired
    /// before every day finished, `DeadlineExceeded`, or `Task` if a unit panicked.
    pub async fn collect(
        &self,
        window_days: u32,
        as_of: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<WindowReport, ValutaError> {
        let dates = window_dates(as_of, window_days)?;

        // Units see a child token so an internal failure never cancels the caller's token.
        let run_cancel = cancel.child_token();
        let _teardown = run_cancel.clone().drop_guard();

        let fan_out = pipeline::fan_out(self, dates, run_cancel);
        match self.cfg.deadline {
            Some(deadline) => tokio::time::timeout(deadline, fan_out)
                .await
                .unwrap_or(Err(ValutaError::DeadlineExceeded { deadline })),
            None => fan_out.await,
        }
    }
}
