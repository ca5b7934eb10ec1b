use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use valuta_core::{
    BulletinFetcher, BulletinParser, CancellationToken, FailurePolicy, FetchError, RateRecord,
    ValutaError, WindowReport,
};

use crate::Valuta;

/// How one day's unit of work ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayOutcome {
    Merged,
    Empty,
    Skipped,
    Failed,
    Cancelled,
}

/// Per-outcome unit counts for one run.
#[derive(Debug, Default)]
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
struct Tally {
    merged: usize,
    empty: usize,
    skipped: usize,
    failed: usize,
    cancelled: usize,
}

impl Tally {
    fn record(&mut self, outcome: DayOutcome) {
        match outcome {
            DayOutcome::Merged => self.merged += 1,
            DayOutcome::Empty => self.empty += 1,
            DayOutcome::Skipped => self.skipped += 1,
            DayOutcome::Failed => self.failed += 1,
            DayOutcome::Cancelled => self.cancelled += 1,
        }
    }
}

/// State shared by every unit of one run.
struct RunState {
    fetcher: Arc<dyn BulletinFetcher>,
    parser: Arc<dyn BulletinParser>,
    policy: FailurePolicy,
    cancel: CancellationToken,
    records: Mutex<Vec<RateRecord>>,
    skipped: Mutex<Vec<ValutaError>>,
    // Written at most once; later failures are dropped.
    first_error: OnceLock<ValutaError>,
}

impl RunState {
    async fn fail(&self, err: ValutaError) -> DayOutcome {
        if self.policy == FailurePolicy::SkipDay {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "skipping failed day");
            self.skipped.lock().await.push(err);
            return DayOutcome::Skipped;
        }

        match self.first_error.set(err) {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("first failure recorded; cancelling run");
            }
            Err(discarded) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %discarded, "discarding failure after the first");
                drop(discarded);
            }
        }
        self.cancel.cancel();
        DayOutcome::Failed
    }

    /// Account for a finished unit. A panicked unit is fatal under every policy.
    fn settle(&self, joined: Result<DayOutcome, JoinError>, tally: &mut Tally) {
        match joined {
            Ok(outcome) => tally.record(outcome),
            Err(join_err) => {
                tally.failed += 1;
                if self
                    .first_error
                    .set(ValutaError::Task(join_err.to_string()))
                    .is_ok()
                {
                    self.cancel.cancel();
                }
            }
        }
    }
}

async fn run_day(
    state: Arc<RunState>,
    date: NaiveDate,
    _permit: OwnedSemaphorePermit,
) -> DayOutcome {
    if state.cancel.is_cancelled() {
        return DayOutcome::Cancelled;
    }

    let fetched = tokio::select! {
        biased;
        () = state.cancel.cancelled() => return DayOutcome::Cancelled,
        fetched = state.fetcher.fetch(date, &state.cancel) => fetched,
    };
    let bytes = match fetched {
        Ok(bytes) => bytes,
        Err(FetchError::Cancelled) if state.cancel.is_cancelled() => {
            return DayOutcome::Cancelled;
        }
        Err(e) => return state.fail(ValutaError::fetch(date, e)).await,
    };

    if bytes.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::debug!("empty bulletin; no data for this day");
        return DayOutcome::Empty;
    }
    if state.cancel.is_cancelled() {
        return DayOutcome::Cancelled;
    }

    let records = match state.parser.parse(&bytes) {
        Ok(records) => records,
        Err(e) => return state.fail(ValutaError::parse(date, e)).await,
    };
    state.records.lock().await.extend(records);
    DayOutcome::Merged
}

/// Run one unit per date under the configured ceiling and gather the results.
///
/// `cancel` is owned by this run: it is fired on the first failure (fail-fast) and
/// observed by every unit and by the launch loop.
pub(crate) async fn fan_out(
    valuta: &Valuta,
    dates: Vec<NaiveDate>,
    cancel: CancellationToken,
) -> Result<WindowReport, ValutaError> {
    let state = Arc::new(RunState {
        fetcher: Arc::clone(&valuta.fetcher),
        parser: Arc::clone(&valuta.parser),
        policy: valuta.cfg.failure_policy,
        cancel: cancel.clone(),
        records: Mutex::new(Vec::new()),
        skipped: Mutex::new(Vec::new()),
        first_error: OnceLock::new(),
    });
    let slots = Arc::new(Semaphore::new(valuta.cfg.max_in_flight));
    let mut units = JoinSet::new();
    let mut tally = Tally::default();
    let mut launch_interrupted = false;

    for date in dates {
        // Finished units are reaped while waiting for a slot, so a failure stops
        // further launches as soon as it is observed.
        let permit = loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break None,
                Some(joined) = units.join_next(), if !units.is_empty() => {
                    state.settle(joined, &mut tally);
                }
                permit = Arc::clone(&slots).acquire_owned() => break permit.ok(),
            }
        };
        let Some(permit) = permit else {
            launch_interrupted = true;
            break;
        };

        let unit = run_day(Arc::clone(&state), date, permit);
        #[cfg(feature = "tracing")]
        let unit = tracing::Instrument::instrument(
            unit,
            tracing::debug_span!("valuta::day", date = %date),
        );
        units.spawn(unit);
    }

    while let Some(joined) = units.join_next().await {
        state.settle(joined, &mut tally);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        merged = tally.merged,
        empty = tally.empty,
        skipped = tally.skipped,
        failed = tally.failed,
        cancelled = tally.cancelled,
        "window finished"
    );

    if let Some(err) = state.first_error.get() {
        return Err(err.clone());
    }
    if launch_interrupted || tally.cancelled > 0 {
        return Err(ValutaError::Cancelled);
    }

    let records = std::mem::take(&mut *state.records.lock().await);
    let skipped = std::mem::take(&mut *state.skipped.lock().await);
    Ok(WindowReport { records, skipped })
}
