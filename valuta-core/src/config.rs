//! Configuration types shared by the orchestrator and the binary.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of calendar days fetched when the caller does not say otherwise.
pub const DEFAULT_WINDOW_DAYS: u32 = 90;

/// Maximum number of day units allowed to fetch or parse at the same time.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 10;

/// Overall deadline applied to a whole run.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// What a run does when a single day fails to fetch or parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FailurePolicy {
    /// The first failing day aborts the run and cancels every other day.
    #[default]
    FailFast,
    /// Failing days are skipped and reported as warnings; the run continues with
    /// whatever the remaining days produced.
    SkipDay,
}

/// Global configuration for the `Valuta` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValutaConfig {
    /// Concurrency ceiling: at most this many day units run fetch/parse logic at once.
    /// Must be at least 1; independent of the window size.
    pub max_in_flight: usize,
    /// Overall deadline for a run. `None` lets a run take as long as it needs.
    pub deadline: Option<Duration>,
    /// Per-day failure handling.
    pub failure_policy: FailurePolicy,
}

impl Default for ValutaConfig {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            deadline: Some(DEFAULT_DEADLINE),
            failure_policy: FailurePolicy::FailFast,
        }
    }
}
