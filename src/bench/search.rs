use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::error::{BenchError, ValidationError};
use crate::invoker::Invoker;

use super::batch::timed_call;
use super::stats::{percent_x100, throughput_x100};
use super::types::Operation;

/// A level must beat the best throughput by 5% to count as an improvement.
const IMPROVEMENT_PERCENT: u128 = 105;
const PERCENT_BASE: u128 = 100;
/// Consecutive non-improving levels before the search gives up.
const PLATEAU_LIMIT: u32 = 3;
/// Error rate above which a level is judged unsustainable.
const ERROR_RATE_LIMIT_PERCENT: u128 = 30;
/// Errors are only judged once a level has run this long.
const ERROR_CHECK_GRACE: Duration = Duration::from_secs(1);

/// Settings for the max-throughput search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub operation: Operation,
    pub start: usize,
    pub max: usize,
    pub step: usize,
    pub duration_per_level: Duration,
    pub per_call_timeout: Duration,
    /// Pause between levels so the endpoint can settle.
    pub settle_delay: Duration,
}

impl SearchConfig {
    #[must_use]
    pub const fn new(operation: Operation) -> Self {
        Self {
            operation,
            start: 5,
            max: 250,
            step: 5,
            duration_per_level: Duration::from_secs(5),
            per_call_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_secs(1),
        }
    }

    /// Checks the search bounds.
    ///
    /// # Errors
    ///
    /// Returns an error when a bound is zero or `start` exceeds `max`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("start", self.start), ("max", self.max), ("step", self.step)] {
            if value == 0 {
                return Err(ValidationError::FieldTooSmall { field, min: 1 });
            }
        }
        if self.start > self.max {
            return Err(ValidationError::SearchStartAboveMax {
                start: self.start,
                max: self.max,
            });
        }
        if self.duration_per_level.is_zero() {
            return Err(ValidationError::FieldDurationZero {
                field: "duration_per_level",
            });
        }
        if self.per_call_timeout.is_zero() {
            return Err(ValidationError::FieldDurationZero {
                field: "per_call_timeout",
            });
        }
        Ok(())
    }
}

/// Measurements of one completed concurrency level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelReport {
    pub concurrency: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub elapsed: Duration,
    pub throughput_x100: u64,
}

/// Why the search stopped advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStop {
    MaxConcurrency,
    Plateau,
    ExcessiveErrorRate {
        concurrency: usize,
        error_rate_x100: u64,
    },
    NoSuccessfulCalls {
        concurrency: usize,
    },
}

impl SearchStop {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchStop::MaxConcurrency => "max-concurrency",
            SearchStop::Plateau => "plateau",
            SearchStop::ExcessiveErrorRate { .. } => "excessive-error-rate",
            SearchStop::NoSuccessfulCalls { .. } => "no-successful-calls",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThroughputResult {
    pub method: String,
    pub best_throughput_x100: u64,
    pub concurrency_at_best: usize,
    /// Completed levels in the order they ran; aborted levels are excluded.
    pub levels: Vec<LevelReport>,
    pub stop: SearchStop,
}

#[derive(Debug)]
struct SearchState {
    current_concurrency: usize,
    best_throughput_x100: u64,
    concurrency_at_best: usize,
    plateau_count: u32,
}

impl SearchState {
    const fn new(start: usize) -> Self {
        Self {
            current_concurrency: start,
            best_throughput_x100: 0,
            concurrency_at_best: start,
            plateau_count: 0,
        }
    }

    fn record(&mut self, level: &LevelReport) -> bool {
        let observed = u128::from(level.throughput_x100).saturating_mul(PERCENT_BASE);
        let required = u128::from(self.best_throughput_x100).saturating_mul(IMPROVEMENT_PERCENT);
        if observed > required {
            self.best_throughput_x100 = level.throughput_x100;
            self.concurrency_at_best = level.concurrency;
            self.plateau_count = 0;
            true
        } else {
            self.plateau_count = self.plateau_count.saturating_add(1);
            false
        }
    }
}

/// Steps concurrency upward and reports the level with the best sustained
/// throughput.
///
/// Stops at `max`, after three consecutive levels without a 5% gain, or when
/// a level fails more than 30% of its calls after its first second. Aborted
/// levels never contribute to the result.
///
/// # Errors
///
/// Returns an error when the search config is invalid.
pub async fn find_max_throughput<I>(
    invoker: &I,
    config: &SearchConfig,
) -> Result<ThroughputResult, BenchError>
where
    I: Invoker + ?Sized,
{
    config.validate()?;
    let method = config.operation.name();
    info!("Finding maximum throughput for {}...", method);

    let mut state = SearchState::new(config.start);
    let mut levels = Vec::new();

    let stop = loop {
        if state.plateau_count >= PLATEAU_LIMIT {
            break SearchStop::Plateau;
        }
        if state.current_concurrency > config.max {
            break SearchStop::MaxConcurrency;
        }

        let concurrency = state.current_concurrency;
        info!("Testing concurrency level: {}", concurrency);
        let level = match run_level(invoker, config, concurrency).await {
            Ok(level) => level,
            Err(BenchError::ExcessiveErrorRate {
                concurrency,
                error_rate_x100,
            }) => {
                warn!(
                    "Too many errors at concurrency {} ({}.{:02}%), stopping search",
                    concurrency,
                    error_rate_x100 / 100,
                    error_rate_x100 % 100
                );
                break SearchStop::ExcessiveErrorRate {
                    concurrency,
                    error_rate_x100,
                };
            }
            Err(BenchError::NoSuccessfulCalls { attempted, .. }) => {
                warn!(
                    "No successful calls at concurrency {} ({} attempted), stopping search",
                    concurrency, attempted
                );
                break SearchStop::NoSuccessfulCalls { concurrency };
            }
            Err(err) => return Err(err),
        };

        info!(
            "Concurrency {}: {}.{:02} req/s",
            concurrency,
            level.throughput_x100 / 100,
            level.throughput_x100 % 100
        );
        if !state.record(&level) {
            debug!(
                "No significant improvement at concurrency {} (plateau {}/{})",
                concurrency, state.plateau_count, PLATEAU_LIMIT
            );
        }
        levels.push(level);

        let Some(next) = concurrency.checked_add(config.step) else {
            break SearchStop::MaxConcurrency;
        };
        state.current_concurrency = next;

        let continues = next <= config.max && state.plateau_count < PLATEAU_LIMIT;
        if continues && !config.settle_delay.is_zero() {
            sleep(config.settle_delay).await;
        }
    };

    Ok(ThroughputResult {
        method: method.to_owned(),
        best_throughput_x100: state.best_throughput_x100,
        concurrency_at_best: state.concurrency_at_best,
        levels,
        stop,
    })
}

/// Launches back-to-back waves of `concurrency` calls for the level duration.
async fn run_level<I>(
    invoker: &I,
    config: &SearchConfig,
    concurrency: usize,
) -> Result<LevelReport, BenchError>
where
    I: Invoker + ?Sized,
{
    let operation = &config.operation;
    let per_call_timeout = config.per_call_timeout;
    let started = Instant::now();
    let mut attempted: usize = 0;
    let mut succeeded: usize = 0;

    while started.elapsed() < config.duration_per_level {
        let first_index = attempted;
        let calls = (0..concurrency).map(move |offset| {
            timed_call(
                invoker,
                operation,
                per_call_timeout,
                first_index.saturating_add(offset),
            )
        });
        let wave = join_all(calls).await;

        attempted = attempted.saturating_add(wave.len());
        succeeded = succeeded.saturating_add(wave.iter().filter(|record| record.succeeded()).count());

        if started.elapsed() > ERROR_CHECK_GRACE {
            let failed = attempted.saturating_sub(succeeded);
            if exceeds_error_limit(failed, attempted) {
                return Err(BenchError::ExcessiveErrorRate {
                    concurrency,
                    error_rate_x100: percent_x100(failed, attempted),
                });
            }
        }
    }

    let elapsed = started.elapsed();
    if succeeded == 0 {
        return Err(BenchError::NoSuccessfulCalls {
            method: operation.name().to_owned(),
            attempted,
        });
    }

    Ok(LevelReport {
        concurrency,
        attempted,
        succeeded,
        elapsed,
        throughput_x100: throughput_x100(succeeded, elapsed),
    })
}

fn exceeds_error_limit(failed: usize, attempted: usize) -> bool {
    let failed = u128::try_from(failed).unwrap_or(u128::MAX);
    let attempted = u128::try_from(attempted).unwrap_or(u128::MAX);
    failed.saturating_mul(PERCENT_BASE) > attempted.saturating_mul(ERROR_RATE_LIMIT_PERCENT)
}
