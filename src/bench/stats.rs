use std::time::Duration;

use crate::error::BenchError;

use super::types::{BenchmarkSummary, CallRecord};

/// Nearest-rank percentiles reported per batch.
const PERCENTILE_P95: usize = 95;
const PERCENTILE_P99: usize = 99;
const PERCENT_DIVISOR: usize = 100;
/// Hundredths of a percent in a whole.
const RATE_SCALE_X100: u128 = 10_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
/// Fixed-point factor for calls-per-second values.
const THROUGHPUT_SCALE: u128 = 100;

/// Aggregates the successful records of a batch into a summary.
///
/// Only successful records contribute latencies. `total_attempted` is the
/// denominator for the success rate and the source of the error count.
///
/// # Errors
///
/// Returns `NoSuccessfulCalls` when no record succeeded.
pub fn summarize(
    records: &[CallRecord],
    total_elapsed: Duration,
    method: &str,
    total_attempted: usize,
) -> Result<BenchmarkSummary, BenchError> {
    let mut latencies: Vec<Duration> = records
        .iter()
        .filter(|record| record.succeeded())
        .map(|record| record.elapsed)
        .collect();

    if latencies.is_empty() {
        return Err(BenchError::NoSuccessfulCalls {
            method: method.to_owned(),
            attempted: total_attempted,
        });
    }

    let successes = latencies.len();
    let attempted = total_attempted.max(successes);
    let avg_latency = mean(&latencies);
    latencies.sort_unstable();

    Ok(BenchmarkSummary {
        method: method.to_owned(),
        avg_latency,
        min_latency: latencies.first().copied().unwrap_or_default(),
        max_latency: latencies.last().copied().unwrap_or_default(),
        p95_latency: nearest_rank(&latencies, PERCENTILE_P95),
        p99_latency: nearest_rank(&latencies, PERCENTILE_P99),
        success_rate_x100: percent_x100(successes, attempted),
        throughput_x100: throughput_x100(successes, total_elapsed),
        success_count: successes,
        error_count: attempted.saturating_sub(successes),
        total_attempted: attempted,
        total_time: total_elapsed,
    })
}

fn mean(latencies: &[Duration]) -> Duration {
    let total_nanos = latencies
        .iter()
        .fold(0u128, |acc, latency| acc.saturating_add(latency.as_nanos()));
    let count = u128::try_from(latencies.len()).unwrap_or(u128::MAX);
    let avg_nanos = total_nanos.checked_div(count).unwrap_or(0);
    Duration::from_nanos(u64::try_from(avg_nanos).unwrap_or(u64::MAX))
}

/// Value at index `floor(percentile * n / 100)` of an ascending slice.
pub(crate) fn nearest_rank(sorted: &[Duration], percentile: usize) -> Duration {
    let index = sorted
        .len()
        .saturating_mul(percentile)
        .checked_div(PERCENT_DIVISOR)
        .unwrap_or(0);
    sorted
        .get(index)
        .or_else(|| sorted.last())
        .copied()
        .unwrap_or_default()
}

/// `part / whole` in hundredths of a percent; zero when `whole` is zero.
pub(crate) fn percent_x100(part: usize, whole: usize) -> u64 {
    let part = u128::try_from(part).unwrap_or(u128::MAX);
    let whole = u128::try_from(whole).unwrap_or(0);
    let scaled = part
        .saturating_mul(RATE_SCALE_X100)
        .checked_div(whole)
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Calls per second in hundredths; zero when no time has elapsed.
pub(crate) fn throughput_x100(successes: usize, elapsed: Duration) -> u64 {
    let successes = u128::try_from(successes).unwrap_or(u128::MAX);
    let scaled = successes
        .saturating_mul(THROUGHPUT_SCALE)
        .saturating_mul(NANOS_PER_SEC)
        .checked_div(elapsed.as_nanos())
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
