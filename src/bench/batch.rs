use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

use crate::error::BenchError;
use crate::invoker::Invoker;

use super::stats::summarize;
use super::types::{BatchConfig, BatchRun, BenchmarkSummary, CallFailure, CallRecord, Operation};

/// Runs a fixed-size batch and aggregates its records.
///
/// # Errors
///
/// Returns an error when the config is invalid or when every call failed.
pub async fn run_batch<I>(invoker: &I, config: &BatchConfig) -> Result<BenchmarkSummary, BenchError>
where
    I: Invoker + ?Sized,
{
    let run = execute_batch(invoker, config).await?;
    summarize(
        &run.records,
        run.elapsed,
        config.operation.name(),
        config.total_calls,
    )
}

/// Executes a batch in waves of `concurrency` calls without aggregating.
///
/// Every call of a wave settles (success, failure, or timeout) before the
/// next wave is launched.
///
/// # Errors
///
/// Returns an error when the config is invalid.
pub async fn execute_batch<I>(invoker: &I, config: &BatchConfig) -> Result<BatchRun, BenchError>
where
    I: Invoker + ?Sized,
{
    config.validate()?;
    let operation = &config.operation;

    if config.warmup {
        info!("Warming up {}...", operation.name());
        warmup(invoker, operation, config.per_call_timeout).await;
        if !config.warmup_pause.is_zero() {
            sleep(config.warmup_pause).await;
        }
    }

    info!(
        "Starting benchmark for {} (requests: {}, concurrency: {})",
        operation, config.total_calls, config.concurrency
    );

    let wave_sizes = plan_waves(config.total_calls, config.concurrency);
    let wave_count = wave_sizes.len();
    let mut records = Vec::with_capacity(config.total_calls);
    let started = Instant::now();
    let mut launched: usize = 0;

    for (wave_index, wave_size) in wave_sizes.iter().copied().enumerate() {
        let first_index = launched;
        let per_call_timeout = config.per_call_timeout;
        let calls = (0..wave_size).map(move |offset| {
            timed_call(
                invoker,
                operation,
                per_call_timeout,
                first_index.saturating_add(offset),
            )
        });
        let wave = join_all(calls).await;

        for record in &wave {
            if let Some(failure) = record.failure.as_ref() {
                warn!(
                    "Error in request {} for {}: {}",
                    record.index.saturating_add(1),
                    operation.name(),
                    failure
                );
            }
        }
        launched = launched.saturating_add(wave.len());
        records.extend(wave);
        debug!(
            "Wave {}/{} for {} settled ({} calls)",
            wave_index.saturating_add(1),
            wave_count,
            operation.name(),
            wave_size
        );

        let is_last = wave_index.saturating_add(1) >= wave_count;
        if !is_last && !config.inter_batch_delay.is_zero() {
            sleep(config.inter_batch_delay).await;
        }
    }

    Ok(BatchRun {
        method: operation.name().to_owned(),
        records,
        wave_sizes,
        elapsed: started.elapsed(),
    })
}

/// Splits `total` calls into waves of at most `concurrency` calls.
#[must_use]
pub fn plan_waves(total: usize, concurrency: usize) -> Vec<usize> {
    let size = concurrency.max(1);
    let mut waves = Vec::with_capacity(total.div_ceil(size));
    let mut remaining = total;
    while remaining > 0 {
        let wave = remaining.min(size);
        waves.push(wave);
        remaining = remaining.saturating_sub(wave);
    }
    waves
}

/// Races one invocation against its deadline.
///
/// The first settlement decides the record. On timeout the pending call
/// future is dropped; whether the endpoint stops working on it is up to the
/// transport.
pub(crate) async fn timed_call<I>(
    invoker: &I,
    operation: &Operation,
    limit: Duration,
    index: usize,
) -> CallRecord
where
    I: Invoker + ?Sized,
{
    let started_at = Instant::now();
    match timeout(limit, invoker.invoke(operation.name(), operation.params())).await {
        Ok(Ok(_)) => CallRecord::success(index, started_at, Instant::now()),
        Ok(Err(err)) => CallRecord::failed(
            index,
            started_at,
            started_at.elapsed(),
            CallFailure::Rejected {
                reason: err.to_string(),
            },
        ),
        Err(_elapsed) => CallRecord::failed(
            index,
            started_at,
            started_at.elapsed(),
            CallFailure::Timeout { after: limit },
        ),
    }
}

async fn warmup<I>(invoker: &I, operation: &Operation, limit: Duration)
where
    I: Invoker + ?Sized,
{
    match timeout(limit, invoker.invoke(operation.name(), operation.params())).await {
        Ok(Ok(_)) => debug!("Warmup request for {} succeeded", operation.name()),
        Ok(Err(err)) => warn!("Warmup request for {} failed: {}", operation.name(), err),
        Err(_elapsed) => warn!(
            "Warmup request for {} timed out after {}ms",
            operation.name(),
            limit.as_millis()
        ),
    }
}
