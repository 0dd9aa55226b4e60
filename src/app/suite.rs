use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info};

use crate::bench::{
    BatchConfig, BenchmarkSummary, Operation, SearchConfig, ThroughputResult, find_max_throughput,
    run_batch,
};
use crate::error::AppResult;
use crate::invoker::{Invoker, NetworkInfo, fetch_network_info};

/// Everything one benchmark run needs besides the endpoint.
#[derive(Debug, Clone)]
pub(crate) struct SuiteConfig {
    pub(crate) operations: Vec<Operation>,
    pub(crate) total_calls: usize,
    pub(crate) concurrency: usize,
    pub(crate) warmup: bool,
    pub(crate) warmup_pause: Duration,
    pub(crate) inter_batch_delay: Duration,
    pub(crate) per_call_timeout: Duration,
    /// Pause between benchmarked methods.
    pub(crate) method_delay: Duration,
    pub(crate) search: Option<SearchConfig>,
}

impl SuiteConfig {
    pub(crate) fn batch_config(&self, operation: &Operation) -> BatchConfig {
        BatchConfig {
            operation: operation.clone(),
            total_calls: self.total_calls,
            concurrency: self.concurrency,
            warmup: self.warmup,
            warmup_pause: self.warmup_pause,
            inter_batch_delay: self.inter_batch_delay,
            per_call_timeout: self.per_call_timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MethodFailure {
    pub(crate) method: String,
    pub(crate) error: String,
}

#[derive(Debug)]
pub(crate) struct SuiteOutcome {
    pub(crate) network: NetworkInfo,
    /// Summaries in the order the methods ran.
    pub(crate) results: Vec<BenchmarkSummary>,
    pub(crate) failures: Vec<MethodFailure>,
    pub(crate) max_throughput: Option<ThroughputResult>,
}

/// Probes the network, benchmarks every configured method, then runs the
/// throughput search when enabled.
///
/// A method whose batch fails is logged and skipped.
///
/// # Errors
///
/// Returns an error when the network probe fails or the search config is
/// invalid.
pub(crate) async fn run_suite<I>(invoker: &I, config: &SuiteConfig) -> AppResult<SuiteOutcome>
where
    I: Invoker + ?Sized,
{
    info!("Testing node connection...");
    let network = fetch_network_info(invoker).await?;
    info!(
        "Connected to network: {} (chainId: {})",
        network.name, network.chain_id
    );

    let mut results = Vec::with_capacity(config.operations.len());
    let mut failures = Vec::new();
    let method_count = config.operations.len();
    for (index, operation) in config.operations.iter().enumerate() {
        match run_batch(invoker, &config.batch_config(operation)).await {
            Ok(summary) => results.push(summary),
            Err(err) => {
                error!("Failed to benchmark {}: {}", operation.name(), err);
                failures.push(MethodFailure {
                    method: operation.name().to_owned(),
                    error: err.to_string(),
                });
            }
        }
        let is_last = index.saturating_add(1) >= method_count;
        if !is_last && !config.method_delay.is_zero() {
            sleep(config.method_delay).await;
        }
    }

    let max_throughput = match config.search.as_ref() {
        Some(search) => Some(find_max_throughput(invoker, search).await?),
        None => None,
    };

    Ok(SuiteOutcome {
        network,
        results,
        failures,
        max_throughput,
    })
}
