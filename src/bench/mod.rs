//! Benchmark harness: wave-scheduled batches, the max-throughput search, and
//! the statistics both of them report.
mod batch;
mod search;
mod stats;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{execute_batch, plan_waves, run_batch};
pub use search::{LevelReport, SearchConfig, SearchStop, ThroughputResult, find_max_throughput};
pub use stats::summarize;
pub use types::{
    BatchConfig, BatchRun, BenchmarkSummary, CallFailure, CallRecord, Operation,
};
