use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::error::ValidationError;

/// A named JSON-RPC call with its ordered parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    name: String,
    params: Vec<Value>,
}

impl Operation {
    #[must_use]
    pub fn new(name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return f.write_str(&self.name);
        }
        let params = Value::Array(self.params.clone());
        write!(f, "{}{}", self.name, params)
    }
}

/// Why a single call did not count as a success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// The per-call deadline fired before the call settled.
    Timeout { after: Duration },
    /// The operation itself returned an error.
    Rejected { reason: String },
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallFailure::Timeout { after } => {
                write!(f, "request timeout after {}ms", after.as_millis())
            }
            CallFailure::Rejected { reason } => f.write_str(reason),
        }
    }
}

/// Outcome of one invocation inside a batch or a search level.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub index: usize,
    pub started_at: Instant,
    /// Absent when the call failed or timed out.
    pub finished_at: Option<Instant>,
    pub elapsed: Duration,
    pub failure: Option<CallFailure>,
}

impl CallRecord {
    #[must_use]
    pub fn success(index: usize, started_at: Instant, finished_at: Instant) -> Self {
        Self {
            index,
            started_at,
            finished_at: Some(finished_at),
            elapsed: finished_at.saturating_duration_since(started_at),
            failure: None,
        }
    }

    #[must_use]
    pub const fn failed(
        index: usize,
        started_at: Instant,
        elapsed: Duration,
        failure: CallFailure,
    ) -> Self {
        Self {
            index,
            started_at,
            finished_at: None,
            elapsed,
            failure: Some(failure),
        }
    }

    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    #[must_use]
    pub const fn timed_out(&self) -> bool {
        matches!(self.failure, Some(CallFailure::Timeout { .. }))
    }
}

/// Settings for one fixed-size batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub operation: Operation,
    pub total_calls: usize,
    pub concurrency: usize,
    pub warmup: bool,
    /// Pause after the warmup call before the first wave.
    pub warmup_pause: Duration,
    /// Delay between waves; never applied after the last wave.
    pub inter_batch_delay: Duration,
    pub per_call_timeout: Duration,
}

impl BatchConfig {
    #[must_use]
    pub const fn new(operation: Operation) -> Self {
        Self {
            operation,
            total_calls: 100,
            concurrency: 1,
            warmup: true,
            warmup_pause: Duration::from_secs(1),
            inter_batch_delay: Duration::from_secs(1),
            per_call_timeout: Duration::from_secs(10),
        }
    }

    /// Checks the batch bounds before any call is issued.
    ///
    /// # Errors
    ///
    /// Returns an error when `total_calls` or `concurrency` is zero, or when
    /// the per-call timeout is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.total_calls == 0 {
            return Err(ValidationError::FieldTooSmall {
                field: "total_calls",
                min: 1,
            });
        }
        if self.concurrency == 0 {
            return Err(ValidationError::FieldTooSmall {
                field: "concurrency",
                min: 1,
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

/// Raw output of a batch before aggregation.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub method: String,
    pub records: Vec<CallRecord>,
    pub wave_sizes: Vec<usize>,
    /// Wall-clock time from the first wave launch to the last settlement.
    pub elapsed: Duration,
}

impl BatchRun {
    #[must_use]
    pub fn successes(&self) -> usize {
        self.records.iter().filter(|record| record.succeeded()).count()
    }
}

/// Immutable statistics for one completed batch.
///
/// Rates are stored as fixed-point hundredths: a `success_rate_x100` of
/// `9950` reads as 99.50%.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkSummary {
    pub method: String,
    pub avg_latency: Duration,
    pub min_latency: Duration,
    pub max_latency: Duration,
    pub p95_latency: Duration,
    pub p99_latency: Duration,
    pub success_rate_x100: u64,
    pub throughput_x100: u64,
    pub success_count: usize,
    pub error_count: usize,
    pub total_attempted: usize,
    pub total_time: Duration,
}
