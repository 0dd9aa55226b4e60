use thiserror::Error;

use super::ValidationError;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("No successful calls for '{method}' ({attempted} attempted).")]
    NoSuccessfulCalls { method: String, attempted: usize },
    #[error(
        "Error rate {}.{:02}% at concurrency {} is too high to sustain.",
        .error_rate_x100 / 100,
        .error_rate_x100 % 100,
        .concurrency
    )]
    ExcessiveErrorRate {
        concurrency: usize,
        error_rate_x100: u64,
    },
    #[error("Invalid benchmark settings: {0}")]
    Validation(#[from] ValidationError),
}
