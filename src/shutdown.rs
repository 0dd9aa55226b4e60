use std::future::Future;

use tracing::warn;

use crate::error::{AppError, AppResult, ValidationError};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub(crate) async fn shutdown_signal() {
    #[cfg(unix)]
    let mut term_signal = match signal(SignalKind::terminate()) {
        Ok(signal) => Some(signal),
        Err(err) => {
            eprintln!("Failed to register SIGTERM handler: {}", err);
            None
        }
    };

    #[cfg(unix)]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            () = async {
                if let Some(signal) = term_signal.as_mut() {
                    signal.recv().await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {}
        }
    }

    #[cfg(not(unix))]
    {
        drop(tokio::signal::ctrl_c().await);
    }
}

/// Drives `work` to completion unless `signal` resolves first, in which case
/// `work` is dropped and the run reports `RunCancelled`.
pub(crate) async fn run_until_shutdown<T, W, S>(work: W, signal: S) -> AppResult<T>
where
    W: Future<Output = AppResult<T>>,
    S: Future<Output = ()>,
{
    tokio::select! {
        result = work => result,
        () = signal => {
            warn!("Shutdown requested, abandoning in-flight calls.");
            Err(AppError::validation(ValidationError::RunCancelled))
        }
    }
}
