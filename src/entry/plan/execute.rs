use chrono::Utc;
use tracing::info;

use crate::app::{SuiteOutcome, export_results, print_report, run_suite};
use crate::error::{AppError, AppResult, ValidationError};
use crate::invoker::JsonRpcInvoker;
use crate::shutdown::{run_until_shutdown, shutdown_signal};

use super::types::RunPlan;

pub(in crate::entry) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    let invoker = JsonRpcInvoker::new(&plan.rpc_url, plan.connect_timeout)?;
    info!("Connected to RPC endpoint: {}", invoker.endpoint());
    let started_at = Utc::now();

    let outcome: SuiteOutcome =
        match run_until_shutdown(run_suite(&invoker, &plan.suite), shutdown_signal()).await {
            Ok(outcome) => outcome,
            Err(AppError::Validation(ValidationError::RunCancelled)) => {
                eprintln!("Run cancelled.");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

    print_report(&outcome);

    if let Some(dir) = plan.export_dir.as_deref() {
        let path = export_results(dir, &outcome, &plan.suite, started_at).await?;
        println!();
        println!("Results exported to '{}'", path.display());
    }
    Ok(())
}
