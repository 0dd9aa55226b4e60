use std::path::PathBuf;
use std::time::Duration;

use crate::app::SuiteConfig;
use crate::args::{BenchArgs, default_operations, default_search_operation};
use crate::bench::SearchConfig;
use crate::error::{AppError, AppResult, ValidationError};
use crate::invoker::parse_endpoint;

use super::types::RunPlan;

/// Pause after the warmup call before the first wave of a method.
const WARMUP_PAUSE: Duration = Duration::from_secs(1);

pub(in crate::entry) fn build_plan(args: BenchArgs) -> AppResult<RunPlan> {
    let rpc_url = match args.rpc_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => url.to_owned(),
        Some(_) | None => {
            tracing::error!("Missing RPC endpoint (set --rpc-url, RPC_ENDPOINT, or rpc_url in config).");
            return Err(AppError::validation(ValidationError::MissingRpcUrl));
        }
    };
    parse_endpoint(&rpc_url)?;

    let search = if args.find_max_rps {
        let operation = args
            .search_method
            .clone()
            .unwrap_or_else(default_search_operation);
        let config = SearchConfig {
            operation,
            start: args.search_start.get(),
            max: args.search_max.get(),
            step: args.search_step.get(),
            duration_per_level: args.search_duration,
            per_call_timeout: args.request_timeout,
            settle_delay: args.search_settle,
        };
        config.validate()?;
        Some(config)
    } else {
        None
    };

    let operations = if args.methods.is_empty() {
        default_operations(&args.address)
    } else {
        args.methods
    };

    let suite = SuiteConfig {
        operations,
        total_calls: args.requests.get(),
        concurrency: args.concurrency.get(),
        warmup: !args.no_warmup,
        warmup_pause: WARMUP_PAUSE,
        inter_batch_delay: args.cooldown,
        per_call_timeout: args.request_timeout,
        method_delay: args.method_delay,
        search,
    };

    let export_dir = if args.no_export {
        None
    } else {
        Some(PathBuf::from(args.output_dir))
    };

    Ok(RunPlan {
        rpc_url,
        connect_timeout: args.connect_timeout,
        suite,
        export_dir,
    })
}
