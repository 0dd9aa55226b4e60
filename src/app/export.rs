use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, SecondsFormat, Timelike, Utc};
use serde_json::{Value, json};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::bench::{BenchmarkSummary, ThroughputResult};
use crate::error::AppResult;

use super::rankings::{Ranking, rank_methods};
use super::suite::{SuiteConfig, SuiteOutcome};

const FILE_PREFIX: &str = "benchmark_results_";

/// Results file name for a run started at `timestamp`.
pub(crate) fn export_file_name(timestamp: &DateTime<Utc>) -> String {
    format!(
        "{}{:04}-{:02}-{:02}T{:02}-{:02}-{:02}Z.json",
        FILE_PREFIX,
        timestamp.year(),
        timestamp.month(),
        timestamp.day(),
        timestamp.hour(),
        timestamp.minute(),
        timestamp.second()
    )
}

/// Writes the pretty-printed results document into `dir`.
///
/// # Errors
///
/// Returns an error when the directory or file cannot be written.
pub(crate) async fn export_results(
    dir: &Path,
    outcome: &SuiteOutcome,
    config: &SuiteConfig,
    timestamp: DateTime<Utc>,
) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(export_file_name(&timestamp));

    let payload = results_json(outcome, config, &timestamp);
    let json = serde_json::to_vec_pretty(&payload)?;

    let file = tokio::fs::File::create(&path).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await?;
    writer.flush().await?;
    Ok(path)
}

pub(crate) fn results_json(
    outcome: &SuiteOutcome,
    config: &SuiteConfig,
    timestamp: &DateTime<Utc>,
) -> Value {
    let rankings = rank_methods(&outcome.results);
    let results: Vec<Value> = outcome.results.iter().map(summary_json).collect();
    let failures: Vec<Value> = outcome
        .failures
        .iter()
        .map(|failure| json!({"method": failure.method, "error": failure.error}))
        .collect();

    let mut payload = json!({
        "timestamp": timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        "network_info": {
            "name": outcome.network.name,
            "chain_id": outcome.network.chain_id
        },
        "benchmark_options": {
            "num_requests": config.total_calls,
            "concurrency": config.concurrency,
            "warmup": config.warmup,
            "cooldown_ms": config.inter_batch_delay.as_millis(),
            "timeout_ms": config.per_call_timeout.as_millis()
        },
        "results": results,
        "failures": failures,
        "rankings": {
            "by_latency": ranking_json(&rankings.by_latency),
            "by_throughput": ranking_json(&rankings.by_throughput)
        }
    });

    if let Some(result) = outcome.max_throughput.as_ref()
        && let Some(object) = payload.as_object_mut()
    {
        object.insert("max_throughput_test".to_owned(), throughput_json(result));
    }
    payload
}

fn summary_json(summary: &BenchmarkSummary) -> Value {
    json!({
        "method": summary.method,
        "avg_latency_us": summary.avg_latency.as_micros(),
        "min_latency_us": summary.min_latency.as_micros(),
        "max_latency_us": summary.max_latency.as_micros(),
        "p95_latency_us": summary.p95_latency.as_micros(),
        "p99_latency_us": summary.p99_latency.as_micros(),
        "success_rate_x100": summary.success_rate_x100,
        "throughput_x100": summary.throughput_x100,
        "success_count": summary.success_count,
        "error_count": summary.error_count,
        "total_attempted": summary.total_attempted,
        "total_time_ms": summary.total_time.as_millis()
    })
}

fn ranking_json(ranking: &Ranking) -> Value {
    json!({
        "title": ranking.title,
        "rankings": ranking.lines
    })
}

fn throughput_json(result: &ThroughputResult) -> Value {
    let levels: Vec<Value> = result
        .levels
        .iter()
        .map(|level| {
            json!({
                "concurrency": level.concurrency,
                "attempted": level.attempted,
                "succeeded": level.succeeded,
                "elapsed_ms": level.elapsed.as_millis(),
                "throughput_x100": level.throughput_x100
            })
        })
        .collect();
    json!({
        "method": result.method,
        "max_throughput_x100": result.best_throughput_x100,
        "optimal_concurrency": result.concurrency_at_best,
        "stop_reason": result.stop.as_str(),
        "levels": levels
    })
}
