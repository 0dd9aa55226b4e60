use std::time::Duration;

use crate::bench::{BenchmarkSummary, ThroughputResult};

use super::rankings::{Ranking, rank_methods};
use super::suite::{MethodFailure, SuiteOutcome};

const PERCENT_DIVISOR: u64 = 100;
/// Nanoseconds per hundredth of a millisecond.
const NS_PER_MS_X100: u128 = 10_000;
/// Milliseconds per hundredth of a second.
const MS_PER_SEC_X100: u128 = 10;

/// Formats a fixed-point hundredths value as `12.34`.
pub(crate) fn format_x100(value: u64) -> String {
    format!(
        "{}.{:02}",
        value / PERCENT_DIVISOR,
        value % PERCENT_DIVISOR
    )
}

/// Milliseconds with two decimals, truncated.
pub(crate) fn format_ms(duration: Duration) -> String {
    format_x100(scaled(duration.as_nanos(), NS_PER_MS_X100))
}

/// Seconds with two decimals, truncated.
pub(crate) fn format_secs(duration: Duration) -> String {
    format_x100(scaled(duration.as_millis(), MS_PER_SEC_X100))
}

fn scaled(value: u128, divisor: u128) -> u64 {
    u64::try_from(value.checked_div(divisor).unwrap_or(0)).unwrap_or(u64::MAX)
}

pub(crate) fn summary_lines(summary: &BenchmarkSummary) -> Vec<String> {
    vec![
        format!("Method: {}", summary.method),
        format!("   ├─ Average Latency: {} ms", format_ms(summary.avg_latency)),
        format!("   ├─ Min Latency: {} ms", format_ms(summary.min_latency)),
        format!("   ├─ Max Latency: {} ms", format_ms(summary.max_latency)),
        format!("   ├─ P95 Latency: {} ms", format_ms(summary.p95_latency)),
        format!("   ├─ P99 Latency: {} ms", format_ms(summary.p99_latency)),
        format!(
            "   ├─ Success Rate: {}%",
            format_x100(summary.success_rate_x100)
        ),
        format!(
            "   ├─ Throughput: {} req/s",
            format_x100(summary.throughput_x100)
        ),
        format!("   ├─ Error Count: {}", summary.error_count),
        format!("   └─ Total Time: {} s", format_secs(summary.total_time)),
    ]
}

fn ranking_lines(ranking: &Ranking) -> Vec<String> {
    let mut lines = Vec::with_capacity(ranking.lines.len().saturating_add(2));
    lines.push(String::new());
    lines.push(ranking.title.to_owned());
    lines.extend(ranking.lines.iter().cloned());
    lines
}

fn failure_lines(failures: &[MethodFailure]) -> Vec<String> {
    let mut lines = vec![String::new(), "Skipped Methods".to_owned()];
    lines.extend(
        failures
            .iter()
            .map(|failure| format!("   - {}: {}", failure.method, failure.error)),
    );
    lines
}

pub(crate) fn throughput_lines(result: &ThroughputResult) -> Vec<String> {
    let mut lines = vec![
        "Maximum Throughput Results".to_owned(),
        "==========================".to_owned(),
        format!("Method: {}", result.method),
        format!(
            "Max Throughput: {} req/s",
            format_x100(result.best_throughput_x100)
        ),
        format!("Optimal Concurrency: {}", result.concurrency_at_best),
        format!("Stopped: {}", result.stop.as_str()),
    ];
    for level in &result.levels {
        lines.push(format!(
            "   concurrency {:>4}: {} req/s ({}/{} ok in {} s)",
            level.concurrency,
            format_x100(level.throughput_x100),
            level.succeeded,
            level.attempted,
            format_secs(level.elapsed)
        ));
    }
    lines
}

/// Every line of the console report, in print order.
pub(crate) fn report_lines(outcome: &SuiteOutcome) -> Vec<String> {
    let mut lines = vec![
        "Benchmark Results Summary".to_owned(),
        "=========================".to_owned(),
    ];
    if outcome.results.is_empty() {
        lines.push(String::new());
        lines.push("No method produced a successful call.".to_owned());
    }
    for summary in &outcome.results {
        lines.push(String::new());
        lines.extend(summary_lines(summary));
    }

    if !outcome.failures.is_empty() {
        lines.extend(failure_lines(&outcome.failures));
    }

    if outcome.results.len() > 1 {
        let rankings = rank_methods(&outcome.results);
        lines.push(String::new());
        lines.push("Method Comparison".to_owned());
        lines.push("=================".to_owned());
        lines.extend(ranking_lines(&rankings.by_latency));
        lines.extend(ranking_lines(&rankings.by_throughput));
    }

    if let Some(result) = outcome.max_throughput.as_ref() {
        lines.push(String::new());
        lines.extend(throughput_lines(result));
    }
    lines
}

pub(crate) fn print_report(outcome: &SuiteOutcome) {
    println!();
    for line in report_lines(outcome) {
        println!("{}", line);
    }
}
