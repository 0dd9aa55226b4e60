use crate::bench::BenchmarkSummary;

use super::summary::{format_ms, format_x100};

pub(crate) const LATENCY_TITLE: &str = "Methods ranked by average latency:";
pub(crate) const THROUGHPUT_TITLE: &str = "Methods ranked by throughput:";

/// A titled list of `N. method: value` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Ranking {
    pub(crate) title: &'static str,
    pub(crate) lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rankings {
    pub(crate) by_latency: Ranking,
    pub(crate) by_throughput: Ranking,
}

/// Ranks methods by average latency (ascending) and by throughput
/// (descending). Ties keep run order.
pub(crate) fn rank_methods(results: &[BenchmarkSummary]) -> Rankings {
    let mut by_latency: Vec<&BenchmarkSummary> = results.iter().collect();
    by_latency.sort_by_key(|summary| summary.avg_latency);

    let mut by_throughput: Vec<&BenchmarkSummary> = results.iter().collect();
    by_throughput.sort_by(|left, right| right.throughput_x100.cmp(&left.throughput_x100));

    Rankings {
        by_latency: Ranking {
            title: LATENCY_TITLE,
            lines: numbered(&by_latency, |summary| {
                format!("{} ms", format_ms(summary.avg_latency))
            }),
        },
        by_throughput: Ranking {
            title: THROUGHPUT_TITLE,
            lines: numbered(&by_throughput, |summary| {
                format!("{} req/s", format_x100(summary.throughput_x100))
            }),
        },
    }
}

fn numbered<F>(ordered: &[&BenchmarkSummary], value: F) -> Vec<String>
where
    F: Fn(&BenchmarkSummary) -> String,
{
    ordered
        .iter()
        .enumerate()
        .map(|(index, summary)| {
            format!(
                "{}. {}: {}",
                index.saturating_add(1),
                summary.method,
                value(summary)
            )
        })
        .collect()
}
