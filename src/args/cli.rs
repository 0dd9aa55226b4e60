use clap::Parser;
use std::time::Duration;

use crate::bench::Operation;

use super::defaults::DEFAULT_ADDRESS;
use super::parsers::{
    parse_bool_env, parse_delay_arg, parse_duration_arg, parse_operation_spec,
    parse_positive_usize,
};
use super::types::PositiveUsize;

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "rpcbench",
    version,
    about = "Benchmark a JSON-RPC endpoint: per-method latency and throughput statistics, rankings, and an optional search for the maximum sustainable request rate."
)]
pub struct BenchArgs {
    /// JSON-RPC endpoint URL
    #[arg(long = "rpc-url", short = 'u', env = "RPC_ENDPOINT")]
    pub rpc_url: Option<String>,

    /// Method to benchmark as NAME or NAME:JSON_ARRAY (repeatable; replaces the default set)
    #[arg(long = "method", short = 'm', value_parser = parse_operation_spec)]
    pub methods: Vec<Operation>,

    /// Account address used by the default eth_getBalance and eth_getTransactionCount calls
    #[arg(long, default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Requests per method
    #[arg(long, short = 'n', default_value = "100", value_parser = parse_positive_usize)]
    pub requests: PositiveUsize,

    /// Calls in flight per wave
    #[arg(long, short = 'c', default_value = "5", value_parser = parse_positive_usize)]
    pub concurrency: PositiveUsize,

    /// Skip the warmup call before each method
    #[arg(long = "no-warmup")]
    pub no_warmup: bool,

    /// Delay between waves (supports ms/s/m/h; 0 disables)
    #[arg(long, default_value = "100ms", value_parser = parse_delay_arg)]
    pub cooldown: Duration,

    /// Per-call timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub request_timeout: Duration,

    /// TCP connect timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = "5s", value_parser = parse_duration_arg)]
    pub connect_timeout: Duration,

    /// Pause between benchmarked methods (supports ms/s/m/h; 0 disables)
    #[arg(long = "method-delay", default_value = "1s", value_parser = parse_delay_arg)]
    pub method_delay: Duration,

    /// Search for the maximum sustainable throughput after the benchmarks
    #[arg(
        long = "find-max-rps",
        env = "FIND_MAX_RPS",
        value_parser = parse_bool_env,
        help_heading = "Throughput Search"
    )]
    pub find_max_rps: bool,

    /// Method used by the throughput search (defaults to eth_blockNumber)
    #[arg(
        long = "search-method",
        value_parser = parse_operation_spec,
        help_heading = "Throughput Search"
    )]
    pub search_method: Option<Operation>,

    /// Starting concurrency for the search
    #[arg(
        long = "search-start",
        default_value = "5",
        value_parser = parse_positive_usize,
        help_heading = "Throughput Search"
    )]
    pub search_start: PositiveUsize,

    /// Highest concurrency the search will try
    #[arg(
        long = "search-max",
        default_value = "250",
        value_parser = parse_positive_usize,
        help_heading = "Throughput Search"
    )]
    pub search_max: PositiveUsize,

    /// Concurrency increment between levels
    #[arg(
        long = "search-step",
        default_value = "5",
        value_parser = parse_positive_usize,
        help_heading = "Throughput Search"
    )]
    pub search_step: PositiveUsize,

    /// How long each level runs (supports ms/s/m/h)
    #[arg(
        long = "search-duration",
        default_value = "5s",
        value_parser = parse_duration_arg,
        help_heading = "Throughput Search"
    )]
    pub search_duration: Duration,

    /// Pause between levels (supports ms/s/m/h; 0 disables)
    #[arg(
        long = "search-settle",
        default_value = "1s",
        value_parser = parse_delay_arg,
        help_heading = "Throughput Search"
    )]
    pub search_settle: Duration,

    /// Directory for the JSON results file
    #[arg(long = "output-dir", short = 'o', default_value = ".")]
    pub output_dir: String,

    /// Do not write the JSON results file
    #[arg(long = "no-export")]
    pub no_export: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by RPCBENCH_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./rpcbench.toml or ./rpcbench.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
