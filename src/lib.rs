//! Core library for the `rpcbench` CLI.
//!
//! This crate provides the building blocks used by the binary: CLI argument
//! types, configuration parsing, the JSON-RPC transport, and the benchmark
//! engine (wave-scheduled batches, statistics, and the max-throughput
//! search). The primary user-facing interface is the `rpcbench`
//! command-line application; library APIs may evolve as the CLI grows.
pub mod args;
pub mod bench;
pub mod config;
pub mod error;
pub mod invoker;
