use serde_json::{Value, json};

use crate::bench::Operation;

pub const DEFAULT_USER_AGENT: &str = concat!("rpcbench/", env!("CARGO_PKG_VERSION"));

/// Account queried by the address-parameterized default methods.
pub const DEFAULT_ADDRESS: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

/// Config filenames checked in the working directory.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["rpcbench.toml", "rpcbench.json"];

/// The method set benchmarked when none is given.
#[must_use]
pub fn default_operations(address: &str) -> Vec<Operation> {
    let at_latest = |address: &str| vec![Value::from(address), json!("latest")];
    vec![
        Operation::new("eth_blockNumber", Vec::new()),
        Operation::new("eth_getBalance", at_latest(address)),
        Operation::new("eth_gasPrice", Vec::new()),
        Operation::new("eth_getTransactionCount", at_latest(address)),
        Operation::new("eth_getBlockByNumber", vec![json!("latest"), json!(false)]),
        Operation::new("eth_chainId", Vec::new()),
    ]
}

/// Operation the throughput search drives when none is given.
#[must_use]
pub fn default_search_operation() -> Operation {
    Operation::new("eth_blockNumber", Vec::new())
}
