//! Remote call dispatch used by the benchmark harness.
mod jsonrpc;
mod network;


use async_trait::async_trait;
use serde_json::Value;

use crate::error::InvokeError;

pub use jsonrpc::{JsonRpcInvoker, parse_endpoint};
pub use network::{NetworkInfo, chain_name, fetch_network_info, parse_quantity};

/// Dispatches a named call with positional parameters to the endpoint.
///
/// Implementations are shared by reference across every concurrent call of a
/// wave and must not need `&mut self`.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Performs one call and returns its result value.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport fails or the endpoint rejects the
    /// call.
    async fn invoke(&self, method: &str, params: &[Value]) -> Result<Value, InvokeError>;
}
