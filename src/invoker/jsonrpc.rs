use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, InvokeError, ValidationError};

use super::Invoker;

const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Serialize)]
struct RpcRequest<'req> {
    jsonrpc: &'static str,
    id: u64,
    method: &'req str,
    params: &'req [Value],
}

/// JSON-RPC 2.0 over HTTP POST.
#[derive(Debug)]
pub struct JsonRpcInvoker {
    client: Client,
    endpoint: Url,
    next_id: AtomicU64,
}

impl JsonRpcInvoker {
    /// Builds an invoker for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or has no host, or when the
    /// HTTP client cannot be built.
    pub fn new(endpoint: &str, connect_timeout: Duration) -> AppResult<Self> {
        let endpoint = parse_endpoint(endpoint)?;
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|err| AppError::Invoke(InvokeError::BuildClient { source: err }))?;
        Ok(Self {
            client,
            endpoint,
            next_id: AtomicU64::new(1),
        })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Invoker for JsonRpcInvoker {
    async fn invoke(&self, method: &str, params: &[Value]) -> Result<Value, InvokeError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| InvokeError::Transport { source: err })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InvokeError::Status {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| InvokeError::Decode { source: err })?;
        debug!("RPC {} (id {}) answered", method, id);
        parse_response(method, body)
    }
}

/// Parses an endpoint URL and requires it to name a host.
///
/// # Errors
///
/// Returns an error when the URL is malformed or has no host.
pub fn parse_endpoint(endpoint: &str) -> AppResult<Url> {
    let url = Url::parse(endpoint).map_err(|err| {
        AppError::validation(ValidationError::InvalidRpcUrl {
            url: endpoint.to_owned(),
            source: err,
        })
    })?;
    if url.host_str().is_none() {
        return Err(AppError::validation(ValidationError::RpcUrlMissingHost {
            url: endpoint.to_owned(),
        }));
    }
    Ok(url)
}

/// Splits a JSON-RPC response body into its result or error member.
///
/// A present `"result": null` is a valid result.
pub(super) fn parse_response(method: &str, mut body: Value) -> Result<Value, InvokeError> {
    if let Some(error) = body.get("error").filter(|error| !error.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| error.to_string(), str::to_owned);
        return Err(InvokeError::Rpc { code, message });
    }

    match body.as_object_mut().and_then(|object| object.remove("result")) {
        Some(result) => Ok(result),
        None => Err(InvokeError::MissingResult {
            method: method.to_owned(),
        }),
    }
}
