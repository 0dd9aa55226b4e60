use thiserror::Error;

/// Failure of a single remote invocation.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("Endpoint returned HTTP {status}.")]
    Status { status: u16 },
    #[error("Failed to decode response: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Response for '{method}' carried neither result nor error.")]
    MissingResult { method: String },
    #[error("Unexpected result for '{method}': {value}")]
    UnexpectedResult { method: String, value: String },
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
}
