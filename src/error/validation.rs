use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("{field} must be > 0.")]
    FieldDurationZero { field: &'static str },
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("{field} must be >= {min}.")]
    FieldTooSmall { field: &'static str, min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Search start concurrency {start} is above the maximum {max}.")]
    SearchStartAboveMax { start: usize, max: usize },
    #[error("Method name must not be empty.")]
    MethodNameEmpty,
    #[error("Invalid params for '{method}'. Expected a JSON array: {source}")]
    InvalidMethodParams {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Missing RPC endpoint (set --rpc-url, RPC_ENDPOINT, or rpc_url in config).")]
    MissingRpcUrl,
    #[error("Invalid RPC endpoint '{url}': {source}")]
    InvalidRpcUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("RPC endpoint '{url}' is missing a host.")]
    RpcUrlMissingHost { url: String },
    #[error("Run cancelled.")]
    RunCancelled,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
