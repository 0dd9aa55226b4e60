use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::args::parsers::parse_duration_value;
use crate::error::ValidationError;

/// Settings read from `rpcbench.toml` / `rpcbench.json`.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(alias = "rpc_endpoint")]
    pub rpc_url: Option<String>,
    pub methods: Option<Vec<MethodConfig>>,
    pub address: Option<String>,
    pub requests: Option<usize>,
    pub concurrency: Option<usize>,
    pub warmup: Option<bool>,
    pub cooldown: Option<DurationValue>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub method_delay: Option<DurationValue>,
    pub find_max_rps: Option<bool>,
    pub search: Option<SearchConfigSection>,
    pub output_dir: Option<String>,
    pub no_export: Option<bool>,
    pub no_color: Option<bool>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodConfig {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchConfigSection {
    /// `NAME` or `NAME:JSON_ARRAY`.
    pub method: Option<String>,
    pub start: Option<usize>,
    pub max: Option<usize>,
    pub step: Option<usize>,
    pub duration: Option<DurationValue>,
    pub settle: Option<DurationValue>,
}

/// Bare integers are seconds; strings accept `ms`/`s`/`m`/`h` units.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    /// Resolves a duration that must be non-zero.
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        let duration = self.to_delay()?;
        if duration.as_millis() == 0 {
            return Err(ValidationError::DurationZero);
        }
        Ok(duration)
    }

    /// Resolves a delay; zero disables it.
    pub(crate) fn to_delay(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
