use serde_json::Value;

use crate::error::InvokeError;

use super::Invoker;

const CHAIN_ID_METHOD: &str = "eth_chainId";
const HEX_RADIX: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub name: String,
    pub chain_id: u64,
}

/// Probes the endpoint for its chain id.
///
/// # Errors
///
/// Returns an error when the call fails or the chain id is not a quantity.
pub async fn fetch_network_info<I>(invoker: &I) -> Result<NetworkInfo, InvokeError>
where
    I: Invoker + ?Sized,
{
    let value = invoker.invoke(CHAIN_ID_METHOD, &[]).await?;
    let chain_id = parse_quantity(&value).ok_or_else(|| InvokeError::UnexpectedResult {
        method: CHAIN_ID_METHOD.to_owned(),
        value: value.to_string(),
    })?;
    Ok(NetworkInfo {
        name: chain_name(chain_id).to_owned(),
        chain_id,
    })
}

/// Parses a hex quantity (`"0x1a"`) or a plain JSON number.
#[must_use]
pub fn parse_quantity(value: &Value) -> Option<u64> {
    match value {
        Value::String(text) => {
            let digits = text
                .strip_prefix("0x")
                .or_else(|| text.strip_prefix("0X"))?;
            u64::from_str_radix(digits, HEX_RADIX).ok()
        }
        Value::Number(number) => number.as_u64(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

#[must_use]
pub const fn chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "mainnet",
        5 => "goerli",
        10 => "optimism",
        56 => "bsc",
        100 => "gnosis",
        137 => "polygon",
        8453 => "base",
        17000 => "holesky",
        42161 => "arbitrum",
        11_155_111 => "sepolia",
        _ => "unknown",
    }
}
