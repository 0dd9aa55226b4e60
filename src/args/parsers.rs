use std::time::Duration;

use serde_json::Value;

use super::types::PositiveUsize;
use crate::bench::Operation;
use crate::error::{AppError, AppResult, ValidationError};

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::validation(ValidationError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}

/// Parses `NAME` or `NAME:JSON_ARRAY` into an operation.
pub(crate) fn parse_operation_spec(s: &str) -> Result<Operation, ValidationError> {
    let (name, params) = match s.split_once(':') {
        Some((name, params)) => (name.trim(), Some(params.trim())),
        None => (s.trim(), None),
    };
    operation_from_parts(name, params)
}

fn operation_from_parts(
    name: &str,
    params: Option<&str>,
) -> Result<Operation, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::MethodNameEmpty);
    }
    let params = match params {
        None | Some("") => Vec::new(),
        Some(raw) => serde_json::from_str::<Vec<Value>>(raw).map_err(|err| {
            ValidationError::InvalidMethodParams {
                method: name.to_owned(),
                source: err,
            }
        })?,
    };
    Ok(Operation::new(name, params))
}

/// Parses a duration such as `250ms`, `5s`, `2m` or `1h`; bare numbers are
/// seconds. Zero is allowed.
pub(crate) fn parse_duration_value(s: &str) -> Result<Duration, ValidationError> {
    let value = s.trim();
    if value.is_empty() {
        return Err(ValidationError::DurationEmpty);
    }

    let digits_len = value.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(ValidationError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ValidationError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let unit = if unit_part.is_empty() { "s" } else { unit_part };
    match unit {
        "ms" => Ok(Duration::from_millis(number)),
        "s" => Ok(Duration::from_secs(number)),
        "m" => number
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or(ValidationError::DurationOverflow),
        "h" => number
            .checked_mul(60)
            .and_then(|minutes| minutes.checked_mul(60))
            .map(Duration::from_secs)
            .ok_or(ValidationError::DurationOverflow),
        _ => Err(ValidationError::InvalidDurationUnit {
            unit: unit.to_owned(),
        }),
    }
}

/// Like [`parse_duration_value`] but rejects durations under a millisecond.
pub(crate) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    let duration = parse_duration_value(s)?;
    if duration.as_millis() == 0 {
        return Err(AppError::validation(ValidationError::DurationZero));
    }
    Ok(duration)
}

pub(crate) fn parse_delay_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s).map_err(AppError::from)
}
