use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::parsers::parse_operation_spec;
use crate::args::{BenchArgs, PositiveUsize};
use crate::bench::Operation;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ConfigFile, DurationValue, MethodConfig, SearchConfigSection};

/// Applies configuration values to CLI arguments.
///
/// Options given on the command line or through their environment variable
/// keep their value; everything else is taken from the config when present.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut BenchArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "rpc_url")
        && let Some(url) = config.rpc_url.clone()
    {
        args.rpc_url = Some(url);
    }

    if !is_explicit(matches, "methods")
        && let Some(methods) = config.methods.as_ref()
    {
        args.methods = parse_methods(methods)?;
    }

    if !is_explicit(matches, "address")
        && let Some(address) = config.address.clone()
    {
        args.address = address;
    }

    if !is_explicit(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = ensure_positive_usize(requests, "requests")?;
    }

    if !is_explicit(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency = ensure_positive_usize(concurrency, "concurrency")?;
    }

    if !is_explicit(matches, "no_warmup")
        && let Some(warmup) = config.warmup
    {
        args.no_warmup = !warmup;
    }

    if !is_explicit(matches, "cooldown")
        && let Some(value) = config.cooldown.as_ref()
    {
        args.cooldown = resolve_delay(value, "cooldown")?;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(value) = config.timeout.as_ref()
    {
        args.request_timeout = resolve_duration(value, "timeout")?;
    }

    if !is_explicit(matches, "connect_timeout")
        && let Some(value) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = resolve_duration(value, "connect_timeout")?;
    }

    if !is_explicit(matches, "method_delay")
        && let Some(value) = config.method_delay.as_ref()
    {
        args.method_delay = resolve_delay(value, "method_delay")?;
    }

    if !is_explicit(matches, "find_max_rps")
        && let Some(enabled) = config.find_max_rps
    {
        args.find_max_rps = enabled;
    }

    if let Some(search) = config.search.as_ref() {
        apply_search(args, matches, search)?;
    }

    if !is_explicit(matches, "output_dir")
        && let Some(dir) = config.output_dir.clone()
    {
        args.output_dir = dir;
    }

    if !is_explicit(matches, "no_export")
        && let Some(no_export) = config.no_export
    {
        args.no_export = no_export;
    }

    if !is_explicit(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    if !is_explicit(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    Ok(())
}

fn apply_search(
    args: &mut BenchArgs,
    matches: &ArgMatches,
    search: &SearchConfigSection,
) -> AppResult<()> {
    if !is_explicit(matches, "search_method")
        && let Some(method) = search.method.as_deref()
    {
        let operation = parse_operation_spec(method)
            .map_err(|err| AppError::config(ConfigError::InvalidSearchMethod { source: err }))?;
        args.search_method = Some(operation);
    }

    if !is_explicit(matches, "search_start")
        && let Some(start) = search.start
    {
        args.search_start = ensure_positive_usize(start, "search.start")?;
    }

    if !is_explicit(matches, "search_max")
        && let Some(max) = search.max
    {
        args.search_max = ensure_positive_usize(max, "search.max")?;
    }

    if !is_explicit(matches, "search_step")
        && let Some(step) = search.step
    {
        args.search_step = ensure_positive_usize(step, "search.step")?;
    }

    if !is_explicit(matches, "search_duration")
        && let Some(value) = search.duration.as_ref()
    {
        args.search_duration = resolve_duration(value, "search.duration")?;
    }

    if !is_explicit(matches, "search_settle")
        && let Some(value) = search.settle.as_ref()
    {
        args.search_settle = resolve_delay(value, "search.settle")?;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn resolve_duration(value: &DurationValue, field: &str) -> AppResult<std::time::Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidDuration {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn resolve_delay(value: &DurationValue, field: &str) -> AppResult<std::time::Duration> {
    value.to_delay().map_err(|err| {
        AppError::config(ConfigError::InvalidDuration {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn parse_methods(methods: &[MethodConfig]) -> AppResult<Vec<Operation>> {
    let mut parsed = Vec::with_capacity(methods.len());
    for (index, method) in methods.iter().enumerate() {
        let name = method.name.trim();
        if name.is_empty() {
            return Err(AppError::config(ConfigError::InvalidMethod {
                index,
                source: ValidationError::MethodNameEmpty,
            }));
        }
        parsed.push(Operation::new(name, method.params.clone()));
    }
    Ok(parsed)
}
