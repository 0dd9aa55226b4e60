use std::time::Duration;

use serde_json::json;
use tempfile::tempdir;

use super::test_support::{parse_with_matches, write_config};
use super::types::DurationValue;
use super::{apply_config, load_config_file};

const TOML_CONFIG: &str = r#"
rpc_url = "http://config-node:8545"
requests = 250
concurrency = 20
warmup = false
cooldown = "250ms"
timeout = 3
method_delay = 0
find_max_rps = true
output_dir = "out"

[[methods]]
name = "eth_getBalance"
params = ["0xabc", "latest"]

[[methods]]
name = "eth_blockNumber"

[search]
method = "eth_gasPrice"
start = 10
max = 100
step = 10
duration = "2s"
settle = "0"
"#;

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = write_config(dir.path(), "rpcbench.toml", TOML_CONFIG)?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.rpc_url.as_deref() != Some("http://config-node:8545") {
        return Err("Unexpected rpc_url".to_owned());
    }
    let methods = config.methods.ok_or_else(|| "Expected methods".to_owned())?;
    let first = methods.first().ok_or_else(|| "Missing method".to_owned())?;
    if first.name != "eth_getBalance" || first.params != [json!("0xabc"), json!("latest")] {
        return Err(format!("Unexpected first method: {:?}", first));
    }
    let second = methods.get(1).ok_or_else(|| "Missing second method".to_owned())?;
    if !second.params.is_empty() {
        return Err("Expected params to default to empty".to_owned());
    }
    let search = config.search.ok_or_else(|| "Expected search".to_owned())?;
    if search.start != Some(10) || search.method.as_deref() != Some("eth_gasPrice") {
        return Err("Unexpected search section".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let content = r#"{
        "rpc_endpoint": "http://json-node:8545",
        "requests": 10,
        "timeout": "1500ms",
        "methods": [{"name": "eth_chainId"}]
    }"#;
    let path = write_config(dir.path(), "rpcbench.json", content)?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.rpc_url.as_deref() != Some("http://json-node:8545") {
        return Err("Expected rpc_endpoint alias".to_owned());
    }
    let timeout = config
        .timeout
        .ok_or_else(|| "Expected timeout".to_owned())?
        .to_duration()
        .map_err(|err| err.to_string())?;
    if timeout != Duration::from_millis(1500) {
        return Err(format!("Unexpected timeout: {:?}", timeout));
    }
    Ok(())
}

#[test]
fn load_config_rejects_unknown_extension() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = write_config(dir.path(), "rpcbench.yaml", "requests: 1")?;
    match load_config_file(&path) {
        Err(err) if err.to_string().contains("Unsupported config extension") => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected unsupported extension error".to_owned()),
    }
}

#[test]
fn apply_config_fills_unset_options() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = write_config(dir.path(), "rpcbench.toml", TOML_CONFIG)?;
    let config = load_config_file(&path).map_err(|err| err.to_string())?;

    let (mut args, matches) = parse_with_matches(&["rpcbench", "--rpc-url", "http://cli:8545"])?;
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    let search_method = args.search_method.as_ref().map(|operation| operation.name());
    let checks = [
        (
            args.rpc_url.as_deref() == Some("http://cli:8545"),
            "CLI rpc_url should win",
        ),
        (args.requests.get() == 250, "Unexpected requests"),
        (args.concurrency.get() == 20, "Unexpected concurrency"),
        (args.no_warmup, "Expected warmup disabled"),
        (
            args.cooldown == Duration::from_millis(250),
            "Unexpected cooldown",
        ),
        (
            args.request_timeout == Duration::from_secs(3),
            "Unexpected timeout",
        ),
        (args.method_delay.is_zero(), "Unexpected method_delay"),
        (args.find_max_rps, "Expected find_max_rps"),
        (args.output_dir == "out", "Unexpected output_dir"),
        (args.methods.len() == 2, "Unexpected method count"),
        (search_method == Some("eth_gasPrice"), "Unexpected search method"),
        (args.search_start.get() == 10, "Unexpected search start"),
        (args.search_max.get() == 100, "Unexpected search max"),
        (args.search_step.get() == 10, "Unexpected search step"),
        (
            args.search_duration == Duration::from_secs(2),
            "Unexpected search duration",
        ),
        (args.search_settle.is_zero(), "Unexpected search settle"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(message.to_owned());
        }
    }
    Ok(())
}

#[test]
fn apply_config_keeps_cli_values() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = write_config(dir.path(), "rpcbench.toml", TOML_CONFIG)?;
    let config = load_config_file(&path).map_err(|err| err.to_string())?;

    let (mut args, matches) = parse_with_matches(&[
        "rpcbench",
        "-u",
        "http://cli:8545",
        "-n",
        "3",
        "-m",
        "eth_chainId",
        "--search-start",
        "1",
    ])?;
    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.requests.get() != 3 {
        return Err("CLI requests should win".to_owned());
    }
    if args.methods.len() != 1 {
        return Err("CLI methods should win".to_owned());
    }
    if args.search_start.get() != 1 || args.search_max.get() != 100 {
        return Err("Search values should merge per field".to_owned());
    }
    Ok(())
}

#[test]
fn apply_config_rejects_invalid_values() -> Result<(), String> {
    let cases = [
        ("concurrency = 0", "must be >= 1"),
        ("timeout = 0", "invalid duration"),
        ("timeout = \"5x\"", "invalid duration"),
        ("[[methods]]\nname = \"  \"", "method #0"),
        ("[search]\nmethod = \"eth_call:{}\"", "search.method"),
    ];
    for (content, expected) in cases {
        let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let path = write_config(dir.path(), "rpcbench.toml", content)?;
        let config = load_config_file(&path).map_err(|err| err.to_string())?;
        let (mut args, matches) = parse_with_matches(&["rpcbench", "-u", "http://cli:8545"])?;
        match apply_config(&mut args, &matches, &config) {
            Err(err) if err.to_string().contains(expected) => {}
            Err(err) => return Err(format!("Unexpected error for {}: {}", content, err)),
            Ok(()) => return Err(format!("Expected error for {}", content)),
        }
    }
    Ok(())
}

#[test]
fn duration_value_delay_allows_zero() -> Result<(), String> {
    let zero = DurationValue::Seconds(0);
    if !zero.to_delay().map_err(|err| err.to_string())?.is_zero() {
        return Err("Expected zero delay".to_owned());
    }
    if zero.to_duration().is_ok() {
        return Err("Expected zero duration to fail".to_owned());
    }
    let text = DurationValue::Text("2m".to_owned());
    if text.to_duration().map_err(|err| err.to_string())? != Duration::from_secs(120) {
        return Err("Unexpected text duration".to_owned());
    }
    Ok(())
}
