
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

use serde_json::Value;
use tempfile::tempdir;

use support_rpc::{FAILING_METHOD, describe, run_rpcbench, spawn_rpc_server_or_skip};

const FAST_RUN: [&str; 11] = [
    "-n",
    "4",
    "-c",
    "2",
    "--no-warmup",
    "--cooldown",
    "0",
    "--method-delay",
    "0",
    "--timeout",
    "2s",
];

fn fast_args<'a>(url: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec!["-u", url];
    args.extend(FAST_RUN);
    args.extend(extra);
    args
}

fn expect_success(output: &Output) -> Result<String, String> {
    if !output.status.success() {
        return Err(format!("rpcbench failed\n{}", describe(output)));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn expect_contains(stdout: &str, needle: &str) -> Result<(), String> {
    if stdout.contains(needle) {
        Ok(())
    } else {
        Err(format!("stdout missing '{}':\n{}", needle, stdout))
    }
}

fn find_export(dir: &Path) -> Result<PathBuf, String> {
    let entries = fs::read_dir(dir).map_err(|err| format!("read_dir failed: {}", err))?;
    let mut exports = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| format!("read entry failed: {}", err))?
            .path();
        let is_export = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("benchmark_results_") && name.ends_with(".json"));
        if is_export {
            exports.push(path);
        }
    }
    match exports.as_slice() {
        [single] => Ok(single.clone()),
        other => Err(format!("expected one export file, found {}", other.len())),
    }
}

#[test]
fn e2e_benchmark_prints_summary_and_exports() -> Result<(), String> {
    let Some((url, _server)) = spawn_rpc_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let out_dir = dir.path().join("results");
    let out_dir_arg = out_dir.to_string_lossy().into_owned();

    let args = fast_args(
        &url,
        &["-m", "eth_blockNumber", "-m", "eth_gasPrice", "-o", out_dir_arg.as_str()],
    );
    let output = run_rpcbench(dir.path(), args)?;
    let stdout = expect_success(&output)?;

    expect_contains(&stdout, "Benchmark Results Summary")?;
    expect_contains(&stdout, "Methods ranked by average latency:")?;
    expect_contains(&stdout, "Results exported to")?;

    let export = find_export(&out_dir)?;
    let content = fs::read_to_string(&export).map_err(|err| format!("read export failed: {}", err))?;
    let json: Value =
        serde_json::from_str(&content).map_err(|err| format!("parse export failed: {}", err))?;

    if json.pointer("/network_info/name") != Some(&Value::from("mainnet")) {
        return Err(format!("unexpected network info: {}", content));
    }
    if json.pointer("/benchmark_options/num_requests") != Some(&Value::from(4)) {
        return Err(format!("unexpected options: {}", content));
    }
    let methods: Vec<&str> = json
        .get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|result| result.get("method").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    if methods != ["eth_blockNumber", "eth_gasPrice"] {
        return Err(format!("unexpected result methods {:?}", methods));
    }
    for result in json.get("results").and_then(Value::as_array).into_iter().flatten() {
        if result.get("success_count") != Some(&Value::from(4)) {
            return Err(format!("expected four successes: {}", result));
        }
    }
    if json.get("max_throughput_test").is_some() {
        return Err("search results present without --find-max-rps".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_failing_method_is_skipped() -> Result<(), String> {
    let Some((url, _server)) = spawn_rpc_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let args = fast_args(
        &url,
        &["-m", FAILING_METHOD, "-m", "eth_blockNumber", "--no-export"],
    );
    let output = run_rpcbench(dir.path(), args)?;
    let stdout = expect_success(&output)?;

    expect_contains(&stdout, "Skipped Methods")?;
    expect_contains(&stdout, FAILING_METHOD)?;
    expect_contains(&stdout, "eth_blockNumber")?;
    if find_export(dir.path()).is_ok() {
        return Err("--no-export still wrote a results file".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_find_max_rps_reports_search() -> Result<(), String> {
    let Some((url, _server)) = spawn_rpc_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let args = fast_args(
        &url,
        &[
            "-m",
            "eth_blockNumber",
            "--no-export",
            "--find-max-rps",
            "--search-start",
            "1",
            "--search-max",
            "2",
            "--search-step",
            "1",
            "--search-duration",
            "200ms",
            "--search-settle",
            "0",
        ],
    );
    let output = run_rpcbench(dir.path(), args)?;
    let stdout = expect_success(&output)?;

    expect_contains(&stdout, "Maximum Throughput Results")?;
    expect_contains(&stdout, "Optimal Concurrency:")?;
    Ok(())
}

#[test]
fn e2e_config_file_supplies_endpoint() -> Result<(), String> {
    let Some((url, _server)) = spawn_rpc_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config = format!(
        r#"rpc_url = "{}"
requests = 2
concurrency = 1
warmup = false
cooldown = "0ms"
method_delay = "0ms"
no_export = true

[[methods]]
name = "eth_chainId"
"#,
        url
    );
    fs::write(dir.path().join("rpcbench.toml"), config)
        .map_err(|err| format!("write config failed: {}", err))?;

    let output = run_rpcbench(dir.path(), std::iter::empty::<&str>())?;
    let stdout = expect_success(&output)?;

    expect_contains(&stdout, "Benchmark Results Summary")?;
    expect_contains(&stdout, "eth_chainId")?;
    Ok(())
}

#[test]
fn e2e_bare_invocation_prints_help() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_rpcbench(dir.path(), std::iter::empty::<&str>())?;
    let stdout = expect_success(&output)?;
    expect_contains(&stdout, "--rpc-url")
}

#[test]
fn e2e_missing_endpoint_fails() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_rpcbench(dir.path(), ["-n", "1"])?;
    if output.status.success() {
        return Err(format!("expected failure without endpoint\n{}", describe(&output)));
    }
    Ok(())
}
