use std::path::{Path, PathBuf};

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::BenchArgs;

pub(crate) fn parse_with_matches(argv: &[&str]) -> Result<(BenchArgs, ArgMatches), String> {
    let matches = BenchArgs::command()
        .try_get_matches_from(argv)
        .map_err(|err| format!("parse failed: {}", err))?;
    let args = BenchArgs::from_arg_matches(&matches)
        .map_err(|err| format!("from matches failed: {}", err))?;
    Ok((args, matches))
}

pub(crate) fn write_config(dir: &Path, name: &str, content: &str) -> Result<PathBuf, String> {
    let path = dir.join(name);
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;
    Ok(path)
}
