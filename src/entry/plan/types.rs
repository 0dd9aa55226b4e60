use std::path::PathBuf;
use std::time::Duration;

use crate::app::SuiteConfig;

/// A validated benchmark run, ready to execute.
#[derive(Debug)]
pub(in crate::entry) struct RunPlan {
    pub(super) rpc_url: String,
    pub(super) connect_timeout: Duration,
    pub(super) suite: SuiteConfig,
    /// Directory for the JSON results file; `None` disables export.
    pub(super) export_dir: Option<PathBuf>,
}
