//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::BenchArgs;
pub use types::PositiveUsize;

pub use defaults::{
    DEFAULT_ADDRESS, DEFAULT_CONFIG_FILES, DEFAULT_USER_AGENT, default_operations,
    default_search_operation,
};
