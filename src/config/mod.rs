//! Configuration loading and application.
mod apply;
mod loader;
pub mod types;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

pub use apply::apply_config;
pub use loader::{default_config_exists, load_config, load_config_file};
