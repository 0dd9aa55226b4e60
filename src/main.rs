mod app;
mod args;
mod bench;
mod config;
mod entry;
mod error;
mod invoker;
mod logger;
mod shutdown;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
