use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variables consulted for a filter directive, in order.
const FILTER_VARS: [&str; 2] = ["RPCBENCH_LOG", "RUST_LOG"];

/// Installs the global `tracing` subscriber. Log lines go to stderr so the
/// report on stdout stays clean.
pub fn init_logging(verbose: bool, no_color: bool) {
    let directive = FILTER_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok());
    let filter = build_filter(directive.as_deref(), verbose);

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

fn build_filter(directive: Option<&str>, verbose: bool) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    directive.map_or_else(
        || EnvFilter::new(fallback),
        |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new(fallback)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(false, true);
        init_logging(true, true);
    }

    #[test]
    fn build_filter_prefers_directive() -> Result<(), String> {
        let filter = build_filter(Some("rpcbench=trace"), false);
        if !filter.to_string().contains("rpcbench=trace") {
            return Err(format!("Unexpected filter: {}", filter));
        }
        let fallback = build_filter(None, true);
        if fallback.to_string() != "debug" {
            return Err(format!("Unexpected fallback: {}", fallback));
        }
        Ok(())
    }
}
