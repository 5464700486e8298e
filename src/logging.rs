//! Tracing setup for the binary

use tracing_subscriber::EnvFilter;

/// Filter variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "ANNOTATRON_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Resolve the filter directive: `ANNOTATRON_LOG`, then `RUST_LOG`, then
/// `debug` when verbose, else `warn`.
pub fn filter_directive(verbose: bool) -> String {
    [LOG_ENV, "RUST_LOG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| {
            if verbose {
                "annotatron_client=debug".to_string()
            } else {
                DEFAULT_FILTER.to_string()
            }
        })
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays parseable.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_new(filter_directive(verbose))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
