use tracing_subscriber::EnvFilter;

/// All crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &["knn_mnist"];

/// Initialize tracing based on CLI verbosity and the `debug` switch.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// `debug` raises the level to at least debug, which turns on per-sample
/// prediction output. `RUST_LOG` overrides both if set. Logs go to stderr so
/// that csv output on stdout stays clean.
pub fn init(verbosity: u8, debug: bool) {
    let level = match (verbosity, debug) {
        (0..=2, true) => "debug",
        (0, false) => "warn",
        (1, false) => "info",
        (2, false) => "debug",
        _ => "trace",
    };

    let default_filter: String = CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
