use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins, then `INTRO_SCORE_LOG`; otherwise `debug` when verbose
/// and `warn` when not.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("INTRO_SCORE_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. from tests) is harmless.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
