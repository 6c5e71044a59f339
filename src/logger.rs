//! Logging setup using the `tracing` ecosystem.
//!
//! Logs go to stderr so JSON written to stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Level precedence: `verbose` (debug), then `quiet` (errors only), then
/// `RUST_LOG`, then info for gomap and warnings for everything else.
pub fn init_logger(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("gomap=debug,tower_http=debug")
    } else if quiet {
        EnvFilter::new("gomap=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,gomap=info"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // A second init (e.g. from tests) is not an error worth reporting.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
