//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const VERBOSE_FILTER: &str =
    "warn,encase_config=debug,encase_provision=debug,encase_core=debug,run_encase=debug";

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise launcher crates log at `debug` when
/// `verbose`, and everything at `warn` when not.
pub fn init(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .compact();

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
