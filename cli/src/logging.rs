//! Structured diagnostic logging.
//!
//! Status lines for the user go through `ProgressReporter` on stdout; this
//! module wires `tracing` events to stderr for debugging. `RUST_LOG` wins
//! when set; otherwise only errors are shown, or everything from this crate
//! at debug level with `--verbose`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init(verbose: bool) {
    let fallback = if verbose { "comfy_lock=debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
