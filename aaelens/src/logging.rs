//! Global tracing subscriber

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Install the fmt subscriber on stderr. Later calls are no-ops.
///
/// With `verbosity == 0` the filter comes from `RUST_LOG`, falling back to
/// `info`; each `-v` raises it (`debug`, then `trace`) and overrides `RUST_LOG`.
pub fn init(verbosity: u8) {
    if INITIALISED.set(()).is_err() {
        return;
    }

    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    // another subscriber (e.g. a test harness) may already be installed
    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}
