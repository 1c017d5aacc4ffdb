use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::commands::Verbosity;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub(crate) fn init_logger(verbosity: Verbosity) {
    let log_filter = log_filter(verbosity);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    if let Err(err) = tracing_subscriber::registry().with(log_layer).try_init() {
        eprintln!("Initializing logger failed: {err}");
    }
}

fn log_filter(verbosity: Verbosity) -> &'static str {
    match verbosity {
        // Show only errors
        Verbosity::Quiet => "off,folio_web=error",
        // Our own info logs, e.g. the listening address
        Verbosity::Verbose(0) => "warn,folio_web=info",
        // Also show debug from the catalog client
        Verbosity::Verbose(1) => "warn,folio_web=debug,folio_catalog=debug",
        Verbosity::Verbose(2) => "info,folio_web=trace,folio_catalog=trace",
        Verbosity::Verbose(_) => "trace",
    }
}
