//! Process-wide logging setup.
//!
//! Events are written to stderr as
//! `<timestamp> <LEVEL> <spans>: <target>: <file>:<line>: <message>`, where
//! `<spans>` names the instrumented functions the event happened in (for
//! example `plot_random:plot{points=1000}:render:`). The level filter
//! sits behind a reload handle, so configuring again replaces the filter of
//! the already installed subscriber.

use std::io::IsTerminal;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::error::{Error, Result};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LEVEL: &str = "info";

type FilterHandle = reload::Handle<EnvFilter, Registry>;

static FILTER: Mutex<Option<FilterHandle>> = Mutex::new(None);

/// Configure logging at `RUST_LOG`, or `info` when unset or invalid.
///
/// Never fails and may be called any number of times.
pub fn configure_logging() {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok().filter(|v| !v.trim().is_empty());
    if let Some(directives) = from_env {
        if configure_logging_with(&directives).is_ok() {
            return;
        }
    }
    // A foreign global subscriber is the only way this can fail.
    let _ = configure_logging_with(DEFAULT_LEVEL);
}

/// Configure logging with an explicit filter such as `"debug"` or
/// `"surface_plotter=trace,info"`. The last call wins.
///
/// # Errors
///
/// Returns [`Error::Logging`] if the filter does not parse or a subscriber
/// not installed by this module already owns the process.
pub fn configure_logging_with(directives: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directives)
        .map_err(|e| Error::Logging(format!("invalid filter {directives:?}: {e}")))?;

    let mut slot = FILTER.lock().map_err(|_| Error::Logging("logging state poisoned".to_string()))?;
    if let Some(handle) = slot.as_ref() {
        return handle
            .reload(filter)
            .map_err(|e| Error::Logging(format!("failed to replace filter: {e}")));
    }

    let (filter_layer, handle) = reload::Layer::new(filter);
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    Registry::default()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    *slot = Some(handle);
    Ok(())
}
