//! Tracing setup for the bindkit binary
//!
//! # What gets logged
//!
//! - `bindkit::diagnostics` (warn): a bind registration, combo edit or file
//!   entry was rejected, naming the group, the bind and the reason. Silent
//!   calls log the same line at debug under `bindkit::bind::group` instead.
//! - `bindkit::bind::event` (error): a subscriber panicked during dispatch and
//!   was skipped.
//! - `bindkit::bind` (debug/trace): groups created, binds and controls
//!   registered, per-group load summaries.
//! - `bindkit::config` and `bindkit::bind::defaults` (info/warn): which
//!   config and bind files were read or written, backups of broken configs.
//!
//! Filter with RUST_LOG, e.g. `RUST_LOG=bindkit::bind=trace` or
//! `RUST_LOG=bindkit::diagnostics=off`.
//!
//! # Log Files
//!
//! Logs are written to `~/.config/bindkit/logs/bindkit.log` with daily rotation.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the console and file layers
///
/// The console shows rejected binds and anything worse by default (`warn`),
/// on stderr so `dump` output on stdout can be piped. The file keeps the
/// debug-level registration and load history as well.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "bindkit.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
