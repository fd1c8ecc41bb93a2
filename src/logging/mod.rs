//! Logging
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary ([`init_logging`]) or to the host application.
//!
//! Tasks and collectors carry a `debug` flag. When it is set, their lifecycle
//! messages (collector init, engine creation and reuse, task setup) are
//! emitted at `info` instead of `debug`, see [`plugin_log!`](crate::plugin_log).
//!
//! # Example
//!
//! ```no_run
//! use pii_extract_plg_presidio::logging::init_logging;
//!
//! init_logging("info", false).expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level};

/// Log a plugin lifecycle event, at `info` when `debug` is set and at
/// `debug` otherwise
///
/// Accepts the same field and message syntax as the `tracing` macros.
///
/// # Example
///
/// ```
/// use pii_extract_plg_presidio::plugin_log;
///
/// let debug = true;
/// plugin_log!(debug, lang = "en", tasks = 5, "PresidioTask created");
/// ```
#[macro_export]
macro_rules! plugin_log {
    ($debug:expr, $($arg:tt)+) => {
        if $debug {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}
