//! Structured logging utilities for snooplib components.
//!
//! Provides consistent logging with component prefixes and structured fields.
//!
//! # Usage
//!
//! ```ignore
//! use snoop_config::logging::*;
//!
//! log_layer_debug!("Dump written", lines = 12);
//! log_cli_info!("Launching command", program = "make");
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Component identifiers for log filtering
pub struct Component;

impl Component {
    pub const LAYER: &'static str = "LAYER";
    pub const CLI: &'static str = "CLI";
    pub const CONFIG: &'static str = "CONFIG";
}

/// Log levels for runtime configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLogLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.trim().to_ascii_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => return Err(ParseLogLevelError(s.to_string())),
        };
        Ok(level)
    }
}

// === LAYER logging macros ===

#[macro_export]
macro_rules! log_layer_error {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::error!(component = "LAYER", $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_layer_warn {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::warn!(component = "LAYER", $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_layer_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = "LAYER", $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_layer_trace {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::trace!(component = "LAYER", $($key = $value,)* $msg)
    };
}

// === CLI logging macros ===

#[macro_export]
macro_rules! log_cli_info {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(component = "CLI", $($key = $value,)* $msg)
    };
}

#[macro_export]
macro_rules! log_cli_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = "CLI", $($key = $value,)* $msg)
    };
}

// === CONFIG logging macros ===

#[macro_export]
macro_rules! log_config_debug {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::debug!(component = "CONFIG", $($key = $value,)* $msg)
    };
}

fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()))
}

/// Initialize logging with the given level filter.
/// Call this once at application startup.
pub fn init_logging(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Subscriber for a preloaded library. While `gate` returns false, events
/// are rejected before they reach the formatter, so its per-thread buffers
/// are never touched.
pub fn gated_subscriber<W>(
    level: LogLevel,
    gate: fn() -> bool,
    writer: W,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::new(level.as_filter()))
        .with(filter_fn(move |_| gate()))
        .with(fmt::layer().with_target(false).with_writer(writer))
}

/// Install a gated stderr subscriber from inside a preloaded library.
///
/// Never panics if one is already installed; returns whether ours won.
pub fn try_init_stderr(level: LogLevel, gate: fn() -> bool) -> bool {
    tracing::subscriber::set_global_default(gated_subscriber(level, gate, std::io::stderr)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_component_constants() {
        assert_eq!(Component::LAYER, "LAYER");
        assert_eq!(Component::CLI, "CLI");
        assert_eq!(Component::CONFIG, "CONFIG");
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(" WARNING ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_level_filter_round_trips() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert_eq!(level.as_filter().parse::<LogLevel>().unwrap(), level);
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    static GATE_OPEN: AtomicBool = AtomicBool::new(false);

    fn gate() -> bool {
        GATE_OPEN.load(Ordering::SeqCst)
    }

    #[test]
    fn test_gated_subscriber_drops_events_while_closed() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = gated_subscriber(LogLevel::Debug, gate, move || writer.clone());

        tracing::subscriber::with_default(subscriber, || {
            GATE_OPEN.store(false, Ordering::SeqCst);
            crate::log_layer_debug!("emitted while closed");
            GATE_OPEN.store(true, Ordering::SeqCst);
            crate::log_layer_debug!("emitted while open");
        });

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(!out.contains("emitted while closed"));
        assert!(out.contains("emitted while open"));
    }
}
