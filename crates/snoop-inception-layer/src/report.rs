//! Exit-time dump.

use crate::state::{init_logging, LayerGuard, RECORDER};
use snoop_config::{dump_recorder, log_layer_debug, log_layer_warn, Config, DumpTarget, Streams};

/// Finalize the recorder and write its paths to the configured destination.
///
/// Runs once; later calls find the recorder finalized and return. The sink
/// reports failures on stderr itself, so they are visible with logging off.
pub(crate) fn dump_at_exit() {
    // Held for the whole dump so our own opens are not recorded.
    let Some(_guard) = LayerGuard::enter() else {
        return;
    };
    init_logging();

    let destination = || {
        Config::load()
            .unwrap_or_else(|e| {
                log_layer_warn!(
                    "config unreadable, using environment only",
                    error = tracing::field::display(&e)
                );
                Config::from_env()
            })
            .destination()
    };

    let Some(report) = dump_recorder(&RECORDER, destination, Streams::process()) else {
        return;
    };
    if let Ok(lines) = report.result {
        log_layer_debug!(
            "dump written",
            paths = lines,
            nodes = report.nodes,
            fallback = report.target == DumpTarget::Stderr
        );
    }
}
