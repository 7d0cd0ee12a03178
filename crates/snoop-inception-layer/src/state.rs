//! Process-wide layer state: the recorder, the re-entrancy guard, and
//! one-shot logging setup.

use libc::c_char;
use snoop_config::{log_layer_trace, logging, ENV_LOG};
use snoop_trie::Recorder;
use std::cell::Cell;
use std::ffi::CStr;
use std::sync::Once;

/// Every path this process has tried to open.
pub static RECORDER: Recorder = Recorder::new();

static LOGGING: Once = Once::new();

/// Has a destructor, so it becomes unreachable once this thread's
/// thread-locals are torn down.
struct TlsAlive;

impl Drop for TlsAlive {
    fn drop(&mut self) {}
}

thread_local! {
    static IN_LAYER: Cell<bool> = const { Cell::new(false) };
    static TLS_ALIVE: TlsAlive = const { TlsAlive };
}

/// Marks the current thread as inside the layer. While held, hooked calls
/// made by the layer itself (logging, config reads, the dump) go straight to
/// libc without being recorded.
pub(crate) struct LayerGuard(());

impl LayerGuard {
    /// `None` if this thread is already inside the layer, or its TLS is gone.
    pub(crate) fn enter() -> Option<Self> {
        IN_LAYER
            .try_with(|flag| (!flag.replace(true)).then_some(LayerGuard(())))
            .ok()
            .flatten()
    }
}

impl Drop for LayerGuard {
    fn drop(&mut self) {
        let _ = IN_LAYER.try_with(|flag| flag.set(false));
    }
}

/// Install a stderr subscriber if `SNOOPLIB_LOG` asks for one. The layer is
/// silent otherwise.
pub(crate) fn init_logging() {
    LOGGING.call_once(|| {
        if let Some(level) = std::env::var(ENV_LOG).ok().and_then(|v| v.parse().ok()) {
            logging::try_init_stderr(level, tls_alive);
        }
    });
}

/// Log gate. The formatter keeps per-thread buffers that panic when touched
/// after thread-local teardown, which is where `.fini_array` and late host
/// `atexit` handlers run. The gate runs before the formatter on every event,
/// so if the formatter's buffers exist on this thread the probe does too, and
/// both are torn down together.
fn tls_alive() -> bool {
    TLS_ALIVE.try_with(|_| ()).is_ok()
}

/// Record the raw path handed to a hooked open call.
pub(crate) unsafe fn record(path: *const c_char) {
    if path.is_null() {
        return;
    }
    let Some(_guard) = LayerGuard::enter() else {
        return;
    };
    init_logging();

    let bytes = CStr::from_ptr(path).to_bytes();
    if !RECORDER.insert(bytes) {
        log_layer_trace!("open after finalize not recorded", len = bytes.len());
    }
}
