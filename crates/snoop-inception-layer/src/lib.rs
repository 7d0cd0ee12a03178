//! # snoop-inception-layer
//!
//! `LD_PRELOAD` library that records every path the host process passes to
//! an `open`-family call and writes the deduplicated set when the process
//! exits.
//!
//! ```text
//! LD_PRELOAD=libsnoop_inception_layer.so SNOOPLIB_OUTPUT_PATH=deps.txt make
//! ```
//!
//! - `SNOOPLIB_OUTPUT_PATH`: destination file. Unset means stdout, between
//!   begin/end markers, or stderr if the host closed stdout before exiting.
//!   A file that can't be opened or written is reported on stderr.
//! - `SNOOPLIB_OUTPUT_APPEND=1`: append instead of truncating.
//! - `SNOOPLIB_LOG=debug`: layer diagnostics on stderr.
//!
//! Only paths no other recorded path extends are written, one per line.
//! Hooks are exported on Linux only.

#![allow(clippy::missing_safety_doc)]

#[macro_use]
mod macros;

mod reals;
mod report;
mod state;

#[cfg(target_os = "linux")]
mod syscalls;

#[cfg(target_os = "linux")]
pub(crate) unsafe fn set_errno(value: libc::c_int) {
    *libc::__errno_location() = value;
}

#[cfg(target_os = "linux")]
unsafe extern "C" fn snoop_fini() {
    report::dump_at_exit();
}

/// Runs from the dynamic loader's teardown, after `main` returns or `exit`
/// is called. Not reached on `_exit` or a fatal signal.
#[cfg(target_os = "linux")]
#[link_section = ".fini_array"]
#[used]
static SNOOP_FINI: unsafe extern "C" fn() = snoop_fini;
