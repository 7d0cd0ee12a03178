//! Real Symbol Storage
//!
//! Resolves the next definition of each hooked libc function with
//! `dlsym(RTLD_NEXT)` and caches the pointer.

use libc::{c_char, c_void};
use std::sync::atomic::{AtomicPtr, Ordering};

/// Lazily resolved pointer to the real libc function
pub struct RealSymbol {
    ptr: AtomicPtr<c_void>,
    name: &'static str,
}

impl RealSymbol {
    /// `name` must be NUL-terminated.
    pub const fn new(name: &'static str) -> Self {
        Self {
            ptr: AtomicPtr::new(std::ptr::null_mut()),
            name,
        }
    }

    /// Null if no later object defines the symbol.
    pub unsafe fn get(&self) -> *mut c_void {
        let p = self.ptr.load(Ordering::Acquire);
        if !p.is_null() {
            return p;
        }
        // Two threads may both resolve; they store the same pointer.
        let f = libc::dlsym(libc::RTLD_NEXT, self.name.as_ptr() as *const c_char);
        self.ptr.store(f, Ordering::Release);
        f
    }
}

pub static REAL_OPEN: RealSymbol = RealSymbol::new("open\0");
pub static REAL_OPEN64: RealSymbol = RealSymbol::new("open64\0");
pub static REAL_OPENAT: RealSymbol = RealSymbol::new("openat\0");
pub static REAL_OPENAT64: RealSymbol = RealSymbol::new("openat64\0");
pub static REAL_CREAT: RealSymbol = RealSymbol::new("creat\0");
pub static REAL_CREAT64: RealSymbol = RealSymbol::new("creat64\0");
pub static REAL_FOPEN: RealSymbol = RealSymbol::new("fopen\0");
pub static REAL_FOPEN64: RealSymbol = RealSymbol::new("fopen64\0");
pub static REAL_OPEN_2: RealSymbol = RealSymbol::new("__open_2\0");
pub static REAL_OPEN64_2: RealSymbol = RealSymbol::new("__open64_2\0");
pub static REAL_OPENAT_2: RealSymbol = RealSymbol::new("__openat_2\0");
pub static REAL_OPENAT64_2: RealSymbol = RealSymbol::new("__openat64_2\0");
