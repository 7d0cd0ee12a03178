//! stdio hooks. glibc's `fopen` opens through an internal entry point that
//! symbol interposition can't reach, so it is hooked separately.

use crate::reals::{REAL_FOPEN, REAL_FOPEN64};
use crate::state::record;
use libc::{c_char, FILE};

type FopenFn = unsafe extern "C" fn(*const c_char, *const c_char) -> *mut FILE;

#[no_mangle]
pub unsafe extern "C" fn fopen(path: *const c_char, mode: *const c_char) -> *mut FILE {
    record(path);
    call_real!(REAL_FOPEN, FopenFn, std::ptr::null_mut(), path, mode)
}

#[no_mangle]
pub unsafe extern "C" fn fopen64(path: *const c_char, mode: *const c_char) -> *mut FILE {
    record(path);
    call_real!(REAL_FOPEN64, FopenFn, std::ptr::null_mut(), path, mode)
}
