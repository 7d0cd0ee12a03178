//! `open` family hooks.
//!
//! Each hook records the path exactly as the caller passed it, then returns
//! whatever the real function returns. `openat` paths are not joined with
//! their directory descriptor.
//!
//! The optional `mode` is declared as a fixed argument: on x86_64 and aarch64
//! Linux a variadic int arrives in the same register, and the real function
//! only reads it when `O_CREAT` or `O_TMPFILE` is set.

use crate::reals::*;
use crate::state::record;
use libc::{c_char, c_int, mode_t};

type OpenFn = unsafe extern "C" fn(*const c_char, c_int, mode_t) -> c_int;
type OpenatFn = unsafe extern "C" fn(c_int, *const c_char, c_int, mode_t) -> c_int;
type CreatFn = unsafe extern "C" fn(*const c_char, mode_t) -> c_int;
type Open2Fn = unsafe extern "C" fn(*const c_char, c_int) -> c_int;
type Openat2Fn = unsafe extern "C" fn(c_int, *const c_char, c_int) -> c_int;

#[no_mangle]
pub unsafe extern "C" fn open(path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    record(path);
    call_real!(REAL_OPEN, OpenFn, -1, path, flags, mode)
}

#[no_mangle]
pub unsafe extern "C" fn open64(path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    record(path);
    call_real!(REAL_OPEN64, OpenFn, -1, path, flags, mode)
}

#[no_mangle]
pub unsafe extern "C" fn openat(
    dirfd: c_int,
    path: *const c_char,
    flags: c_int,
    mode: mode_t,
) -> c_int {
    record(path);
    call_real!(REAL_OPENAT, OpenatFn, -1, dirfd, path, flags, mode)
}

#[no_mangle]
pub unsafe extern "C" fn openat64(
    dirfd: c_int,
    path: *const c_char,
    flags: c_int,
    mode: mode_t,
) -> c_int {
    record(path);
    call_real!(REAL_OPENAT64, OpenatFn, -1, dirfd, path, flags, mode)
}

#[no_mangle]
pub unsafe extern "C" fn creat(path: *const c_char, mode: mode_t) -> c_int {
    record(path);
    call_real!(REAL_CREAT, CreatFn, -1, path, mode)
}

#[no_mangle]
pub unsafe extern "C" fn creat64(path: *const c_char, mode: mode_t) -> c_int {
    record(path);
    call_real!(REAL_CREAT64, CreatFn, -1, path, mode)
}

// _FORTIFY_SOURCE entry points, used when the compiler can't prove the
// mode argument is unneeded.

#[no_mangle]
pub unsafe extern "C" fn __open_2(path: *const c_char, flags: c_int) -> c_int {
    record(path);
    call_real!(REAL_OPEN_2, Open2Fn, -1, path, flags)
}

#[no_mangle]
pub unsafe extern "C" fn __open64_2(path: *const c_char, flags: c_int) -> c_int {
    record(path);
    call_real!(REAL_OPEN64_2, Open2Fn, -1, path, flags)
}

#[no_mangle]
pub unsafe extern "C" fn __openat_2(dirfd: c_int, path: *const c_char, flags: c_int) -> c_int {
    record(path);
    call_real!(REAL_OPENAT_2, Openat2Fn, -1, dirfd, path, flags)
}

#[no_mangle]
pub unsafe extern "C" fn __openat64_2(dirfd: c_int, path: *const c_char, flags: c_int) -> c_int {
    record(path);
    call_real!(REAL_OPENAT64_2, Openat2Fn, -1, dirfd, path, flags)
}
