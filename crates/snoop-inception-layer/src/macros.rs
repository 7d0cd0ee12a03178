/// Forward to the real libc function behind a [`RealSymbol`](crate::reals::RealSymbol).
/// If it can't be resolved, sets `ENOSYS` and returns `$fail` from the caller.
///
/// # Usage:
/// ```ignore
/// call_real!(REAL_OPEN, OpenFn, -1, path, flags, mode)
/// ```
#[macro_export]
macro_rules! call_real {
    ($sym:expr, $t:ty, $fail:expr $(, $arg:expr)* $(,)?) => {{
        let f = $sym.get();
        if f.is_null() {
            $crate::set_errno(libc::ENOSYS);
            return $fail;
        }
        let real = std::mem::transmute::<*mut libc::c_void, $t>(f);
        real($($arg),*)
    }};
}

