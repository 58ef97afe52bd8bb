// SPDX-License-Identifier: MPL-2.0 OR LGPL-3.0-or-later
/*
 * pathveto: filesystem path denylist enforcement via LD_PRELOAD
 * Copyright (C) 2026 The pathveto Authors
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU Lesser General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or (at your
 * option) any later version.
 *
 * This program is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
 * or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License
 * for more details.
 *
 * You should have received a copy of the GNU Lesser General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

//! Shared helpers for the `capi` dispatch layer.

use std::ffi::{CStr, OsStr};
use std::os::raw::c_char;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Borrow a caller-supplied, possibly-NULL C string as a [`Path`].
///
/// Returns `None` on a NULL pointer, mirroring spec.md §4.4 step 2 ("path is
/// absent" is always allowed, not an error) -- this is deliberately not a
/// `Result`: a NULL path is a normal input for several interposed entry
/// points (e.g. `fopen(NULL, mode)` is invalid C usage, but pathveto's job
/// is only to gate access, not to validate arguments on the original
/// implementation's behalf).
///
/// # Safety
/// `path`, if non-NULL, must point to a valid NUL-terminated C string that
/// lives at least as long as the returned borrow.
pub(crate) unsafe fn path_from_ptr<'a>(path: *const c_char) -> Option<&'a Path> {
    if path.is_null() {
        return None;
    }
    // SAFETY: caller guarantees `path` is a valid NUL-terminated C string.
    let bytes = unsafe { CStr::from_ptr(path) }.to_bytes();
    Some(Path::new(OsStr::from_bytes(bytes)))
}

/// Set the thread-local C error indicator to `EACCES`, the "permission
/// denied" indication spec.md §6 requires on every blocked call.
pub(crate) fn deny() {
    // SAFETY: `__errno_location` returns a valid per-thread pointer; writing
    // through it is the standard, signal-unsafe-free way to set `errno`
    // from Rust (the same thing `errno = EACCES` does in C).
    unsafe {
        *libc::__errno_location() = libc::EACCES;
    }
}

/// Resolve and cache the next (non-interposed) definition of `$name`, typed
/// as `$ty`, in a `static` scoped to the macro's call site.
///
/// Every `capi` hook that forwards to the original implementation uses this
/// once per entry point rather than sharing a single generically-typed
/// cache: entry points with the same Rust function-pointer signature (e.g.
/// several `*64` siblings) would otherwise collide on the same cached
/// address if the cache were keyed only by type.
macro_rules! next_symbol {
    ($name:literal, $ty:ty) => {{
        static CACHE: ::std::sync::OnceLock<usize> = ::std::sync::OnceLock::new();
        let addr = *CACHE.get_or_init(|| $crate::orig::lookup($name).unwrap_or(0));
        if addr == 0 {
            None
        } else {
            // SAFETY: `addr` was resolved by `dlsym(RTLD_NEXT, $name)`
            // against the known C signature `$ty`; a non-zero address only
            // ever gets cached here when that lookup succeeded.
            Some(unsafe { ::std::mem::transmute::<usize, $ty>(addr) })
        }
    }};
}

pub(crate) use next_symbol;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_path_is_none() {
        assert!(unsafe { path_from_ptr(std::ptr::null()) }.is_none());
    }

    #[test]
    fn non_null_path_roundtrips() {
        let c = std::ffi::CString::new("/app/secret").unwrap();
        let path = unsafe { path_from_ptr(c.as_ptr()) }.unwrap();
        assert_eq!(path, Path::new("/app/secret"));
    }
}
