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

//! Open/create family (spec.md §4.6 "Open/create").
//!
//! `open`/`openat` and their `*64` siblings are variadic in C (the mode
//! argument only exists when `O_CREAT`/`O_TMPFILE` is set), but Rust has no
//! stable way to *define* a variadic `extern "C" fn`. Like other
//! Rust `LD_PRELOAD` shims, these hooks instead declare the extra `mode_t`
//! parameter unconditionally -- on every ABI glibc supports, an unused
//! trailing integer argument is simply an unread register/stack slot, so
//! this is safe as long as the value is only *used* when the flags say a
//! mode was actually passed. This is the direct equivalent of the original
//! C implementation's `va_start`/`va_arg` dance.

use std::os::raw::{c_char, c_int};

use libc::mode_t;

use crate::capi::utils::{deny, next_symbol, path_from_ptr};
use crate::oracle;

fn needs_mode(flags: c_int) -> bool {
    flags & (libc::O_CREAT | libc::O_TMPFILE) != 0
}

/// # Safety
/// Same contract as `open(2)`: `path` must be a valid NUL-terminated C
/// string or NULL.
#[no_mangle]
pub unsafe extern "C" fn open(path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked(candidate) {
        deny();
        return -1;
    }

    type WithMode = unsafe extern "C" fn(*const c_char, c_int, mode_t) -> c_int;
    type WithoutMode = unsafe extern "C" fn(*const c_char, c_int) -> c_int;

    if needs_mode(flags) {
        match next_symbol!("open", WithMode) {
            Some(real) => unsafe { real(path, flags, mode) },
            None => {
                deny();
                -1
            }
        }
    } else {
        match next_symbol!("open", WithoutMode) {
            Some(real) => unsafe { real(path, flags) },
            None => {
                deny();
                -1
            }
        }
    }
}

/// # Safety
/// Same contract as [`open`].
#[no_mangle]
pub unsafe extern "C" fn open64(path: *const c_char, flags: c_int, mode: mode_t) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked(candidate) {
        deny();
        return -1;
    }

    type WithMode = unsafe extern "C" fn(*const c_char, c_int, mode_t) -> c_int;
    type WithoutMode = unsafe extern "C" fn(*const c_char, c_int) -> c_int;

    if needs_mode(flags) {
        match next_symbol!("open64", WithMode) {
            Some(real) => unsafe { real(path, flags, mode) },
            None => {
                deny();
                -1
            }
        }
    } else {
        match next_symbol!("open64", WithoutMode) {
            Some(real) => unsafe { real(path, flags) },
            None => {
                deny();
                -1
            }
        }
    }
}

/// # Safety
/// Same contract as `openat(2)`.
#[no_mangle]
pub unsafe extern "C" fn openat(
    dirfd: c_int,
    path: *const c_char,
    flags: c_int,
    mode: mode_t,
) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked_at(dirfd, candidate) {
        deny();
        return -1;
    }

    type WithMode = unsafe extern "C" fn(c_int, *const c_char, c_int, mode_t) -> c_int;
    type WithoutMode = unsafe extern "C" fn(c_int, *const c_char, c_int) -> c_int;

    if needs_mode(flags) {
        match next_symbol!("openat", WithMode) {
            Some(real) => unsafe { real(dirfd, path, flags, mode) },
            None => {
                deny();
                -1
            }
        }
    } else {
        match next_symbol!("openat", WithoutMode) {
            Some(real) => unsafe { real(dirfd, path, flags) },
            None => {
                deny();
                -1
            }
        }
    }
}

/// # Safety
/// Same contract as [`openat`].
#[no_mangle]
pub unsafe extern "C" fn openat64(
    dirfd: c_int,
    path: *const c_char,
    flags: c_int,
    mode: mode_t,
) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked_at(dirfd, candidate) {
        deny();
        return -1;
    }

    type WithMode = unsafe extern "C" fn(c_int, *const c_char, c_int, mode_t) -> c_int;
    type WithoutMode = unsafe extern "C" fn(c_int, *const c_char, c_int) -> c_int;

    if needs_mode(flags) {
        match next_symbol!("openat64", WithMode) {
            Some(real) => unsafe { real(dirfd, path, flags, mode) },
            None => {
                deny();
                -1
            }
        }
    } else {
        match next_symbol!("openat64", WithoutMode) {
            Some(real) => unsafe { real(dirfd, path, flags) },
            None => {
                deny();
                -1
            }
        }
    }
}

macro_rules! creat_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `creat(2)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(path: *const c_char, mode: mode_t) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type CreatFn = unsafe extern "C" fn(*const c_char, mode_t) -> c_int;
            match next_symbol!($symbol, CreatFn) {
                Some(real) => unsafe { real(path, mode) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

creat_fn!(creat, "creat");
creat_fn!(creat64, "creat64");

macro_rules! fopen_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `fopen(3)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            path: *const c_char,
            mode: *const c_char,
        ) -> *mut libc::FILE {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return std::ptr::null_mut();
            }
            type FopenFn = unsafe extern "C" fn(*const c_char, *const c_char) -> *mut libc::FILE;
            match next_symbol!($symbol, FopenFn) {
                Some(real) => unsafe { real(path, mode) },
                None => {
                    deny();
                    std::ptr::null_mut()
                }
            }
        }
    };
}

fopen_fn!(fopen, "fopen");
fopen_fn!(fopen64, "fopen64");

macro_rules! freopen_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `freopen(3)`. A NULL `path` reopens `stream`
        /// with new flags and is always allowed, matching spec.md §4.4
        /// step 2.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            path: *const c_char,
            mode: *const c_char,
            stream: *mut libc::FILE,
        ) -> *mut libc::FILE {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return std::ptr::null_mut();
            }
            type FreopenFn =
                unsafe extern "C" fn(*const c_char, *const c_char, *mut libc::FILE) -> *mut libc::FILE;
            match next_symbol!($symbol, FreopenFn) {
                Some(real) => unsafe { real(path, mode, stream) },
                None => {
                    deny();
                    std::ptr::null_mut()
                }
            }
        }
    };
}

freopen_fn!(freopen, "freopen");
freopen_fn!(freopen64, "freopen64");
