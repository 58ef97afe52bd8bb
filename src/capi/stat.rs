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

//! Stat family (spec.md §4.6 "Stat").
//!
//! glibc's public `stat`/`lstat`/`fstatat` are thin wrappers around the
//! symbol-versioned `__xstat`/`__lxstat`/`__fxstatat` entry points on older
//! glibcs, and a direct syscall wrapper on newer ones depending on how the
//! binary was linked. pathveto interposes both layers so the check applies
//! regardless of which one a given libc build resolves to.

use std::os::raw::{c_char, c_int, c_uint};

use crate::capi::utils::{deny, next_symbol, path_from_ptr};
use crate::oracle;

macro_rules! stat_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `stat(2)`/`lstat(2)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(path: *const c_char, buf: *mut libc::stat) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type StatFn = unsafe extern "C" fn(*const c_char, *mut libc::stat) -> c_int;
            match next_symbol!($symbol, StatFn) {
                Some(real) => unsafe { real(path, buf) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

stat_fn!(stat, "stat");
stat_fn!(stat64, "stat64");
stat_fn!(lstat, "lstat");
stat_fn!(lstat64, "lstat64");

macro_rules! fstatat_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `fstatat(2)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            dirfd: c_int,
            path: *const c_char,
            buf: *mut libc::stat,
            flags: c_int,
        ) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked_at(dirfd, candidate) {
                deny();
                return -1;
            }
            type FstatatFn =
                unsafe extern "C" fn(c_int, *const c_char, *mut libc::stat, c_int) -> c_int;
            match next_symbol!($symbol, FstatatFn) {
                Some(real) => unsafe { real(dirfd, path, buf, flags) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

fstatat_fn!(fstatat, "fstatat");
fstatat_fn!(fstatat64, "fstatat64");

macro_rules! xstat_fn {
    ($name:ident, $symbol:literal) => {
        /// Legacy symbol-versioned stat entry point. `ver` is the glibc
        /// stat-buffer ABI version tag and is opaque to pathveto; it is
        /// forwarded unchanged.
        ///
        /// # Safety
        /// Same contract as `stat(2)`/`lstat(2)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            ver: c_int,
            path: *const c_char,
            buf: *mut libc::stat,
        ) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type XstatFn = unsafe extern "C" fn(c_int, *const c_char, *mut libc::stat) -> c_int;
            match next_symbol!($symbol, XstatFn) {
                Some(real) => unsafe { real(ver, path, buf) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

xstat_fn!(__xstat, "__xstat");
xstat_fn!(__xstat64, "__xstat64");
xstat_fn!(__lxstat, "__lxstat");
xstat_fn!(__lxstat64, "__lxstat64");

macro_rules! fxstatat_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `fstatat(2)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            ver: c_int,
            dirfd: c_int,
            path: *const c_char,
            buf: *mut libc::stat,
            flags: c_int,
        ) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked_at(dirfd, candidate) {
                deny();
                return -1;
            }
            type FxstatatFn = unsafe extern "C" fn(
                c_int,
                c_int,
                *const c_char,
                *mut libc::stat,
                c_int,
            ) -> c_int;
            match next_symbol!($symbol, FxstatatFn) {
                Some(real) => unsafe { real(ver, dirfd, path, buf, flags) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

fxstatat_fn!(__fxstatat, "__fxstatat");
fxstatat_fn!(__fxstatat64, "__fxstatat64");

/// # Safety
/// Same contract as `statx(2)`.
#[no_mangle]
pub unsafe extern "C" fn statx(
    dirfd: c_int,
    path: *const c_char,
    flags: c_int,
    mask: c_uint,
    buf: *mut libc::statx,
) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked_at(dirfd, candidate) {
        deny();
        return -1;
    }
    type StatxFn =
        unsafe extern "C" fn(c_int, *const c_char, c_int, c_uint, *mut libc::statx) -> c_int;
    match next_symbol!("statx", StatxFn) {
        Some(real) => unsafe { real(dirfd, path, flags, mask, buf) },
        None => {
            deny();
            -1
        }
    }
}
