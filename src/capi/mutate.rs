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

//! Mutating-operation family (spec.md §4.6 "Mutating operations").
//!
//! Entry points that take two paths (`rename`, `link`, and their `*at`
//! siblings) are blocked if *either* endpoint matches the policy: letting a
//! blocked path escape detection just because it was named as the
//! destination rather than the source would violate the fail-closed
//! invariant.

use std::os::raw::{c_char, c_int, c_uint};

use libc::{dev_t, gid_t, mode_t, off_t, uid_t};

use crate::capi::utils::{deny, next_symbol, path_from_ptr};
use crate::oracle;

macro_rules! single_path_fn {
    ($name:ident, $symbol:literal, ($($arg:ident : $ty:ty),*)) => {
        /// # Safety
        /// Same contract as the libc entry point of the same name.
        #[no_mangle]
        pub unsafe extern "C" fn $name(path: *const c_char, $($arg: $ty),*) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type F = unsafe extern "C" fn(*const c_char, $($ty),*) -> c_int;
            match next_symbol!($symbol, F) {
                Some(real) => unsafe { real(path, $($arg),*) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

single_path_fn!(unlink, "unlink", ());
single_path_fn!(mknod, "mknod", (mode: mode_t, dev: dev_t));
single_path_fn!(mkfifo, "mkfifo", (mode: mode_t));
single_path_fn!(chmod, "chmod", (mode: mode_t));
single_path_fn!(chown, "chown", (owner: uid_t, group: gid_t));
single_path_fn!(lchown, "lchown", (owner: uid_t, group: gid_t));
single_path_fn!(truncate, "truncate", (length: off_t));
single_path_fn!(truncate64, "truncate64", (length: off_t));

macro_rules! at_path_fn {
    ($name:ident, $symbol:literal, ($($arg:ident : $ty:ty),*)) => {
        /// # Safety
        /// Same contract as the libc entry point of the same name.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            dirfd: c_int,
            path: *const c_char,
            $($arg: $ty),*
        ) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked_at(dirfd, candidate) {
                deny();
                return -1;
            }
            type F = unsafe extern "C" fn(c_int, *const c_char, $($ty),*) -> c_int;
            match next_symbol!($symbol, F) {
                Some(real) => unsafe { real(dirfd, path, $($arg),*) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

at_path_fn!(unlinkat, "unlinkat", (flags: c_int));
at_path_fn!(mknodat, "mknodat", (mode: mode_t, dev: dev_t));
at_path_fn!(mkfifoat, "mkfifoat", (mode: mode_t));
at_path_fn!(fchmodat, "fchmodat", (mode: mode_t, flags: c_int));
at_path_fn!(fchownat, "fchownat", (owner: uid_t, group: gid_t, flags: c_int));
at_path_fn!(futimesat, "futimesat", (times: *const libc::timeval));

/// # Safety
/// Same contract as `rename(2)`.
#[no_mangle]
pub unsafe extern "C" fn rename(old: *const c_char, new: *const c_char) -> c_int {
    let old_candidate = unsafe { path_from_ptr(old) };
    let new_candidate = unsafe { path_from_ptr(new) };
    if oracle::is_blocked(old_candidate) || oracle::is_blocked(new_candidate) {
        deny();
        return -1;
    }
    type RenameFn = unsafe extern "C" fn(*const c_char, *const c_char) -> c_int;
    match next_symbol!("rename", RenameFn) {
        Some(real) => unsafe { real(old, new) },
        None => {
            deny();
            -1
        }
    }
}

/// # Safety
/// Same contract as `renameat(2)`.
#[no_mangle]
pub unsafe extern "C" fn renameat(
    old_dirfd: c_int,
    old: *const c_char,
    new_dirfd: c_int,
    new: *const c_char,
) -> c_int {
    let old_candidate = unsafe { path_from_ptr(old) };
    let new_candidate = unsafe { path_from_ptr(new) };
    if oracle::is_blocked_at(old_dirfd, old_candidate) || oracle::is_blocked_at(new_dirfd, new_candidate) {
        deny();
        return -1;
    }
    type RenameatFn = unsafe extern "C" fn(c_int, *const c_char, c_int, *const c_char) -> c_int;
    match next_symbol!("renameat", RenameatFn) {
        Some(real) => unsafe { real(old_dirfd, old, new_dirfd, new) },
        None => {
            deny();
            -1
        }
    }
}

/// # Safety
/// Same contract as `renameat2(2)`.
#[no_mangle]
pub unsafe extern "C" fn renameat2(
    old_dirfd: c_int,
    old: *const c_char,
    new_dirfd: c_int,
    new: *const c_char,
    flags: c_uint,
) -> c_int {
    let old_candidate = unsafe { path_from_ptr(old) };
    let new_candidate = unsafe { path_from_ptr(new) };
    if oracle::is_blocked_at(old_dirfd, old_candidate) || oracle::is_blocked_at(new_dirfd, new_candidate) {
        deny();
        return -1;
    }
    type Renameat2Fn =
        unsafe extern "C" fn(c_int, *const c_char, c_int, *const c_char, c_uint) -> c_int;
    match next_symbol!("renameat2", Renameat2Fn) {
        Some(real) => unsafe { real(old_dirfd, old, new_dirfd, new, flags) },
        None => {
            deny();
            -1
        }
    }
}

/// # Safety
/// Same contract as `link(2)`.
#[no_mangle]
pub unsafe extern "C" fn link(old: *const c_char, new: *const c_char) -> c_int {
    let old_candidate = unsafe { path_from_ptr(old) };
    let new_candidate = unsafe { path_from_ptr(new) };
    if oracle::is_blocked(old_candidate) || oracle::is_blocked(new_candidate) {
        deny();
        return -1;
    }
    type LinkFn = unsafe extern "C" fn(*const c_char, *const c_char) -> c_int;
    match next_symbol!("link", LinkFn) {
        Some(real) => unsafe { real(old, new) },
        None => {
            deny();
            -1
        }
    }
}

/// # Safety
/// Same contract as `linkat(2)`.
#[no_mangle]
pub unsafe extern "C" fn linkat(
    old_dirfd: c_int,
    old: *const c_char,
    new_dirfd: c_int,
    new: *const c_char,
    flags: c_int,
) -> c_int {
    let old_candidate = unsafe { path_from_ptr(old) };
    let new_candidate = unsafe { path_from_ptr(new) };
    if oracle::is_blocked_at(old_dirfd, old_candidate) || oracle::is_blocked_at(new_dirfd, new_candidate) {
        deny();
        return -1;
    }
    type LinkatFn =
        unsafe extern "C" fn(c_int, *const c_char, c_int, *const c_char, c_int) -> c_int;
    match next_symbol!("linkat", LinkatFn) {
        Some(real) => unsafe { real(old_dirfd, old, new_dirfd, new, flags) },
        None => {
            deny();
            -1
        }
    }
}

/// # Safety
/// Same contract as `utime(2)`.
#[no_mangle]
pub unsafe extern "C" fn utime(path: *const c_char, times: *const libc::utimbuf) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked(candidate) {
        deny();
        return -1;
    }
    type UtimeFn = unsafe extern "C" fn(*const c_char, *const libc::utimbuf) -> c_int;
    match next_symbol!("utime", UtimeFn) {
        Some(real) => unsafe { real(path, times) },
        None => {
            deny();
            -1
        }
    }
}

macro_rules! timeval_pair_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as the libc entry point of the same name.
        #[no_mangle]
        pub unsafe extern "C" fn $name(path: *const c_char, times: *const libc::timeval) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type F = unsafe extern "C" fn(*const c_char, *const libc::timeval) -> c_int;
            match next_symbol!($symbol, F) {
                Some(real) => unsafe { real(path, times) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

timeval_pair_fn!(utimes, "utimes");
timeval_pair_fn!(lutimes, "lutimes");

/// # Safety
/// Same contract as `utimensat(2)`.
#[no_mangle]
pub unsafe extern "C" fn utimensat(
    dirfd: c_int,
    path: *const c_char,
    times: *const libc::timespec,
    flags: c_int,
) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked_at(dirfd, candidate) {
        deny();
        return -1;
    }
    type UtimensatFn =
        unsafe extern "C" fn(c_int, *const c_char, *const libc::timespec, c_int) -> c_int;
    match next_symbol!("utimensat", UtimensatFn) {
        Some(real) => unsafe { real(dirfd, path, times, flags) },
        None => {
            deny();
            -1
        }
    }
}
