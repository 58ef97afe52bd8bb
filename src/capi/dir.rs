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

//! Directory family (spec.md §4.6 "Directory operations").

use std::os::raw::{c_char, c_int};

use libc::mode_t;

use crate::capi::utils::{deny, next_symbol, path_from_ptr};
use crate::oracle;

/// # Safety
/// Same contract as `opendir(3)`.
#[no_mangle]
pub unsafe extern "C" fn opendir(path: *const c_char) -> *mut libc::DIR {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked(candidate) {
        deny();
        return std::ptr::null_mut();
    }
    type OpendirFn = unsafe extern "C" fn(*const c_char) -> *mut libc::DIR;
    match next_symbol!("opendir", OpendirFn) {
        Some(real) => unsafe { real(path) },
        None => {
            deny();
            std::ptr::null_mut()
        }
    }
}

/// # Safety
/// Same contract as `chdir(2)`.
#[no_mangle]
pub unsafe extern "C" fn chdir(path: *const c_char) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked(candidate) {
        deny();
        return -1;
    }
    type ChdirFn = unsafe extern "C" fn(*const c_char) -> c_int;
    match next_symbol!("chdir", ChdirFn) {
        Some(real) => unsafe { real(path) },
        None => {
            deny();
            -1
        }
    }
}

/// # Safety
/// Same contract as `rmdir(2)`.
#[no_mangle]
pub unsafe extern "C" fn rmdir(path: *const c_char) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked(candidate) {
        deny();
        return -1;
    }
    type RmdirFn = unsafe extern "C" fn(*const c_char) -> c_int;
    match next_symbol!("rmdir", RmdirFn) {
        Some(real) => unsafe { real(path) },
        None => {
            deny();
            -1
        }
    }
}

/// # Safety
/// Same contract as `mkdir(2)`.
#[no_mangle]
pub unsafe extern "C" fn mkdir(path: *const c_char, mode: mode_t) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked(candidate) {
        deny();
        return -1;
    }
    type MkdirFn = unsafe extern "C" fn(*const c_char, mode_t) -> c_int;
    match next_symbol!("mkdir", MkdirFn) {
        Some(real) => unsafe { real(path, mode) },
        None => {
            deny();
            -1
        }
    }
}

/// # Safety
/// Same contract as `mkdirat(2)`.
#[no_mangle]
pub unsafe extern "C" fn mkdirat(dirfd: c_int, path: *const c_char, mode: mode_t) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked_at(dirfd, candidate) {
        deny();
        return -1;
    }
    type MkdiratFn = unsafe extern "C" fn(c_int, *const c_char, mode_t) -> c_int;
    match next_symbol!("mkdirat", MkdiratFn) {
        Some(real) => unsafe { real(dirfd, path, mode) },
        None => {
            deny();
            -1
        }
    }
}
