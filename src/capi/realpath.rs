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

//! Canonicalization family (spec.md §4.6 "Canonicalization").
//!
//! `realpath`/`canonicalize_file_name` are the one family where the
//! *result*, not just the argument, needs checking: an input path that
//! looks fine on its face can still resolve, through a symlink, into a
//! blocked prefix. Both the argument and the resolved string the real
//! implementation produces are checked here.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::capi::utils::{deny, next_symbol, path_from_ptr};
use crate::oracle;

unsafe fn resolved_is_blocked(resolved: *mut c_char) -> bool {
    if resolved.is_null() {
        return false;
    }
    let bytes = unsafe { CStr::from_ptr(resolved) }.to_bytes();
    let path = Path::new(std::ffi::OsStr::from_bytes(bytes));
    oracle::is_blocked(Some(path))
}

/// # Safety
/// Same contract as `realpath(3)`.
#[no_mangle]
pub unsafe extern "C" fn realpath(
    path: *const c_char,
    resolved_path: *mut c_char,
) -> *mut c_char {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked(candidate) {
        deny();
        return std::ptr::null_mut();
    }

    type RealpathFn = unsafe extern "C" fn(*const c_char, *mut c_char) -> *mut c_char;
    let real = match next_symbol!("realpath", RealpathFn) {
        Some(real) => real,
        None => {
            deny();
            return std::ptr::null_mut();
        }
    };

    let result = unsafe { real(path, resolved_path) };
    if unsafe { resolved_is_blocked(result) } {
        // The caller's own buffer (if any) may already hold the resolved
        // string; there is no way to un-write it, but we do not hand back
        // a pointer to it and we free any buffer we own.
        if resolved_path.is_null() && !result.is_null() {
            unsafe { libc::free(result.cast()) };
        }
        deny();
        return std::ptr::null_mut();
    }
    result
}

/// # Safety
/// Same contract as `canonicalize_file_name(3)`.
#[no_mangle]
pub unsafe extern "C" fn canonicalize_file_name(path: *const c_char) -> *mut c_char {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked(candidate) {
        deny();
        return std::ptr::null_mut();
    }

    type CanonicalizeFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;
    let real = match next_symbol!("canonicalize_file_name", CanonicalizeFn) {
        Some(real) => real,
        None => {
            deny();
            return std::ptr::null_mut();
        }
    };

    let result = unsafe { real(path) };
    if unsafe { resolved_is_blocked(result) } {
        if !result.is_null() {
            unsafe { libc::free(result.cast()) };
        }
        deny();
        return std::ptr::null_mut();
    }
    result
}
