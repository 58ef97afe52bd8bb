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

//! Extended-attribute family (spec.md §4.6 "Extended attributes").
//!
//! The `f*xattr` variants take a file descriptor rather than a path and are
//! outside pathveto's scope (spec.md §2 Non-goals: descriptors obtained
//! before a deny decision are not retroactively revoked).

use std::os::raw::{c_char, c_int, c_void};

use libc::{size_t, ssize_t};

use crate::capi::utils::{deny, next_symbol, path_from_ptr};
use crate::oracle;

macro_rules! set_xattr_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `setxattr(2)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            path: *const c_char,
            name: *const c_char,
            value: *const c_void,
            size: size_t,
            flags: c_int,
        ) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type F = unsafe extern "C" fn(
                *const c_char,
                *const c_char,
                *const c_void,
                size_t,
                c_int,
            ) -> c_int;
            match next_symbol!($symbol, F) {
                Some(real) => unsafe { real(path, name, value, size, flags) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

set_xattr_fn!(setxattr, "setxattr");
set_xattr_fn!(lsetxattr, "lsetxattr");

macro_rules! get_xattr_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `getxattr(2)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            path: *const c_char,
            name: *const c_char,
            value: *mut c_void,
            size: size_t,
        ) -> ssize_t {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type F =
                unsafe extern "C" fn(*const c_char, *const c_char, *mut c_void, size_t) -> ssize_t;
            match next_symbol!($symbol, F) {
                Some(real) => unsafe { real(path, name, value, size) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

get_xattr_fn!(getxattr, "getxattr");
get_xattr_fn!(lgetxattr, "lgetxattr");

macro_rules! list_xattr_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `listxattr(2)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            path: *const c_char,
            list: *mut c_char,
            size: size_t,
        ) -> ssize_t {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type F = unsafe extern "C" fn(*const c_char, *mut c_char, size_t) -> ssize_t;
            match next_symbol!($symbol, F) {
                Some(real) => unsafe { real(path, list, size) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

list_xattr_fn!(listxattr, "listxattr");
list_xattr_fn!(llistxattr, "llistxattr");

macro_rules! remove_xattr_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `removexattr(2)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(path: *const c_char, name: *const c_char) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type F = unsafe extern "C" fn(*const c_char, *const c_char) -> c_int;
            match next_symbol!($symbol, F) {
                Some(real) => unsafe { real(path, name) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

remove_xattr_fn!(removexattr, "removexattr");
remove_xattr_fn!(lremovexattr, "lremovexattr");
