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

//! Access-check family (spec.md §4.6 "Access checks").

use std::os::raw::{c_char, c_int};

use crate::capi::utils::{deny, next_symbol, path_from_ptr};
use crate::oracle;

macro_rules! access_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `access(2)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(path: *const c_char, mode: c_int) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type AccessFn = unsafe extern "C" fn(*const c_char, c_int) -> c_int;
            match next_symbol!($symbol, AccessFn) {
                Some(real) => unsafe { real(path, mode) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

access_fn!(access, "access");
access_fn!(euidaccess, "euidaccess");
access_fn!(eaccess, "eaccess");

macro_rules! faccessat_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `faccessat(2)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            dirfd: c_int,
            path: *const c_char,
            mode: c_int,
            flags: c_int,
        ) -> c_int {
            let candidate = unsafe { path_from_ptr(path) };
            if oracle::is_blocked_at(dirfd, candidate) {
                deny();
                return -1;
            }
            type FaccessatFn = unsafe extern "C" fn(c_int, *const c_char, c_int, c_int) -> c_int;
            match next_symbol!($symbol, FaccessatFn) {
                Some(real) => unsafe { real(dirfd, path, mode, flags) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

faccessat_fn!(faccessat, "faccessat");
faccessat_fn!(faccessat2, "faccessat2");
