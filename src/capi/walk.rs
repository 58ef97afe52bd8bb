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

//! File-tree-walk family (spec.md §4.6 "Tree walk").
//!
//! `ftw`/`nftw` take a caller-supplied callback invoked once per visited
//! entry; pathveto only gates the walk's starting point, the same as every
//! other entry point in this layer -- it has no way (and no need) to
//! inspect what the callback itself goes on to do with each visited path.

use std::os::raw::{c_char, c_int};

use libc::stat;

/// Layout mirrors glibc's `struct FTW` (`<ftw.h>`): byte offset of the
/// filename within the full path, and the walk depth.
#[repr(C)]
pub struct Ftw {
    pub base: c_int,
    pub level: c_int,
}

type FtwCallback = unsafe extern "C" fn(*const c_char, *const stat, c_int) -> c_int;
type NftwCallback = unsafe extern "C" fn(*const c_char, *const stat, c_int, *mut Ftw) -> c_int;

use crate::capi::utils::{deny, next_symbol, path_from_ptr};
use crate::oracle;

macro_rules! ftw_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `ftw(3)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            dirpath: *const c_char,
            callback: FtwCallback,
            nopenfd: c_int,
        ) -> c_int {
            let candidate = unsafe { path_from_ptr(dirpath) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type F = unsafe extern "C" fn(*const c_char, FtwCallback, c_int) -> c_int;
            match next_symbol!($symbol, F) {
                Some(real) => unsafe { real(dirpath, callback, nopenfd) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

ftw_fn!(ftw, "ftw");
ftw_fn!(ftw64, "ftw64");

macro_rules! nftw_fn {
    ($name:ident, $symbol:literal) => {
        /// # Safety
        /// Same contract as `nftw(3)`.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            dirpath: *const c_char,
            callback: NftwCallback,
            nopenfd: c_int,
            flags: c_int,
        ) -> c_int {
            let candidate = unsafe { path_from_ptr(dirpath) };
            if oracle::is_blocked(candidate) {
                deny();
                return -1;
            }
            type F = unsafe extern "C" fn(*const c_char, NftwCallback, c_int, c_int) -> c_int;
            match next_symbol!($symbol, F) {
                Some(real) => unsafe { real(dirpath, callback, nopenfd, flags) },
                None => {
                    deny();
                    -1
                }
            }
        }
    };
}

nftw_fn!(nftw, "nftw");
nftw_fn!(nftw64, "nftw64");
