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

//! Execute-by-path family (spec.md §4.6 "Execute by path").
//!
//! Only `execve`/`execveat` are interposed. `execv` and the `execvp`/
//! `execvpe`/`execlp`/`execle`/`execl` family all tail-call into a libc
//! `$PATH` search (or, for `execv`, are a thin literal-path wrapper glibc
//! itself implements in terms of `execve`) before the real exec happens --
//! and a `$PATH` search picks a file this hook cannot predict without
//! reimplementing glibc's search order itself. Checking the bare `file`
//! argument against the admission oracle would check a candidate path
//! that has nothing to do with the one actually executed: a caller could
//! name an unblocked-looking `file` that a later `$PATH` entry resolves
//! into a forbidden prefix, and this hook would have confidently allowed
//! it. Rather than guess, none of that family is interposed, leaving
//! `execve`/`execveat` -- whose `path`/`pathname` argument is exactly the
//! path that gets executed -- as the only members of this family pathveto
//! covers.

use std::os::raw::{c_char, c_int};

use crate::capi::utils::{deny, next_symbol, path_from_ptr};
use crate::oracle;

/// # Safety
/// Same contract as `execve(2)`.
#[no_mangle]
pub unsafe extern "C" fn execve(
    path: *const c_char,
    argv: *const *mut c_char,
    envp: *const *mut c_char,
) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked(candidate) {
        deny();
        return -1;
    }
    type ExecveFn =
        unsafe extern "C" fn(*const c_char, *const *mut c_char, *const *mut c_char) -> c_int;
    match next_symbol!("execve", ExecveFn) {
        Some(real) => unsafe { real(path, argv, envp) },
        None => {
            deny();
            -1
        }
    }
}

/// # Safety
/// Same contract as `execveat(2)`.
#[no_mangle]
pub unsafe extern "C" fn execveat(
    dirfd: c_int,
    path: *const c_char,
    argv: *const *mut c_char,
    envp: *const *mut c_char,
    flags: c_int,
) -> c_int {
    let candidate = unsafe { path_from_ptr(path) };
    if oracle::is_blocked_at(dirfd, candidate) {
        deny();
        return -1;
    }
    type ExecveatFn = unsafe extern "C" fn(
        c_int,
        *const c_char,
        *const *mut c_char,
        *const *mut c_char,
        c_int,
    ) -> c_int;
    match next_symbol!("execveat", ExecveatFn) {
        Some(real) => unsafe { real(dirfd, path, argv, envp, flags) },
        None => {
            deny();
            -1
        }
    }
}
