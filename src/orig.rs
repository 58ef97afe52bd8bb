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

//! Next-symbol lookup table.
//!
//! The admission oracle and resolvers must never call through this crate's
//! own interposed entry points: if a configured prefix happens to cover a
//! resource those entry points touch internally (notably `/proc/self/fd/*`,
//! used by [`crate::descriptor`]), calling the interposed name would
//! deadlock policy or hand an attacker a way to force a fail-open bug.
//! Instead, every helper the engine depends on is resolved once via the
//! dynamic linker's `RTLD_NEXT` lookup and cached, exactly as the original
//! shim does at each of its `dlsym(RTLD_NEXT, ...)` call sites, except here
//! the cache is shared rather than re-resolved per call.
//!
//! `libc::dlsym`/`RTLD_NEXT` are used directly rather than through `rustix`
//! because `rustix` does not wrap the dynamic linker's symbol-resolution
//! API; every other host interaction in this crate goes through `rustix`
//! where a safe wrapper exists.

use std::ffi::CString;
use std::os::raw::c_char;
use std::sync::OnceLock;

use crate::error::{Error, ErrorImpl};

type RealpathFn = unsafe extern "C" fn(*const c_char, *mut c_char) -> *mut c_char;
type ReadlinkFn = unsafe extern "C" fn(*const c_char, *mut c_char, usize) -> isize;

static REALPATH: OnceLock<Option<usize>> = OnceLock::new();
static READLINK: OnceLock<Option<usize>> = OnceLock::new();

/// Resolve the next (non-interposed) definition of `name` via `RTLD_NEXT`.
///
/// Returns `None` if the dynamic linker cannot find a next definition. This
/// should not normally happen for libc entry points on a glibc/musl host,
/// but a missing symbol is treated as a resolution failure, not a panic:
/// every caller of this module folds `None` into fail-closed.
fn next_symbol(name: &'static str) -> Option<usize> {
    let cname = CString::new(name).ok()?;
    // SAFETY: `cname` is a valid, NUL-terminated C string for the lifetime
    // of this call; `dlsym` with `RTLD_NEXT` returns either NULL or a stable
    // function address valid for the remainder of the process.
    let ptr = unsafe { libc::dlsym(libc::RTLD_NEXT, cname.as_ptr()) };
    if ptr.is_null() {
        None
    } else {
        Some(ptr as usize)
    }
}

/// The original, non-interposed `realpath(3)`.
pub(crate) fn real_realpath() -> Result<RealpathFn, Error> {
    let addr = *REALPATH.get_or_init(|| next_symbol("realpath"));
    let addr = addr.ok_or_else(|| ErrorImpl::SymbolUnavailable {
        symbol: "realpath".into(),
    })?;
    // SAFETY: `addr` was resolved by `dlsym` against the known signature of
    // `realpath(3)`; we never cache an address from a symbol lookup for any
    // other name under this key.
    Ok(unsafe { std::mem::transmute::<usize, RealpathFn>(addr) })
}

/// The original, non-interposed `readlink(2)`.
pub(crate) fn real_readlink() -> Result<ReadlinkFn, Error> {
    let addr = *READLINK.get_or_init(|| next_symbol("readlink"));
    let addr = addr.ok_or_else(|| ErrorImpl::SymbolUnavailable {
        symbol: "readlink".into(),
    })?;
    // SAFETY: see `real_realpath` above.
    Ok(unsafe { std::mem::transmute::<usize, ReadlinkFn>(addr) })
}

/// Look up the next definition of an arbitrary interposed symbol, for use by
/// the `capi` dispatch layer when forwarding an allowed call to the original
/// implementation. Not cached here (each `capi` hook caches its own symbol
/// in a local `OnceLock`), since the set of names is large and only a
/// handful are on any given process's hot path.
pub(crate) fn lookup(name: &'static str) -> Result<usize, Error> {
    next_symbol(name).ok_or_else(|| {
        ErrorImpl::SymbolUnavailable {
            symbol: name.into(),
        }
        .into()
    })
}
