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

//! Recover the path a directory file descriptor refers to.
//!
//! Used by the `*at` family of interposition hooks (spec.md §4.4's
//! "Descriptor-relative variant") to turn `(dirfd, "relative/name")` into an
//! absolute path the admission oracle can reason about. This reads
//! `/proc/self/fd/<fd>`, which is itself a path -- so, like
//! [`crate::resolve`], it must go through the *original* `readlink(2)` via
//! [`crate::orig`], never through this crate's own interposed `readlink`
//! hook, or a blocked prefix covering `/proc` would make descriptor
//! resolution recurse into the oracle that depends on it.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::os::unix::ffi::OsStringExt;
use std::path::PathBuf;

use crate::error::{Error, ErrorImpl};
use crate::orig;

/// Resolve `dirfd` to the absolute path it was opened with, by reading its
/// `/proc/self/fd/<dirfd>` symlink.
///
/// Returns an error (treated by callers as "cannot resolve", hence blocked)
/// if the descriptor is invalid, the link can't be read, or the content
/// doesn't fit in a `PATH_MAX`-sized buffer.
pub(crate) fn resolve_dirfd(dirfd: c_int) -> Result<PathBuf, Error> {
    let link_path = format!("/proc/self/fd/{dirfd}");
    let clink = CString::new(link_path).map_err(|_| ErrorImpl::InvalidPathEncoding)?;

    let readlink = orig::real_readlink()?;

    let mut buf = vec![0u8; libc::PATH_MAX as usize];
    // SAFETY: `readlink` is `readlink(2)`'s address obtained via
    // `RTLD_NEXT`; `clink` is a valid NUL-terminated C string; `buf` is
    // PATH_MAX bytes and outlives the call.
    let written = unsafe { readlink(clink.as_ptr() as *const c_char, buf.as_mut_ptr() as *mut c_char, buf.len()) };

    if written < 0 {
        return Err(ErrorImpl::DescriptorUnresolvable { fd: dirfd }.into());
    }
    let written = written as usize;
    if written >= buf.len() {
        // The kernel truncates silently if the target doesn't fit; treat
        // that the same as any other resolution failure.
        return Err(ErrorImpl::DescriptorUnresolvable { fd: dirfd }.into());
    }

    buf.truncate(written);
    Ok(PathBuf::from(std::ffi::OsString::from_vec(buf)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_stdin_fd_is_something() {
        // fd 0 is some file (usually a tty, pipe, or /dev/null in test
        // harnesses); we only assert this succeeds and yields a path, not
        // its exact content.
        let resolved = resolve_dirfd(0);
        assert!(resolved.is_ok(), "resolving fd 0 should succeed: {resolved:?}");
    }

    #[test]
    fn resolve_invalid_fd_fails() {
        let resolved = resolve_dirfd(-1);
        assert!(resolved.is_err(), "resolving an invalid fd should fail");
    }
}
