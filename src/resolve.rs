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

//! Symlink-aware resolution using the host's *original* `realpath(3)`.
//!
//! This must go through [`crate::orig`]'s next-symbol table rather than
//! calling `realpath` directly: the interposed `realpath` hook itself
//! checks the admission oracle, so using it here would mean the resolver
//! that the oracle depends on could recurse back into the oracle. If a
//! configured prefix happened to cover whatever path `realpath` needs to
//! inspect along the way, that recursion could deadlock policy or be
//! abused to force a decision. The original, pre-interposition
//! `realpath(3)` has no such dependency.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use crate::orig;

/// Two-step resolution strategy for a path that may not yet exist.
///
/// 1. Resolve the full path. If that succeeds, return it.
/// 2. Otherwise, split off the final component, resolve the parent, and
///    re-append the final component to the resolved parent.
///
/// Returns `None` if neither step succeeds (e.g. the parent doesn't exist
/// either, or the next-symbol lookup itself is unavailable); callers treat
/// `None` as "no symlink-layer evidence", not as a block by itself -- see
/// [`crate::oracle`].
pub(crate) fn resolve(path: &Path) -> Option<PathBuf> {
    if let Some(resolved) = try_realpath(path) {
        return Some(resolved);
    }

    let (parent, name) = split_last_component(path)?;
    let resolved_parent = try_realpath(parent)?;
    Some(resolved_parent.join(name))
}

fn split_last_component(path: &Path) -> Option<(&Path, &std::ffi::OsStr)> {
    let name = path.file_name()?;
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty())?;
    Some((parent, name))
}

fn try_realpath(path: &Path) -> Option<PathBuf> {
    let real = orig::real_realpath().ok()?;
    let cpath = CString::new(path.as_os_str().as_bytes()).ok()?;

    // realpath(3) fills in a caller-supplied buffer of at least PATH_MAX
    // bytes when given a non-NULL second argument; it returns that same
    // pointer on success or NULL on failure, so there is nothing to free.
    let mut buf = vec![0u8; libc::PATH_MAX as usize];
    // SAFETY: `real` is `realpath(3)`'s address obtained via `RTLD_NEXT`;
    // `cpath` is a valid NUL-terminated C string; `buf` is at least
    // PATH_MAX bytes and outlives the call.
    let ptr = unsafe { real(cpath.as_ptr(), buf.as_mut_ptr() as *mut c_char) };
    if ptr.is_null() {
        return None;
    }

    // SAFETY: on success `ptr` points at `buf`, which is NUL-terminated by
    // `realpath(3)` somewhere within its PATH_MAX-sized allocation.
    let resolved = unsafe { CStr::from_ptr(ptr) };
    Some(PathBuf::from(std::ffi::OsString::from_vec(
        resolved.to_bytes().to_vec(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn split_last_component_basic() {
        let (parent, name) = split_last_component(Path::new("/a/b/c")).unwrap();
        assert_eq!(parent, Path::new("/a/b"));
        assert_eq!(name, "c");
    }

    #[test]
    fn split_last_component_root_has_no_parent() {
        assert!(split_last_component(Path::new("/")).is_none());
    }

    #[test]
    fn resolve_existing_path_matches_realpath() {
        let resolved = resolve(Path::new("/")).expect("resolving / should succeed");
        assert_eq!(resolved, Path::new("/"));
    }

    #[test]
    fn resolve_nonexistent_path_falls_back_to_parent() {
        let resolved = resolve(Path::new("/nonexistent-pathveto-test-target"))
            .expect("resolving a missing child of / should fall back to the parent");
        assert_eq!(resolved, Path::new("/nonexistent-pathveto-test-target"));
    }
}
