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

#![forbid(unsafe_code)]

//! Pure textual path canonicalization.
//!
//! No filesystem I/O happens here beyond a `getcwd` for relative inputs, so
//! this is safe to call from any interposition hook: it cannot recurse
//! through another interposed entry point, unlike the symlink-aware
//! resolver in [`crate::resolve`].

use std::ffi::OsStr;
use std::os::unix::ffi::OsStringExt;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, ErrorImpl};

/// Platform path length limit. Anything that would canonicalize to more
/// than this many bytes is a failure, matching the original's
/// stack-buffer-bounded implementation.
pub(crate) const MAX_PATH_LEN: usize = libc::PATH_MAX as usize;

/// Canonicalize `path` into an absolute form with `.`/`..` resolved
/// textually and trailing/redundant separators collapsed.
///
/// If `path` is relative, the current working directory is prepended first.
/// The empty result normalizes to `/`.
pub(crate) fn canonicalize(path: &Path) -> Result<PathBuf, Error> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir()?.join(path)
    };

    let mut stack: Vec<&OsStr> = Vec::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                stack.pop();
            }
            Component::Normal(part) => stack.push(part),
        }
    }

    let mut result = PathBuf::from("/");
    for part in stack {
        result.push(part);
    }

    if result.as_os_str().len() > MAX_PATH_LEN {
        return Err(ErrorImpl::PathTooLong {
            len: result.as_os_str().len(),
        }
        .into());
    }

    Ok(result)
}

/// Get the current working directory via the host, without going through
/// any interposed entry point (`getcwd` is not part of the interposed
/// family in spec.md §4.6, so this is just a plain `rustix` call).
fn current_dir() -> Result<PathBuf, Error> {
    let cwd = rustix::process::getcwd(Vec::new()).map_err(|err| ErrorImpl::OsError {
        operation: "getcwd".into(),
        source: std::io::Error::from_raw_os_error(err.raw_os_error()),
    })?;
    Ok(PathBuf::from(std::ffi::OsString::from_vec(
        cwd.into_bytes(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn already_canonical() {
        assert_eq!(canonicalize(Path::new("/app/secret")).unwrap(), Path::new("/app/secret"));
    }

    #[test]
    fn dot_and_dotdot_components() {
        assert_eq!(
            canonicalize(Path::new("/tmp/../app/./secret")).unwrap(),
            Path::new("/app/secret")
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(canonicalize(Path::new("/app/")).unwrap(), Path::new("/app"));
    }

    #[test]
    fn dotdot_above_root_does_not_escape() {
        assert_eq!(canonicalize(Path::new("/../../etc")).unwrap(), Path::new("/etc"));
    }

    #[test]
    fn empty_path_normalizes_to_root() {
        assert_eq!(canonicalize(Path::new("")).unwrap(), current_dir().unwrap());
    }

    #[test]
    fn root_normalizes_to_root() {
        assert_eq!(canonicalize(Path::new("/")).unwrap(), Path::new("/"));
    }

    #[test]
    fn idempotent() {
        let once = canonicalize(Path::new("/tmp/../app/./x//y/../z")).unwrap();
        let twice = canonicalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn redundant_separators_collapse() {
        assert_eq!(
            canonicalize(Path::new("/app//x///y")).unwrap(),
            Path::new("/app/x/y")
        );
    }
}
