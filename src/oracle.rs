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

//! The admission oracle: the single function every `capi` hook consults.
//!
//! Every `capi` hook only ever asks "is this [`Decision::Blocked`]" -- the
//! richer [`BlockReason`] exists purely so [`crate::trace`] output (and
//! tests) can say *why*, addressing the Design Notes' open question about
//! distinguishing a forwarded failure from a policy failure. It does not
//! change the boolean contract callers see.

use std::os::raw::c_int;
use std::path::{Path, PathBuf};

use crate::canon;
use crate::config::{self, Policy, PolicyState};
use crate::descriptor;
use crate::resolve;
use crate::trace::trace;

/// Which check produced a block, for debug tracing and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockReason {
    /// The one-shot configuration load failed; every query is blocked.
    FailClosed,
    /// The canonicalized (or, on canonicalization failure, raw) candidate
    /// matched a forbidden prefix directly.
    DirectMatch,
    /// The candidate only matched a forbidden prefix after symlink-aware
    /// resolution.
    ResolvedMatch,
    /// A directory descriptor could not be resolved to a path.
    DescriptorUnresolvable,
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FailClosed => "fail-closed",
            Self::DirectMatch => "direct match",
            Self::ResolvedMatch => "resolved match",
            Self::DescriptorUnresolvable => "descriptor unresolvable",
        };
        f.write_str(s)
    }
}

/// Result of an admission query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Allowed,
    Blocked(BlockReason),
}

impl Decision {
    pub(crate) fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

/// Does `candidate` fall under any forbidden prefix?
///
/// `Path::starts_with` compares path *components*, not raw byte prefixes,
/// which is exactly the "equal, or followed immediately by a separator"
/// match rule spec.md §3 requires: `/app` matches `/app`, `/app/`, and
/// `/app/x`, but not `/applications`.
fn matches_any(candidate: &Path, prefixes: &[PathBuf]) -> bool {
    prefixes.iter().any(|prefix| candidate.starts_with(prefix))
}

/// Admit or deny a single absolute-or-relative path.
///
/// `path = None` models the "no path supplied" case (spec.md §4.4 step 2),
/// which is always allowed -- the oracle has nothing to check.
pub(crate) fn decide(path: Option<&Path>) -> Decision {
    let policy = match config::ensure_initialized() {
        PolicyState::FailClosed => return Decision::Blocked(BlockReason::FailClosed),
        PolicyState::Ready(policy) => policy,
    };

    let Some(path) = path else {
        return Decision::Allowed;
    };

    if policy.prefixes().is_empty() {
        return Decision::Allowed;
    }

    decide_with_policy(path, policy)
}

fn decide_with_policy(path: &Path, policy: &Policy) -> Decision {
    let debug = policy.debug();

    // Canonicalization failure falls back to the raw path: it has not been
    // proven to match anything yet, so checking it directly is still a
    // conservative (never permissive) choice -- spec.md §4.4 step 3 and
    // §4.8's last sentence.
    let candidate = canon::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    if matches_any(&candidate, policy.prefixes()) {
        trace!(debug, "block ({}): {candidate:?}", BlockReason::DirectMatch);
        return Decision::Blocked(BlockReason::DirectMatch);
    }

    if let Some(resolved) = resolve::resolve(&candidate) {
        if matches_any(&resolved, policy.prefixes()) {
            trace!(
                debug,
                "block ({}): {candidate:?} resolves to {resolved:?}",
                BlockReason::ResolvedMatch
            );
            return Decision::Blocked(BlockReason::ResolvedMatch);
        }
    }

    Decision::Allowed
}

/// Admit or deny a descriptor-relative path, per spec.md §4.4's
/// "Descriptor-relative variant".
pub(crate) fn decide_at(dirfd: c_int, pathname: Option<&Path>) -> Decision {
    let Some(pathname) = pathname else {
        return decide(None);
    };

    if pathname.is_absolute() {
        return decide(Some(pathname));
    }

    if dirfd == libc::AT_FDCWD {
        return decide(Some(pathname));
    }

    match descriptor::resolve_dirfd(dirfd) {
        Ok(dirpath) => decide(Some(&dirpath.join(pathname))),
        Err(_) => {
            trace!(
                config::is_debug(),
                "block ({}): dirfd {dirfd} could not be resolved",
                BlockReason::DescriptorUnresolvable
            );
            Decision::Blocked(BlockReason::DescriptorUnresolvable)
        }
    }
}

/// `true` if `path` is forbidden. The plain-boolean entry point the `capi`
/// dispatch layer actually calls.
pub(crate) fn is_blocked(path: Option<&Path>) -> bool {
    decide(path).is_blocked()
}

/// Descriptor-relative counterpart of [`is_blocked`].
pub(crate) fn is_blocked_at(dirfd: c_int, pathname: Option<&Path>) -> bool {
    decide_at(dirfd, pathname).is_blocked()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn policy(prefixes: &[&str]) -> Policy {
        Policy::for_test(prefixes.iter().map(PathBuf::from).collect(), false)
    }

    #[test]
    fn direct_match_on_exact_prefix() {
        let p = policy(&["/app"]);
        assert_eq!(
            decide_with_policy(Path::new("/app"), &p),
            Decision::Blocked(BlockReason::DirectMatch)
        );
    }

    #[test]
    fn direct_match_on_child() {
        let p = policy(&["/app"]);
        assert_eq!(
            decide_with_policy(Path::new("/app/secret"), &p),
            Decision::Blocked(BlockReason::DirectMatch)
        );
    }

    #[test]
    fn sibling_with_shared_prefix_is_not_blocked() {
        let p = policy(&["/app"]);
        assert_eq!(
            decide_with_policy(Path::new("/applications/foo"), &p),
            Decision::Allowed
        );
    }

    #[test]
    fn dotdot_traversal_is_canonicalized_before_matching() {
        let p = policy(&["/app"]);
        assert_eq!(
            decide_with_policy(Path::new("/tmp/../app/secret"), &p),
            Decision::Blocked(BlockReason::DirectMatch)
        );
    }

    #[test]
    fn unrelated_path_is_allowed() {
        let p = policy(&["/app"]);
        assert_eq!(decide_with_policy(Path::new("/tmp/ok"), &p), Decision::Allowed);
    }

    #[test]
    fn empty_prefix_list_allows_everything() {
        let p = policy(&[]);
        assert_eq!(decide_with_policy(Path::new("/app/secret"), &p), Decision::Allowed);
    }
}
