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

//! Process-wide configuration: the forbidden-prefix list and the debug flag.
//!
//! Published exactly once through a [`OnceLock`], mirroring the
//! `CACHED_PROCFS_HANDLE`/`HAS_UNBROKEN_MOUNT_API` one-shot-cache idiom this
//! crate's structural reference uses for its own process-wide state. Unlike
//! those, failure here is not recoverable per-call: if the working copy of
//! the prefix list cannot be built, [`PolicyState::FailClosed`] is published
//! instead of [`PolicyState::Ready`], and every subsequent admission query
//! is blocked unconditionally for the remainder of the process's life. See
//! [`crate::oracle`] for where that flag is consulted.

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::error::{Error, ErrorImpl};
use crate::trace::trace;

/// Name of the environment variable naming forbidden path prefixes.
pub(crate) const BLOCKED_PATHS_VAR: &str = "PATHVETO_BLOCKED_PATHS";
/// Name of the environment variable enabling debug trace output.
pub(crate) const DEBUG_VAR: &str = "PATHVETO_DEBUG";

const DEFAULT_BLOCKED_PATHS: &str = "/app:/.apps_data";
const LIST_SEPARATOR: char = ':';

/// Static upper bound on the number of forbidden prefixes. Entries beyond
/// this are silently dropped, matching the original shim's behavior; see
/// the Design Notes' third open question.
const MAX_PREFIXES: usize = 64;

/// Frozen, process-wide admission policy.
#[derive(Debug)]
pub(crate) struct Policy {
    prefixes: Vec<PathBuf>,
    debug: bool,
}

impl Policy {
    pub(crate) fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    pub(crate) fn debug(&self) -> bool {
        self.debug
    }

    #[cfg(test)]
    pub(crate) fn for_test(prefixes: Vec<PathBuf>, debug: bool) -> Self {
        Self { prefixes, debug }
    }
}

/// The three-state initialization the Design Notes ask for, collapsed into a
/// tagged variant rather than a `Ready` flag living next to a possibly-stale
/// prefix list: it is structurally impossible to observe a `Ready` state
/// with an incomplete policy.
#[derive(Debug)]
pub(crate) enum PolicyState {
    Ready(Policy),
    FailClosed,
}

static POLICY: OnceLock<PolicyState> = OnceLock::new();

/// One-shot accessor. Called eagerly from the library constructor
/// ([`crate::lifecycle`]) and lazily from the admission oracle on first real
/// call; whichever runs first wins.
pub(crate) fn ensure_initialized() -> &'static PolicyState {
    POLICY.get_or_init(load_from_env)
}

/// Cheap read of the cached debug flag, for use by [`crate::trace::trace`]
/// call sites outside of this module. Before initialization completes this
/// is `false` (tracing doesn't exist yet), not fail-closed: the debug flag
/// never affects admission decisions.
pub(crate) fn is_debug() -> bool {
    match POLICY.get() {
        Some(PolicyState::Ready(policy)) => policy.debug(),
        _ => false,
    }
}

fn load_from_env() -> PolicyState {
    let debug = env::var(DEBUG_VAR).map(|v| v == "1").unwrap_or(false);

    let raw = env::var(BLOCKED_PATHS_VAR).unwrap_or_else(|_| DEFAULT_BLOCKED_PATHS.to_string());

    let (prefixes, dropped) = match build_prefixes(&raw) {
        Ok(built) => built,
        Err(err) => {
            // Matches the original's malloc-can-fail posture: if the working
            // copy of the prefix list cannot even be built, nothing can be
            // confidently admitted for the rest of the process's life.
            trace!(debug, "config: {err}, latching fail-closed");
            return PolicyState::FailClosed;
        }
    };

    if dropped > 0 {
        // Kept silent by default (matching the original), visible only with
        // PATHVETO_DEBUG=1 -- see the Design Notes' third open question.
        trace!(
            debug,
            "config: dropped {dropped} prefixes beyond the {MAX_PREFIXES}-entry cap"
        );
    }

    trace!(
        debug,
        "config: loaded {} forbidden prefixes: {:?}",
        prefixes.len(),
        prefixes
    );

    PolicyState::Ready(Policy { prefixes, debug })
}

/// Build the working copy of the prefix list, growing it one [`PathBuf`] at a
/// time behind a checked reservation rather than letting a plain `push`
/// abort the process on allocation failure -- the one place in this module
/// that actually allocates without bound, since `raw`'s length (and thus the
/// number of candidate tokens) is controlled by whatever `PATHVETO_BLOCKED_PATHS`
/// the caller's environment happens to hold.
fn build_prefixes(raw: &str) -> Result<(Vec<PathBuf>, usize), Error> {
    let mut prefixes = Vec::new();
    let mut dropped = 0usize;
    for token in raw.split(LIST_SEPARATOR) {
        let token = trim_prefix_token(token);
        if token.is_empty() {
            continue;
        }
        if prefixes.len() >= MAX_PREFIXES {
            dropped += 1;
            continue;
        }
        prefixes.try_reserve(1).map_err(|_| -> Error {
            ErrorImpl::ConfigLoadFailed {
                description: "allocation failure while growing the forbidden-prefix list".into(),
            }
            .into()
        })?;
        prefixes.push(PathBuf::from(token));
    }
    Ok((prefixes, dropped))
}

/// Trim leading whitespace and all trailing whitespace/path separators from
/// a single list token, so `" /app/ "` stores as `/app` and `"/app///"`
/// stores as `/app`.
fn trim_prefix_token(token: &str) -> &str {
    let token = token.trim_start();
    token.trim_end_matches(|c: char| c.is_whitespace() || c == '/')
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn trim_prefix_token_strips_whitespace_and_trailing_slashes() {
        assert_eq!(trim_prefix_token("  /app/  "), "/app");
        assert_eq!(trim_prefix_token("/app///"), "/app");
        assert_eq!(trim_prefix_token("/app"), "/app");
        assert_eq!(trim_prefix_token("   "), "");
    }

    #[test]
    fn trim_prefix_token_does_not_touch_internal_slashes() {
        assert_eq!(trim_prefix_token("/a/b/c/"), "/a/b/c");
    }

    #[test]
    fn default_blocked_paths_parses_to_two_entries() {
        let prefixes: Vec<_> = DEFAULT_BLOCKED_PATHS
            .split(LIST_SEPARATOR)
            .map(trim_prefix_token)
            .filter(|t| !t.is_empty())
            .collect();
        assert_eq!(prefixes, vec!["/app", "/.apps_data"]);
    }

    #[test]
    fn empty_list_parses_to_no_prefixes() {
        let prefixes: Vec<_> = ""
            .split(LIST_SEPARATOR)
            .map(trim_prefix_token)
            .filter(|t| !t.is_empty())
            .collect();
        assert!(prefixes.is_empty());
    }

    #[test]
    fn build_prefixes_honors_the_cap_and_reports_the_drop_count() {
        let raw: Vec<String> = (0..(MAX_PREFIXES + 3)).map(|i| format!("/p{i}")).collect();
        let (prefixes, dropped) = build_prefixes(&raw.join(":")).unwrap();
        assert_eq!(prefixes.len(), MAX_PREFIXES);
        assert_eq!(dropped, 3);
    }
}
