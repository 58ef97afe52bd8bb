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

//! Debug trace output.
//!
//! No logging framework is pulled in here: this library gets loaded into an
//! arbitrary, already-running host process via `LD_PRELOAD`, and installing a
//! global `tracing` subscriber (or fighting over one the host already
//! installed) is exactly the kind of ambient state the rest of this crate
//! avoids. Instead this is a single macro that does nothing when tracing is
//! disabled and, when enabled, writes one line to stderr with one
//! [`Write::write_all`] call so concurrent callers don't interleave partial
//! lines.

use std::fmt::Arguments;
use std::io::{self, Write};

/// Write one trace line to stderr, prefixed with the stable `[pathveto]` tag.
///
/// Not exported as part of the crate's public surface; only ever reached
/// through the [`trace!`] macro below, which checks the debug flag first so
/// this never runs (and never formats anything) when tracing is disabled.
pub(crate) fn write_line(args: Arguments<'_>) {
    let line = format!("[pathveto] {args}\n");
    // A single write_all on the locked stream is as atomic as we can make
    // this without coordinating with whatever else the host writes to
    // stderr; see the Design Notes' first open question.
    let stderr = io::stderr();
    let mut handle = stderr.lock();
    let _ = handle.write_all(line.as_bytes());
}

/// Emit a debug trace line if `$enabled` is true.
///
/// `$enabled` is evaluated eagerly but is expected to be a cheap read of the
/// cached debug flag (see [`crate::config::is_debug`]), never I/O.
macro_rules! trace {
    ($enabled:expr, $($arg:tt)*) => {
        if $enabled {
            $crate::trace::write_line(format_args!($($arg)*));
        }
    };
}

pub(crate) use trace;
