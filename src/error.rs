// SPDX-License-Identifier: MPL-2.0 OR LGPL-3.0-or-later
/*
 * pathveto: filesystem path denylist enforcement via LD_PRELOAD
 * Copyright (C) 2026 The pathveto Authors
 *
 * == MPL-2.0 ==
 *
 *  This Source Code Form is subject to the terms of the Mozilla Public
 *  License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 *
 * Alternatively, this Source Code Form may also (at your option) be used
 * under the terms of the GNU Lesser General Public License Version 3, as
 * described below:
 *
 * == LGPL-3.0-or-later ==
 *
 *  This program is free software: you can redistribute it and/or modify it
 *  under the terms of the GNU Lesser General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or (at
 *  your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful, but
 *  WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY  or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General
 * Public License  for more details.
 *
 *  You should have received a copy of the GNU Lesser General Public License
 *  along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

#![forbid(unsafe_code)]

//! Error types for pathveto's internal engine.
//!
//! None of this is exposed across the C ABI boundary: every `capi` hook
//! converts an [`Error`] into the documented libc failure convention
//! (`-1`+`errno`, `NULL`, ...) before returning to the caller. Internally,
//! though, having a real error type lets the resolver and config loader
//! describe *why* a decision couldn't be made with confidence, which
//! [`crate::oracle`] then collapses into "blocked" — see the fail-closed
//! requirement in the admission oracle's docs.

use std::borrow::Cow;
use std::io::Error as IOError;

/// Opaque error type for pathveto's internal engine.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub(crate) struct Error(#[from] Box<ErrorImpl>);

impl<E: Into<ErrorImpl>> From<E> for Error {
    #[doc(hidden)]
    fn from(err: E) -> Self {
        Self(Box::new(err.into()))
    }
}

impl Error {
    #[cfg(test)]
    pub(crate) fn into_inner(self) -> ErrorImpl {
        *self.0
    }
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum ErrorImpl {
    #[error("path exceeds the maximum supported length ({len} bytes)")]
    PathTooLong { len: usize },

    #[error("path contains a NUL byte or is not valid for a C string")]
    InvalidPathEncoding,

    #[error("could not load configuration: {description}")]
    ConfigLoadFailed { description: Cow<'static, str> },

    #[error("could not resolve directory descriptor {fd} to a path")]
    DescriptorUnresolvable { fd: std::os::raw::c_int },

    #[error("next-symbol lookup for {symbol} failed")]
    SymbolUnavailable { symbol: Cow<'static, str> },

    #[error("{operation} failed")]
    OsError {
        operation: Cow<'static, str>,
        source: IOError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn config_load_failed_round_trips_its_description() {
        let err: Error = ErrorImpl::ConfigLoadFailed {
            description: "allocation failure while building the prefix list".into(),
        }
        .into();
        match err.into_inner() {
            ErrorImpl::ConfigLoadFailed { description } => {
                assert_eq!(description, "allocation failure while building the prefix list");
            }
            other => panic!("expected ConfigLoadFailed, got {other:?}"),
        }
    }
}
