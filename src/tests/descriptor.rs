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

//! Exercises [`crate::descriptor::resolve_dirfd`] against a real open
//! directory file descriptor.

use std::os::unix::io::AsRawFd;

use crate::descriptor;
use crate::tests::common::EscapeTree;

#[test]
fn resolves_an_open_directory_fd_to_its_path() {
    let tree = EscapeTree::build();
    let dir = std::fs::File::open(tree.allowed_dir()).expect("open allowed dir");
    let resolved = descriptor::resolve_dirfd(dir.as_raw_fd()).expect("resolve dirfd");
    let expected =
        std::fs::canonicalize(tree.allowed_dir()).expect("canonicalize allowed dir");
    assert_eq!(resolved, expected);
}

#[test]
fn rejects_a_descriptor_that_is_not_open() {
    // An arbitrarily large fd number that is very unlikely to be open in the
    // test harness.
    let bogus_fd: std::os::raw::c_int = 12345;
    assert!(descriptor::resolve_dirfd(bogus_fd).is_err());
}
