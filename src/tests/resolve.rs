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

//! Exercises [`crate::resolve::resolve`] against real symlinks: textual
//! canonicalization alone would never catch a symlink escaping the
//! `allowed/` subtree, which is exactly what the resolver exists to close.

use crate::resolve;
use crate::tests::common::EscapeTree;

#[test]
fn symlink_escape_resolves_to_its_real_target() {
    let tree = EscapeTree::build();
    let resolved = resolve::resolve(&tree.escape_path()).expect("resolve escape path");
    let expected = std::fs::canonicalize(tree.blocked_dir().join("secret.txt"))
        .expect("canonicalize real target");
    assert_eq!(resolved, expected);
}

#[test]
fn plain_file_in_allowed_dir_resolves_to_itself() {
    let tree = EscapeTree::build();
    let path = tree.allowed_dir().join("escape");
    let resolved = resolve::resolve(&path).expect("resolve symlink itself");
    // The symlink's own canonical location is still under allowed/, distinct
    // from where it points.
    assert!(resolved.starts_with(
        std::fs::canonicalize(tree.allowed_dir()).expect("canonicalize allowed dir")
    ));
}

#[test]
fn nonexistent_parent_still_resolves_via_fallback() {
    let tree = EscapeTree::build();
    let path = tree.allowed_dir().join("does-not-exist.txt");
    let resolved = resolve::resolve(&path).expect("resolve nonexistent leaf");
    let expected_parent =
        std::fs::canonicalize(tree.allowed_dir()).expect("canonicalize allowed dir");
    assert_eq!(resolved, expected_parent.join("does-not-exist.txt"));
}
