// BgpNeighbors: Verify that all BGP sessions in a testbed are established
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

use pretty_assertions::assert_eq;

use crate::table::render_org_table;

#[test]
fn neighbor_table() {
    let rows = [
        ["default", "10.0.0.1", "Established", "Passed"].map(String::from),
        ["red", "10.1.0.6", "Idle", "Failed"].map(String::from),
    ];
    assert_eq!(
        render_org_table(["VRF", "Peer", "State", "Result"], &rows),
        "| VRF     | Peer     | State       | Result   |\n\
         |---------+----------+-------------+----------|\n\
         | default | 10.0.0.1 | Established | Passed   |\n\
         | red     | 10.1.0.6 | Idle        | Failed   |"
    );
}

#[test]
fn empty_table() {
    assert_eq!(
        render_org_table(["VRF", "Peer", "State", "Result"], &[]),
        "| VRF   | Peer   | State   | Result   |\n\
         |-------+--------+---------+----------|"
    );
}

#[test]
fn wide_cells() {
    let rows = [["a very long cell", "x"].map(String::from)];
    assert_eq!(
        render_org_table(["A", "Long header"], &rows),
        "| A                | Long header   |\n\
         |------------------+---------------|\n\
         | a very long cell | x             |"
    );
}

#[test]
fn multi_line_cells() {
    let rows = [
        ["connect", "FAILED", "R1 is down\nR2 is down"].map(String::from),
        ["clean_up", "PASSED", ""].map(String::from),
    ];
    assert_eq!(
        render_org_table(["Section", "Result", "Reason"], &rows),
        "| Section   | Result   | Reason     |\n\
         |-----------+----------+------------|\n\
         | connect   | FAILED   | R1 is down |\n\
         |           |          | R2 is down |\n\
         | clean_up  | PASSED   |            |"
    );
}
