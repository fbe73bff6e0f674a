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

//! Render tables in the org-mode format:
//!
//! ```text
//! | VRF     | Peer     | State       | Result   |
//! |---------+----------+-------------+----------|
//! | default | 10.0.0.1 | Established | Passed   |
//! ```

use itertools::Itertools;

/// Headers are at least this much wider than their text.
const HEADER_PADDING: usize = 2;

/// Render a table with left-aligned cells. Each column is as wide as its widest cell, or its
/// header plus two characters, whichever is larger. A cell that spans multiple lines continues on
/// the following rows, with the other cells of those rows left empty.
pub fn render_org_table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let lines = rows.iter().flat_map(|row| split_row(row)).collect_vec();

    let mut widths = headers.map(|h| h.chars().count() + HEADER_PADDING);
    for line in lines.iter() {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(render_line(headers.iter().copied(), &widths));
    out.push(format!(
        "|{}|",
        widths.iter().map(|w| "-".repeat(w + 2)).join("+")
    ));
    for line in lines.iter() {
        out.push(render_line(line.iter().copied(), &widths));
    }
    out.join("\n")
}

/// Split a row with multi-line cells into multiple single-line rows.
fn split_row<const N: usize>(row: &[String; N]) -> Vec<[&str; N]> {
    let cells: [Vec<&str>; N] = std::array::from_fn(|c| row[c].lines().collect_vec());
    let height = cells.iter().map(Vec::len).max().unwrap_or_default().max(1);
    (0..height)
        .map(|i| std::array::from_fn(|c| cells[c].get(i).copied().unwrap_or_default()))
        .collect()
}

/// Render a single row, padding every cell to its column width.
fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    format!(
        "| {} |",
        cells
            .zip(widths)
            .map(|(cell, width)| pad(cell, *width))
            .join(" | ")
    )
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{s}{}", " ".repeat(width.saturating_sub(len)))
}
