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

//! Module for parsing whitespace-separated tables printed by network operating systems.

use itertools::Itertools;
use thiserror::Error;

pub struct Assert<const N: usize>;
impl<const N: usize> Assert<N> {
    pub const NON_ZERO: usize = N - 1;
}

/// Parse a table using the given header field names. The first line must be the table header.
/// Every non-empty line afterwards is split at whitespace into exactly `N` cells. The last cell
/// takes the remainder of the line, such that it may contain spaces (like `Idle (Admin)`).
///
/// A row that consists of a single word is joined with the next row. Devices print long
/// addresses (e.g., IPv6 neighbors) on a line of their own, followed by the remaining columns.
pub fn parse_table<'a, const N: usize>(
    table: &'a str,
    headers: [&'static str; N],
) -> Result<Vec<[String; N]>, TableParseError> {
    // make sure that N is at least 1.
    _ = Assert::<N>::NON_ZERO;

    let mut lines = table.lines();
    let header = lines
        .next()
        .ok_or_else(|| TableParseError::InvalidHeader(String::new()))?;

    if header.split_whitespace().join(" ") != headers.iter().join(" ") {
        return Err(TableParseError::InvalidHeader(header.to_string()));
    }

    let mut results = Vec::new();
    let mut wrapped: Option<&'a str> = None;
    for row in lines.map(str::trim).filter(|l| !l.is_empty()) {
        if N > 1 && wrapped.is_none() && row.split_whitespace().count() == 1 {
            wrapped = Some(row);
            continue;
        }
        let row = match wrapped.take() {
            Some(first) => format!("{first} {row}"),
            None => row.to_string(),
        };
        results.push(split_row(&row)?);
    }

    if let Some(first) = wrapped {
        return Err(TableParseError::RowTooShort(first.to_string()));
    }

    Ok(results)
}

/// Split a single row into `N` cells.
fn split_row<const N: usize>(row: &str) -> Result<[String; N], TableParseError> {
    let mut cells: [String; N] = std::array::from_fn(|_| String::new());
    let mut rest = row.trim();
    for cell in cells.iter_mut().take(N - 1) {
        let end = rest
            .find(char::is_whitespace)
            .ok_or_else(|| TableParseError::RowTooShort(row.to_string()))?;
        *cell = rest[..end].to_string();
        rest = rest[end..].trim_start();
    }
    if rest.is_empty() {
        return Err(TableParseError::RowTooShort(row.to_string()));
    }
    cells[N - 1] = rest.to_string();
    Ok(cells)
}

/// Error while parsing a table
#[derive(Debug, Error)]
pub enum TableParseError {
    /// Invalid header line.
    #[error("Invalid header line: {0}")]
    InvalidHeader(String),
    /// A row has fewer cells than the header.
    #[error("A row is too short to be parsed: {0}")]
    RowTooShort(String),
}
