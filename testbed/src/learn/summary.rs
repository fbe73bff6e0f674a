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

//! Parse the neighbor table of `show ip bgp summary`, which looks the same on both NX-OS and
//! IOS-XE:
//!
//! ```text
//! Neighbor        V    AS MsgRcvd MsgSent   TblVer  InQ OutQ Up/Down  State/PfxRcd
//! 1.0.1.1         4 65535     170     168       57    0    0 02:41:42 1
//! 1.192.0.2       4     5     111     110        0    0    0 00:55:54 Idle
//! ```

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{table_parser::parse_table, ParseError};
use crate::snapshot::{NeighborAttributes, SESSION_STATE};

/// Columns of the neighbor table.
const COLUMNS: [&str; 10] = [
    "Neighbor",
    "V",
    "AS",
    "MsgRcvd",
    "MsgSent",
    "TblVer",
    "InQ",
    "OutQ",
    "Up/Down",
    "State/PfxRcd",
];

/// Attribute names for all columns except the first and the last one.
const ATTRIBUTES: [&str; 8] = [
    "version",
    "remote_as",
    "msg_rcvd",
    "msg_sent",
    "tbl_ver",
    "in_q",
    "out_q",
    "up_down",
];

/// Parse the neighbor table that is part of `text`. All lines before the table header are
/// ignored, and the table ends at the first empty line after it. If `text` contains no table, then
/// the result is empty.
pub(super) fn parse_neighbor_table(
    text: &str,
) -> Result<IndexMap<String, NeighborAttributes>, ParseError> {
    let Some(start) = find_header(text) else {
        return Ok(IndexMap::new());
    };
    let table = &text[start..];
    let table = match table.find("\n\n") {
        Some(end) => &table[..end],
        None => table,
    };

    let mut result = IndexMap::new();
    for row in parse_table(table, COLUMNS)? {
        let [neighbor, rest @ .., state] = row;
        let mut attrs = Map::new();
        attrs.insert("neighbor_id".to_string(), Value::String(neighbor.clone()));
        for (key, value) in ATTRIBUTES.iter().zip(rest) {
            attrs.insert(key.to_string(), number_or_string(value));
        }
        match state.parse::<u64>() {
            Ok(prefixes) => {
                attrs.insert(SESSION_STATE.to_string(), Value::from("established"));
                attrs.insert("prefixes_received".to_string(), Value::from(prefixes));
            }
            Err(_) => {
                attrs.insert(SESSION_STATE.to_string(), Value::from(state.to_lowercase()));
            }
        }
        if result.insert(neighbor.clone(), attrs).is_some() {
            log::warn!("Neighbor {neighbor} appears twice in the same table!");
        }
    }

    Ok(result)
}

/// Find the byte position of the table header.
fn find_header(text: &str) -> Option<usize> {
    let mut pos = 0;
    for line in text.split_inclusive('\n') {
        if line.split_whitespace().next() == Some(COLUMNS[0])
            && line.split_whitespace().last() == Some(COLUMNS[9])
        {
            return Some(pos);
        }
        pos += line.len();
    }
    None
}

/// Store numbers as JSON numbers, and everything else as strings.
fn number_or_string(s: String) -> Value {
    match s.parse::<u64>() {
        Ok(x) => Value::from(x),
        Err(_) => Value::String(s),
    }
}
