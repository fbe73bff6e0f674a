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

//! Learn the BGP state of Cisco NX-OS devices.

use lazy_static::lazy_static;
use regex::Regex;

use super::{summary::parse_neighbor_table, LearnError, ParseError, StateLearner};
use crate::snapshot::BgpSnapshot;

/// Learner for NX-OS, parsing the output of `show ip bgp summary vrf all`. The output contains one
/// section for each VRF:
///
/// ```text
/// BGP summary information for VRF default, address family IPv4 Unicast
/// BGP router identifier 1.0.0.1, local AS number 65535
/// ...
///
/// Neighbor        V    AS MsgRcvd MsgSent   TblVer  InQ OutQ Up/Down  State/PfxRcd
/// 1.0.1.1         4 65535     170     168       57    0    0 02:41:42 1
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NxosLearner;

impl StateLearner for NxosLearner {
    fn command(&self) -> &'static str {
        "ip bgp summary vrf all"
    }

    fn parse(&self, output: &str) -> Result<BgpSnapshot, LearnError> {
        lazy_static! {
            static ref SECTION_START: Regex =
                Regex::new(r"^BGP summary information for VRF (\S+), address family (.+)$")
                    .unwrap();
        }

        let output = output.replace("\r\n", "\n");
        if output.trim().is_empty() || output.contains("BGP process not running") {
            return Err(LearnError::NoBgpState);
        }

        // split the output into sections, one per VRF and address family.
        let mut sections: Vec<(&str, String)> = Vec::new();
        for line in output.lines() {
            if let Some(c) = SECTION_START.captures(line.trim()) {
                let vrf = c.get(1).map_or("", |m| m.as_str());
                log::trace!(
                    "Found VRF {vrf}, address family {}",
                    c.get(2).map_or("", |m| m.as_str())
                );
                sections.push((vrf, String::new()));
            } else if let Some((_, text)) = sections.last_mut() {
                text.push_str(line);
                text.push('\n');
            } else if !line.trim().is_empty() {
                log::warn!("Invalid preamble line when parsing BGP summary:\n{}", output);
                return Err(ParseError::InvalidPreamble(line.to_string()).into());
            }
        }

        let mut snapshot = BgpSnapshot::default();
        for (vrf, text) in sections {
            let neighbors = parse_neighbor_table(&text)?;
            snapshot.default_vrf_mut(vrf).neighbor.extend(neighbors);
        }
        Ok(snapshot)
    }
}
