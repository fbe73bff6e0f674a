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

//! Learn the BGP state of Cisco IOS-XE devices.

use super::{summary::parse_neighbor_table, LearnError, ParseError, StateLearner};
use crate::snapshot::{BgpSnapshot, DEFAULT_VRF};

/// Learner for IOS-XE, parsing the output of `show ip bgp summary`. IOS-XE only reports the
/// neighbors of the global routing table, which end up in the VRF `default`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IosxeLearner;

impl StateLearner for IosxeLearner {
    fn command(&self) -> &'static str {
        "ip bgp summary"
    }

    fn parse(&self, output: &str) -> Result<BgpSnapshot, LearnError> {
        let output = output.replace("\r\n", "\n");
        let output = output.trim();
        if output.is_empty() || output.starts_with("% BGP not active") {
            return Err(LearnError::NoBgpState);
        }
        if !output.starts_with("BGP router identifier") {
            log::warn!("Invalid preamble line when parsing BGP summary:\n{}", output);
            return Err(ParseError::InvalidPreamble(output.to_string()).into());
        }

        let mut snapshot = BgpSnapshot::default();
        let neighbors = parse_neighbor_table(output)?;
        snapshot.default_vrf_mut(DEFAULT_VRF).neighbor = neighbors;
        Ok(snapshot)
    }
}
