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

//! Normalized BGP operational state of a single device.
//!
//! A snapshot has the shape `instance -> vrf -> neighbor -> attributes`. Every level is optional
//! in the serialized form: a missing `instance`, `vrf` or `neighbor` key deserializes into an empty
//! map, such that a device without any BGP neighbor simply has no neighbors. All maps keep the
//! order in which entries were inserted (or appeared in the serialized form).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the routing instance that holds all VRFs.
pub const DEFAULT_INSTANCE: &str = "default";

/// Name of the VRF used by platforms that do not report VRFs.
pub const DEFAULT_VRF: &str = "default";

/// Attribute key that carries the session state of a neighbor.
pub const SESSION_STATE: &str = "session_state";

/// Raw attributes of a BGP neighbor, as produced by the state learner.
pub type NeighborAttributes = Map<String, Value>;

/// Point-in-time capture of the BGP state of a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BgpSnapshot {
    /// All routing instances, keyed by their name.
    #[serde(default)]
    pub instance: IndexMap<String, BgpInstance>,
}

/// A BGP routing instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BgpInstance {
    /// All VRFs of this instance, keyed by their name.
    #[serde(default)]
    pub vrf: IndexMap<String, BgpVrf>,
}

/// A single VRF with its BGP neighbors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BgpVrf {
    /// All neighbors, keyed by their address.
    #[serde(default)]
    pub neighbor: IndexMap<String, NeighborAttributes>,
}

impl BgpSnapshot {
    /// Parse a snapshot from its JSON representation.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Iterate over all VRFs of the default instance. A snapshot without a default instance has no
    /// VRFs.
    pub fn default_vrfs(&self) -> impl Iterator<Item = (&str, &BgpVrf)> {
        self.instance
            .get(DEFAULT_INSTANCE)
            .into_iter()
            .flat_map(|instance| instance.vrf.iter())
            .map(|(name, vrf)| (name.as_str(), vrf))
    }

    /// Get a mutable reference to a VRF in the default instance, creating both the instance and the
    /// VRF if they do not exist yet.
    pub fn default_vrf_mut(&mut self, vrf: impl Into<String>) -> &mut BgpVrf {
        self.instance
            .entry(DEFAULT_INSTANCE.to_string())
            .or_default()
            .vrf
            .entry(vrf.into())
            .or_default()
    }

    /// Total number of neighbors over all VRFs of the default instance.
    pub fn num_neighbors(&self) -> usize {
        self.default_vrfs().map(|(_, vrf)| vrf.neighbor.len()).sum()
    }
}

impl BgpVrf {
    /// Iterate over all neighbors of that VRF.
    pub fn neighbors(&self) -> impl Iterator<Item = (&str, &NeighborAttributes)> {
        self.neighbor.iter().map(|(addr, attrs)| (addr.as_str(), attrs))
    }
}

/// Get the session state from the attributes of a neighbor. Returns `None` if the attribute is
/// missing or is not a string.
pub fn session_state(attrs: &NeighborAttributes) -> Option<&str> {
    attrs.get(SESSION_STATE).and_then(Value::as_str)
}
