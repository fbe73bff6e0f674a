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

//! Evaluate the session state of all BGP neighbors.
//!
//! The evaluation walks every snapshot in the order `device -> vrf -> neighbor`, exactly in the
//! order in which the entries were inserted. Each neighbor results in exactly one
//! [`NeighborRow`]. A neighbor passes if and only if its session state is `established` (compared
//! case-insensitively). The raw attributes of every failing neighbor are stored in the
//! [`FailureIndex`].

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use testbed::snapshot::{session_state, BgpSnapshot, NeighborAttributes};

/// State that is assumed if a neighbor does not report any session state.
pub const UNKNOWN_STATE: &str = "Unknown";

/// The only session state that is accepted.
pub const ESTABLISHED: &str = "established";

/// Raw attributes of all failing neighbors, grouped by the device.
pub type FailureIndex = IndexMap<String, IndexMap<String, NeighborAttributes>>;

/// Verdict for a single BGP neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    /// The session is established.
    Passed,
    /// The session is in any other state.
    Failed,
}

impl Verdict {
    /// Classify a session state.
    pub fn from_state(state: &str) -> Self {
        if state.to_lowercase() == ESTABLISHED {
            Verdict::Passed
        } else {
            Verdict::Failed
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Passed => f.write_str("Passed"),
            Verdict::Failed => f.write_str("Failed"),
        }
    }
}

/// One row of the report table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborRow {
    /// Name of the VRF
    pub vrf: String,
    /// Address of the neighbor
    pub neighbor: String,
    /// Session state, capitalized for display (e.g., `Established`).
    pub state: String,
    /// Verdict of this neighbor.
    pub verdict: Verdict,
}

/// All rows of a single device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceEvaluation {
    /// Name of the device
    pub device: String,
    /// One row per neighbor, in the order of the snapshot.
    pub rows: Vec<NeighborRow>,
}

/// Result of evaluating all snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// Evaluated devices, in the order of the input.
    pub devices: Vec<DeviceEvaluation>,
    /// Attributes of all failing neighbors.
    pub failures: FailureIndex,
}

impl Evaluation {
    /// Returns `true` if no neighbor has failed. This is also true if there is no neighbor at all.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of evaluated neighbors.
    pub fn num_neighbors(&self) -> usize {
        self.devices.iter().map(|d| d.rows.len()).sum()
    }

    /// Total number of failing neighbors.
    pub fn num_failures(&self) -> usize {
        self.failures.values().map(IndexMap::len).sum()
    }
}

/// Evaluate the snapshots of all devices. The evaluation always runs over all devices; failures
/// of one device never stop the evaluation of the next one.
pub fn evaluate(snapshots: &IndexMap<String, BgpSnapshot>) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for (device, snapshot) in snapshots {
        let mut rows = Vec::new();
        for (vrf, neighbors) in snapshot.default_vrfs() {
            for (neighbor, attrs) in neighbors.neighbors() {
                let state = session_state(attrs).unwrap_or(UNKNOWN_STATE).to_lowercase();
                let verdict = Verdict::from_state(&state);

                if verdict == Verdict::Failed {
                    log::debug!("[{device}] neighbor {neighbor} in VRF {vrf} is {state}");
                    evaluation
                        .failures
                        .entry(device.clone())
                        .or_default()
                        .insert(neighbor.to_string(), attrs.clone());
                }

                rows.push(NeighborRow {
                    vrf: vrf.to_string(),
                    neighbor: neighbor.to_string(),
                    state: capitalize(&state),
                    verdict,
                });
            }
        }
        evaluation.devices.push(DeviceEvaluation {
            device: device.clone(),
            rows,
        });
    }

    evaluation
}

/// Make the first character upper-case and all others lower-case.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
