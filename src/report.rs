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

//! Reporting of a run. All output of a run goes through a [`ReportSink`] that is passed to every
//! stage explicitly.

use std::string::FromUtf8Error;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;

use crate::{
    evaluator::{DeviceEvaluation, FailureIndex},
    table::render_org_table,
};

/// Width of the text inside a banner.
const BANNER_WIDTH: usize = 78;

/// Headers of the neighbor table.
const NEIGHBOR_TABLE_HEADERS: [&str; 4] = ["VRF", "Peer", "State", "Result"];

/// Receiver of the pre-formatted report of a run.
pub trait ReportSink {
    /// Report an informational message.
    fn info(&mut self, msg: &str);

    /// Report an error.
    fn error(&mut self, msg: &str);
}

/// Sink that forwards everything to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn info(&mut self, msg: &str) {
        log::info!("{msg}");
    }

    fn error(&mut self, msg: &str) {
        log::error!("{msg}");
    }
}

/// Draw a box around the message, with the message centered.
///
/// ```text
/// +------------------------------------------------------------------------------+
/// |                          Connecting to device 'R1'                           |
/// +------------------------------------------------------------------------------+
/// ```
pub fn banner(msg: impl AsRef<str>) -> String {
    let rule = format!("+{}+", "-".repeat(BANNER_WIDTH));
    let lines = msg
        .as_ref()
        .lines()
        .map(|l| format!("|{:^width$}|", l, width = BANNER_WIDTH));
    std::iter::once(rule.clone())
        .chain(lines)
        .chain(std::iter::once(rule))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the neighbor table of a single device.
pub fn device_table(device: &DeviceEvaluation) -> String {
    let rows = device
        .rows
        .iter()
        .map(|r| {
            [
                r.vrf.clone(),
                r.neighbor.clone(),
                r.state.clone(),
                r.verdict.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    render_org_table(NEIGHBOR_TABLE_HEADERS, &rows)
}

/// Dump the failure index as JSON, indented by three spaces.
pub fn failure_dump(failures: &FailureIndex) -> Result<String, DumpError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"   "));
    failures.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Error while dumping the failing neighbors.
#[derive(Debug, Error)]
pub enum DumpError {
    /// Cannot serialize the attributes
    #[error("Cannot serialize the failing neighbors: {0}")]
    Json(#[from] serde_json::Error),
    /// The serialized attributes are not valid UTF-8
    #[error("The dump of the failing neighbors is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}
