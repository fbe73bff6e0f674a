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

//! Learn the BGP state of all connected devices.

use indexmap::IndexMap;
use testbed::{BgpSnapshot, Device, DeviceError, LearnError, LearnerRegistry};
use thiserror::Error;

use crate::report::{banner, ReportSink};

/// Learn the BGP snapshot of every device, using the learner registered for its platform. The
/// first device whose state cannot be learned (or that is not connected) aborts the collection.
pub async fn collect_snapshots<D: Device>(
    devices: &[D],
    registry: &LearnerRegistry,
    sink: &mut dyn ReportSink,
) -> Result<IndexMap<String, BgpSnapshot>, CollectError> {
    let mut snapshots = IndexMap::new();

    for device in devices {
        sink.info(&banner(format!(
            "Gathering BGP Information from {}",
            device.name()
        )));
        let snapshot = learn(device, registry)
            .await
            .map_err(|source| CollectError {
                device: device.name().to_string(),
                source,
            })?;
        snapshots.insert(device.name().to_string(), snapshot);
    }

    Ok(snapshots)
}

/// Learn the snapshot of a single device.
async fn learn<D: Device>(
    device: &D,
    registry: &LearnerRegistry,
) -> Result<BgpSnapshot, LearnError> {
    if !device.is_connected() {
        return Err(DeviceError::NotConnected(device.name().to_string()).into());
    }
    registry.learner(device.platform())?.learn(device).await
}

/// The BGP state of a device could not be learned.
#[derive(Debug, Error)]
#[error("Failed to learn BGP info from device {device}: {source}")]
pub struct CollectError {
    /// Name of the device
    pub device: String,
    /// Reason why the state could not be learned
    #[source]
    pub source: LearnError,
}
