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

//! Connect to all devices of the testbed.

use testbed::Device;

use crate::report::{banner, ReportSink};

/// Devices that could be connected, and the failure message of all others.
#[derive(Debug)]
pub struct SetupOutcome<D> {
    /// Connected devices, in the order of the inventory.
    pub connected: Vec<D>,
    /// One message for each device that could not be connected.
    pub failures: Vec<String>,
}

impl<D> SetupOutcome<D> {
    /// Returns `true` if every device could be connected.
    pub fn all_connected(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Connect to all devices one after the other. A device that cannot be connected is reported and
/// skipped; the remaining devices are still connected.
pub async fn connect_devices<D: Device>(
    devices: impl IntoIterator<Item = D>,
    sink: &mut dyn ReportSink,
) -> SetupOutcome<D> {
    let mut connected = Vec::new();
    let mut failures = Vec::new();

    for mut device in devices {
        sink.info(&banner(format!("Connecting to device '{}'", device.name())));
        match device.connect().await {
            Ok(()) => connected.push(device),
            Err(e) => {
                let msg = format!(
                    "Failed to establish connection to '{}': {}",
                    device.name(),
                    e.source
                );
                sink.error(&msg);
                failures.push(msg);
            }
        }
    }

    if connected.is_empty() {
        log::warn!("Could not connect to any device!");
    }

    SetupOutcome {
        connected,
        failures,
    }
}
