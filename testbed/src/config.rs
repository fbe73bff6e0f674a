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

//! This module contains the code for reading the testbed file.
//!
//! ```toml
//! name = "lab"
//! connect_timeout = 10
//!
//! [[device]]
//! name = "R1"
//! os = "nxos"
//! ssh = "r1.lab"
//!
//! [[device]]
//! name = "R2"
//! os = "iosxe"
//! ```

use std::{collections::HashSet, path::Path, str::FromStr, time::Duration};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::{device::SshDevice, learn::Platform};

/// Default time to wait for a device to answer the connection probe.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// The testbed, i.e., the inventory of all devices that should be checked.
#[derive(Debug, Clone, Deserialize)]
pub struct Testbed {
    /// Name of the testbed, only used for logging.
    #[serde(default = "default_name")]
    pub name: String,
    /// Time to wait for a device to answer the connection probe (in seconds).
    #[serde(
        default = "default_connect_timeout",
        deserialize_with = "deserialize_seconds"
    )]
    pub connect_timeout: Duration,
    /// All devices in the order in which they are connected and checked.
    #[serde(default, rename = "device")]
    pub devices: Vec<DeviceProperties>,
}

/// Properties of a single device.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceProperties {
    /// Unique name of the device.
    pub name: String,
    /// Network operating system running on the device.
    pub os: Platform,
    /// The ssh destination to reach the device. If omitted, the name is used.
    #[serde(default)]
    pub ssh: Option<String>,
}

impl DeviceProperties {
    /// SSH destination of the device.
    pub fn ssh_destination(&self) -> &str {
        self.ssh.as_deref().unwrap_or(&self.name)
    }
}

impl Testbed {
    /// Read and parse the testbed file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::debug!("Reading testbed file {}", path.display());
        std::fs::read_to_string(path)?.parse()
    }

    /// Create one (not yet connected) device handle for every device, in the order in which they
    /// appear in the testbed file.
    pub fn devices(&self) -> Vec<SshDevice> {
        self.devices
            .iter()
            .map(|props| SshDevice::new(props.clone(), self.connect_timeout))
            .collect()
    }
}

impl FromStr for Testbed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let testbed: Testbed = toml::from_str(s)?;
        if testbed.devices.is_empty() {
            return Err(ConfigError::NoDevices(testbed.name));
        }
        let mut seen = HashSet::new();
        for device in testbed.devices.iter() {
            if !seen.insert(device.name.as_str()) {
                return Err(ConfigError::DuplicateDevice(device.name.clone()));
            }
        }
        Ok(testbed)
    }
}

fn default_name() -> String {
    String::from("testbed")
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
}

fn deserialize_seconds<'de, D>(de: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(de)?;
    if secs == 0 {
        return Err(serde::de::Error::custom(
            "connect_timeout must be at least one second",
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Error while reading the testbed file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Cannot read the file
    #[error("Cannot read the testbed file: {0}")]
    Io(#[from] std::io::Error),
    /// Cannot parse the file
    #[error("Cannot parse the testbed file: {0}")]
    Toml(#[from] toml::de::Error),
    /// Two devices have the same name.
    #[error("Device {0} is defined twice!")]
    DuplicateDevice(String),
    /// The testbed does not contain any device.
    #[error("Testbed {0} has no devices!")]
    NoDevices(String),
}
