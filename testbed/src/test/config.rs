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

use std::time::Duration;

use pretty_assertions::assert_eq;

use crate::{
    config::{ConfigError, Testbed},
    device::Device,
    learn::Platform,
};

#[test]
fn read_testbed() {
    let testbed: Testbed = include_str!("files/testbed.toml").parse().unwrap();
    assert_eq!(testbed.name, "lab");
    assert_eq!(testbed.connect_timeout, Duration::from_secs(5));

    let devices = testbed.devices();
    assert_eq!(
        devices
            .iter()
            .map(|d| (d.name(), d.platform(), d.properties().ssh_destination()))
            .collect::<Vec<_>>(),
        vec![
            ("R1", Platform::Nxos, "r1.lab"),
            ("R2", Platform::Iosxe, "admin@10.0.0.2"),
            ("R3", Platform::Nxos, "R3"),
        ]
    );
    assert!(devices.iter().all(|d| !d.is_connected()));
}

#[test]
fn default_values() {
    let testbed: Testbed = "[[device]]\nname = \"R1\"\nos = \"iosxe\"\n".parse().unwrap();
    assert_eq!(testbed.name, "testbed");
    assert_eq!(testbed.connect_timeout, Duration::from_secs(10));
}

#[test]
fn duplicate_device() {
    let testbed = "\
[[device]]
name = \"R1\"
os = \"nxos\"

[[device]]
name = \"R1\"
os = \"iosxe\"
";
    assert!(matches!(
        testbed.parse::<Testbed>(),
        Err(ConfigError::DuplicateDevice(name)) if name == "R1"
    ));
}

#[test]
fn no_devices() {
    assert!(matches!(
        "name = \"empty\"".parse::<Testbed>(),
        Err(ConfigError::NoDevices(name)) if name == "empty"
    ));
}

#[test]
fn unknown_platform() {
    assert!(matches!(
        "[[device]]\nname = \"R1\"\nos = \"junos\"\n".parse::<Testbed>(),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn zero_timeout() {
    assert!(matches!(
        "connect_timeout = 0\n[[device]]\nname = \"R1\"\nos = \"nxos\"\n".parse::<Testbed>(),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn missing_file() {
    assert!(matches!(
        Testbed::from_file("/nonexistent/testbed.toml"),
        Err(ConfigError::Io(_))
    ));
}
