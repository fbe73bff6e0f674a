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

//! This library describes a testbed of network devices, connects to them, and learns their BGP
//! operational state.
//!
//! # Configuration
//!
//! The testbed is described in a TOML file (see [`config`]). Each device has a name, the
//! network operating system it runs, and the SSH destination under which it can be reached. Make
//! sure that the SSH destination matches your `~/.ssh/config` file, and that the command `ssh
//! $destination` establishes the session without asking for a username or password.
//!
//! # Devices
//!
//! A [`device::Device`] is a handle to a network device. It starts disconnected, and
//! [`device::Device::connect`] establishes the management session. [`device::SshDevice`] reaches
//! the device using the system `ssh` client with a control master, such that every command reuses
//! the same connection.
//!
//! # Learning the BGP state
//!
//! A [`learn::StateLearner`] executes a show command on a device and parses the output into a
//! [`snapshot::BgpSnapshot`]. The learner is picked from the [`learn::LearnerRegistry`] based on
//! the [`learn::Platform`] of the device.
//!
//! ```text
//!  Testbed file ──► SshDevice ──connect──► SshSession
//!                      │
//!                      └──show──► StateLearner (per platform) ──► BgpSnapshot
//! ```

pub mod config;
pub mod device;
pub mod learn;
pub mod snapshot;
pub mod ssh;

#[cfg(test)]
mod test;

pub use config::{ConfigError, Testbed};
pub use device::{ConnectionError, Device, DeviceError, SshDevice};
pub use learn::{LearnError, LearnerRegistry, Platform, StateLearner};
pub use snapshot::BgpSnapshot;
