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

//! This module learns the BGP state of devices. Each platform has its own [`StateLearner`] that
//! knows which command to execute and how to parse its output into a [`BgpSnapshot`]. The
//! [`LearnerRegistry`] maps each [`Platform`] to its learner.

use std::{collections::HashMap, fmt};

use async_trait::async_trait;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    device::{Device, DeviceError},
    snapshot::BgpSnapshot,
};

mod iosxe;
mod nxos;
mod summary;
pub(crate) mod table_parser;
pub use iosxe::IosxeLearner;
pub use nxos::NxosLearner;
pub use table_parser::TableParseError;

/// Network operating system of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Cisco NX-OS
    Nxos,
    /// Cisco IOS-XE
    Iosxe,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Nxos => f.write_str("nxos"),
            Platform::Iosxe => f.write_str("iosxe"),
        }
    }
}

/// Capability to learn the BGP state of a device.
#[async_trait]
pub trait StateLearner: Send + Sync {
    /// The show command (without the leading `show`) that reveals the BGP state.
    fn command(&self) -> &'static str;

    /// Parse the output of [`StateLearner::command`].
    fn parse(&self, output: &str) -> Result<BgpSnapshot, LearnError>;

    /// Execute the command on the device and parse its output.
    async fn learn(&self, device: &dyn Device) -> Result<BgpSnapshot, LearnError> {
        log::debug!("[{}] show {}", device.name(), self.command());
        let output = device.show(self.command()).await?;
        let snapshot = self.parse(&output)?;
        log::debug!(
            "[{}] learned {} BGP neighbors",
            device.name(),
            snapshot.num_neighbors()
        );
        Ok(snapshot)
    }
}

/// Dispatch table from platforms to their state learner.
pub struct LearnerRegistry {
    learners: HashMap<Platform, Box<dyn StateLearner>>,
}

impl LearnerRegistry {
    /// Create a registry without any learner.
    pub fn empty() -> Self {
        Self {
            learners: HashMap::new(),
        }
    }

    /// Register the learner for a platform, replacing the previous one.
    pub fn register(
        &mut self,
        platform: Platform,
        learner: impl StateLearner + 'static,
    ) -> &mut Self {
        if self.learners.insert(platform, Box::new(learner)).is_some() {
            log::debug!("Replaced the state learner for {platform}");
        }
        self
    }

    /// Get the learner for the given platform.
    pub fn learner(&self, platform: Platform) -> Result<&dyn StateLearner, LearnError> {
        match self.learners.get(&platform) {
            Some(learner) => Ok(learner.as_ref()),
            None => Err(LearnError::UnsupportedPlatform(platform)),
        }
    }
}

impl Default for LearnerRegistry {
    /// Registry containing the learners for all supported platforms.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(Platform::Nxos, NxosLearner)
            .register(Platform::Iosxe, IosxeLearner);
        registry
    }
}

impl fmt::Debug for LearnerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LearnerRegistry {{ {} }}",
            self.learners
                .iter()
                .map(|(p, l)| format!("{p}: show {}", l.command()))
                .sorted()
                .join(", ")
        )
    }
}

/// Error while learning the BGP state of a device.
#[derive(Debug, Error)]
pub enum LearnError {
    /// The device does not report any BGP state.
    #[error("The device reports no BGP state")]
    NoBgpState,
    /// There is no learner for the platform of the device.
    #[error("No state learner for platform {0}")]
    UnsupportedPlatform(Platform),
    /// Cannot execute the command on the device.
    #[error("{0}")]
    Device(#[from] DeviceError),
    /// Cannot parse the output of the command.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// Error while parsing the output of a device.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Cannot parse a table
    #[error("Table parse error: {0}")]
    TableParse(#[from] TableParseError),
    /// Invalid preamble before the table starts.
    #[error("Invalid Preamble before the table:\n{0}")]
    InvalidPreamble(String),
}
