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

//! Handles to the devices of a testbed.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    config::DeviceProperties,
    learn::Platform,
    ssh::{SshError, SshSession},
};

/// A network device that can be connected to, and that can execute show commands.
#[async_trait]
pub trait Device: Send + Sync {
    /// Unique name of the device.
    fn name(&self) -> &str;

    /// Network operating system of the device.
    fn platform(&self) -> Platform;

    /// Whether a management session is established.
    fn is_connected(&self) -> bool;

    /// Establish the management session.
    async fn connect(&mut self) -> Result<(), ConnectionError>;

    /// Execute `show <cmd>` and return its output.
    async fn show(&self, cmd: &str) -> Result<String, DeviceError>;
}

/// A device reached over SSH.
///
/// **Warning** Make sure that the destination is properly configured in `~/.ssh/config`, such that
/// no password is required when logging in.
#[derive(Debug, Clone)]
pub struct SshDevice {
    props: DeviceProperties,
    connect_timeout: Duration,
    session: Option<SshSession>,
}

impl SshDevice {
    /// Create a new handle. This will not yet connect to the device.
    pub fn new(props: DeviceProperties, connect_timeout: Duration) -> Self {
        Self {
            props,
            connect_timeout,
            session: None,
        }
    }

    /// Get the properties of the device as written in the testbed file.
    pub fn properties(&self) -> &DeviceProperties {
        &self.props
    }
}

#[async_trait]
impl Device for SshDevice {
    fn name(&self) -> &str {
        &self.props.name
    }

    fn platform(&self) -> Platform {
        self.props.os
    }

    fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    async fn connect(&mut self) -> Result<(), ConnectionError> {
        if self.session.is_some() {
            log::debug!("[{}] already connected", self.name());
            return Ok(());
        }
        let session = SshSession::new(self.props.ssh_destination(), self.connect_timeout)
            .await
            .map_err(|source| ConnectionError {
                device: self.props.name.clone(),
                source,
            })?;
        log::debug!(
            "[{}] connected via {}",
            self.props.name,
            self.props.ssh_destination()
        );
        self.session = Some(session);
        Ok(())
    }

    async fn show(&self, cmd: &str) -> Result<String, DeviceError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| DeviceError::NotConnected(self.props.name.clone()))?;
        Ok(session.run(&["show", cmd]).await?)
    }
}

/// The management session to a device could not be established.
#[derive(Debug, Error)]
#[error("Cannot connect to {device}")]
pub struct ConnectionError {
    /// Name of the device
    pub device: String,
    /// Reason why the connection failed
    #[source]
    pub source: SshError,
}

/// Error while interacting with a connected device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device is not connected.
    #[error("Device {0} is not connected")]
    NotConnected(String),
    /// SSH error
    #[error("Session error: {0}")]
    Ssh(#[from] SshError),
}
