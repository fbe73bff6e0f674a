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

//! SSH sessions towards the devices of a testbed.
//!
//! A session does not keep a process alive by itself. Instead, every command spawns the system
//! `ssh` client, which reuses a control master socket (see [`CONTROL_ARGS`]).

use std::{process::Output, string::FromUtf8Error, time::Duration};

use itertools::Itertools;
use thiserror::Error;
use tokio::{process::Command, time::timeout};

/// Network operating systems print this banner on stderr before every command.
const ACCESS_BANNER: &str = "User Access Verification";

/// Arguments passed to every invocation of `ssh`.
pub const CONTROL_ARGS: [&str; 4] = [
    "-oControlMaster=auto",
    "-oControlPath=/tmp/.ssh-%r@%h:%p",
    "-oControlPersist=30m",
    "-oBatchMode=yes",
];

/// Word echoed by the remote end while connecting.
const PROBE: &str = "test";

/// SSH session with a single device.
///
/// **Warning** Make sure that the destination is properly configured in `~/.ssh/config`, such that
/// no password is required when logging in.
#[derive(Debug, Clone)]
pub struct SshSession {
    /// SSH destination host
    destination: String,
}

impl SshSession {
    /// Open a session to `destination`. The session is only returned once the remote end has
    /// echoed a probe within `connect_timeout`.
    ///
    /// ```rust,no_run
    /// use std::time::Duration;
    /// use testbed::ssh::SshSession;
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///
    /// let s = SshSession::new("r1.lab", Duration::from_secs(10)).await?;
    /// let output = s.run(&["show", "version"]).await?;
    /// println!("{output}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(
        destination: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, SshError> {
        let this = Self {
            destination: destination.into(),
        };
        log::trace!("[{}] connecting...", this.name());

        let answer = timeout(connect_timeout, this.run(&["echo", PROBE]))
            .await
            .map_err(|_| {
                log::error!("[{}] connection timeout!", this.name());
                SshError::Timeout(connect_timeout)
            })??;

        if answer.trim() != PROBE {
            log::error!("[{}] unexpected answer to the probe:\n{answer}", this.name());
            return Err(SshError::Setup(format!(
                "Expected `{PROBE}`, but got `{}`",
                answer.trim()
            )));
        }

        log::trace!("[{}] connection established!", this.name());
        Ok(this)
    }

    /// Get the destination of the session.
    pub fn name(&self) -> &str {
        &self.destination
    }

    /// Run a command on the remote end and return its stdout. The command fails if `ssh` exits
    /// with a non-zero code, or if the remote end writes anything but the access banner to
    /// stderr.
    pub async fn run(&self, args: &[&str]) -> Result<String, SshError> {
        let cmd_str = args.iter().join(" ");
        log::trace!("[{}] `{cmd_str}`", self.name());

        let output = Command::new("ssh")
            .args(CONTROL_ARGS)
            .arg(self.name())
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                log::error!("[{}] cannot spawn ssh for `{cmd_str}`: {e}", self.name());
                SshError::Client(e)
            })?;

        self.check_output(&cmd_str, output)
    }

    /// Check the exit code and stderr of a finished command.
    fn check_output(&self, cmd: &str, output: Output) -> Result<String, SshError> {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim().trim_start_matches(ACCESS_BANNER).trim();

        if !output.status.success() {
            log::error!(
                "[{}] `{cmd}` exited with code {:?}\nSTDERR:\n{stderr}",
                self.name(),
                output.status.code()
            );
            return Err(SshError::ExitCode {
                host: self.name().to_string(),
                cmd: cmd.to_string(),
                code: output.status.code(),
            });
        }

        if !stderr.is_empty() {
            log::trace!("[{}] `{cmd}` wrote to stderr:\n{stderr}", self.name());
            return Err(SshError::Stderr {
                host: self.name().to_string(),
                cmd: cmd.to_string(),
                stderr: stderr.to_string(),
            });
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}

/// Error kind returned by [`SshSession`].
#[derive(Debug, Error)]
pub enum SshError {
    /// The remote end did not answer the connection probe as expected.
    #[error("Error while establishing the connection: {0}")]
    Setup(String),
    /// Timeout while establishing the session
    #[error("Timeout after {0:?} while establishing the session.")]
    Timeout(Duration),
    /// Error while spawning the local `ssh` client
    #[error("SSH Client error: {0}")]
    Client(#[from] std::io::Error),
    /// The command exited with a non-zero code (or was killed by a signal).
    #[error("Command `{cmd}` on {host} exited with code {code:?}")]
    ExitCode {
        /// SSH destination
        host: String,
        /// The command that was executed
        cmd: String,
        /// Exit code, if any
        code: Option<i32>,
    },
    /// The command printed an error.
    #[error("Command `{cmd}` on {host} failed: {stderr}")]
    Stderr {
        /// SSH destination
        host: String,
        /// The command that was executed
        cmd: String,
        /// Everything printed to stderr, without the access banner
        stderr: String,
    },
    /// Cannot parse output as utf8
    #[error("Cannot parse output as UTF-8: {0}")]
    FromUtf8(#[from] FromUtf8Error),
}
