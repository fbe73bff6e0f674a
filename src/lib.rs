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

//! # BgpNeighbors: Verify that all BGP sessions in a testbed are established
//!
//! This program connects to every device of a testbed, learns the BGP state of each device, and
//! checks that every BGP neighbor (in every VRF of the default instance) is in the `established`
//! state. The result is reported as one table per device. The raw attributes of every neighbor
//! that is not established are dumped as JSON.
//!
//! ## Structure
//! The source code of this program is structured as follows:
//! - The crate [`testbed`] contains the inventory ([`testbed::Testbed`]), the connection to the
//!   devices ([`testbed::Device`]), and the platform-specific learners that turn the output of
//!   the devices into a [`testbed::BgpSnapshot`].
//! - The module [`setup`] connects to all devices, isolating failures of individual devices.
//! - The module [`collect`] learns the BGP state of all connected devices.
//! - The module [`evaluator`] checks the session state of every neighbor and builds the
//!   [`evaluator::FailureIndex`].
//! - The modules [`report`] and [`table`] format the output of a run.
//! - The module [`script`] ties everything together into a single run ([`run`]).

#![deny(missing_docs, missing_debug_implementations, rust_2018_idioms)]

pub mod collect;
pub mod evaluator;
pub mod report;
pub mod script;
pub mod setup;
pub mod table;

#[cfg(test)]
mod test;

pub use evaluator::{evaluate, Evaluation, FailureIndex, Verdict};
pub use report::{LogSink, ReportSink};
pub use script::{run, RunSummary, SectionResult};
