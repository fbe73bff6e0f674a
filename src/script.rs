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

//! The lifecycle of a single run: setup, testcase, and cleanup.
//!
//! A run consists of the following sections, executed in this order:
//!
//! 1. [`CONNECT`]: connect to all devices ([`connect_devices`]).
//! 2. [`LEARN_BGP`]: learn the BGP state of all connected devices ([`collect_snapshots`]).
//! 3. [`CHECK_BGP`]: evaluate and report the session state of all neighbors ([`check_bgp`]).
//! 4. [`CLEAN_UP`]: always executed, even if the testcase failed.
//!
//! If the BGP state cannot be learned, the run jumps directly to the cleanup, and [`CHECK_BGP`]
//! is [`SectionResult::Blocked`].

use std::{fmt, time::Duration};

use indexmap::IndexMap;
use itertools::Itertools;
use testbed::{BgpSnapshot, Device, LearnerRegistry};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{
    collect::collect_snapshots,
    evaluator::{evaluate, Evaluation},
    report::{banner, device_table, failure_dump, ReportSink},
    setup::connect_devices,
    table::render_org_table,
};

/// Name of the setup section.
pub const CONNECT: &str = "common_setup.connect";
/// Name of the section that learns the BGP state.
pub const LEARN_BGP: &str = "BgpNeighborsEstablished.learn_bgp";
/// Name of the section that checks the BGP state.
pub const CHECK_BGP: &str = "BgpNeighborsEstablished.check_bgp";
/// Name of the cleanup section.
pub const CLEAN_UP: &str = "common_cleanup.clean_up";

/// Reason of a passing check.
pub const ALL_ESTABLISHED: &str = "All BGP neighbors are established.";
/// Reason of a failing check.
pub const NOT_ALL_ESTABLISHED: &str = "Some BGP neighbors are not established.";

/// Result of a single section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionResult {
    /// The section succeeded.
    Passed,
    /// The section failed.
    Failed,
    /// The section was skipped, because an earlier section jumped to the cleanup.
    Blocked,
}

impl fmt::Display for SectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionResult::Passed => f.write_str("PASSED"),
            SectionResult::Failed => f.write_str("FAILED"),
            SectionResult::Blocked => f.write_str("BLOCKED"),
        }
    }
}

/// Outcome of a single section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOutcome {
    /// Name of the section, like `common_setup.connect`.
    pub name: &'static str,
    /// Result of the section
    pub result: SectionResult,
    /// Optional explanation of the result.
    pub reason: Option<String>,
}

impl SectionOutcome {
    /// Create a passing section without a reason.
    fn passed(name: &'static str) -> Self {
        Self {
            name,
            result: SectionResult::Passed,
            reason: None,
        }
    }

    /// Create a section with a result and a reason.
    fn with_reason(name: &'static str, result: SectionResult, reason: impl Into<String>) -> Self {
        Self {
            name,
            result,
            reason: Some(reason.into()),
        }
    }
}

/// Summary of an entire run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Time when the run was started.
    pub started: OffsetDateTime,
    /// Duration of the entire run.
    pub duration: Duration,
    /// Outcome of every section, in the order of execution.
    pub sections: Vec<SectionOutcome>,
    /// The evaluation, if the BGP state could be learned.
    pub evaluation: Option<Evaluation>,
}

impl RunSummary {
    /// Returns `true` if no section failed or was blocked.
    pub fn passed(&self) -> bool {
        self.sections
            .iter()
            .all(|s| s.result == SectionResult::Passed)
    }

    /// Get the outcome of a section by its name.
    pub fn section(&self, name: &str) -> Option<&SectionOutcome> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Render the summary of all sections as a table.
    pub fn render(&self) -> String {
        let started = self
            .started
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.started.to_string());
        let rows = self
            .sections
            .iter()
            .map(|s| {
                [
                    s.name.to_string(),
                    s.result.to_string(),
                    s.reason.clone().unwrap_or_default(),
                ]
            })
            .collect_vec();
        format!(
            "{}\nStarted at {started}, took {:.3}s\n{}",
            banner("Detailed Results"),
            self.duration.as_secs_f64(),
            render_org_table(["Section", "Result", "Reason"], &rows)
        )
    }
}

/// Execute the entire run on the given devices.
pub async fn run<D: Device>(
    devices: Vec<D>,
    registry: &LearnerRegistry,
    sink: &mut dyn ReportSink,
) -> RunSummary {
    let started = OffsetDateTime::now_local()
        .ok()
        .unwrap_or_else(OffsetDateTime::now_utc);
    let mut sections = Vec::new();
    let mut evaluation = None;

    // common setup
    let setup = connect_devices(devices, sink).await;
    sections.push(if setup.all_connected() {
        SectionOutcome::passed(CONNECT)
    } else {
        SectionOutcome::with_reason(CONNECT, SectionResult::Failed, setup.failures.join("\n"))
    });

    // testcase
    match collect_snapshots(&setup.connected, registry, sink).await {
        Ok(snapshots) => {
            sections.push(SectionOutcome::passed(LEARN_BGP));
            let (outcome, eval) = check_bgp(&snapshots, sink);
            sections.push(outcome);
            evaluation = Some(eval);
        }
        Err(e) => {
            sink.error(&e.to_string());
            sections.push(SectionOutcome::with_reason(
                LEARN_BGP,
                SectionResult::Failed,
                e.source.to_string(),
            ));
            sections.push(SectionOutcome::with_reason(
                CHECK_BGP,
                SectionResult::Blocked,
                format!("skipped by goto {CLEAN_UP}"),
            ));
        }
    }

    // common cleanup
    sink.info("Common Cleanup");
    sections.push(SectionOutcome::passed(CLEAN_UP));

    let finished = OffsetDateTime::now_local()
        .ok()
        .unwrap_or_else(OffsetDateTime::now_utc);

    RunSummary {
        started,
        duration: (finished - started).try_into().unwrap_or_default(),
        sections,
        evaluation,
    }
}

/// Evaluate all snapshots, report one table per device, and dump the attributes of all failing
/// neighbors.
pub fn check_bgp(
    snapshots: &IndexMap<String, BgpSnapshot>,
    sink: &mut dyn ReportSink,
) -> (SectionOutcome, Evaluation) {
    let evaluation = evaluate(snapshots);

    for device in evaluation.devices.iter() {
        sink.info(&format!(
            "Device {} BGP Neighbors:\n{}",
            device.device,
            device_table(device)
        ));
    }

    if evaluation.passed() {
        let outcome = SectionOutcome::with_reason(CHECK_BGP, SectionResult::Passed, ALL_ESTABLISHED);
        return (outcome, evaluation);
    }

    match failure_dump(&evaluation.failures) {
        Ok(dump) => sink.error(&dump),
        Err(e) => sink.error(&e.to_string()),
    }
    let outcome = SectionOutcome::with_reason(CHECK_BGP, SectionResult::Failed, NOT_ALL_ESTABLISHED);
    (outcome, evaluation)
}
