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

use pretty_assertions::assert_eq;
use serde_json::json;

use super::fakes::{snapshots, FakeDevice, MemorySink, ALL_ESTABLISHED, ONE_IDLE};
use crate::{
    collect::collect_snapshots,
    script::{
        check_bgp, run, SectionResult, ALL_ESTABLISHED as PASSED_REASON, CHECK_BGP, CLEAN_UP,
        CONNECT, LEARN_BGP, NOT_ALL_ESTABLISHED,
    },
    setup::connect_devices,
};
use testbed::{DeviceError, LearnError, LearnerRegistry, Platform};

fn results(summary: &crate::RunSummary) -> Vec<(&'static str, SectionResult)> {
    summary.sections.iter().map(|s| (s.name, s.result)).collect()
}

#[test_log::test(tokio::test)]
async fn all_established() {
    let devices = vec![
        FakeDevice::nxos("R1", ALL_ESTABLISHED),
        FakeDevice::nxos("R2", ALL_ESTABLISHED),
    ];
    let mut sink = MemorySink::default();
    let summary = run(devices, &LearnerRegistry::default(), &mut sink).await;

    assert!(summary.passed());
    assert_eq!(
        results(&summary),
        vec![
            (CONNECT, SectionResult::Passed),
            (LEARN_BGP, SectionResult::Passed),
            (CHECK_BGP, SectionResult::Passed),
            (CLEAN_UP, SectionResult::Passed),
        ]
    );
    assert_eq!(
        summary.section(CHECK_BGP).unwrap().reason.as_deref(),
        Some(PASSED_REASON)
    );
    assert!(sink.contains_info("Connecting to device 'R2'"));
    assert!(sink.contains_info("Gathering BGP Information from R1"));
    assert!(sink.contains_info("Device R2 BGP Neighbors:"));
    assert!(sink.contains_info("Common Cleanup"));
    assert!(sink.error.is_empty());
    assert_eq!(summary.evaluation.unwrap().num_neighbors(), 4);
}

#[test_log::test(tokio::test)]
async fn idle_neighbor() {
    let devices = vec![
        FakeDevice::nxos("R1", ALL_ESTABLISHED),
        FakeDevice::nxos("R2", ONE_IDLE),
    ];
    let mut sink = MemorySink::default();
    let summary = run(devices, &LearnerRegistry::default(), &mut sink).await;

    assert!(!summary.passed());
    let check = summary.section(CHECK_BGP).unwrap();
    assert_eq!(check.result, SectionResult::Failed);
    assert_eq!(check.reason.as_deref(), Some(NOT_ALL_ESTABLISHED));

    let eval = summary.evaluation.unwrap();
    assert_eq!(eval.failures.keys().collect::<Vec<_>>(), vec!["R2"]);
    assert_eq!(eval.failures["R2"].keys().collect::<Vec<_>>(), vec!["10.0.0.2"]);
    assert!(sink.contains_info("| default | 10.0.0.2 | Idle        | Failed   |"));
    assert!(sink.contains_error("\"session_state\": \"idle\""));
}

#[test_log::test(tokio::test)]
async fn unreachable_device_is_skipped() {
    let devices = vec![
        FakeDevice::nxos("R1", ALL_ESTABLISHED),
        FakeDevice::unreachable("R2"),
    ];
    let mut sink = MemorySink::default();
    let summary = run(devices, &LearnerRegistry::default(), &mut sink).await;

    assert!(!summary.passed());
    assert_eq!(
        results(&summary),
        vec![
            (CONNECT, SectionResult::Failed),
            (LEARN_BGP, SectionResult::Passed),
            (CHECK_BGP, SectionResult::Passed),
            (CLEAN_UP, SectionResult::Passed),
        ]
    );
    assert_eq!(
        sink.error,
        vec!["Failed to establish connection to 'R2': Timeout after 10s while establishing the session."]
    );
    assert!(!sink.contains_info("Gathering BGP Information from R2"));
    let eval = summary.evaluation.unwrap();
    assert_eq!(
        eval.devices.iter().map(|d| d.device.as_str()).collect::<Vec<_>>(),
        vec!["R1"]
    );
}

#[test_log::test(tokio::test)]
async fn failed_learning_jumps_to_cleanup() {
    let devices = vec![
        FakeDevice::nxos("R1", ALL_ESTABLISHED),
        FakeDevice::nxos("R2", "BGP process not running\n"),
        FakeDevice::nxos("R3", ALL_ESTABLISHED),
    ];
    let mut sink = MemorySink::default();
    let summary = run(devices, &LearnerRegistry::default(), &mut sink).await;

    assert!(!summary.passed());
    assert_eq!(
        results(&summary),
        vec![
            (CONNECT, SectionResult::Passed),
            (LEARN_BGP, SectionResult::Failed),
            (CHECK_BGP, SectionResult::Blocked),
            (CLEAN_UP, SectionResult::Passed),
        ]
    );
    assert!(summary.evaluation.is_none());
    assert!(sink.contains_error("Failed to learn BGP info from device R2"));
    assert!(!sink.contains_info("Gathering BGP Information from R3"));
    assert!(sink.contains_info("Common Cleanup"));
}

#[test_log::test(tokio::test)]
async fn unsupported_platform() {
    let mut device = FakeDevice::nxos("R1", ALL_ESTABLISHED);
    device.platform = Platform::Iosxe;
    let mut registry = LearnerRegistry::empty();
    registry.register(Platform::Nxos, testbed::learn::NxosLearner);

    let mut sink = MemorySink::default();
    let setup = connect_devices(vec![device], &mut sink).await;
    let err = collect_snapshots(&setup.connected, &registry, &mut sink)
        .await
        .unwrap_err();

    assert_eq!(err.device, "R1");
    assert!(matches!(
        err.source,
        LearnError::UnsupportedPlatform(Platform::Iosxe)
    ));
}

#[test_log::test(tokio::test)]
async fn no_devices() {
    let mut sink = MemorySink::default();
    let summary = run(Vec::<FakeDevice>::new(), &LearnerRegistry::default(), &mut sink).await;

    assert!(summary.passed());
    assert_eq!(summary.evaluation.unwrap().num_neighbors(), 0);
}

#[test_log::test]
fn check_reports_every_device() {
    let snapshots = snapshots([
        ("R1", json!({})),
        (
            "R2",
            json!({"instance": {"default": {"vrf": {"default": {"neighbor": {
                "10.0.0.9": {"session_state": "active"}
            }}}}}}),
        ),
    ]);
    let mut sink = MemorySink::default();
    let (outcome, eval) = check_bgp(&snapshots, &mut sink);

    assert_eq!(outcome.result, SectionResult::Failed);
    assert_eq!(eval.num_failures(), 1);
    assert!(sink.contains_info("Device R1 BGP Neighbors:"));
    assert!(sink.contains_info("Device R2 BGP Neighbors:"));
    assert_eq!(
        sink.error,
        vec!["{\n   \"R2\": {\n      \"10.0.0.9\": {\n         \"session_state\": \"active\"\n      }\n   }\n}"]
    );
}

#[test_log::test(tokio::test)]
async fn summary_table() {
    let devices = vec![FakeDevice::nxos("R1", ONE_IDLE)];
    let mut sink = MemorySink::default();
    let summary = run(devices, &LearnerRegistry::default(), &mut sink).await;
    let rendered = summary.render();

    assert!(rendered.contains("Detailed Results"));
    assert!(rendered.contains(&format!("| {CHECK_BGP} | FAILED   | {NOT_ALL_ESTABLISHED} |")));
    assert!(rendered.contains(&format!("| {CONNECT}")));
}

#[test_log::test(tokio::test)]
async fn summary_with_multiple_connection_failures() {
    let devices = vec![FakeDevice::unreachable("R1"), FakeDevice::unreachable("R2")];
    let mut sink = MemorySink::default();
    let summary = run(devices, &LearnerRegistry::default(), &mut sink).await;
    let rendered = summary.render();

    let table = rendered
        .lines()
        .skip_while(|l| !l.starts_with("| Section"))
        .collect::<Vec<_>>();
    // header, rule, two lines for the setup, and one line for each other section
    assert_eq!(table.len(), 7);
    assert!(table.iter().all(|l| l.starts_with('|') && l.ends_with('|')));
    assert!(table
        .iter()
        .all(|l| l.chars().count() == table[0].chars().count()));
    assert!(table[2].contains("Failed to establish connection to 'R1'"));
    assert!(table[3].contains("Failed to establish connection to 'R2'"));
}

#[test_log::test(tokio::test)]
async fn disconnected_device_is_not_learned() {
    let devices = vec![FakeDevice::nxos("R1", ALL_ESTABLISHED)];
    let mut sink = MemorySink::default();
    let err = collect_snapshots(&devices, &LearnerRegistry::empty(), &mut sink)
        .await
        .unwrap_err();

    assert_eq!(err.device, "R1");
    assert!(matches!(
        err.source,
        LearnError::Device(DeviceError::NotConnected(ref name)) if name == "R1"
    ));
}
