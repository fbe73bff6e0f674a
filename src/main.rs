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

use std::{path::PathBuf, process::ExitCode};

use bgp_neighbors::{run, LogSink};
use clap::Parser;
use testbed::{LearnerRegistry, Testbed};

/// Verify that all BGP neighbors of all devices in the testbed are established.
#[derive(Debug, Parser)]
struct Cli {
    /// Testbed file (TOML) that lists all devices.
    #[clap(long = "testbed", short = 't', env = "BGP_TESTBED")]
    testbed: PathBuf,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = Cli::parse();

    let testbed = Testbed::from_file(&args.testbed)?;
    log::info!(
        "Loaded testbed {} with {} devices",
        testbed.name,
        testbed.devices.len()
    );

    let registry = LearnerRegistry::default();
    let mut sink = LogSink;

    let summary = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(testbed.devices(), &registry, &mut sink));

    log::info!("{}", summary.render());

    Ok(if summary.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
