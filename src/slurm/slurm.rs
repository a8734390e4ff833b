// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Slurm CLI integration: query a job via sacct, sstat and squeue.

use std::process::Command;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

/// Column separator requested from sacct/sstat; never appears in a value
pub const DELIMITER: &str = "|#|";

/// The three read-only views the scheduler offers on a job
pub trait Scheduler {
    /// Accounting rows (job and steps), one line per row
    fn accounting(&self, jobid: &str, columns: &[&str]) -> Result<String>;

    /// Live samples of a running job's steps, one line per row
    fn live_stats(&self, jobid: &str, columns: &[&str]) -> Result<String>;

    /// `dependencies;reason` of a pending job
    fn queue_status(&self, jobid: &str) -> Result<String>;
}

/// Runs the real Slurm commands
pub struct SlurmCli;

impl Scheduler for SlurmCli {
    fn accounting(&self, jobid: &str, columns: &[&str]) -> Result<String> {
        let format = format!("--format={}", columns.join(","));
        let delimiter = format!("--delimiter={}", DELIMITER);
        run(
            "sacct",
            &[format.as_str(), "--parsable2", "--noheader", delimiter.as_str(), "-j", jobid],
        )
    }

    fn live_stats(&self, jobid: &str, columns: &[&str]) -> Result<String> {
        let format = format!("--format={}", columns.join(","));
        let delimiter = format!("--delimiter={}", DELIMITER);
        let steps = format!("{},{}.batch", jobid, jobid);
        run(
            "sstat",
            &[format.as_str(), "--parsable2", "--noheader", delimiter.as_str(), "-j", steps.as_str()],
        )
    }

    fn queue_status(&self, jobid: &str) -> Result<String> {
        run("squeue", &["--noheader", "--format=%E;%r", "-j", jobid])
    }
}

fn run(program: &str, args: &[&str]) -> Result<String> {
    debug!("Running {} {}", program, args.join(" "));
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute {}", program))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("{} failed: {}", program, stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
