// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Gathers every view of a job into one record and renders the report.
//!
//! External calls happen strictly in order: sacct, then sstat for a
//! running job the caller may inspect, then squeue for a pending job,
//! then one metrics query per GPU node.

use std::io::{self, Write};

use anyhow::{anyhow, Result};
use chrono::{Local, LocalResult, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, warn};

use crate::config::Config;
use crate::gpu::{gpu_usage, GpuError, MetricsBackend, NodeUsage};
use crate::hints::hints;
use crate::record::schema::{column_names, live_column_names};
use crate::record::{parse_rows, reconcile, Record};
use crate::slurm::{job_states, JobState, QueueStatus, Scheduler, DELIMITER};

/// Width of the label column
const LABEL_WIDTH: usize = 20;

/// Wrap width for hint text
const HINT_WIDTH: usize = 76;

/// Identity allowed to read live stats of any job
const PRIVILEGED_USER: &str = "root";

/// Everything needed to print one job
#[derive(Debug)]
pub struct Report {
    pub record: Record,
    /// `None` when the job has no GPU section at all
    pub gpu: Option<Result<Vec<NodeUsage>, GpuError>>,
    pub hints: Vec<String>,
}

/// Query the scheduler and fold all rows into one record.
pub fn collect(jobid: &str, scheduler: &dyn Scheduler, caller: &str) -> Result<Record> {
    let output = scheduler.accounting(jobid, &column_names())?;
    let mut rows = parse_rows(&output, DELIMITER, false);
    if rows.is_empty() {
        return Err(anyhow!("Job {} not found", jobid));
    }
    debug!("sacct returned {} rows for job {}", rows.len(), jobid);

    let mut record = reconcile(rows.clone())?;
    let states = job_states(record.text("State"));

    if states.contains(&JobState::Running) && may_inspect(&record, caller) {
        match scheduler.live_stats(jobid, &live_column_names()) {
            Ok(output) => {
                rows.extend(parse_rows(&output, DELIMITER, true));
                record = reconcile(rows)?;
            }
            Err(e) => warn!("Live statistics unavailable for job {}: {:#}", jobid, e),
        }
    }

    if states.contains(&JobState::Pending) {
        match scheduler.queue_status(jobid) {
            Ok(output) => {
                let status = QueueStatus::parse(&output);
                record.dependencies = status.dependencies;
                record.reason = status.reason;
            }
            Err(e) => warn!("Queue status unavailable for job {}: {:#}", jobid, e),
        }
    }

    Ok(record)
}

/// The owner and the privileged user may read live stats.
fn may_inspect(record: &Record, caller: &str) -> bool {
    caller == PRIVILEGED_USER || caller == record.text("User")
}

/// Collect the record, then derive the GPU section and hints from it.
pub fn build(
    jobid: &str,
    scheduler: &dyn Scheduler,
    metrics: &dyn MetricsBackend,
    caller: &str,
    config: &Config,
) -> Result<Report> {
    let record = collect(jobid, scheduler, caller)?;
    let gpu = gpu_section(&record, metrics, config);
    let hints = hints(&record, config);
    Ok(Report { record, gpu, hints })
}

fn gpu_section(
    record: &Record,
    metrics: &dyn MetricsBackend,
    config: &Config,
) -> Option<Result<Vec<NodeUsage>, GpuError>> {
    if !config.is_gpu_partition(record.text("Partition")) {
        return None;
    }
    let start = record.stamp("Start").map(unix_time)?;
    let end = record
        .stamp("End")
        .map(unix_time)
        .unwrap_or_else(|| Utc::now().timestamp());
    Some(gpu_usage(metrics, record.text("NodeList"), start, end, config))
}

/// sacct prints local wall-clock time
fn unix_time(stamp: NaiveDateTime) -> i64 {
    let resolved = Local.from_local_datetime(&stamp).map(|t| t.timestamp());
    let offset = Local.offset_from_utc_datetime(&stamp).local_minus_utc();
    resolve_unix_time(resolved, stamp, offset)
}

/// A time skipped by a DST jump is read with the offset in effect at
/// that instant.
fn resolve_unix_time(resolved: LocalResult<i64>, stamp: NaiveDateTime, offset: i32) -> i64 {
    resolved
        .earliest()
        .unwrap_or_else(|| stamp.and_utc().timestamp() - i64::from(offset))
}

/// Write the report to `out`; GPU failures go to `diag`.
pub fn render(report: &Report, config: &Config, out: &mut dyn Write, diag: &mut dyn Write) -> io::Result<()> {
    let record = &report.record;
    for (field, value) in record.fields() {
        if field.shown {
            writeln!(out, "{:<width$}: {}", field.description, (field.format)(value, record), width = LABEL_WIDTH)?;
        }
    }

    match &report.gpu {
        None => {}
        Some(Ok(usage)) => {
            for node in usage {
                match node.average {
                    Some(avg) => writeln!(out, "{:<width$}: {:.1}% ({})", "Average GPU usage", avg, node.node, width = LABEL_WIDTH)?,
                    None => writeln!(out, "{:<width$}: no metrics available ({})", "Average GPU usage", node.node, width = LABEL_WIDTH)?,
                }
            }
        }
        Some(Err(e)) => {
            writeln!(diag, "GPU usage could not be retrieved.")?;
            writeln!(diag, "{}", e)?;
        }
    }

    if !report.hints.is_empty() {
        render_hints(&report.hints, &config.docs_url, out)?;
    }
    Ok(())
}

fn render_hints(hints: &[String], docs_url: &str, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{:<width$}:", "Hints and tips", width = LABEL_WIDTH)?;
    for (i, hint) in hints.iter().enumerate() {
        let mut marker = format!("{:>2})", i + 1);
        for line in wrap(hint, HINT_WIDTH) {
            writeln!(out, "{} {}", marker, line)?;
            marker = "   ".to_string();
        }
    }
    writeln!(out, " *) For more information on these issues see:")?;
    writeln!(out, "    {}", docs_url)?;
    Ok(())
}

/// Greedy word wrap
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
