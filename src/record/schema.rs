// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! The fixed field schema.
//!
//! Order here is both the column order requested from sacct/sstat and
//! the order of the rendered report.

use super::combine::{append, keep_first, numeric_max, time_max, time_min};
use super::format::{
    format_cpu_share, format_cputime, format_max_disk_read, format_max_disk_write, format_max_rss,
    format_reqmem, format_state, format_value, format_walltime,
};
use super::parser::{parse_bytes, parse_count, parse_limit, parse_seconds, parse_stamp, parse_text};
use super::types::{Record, Row, Value};

/// Binds a source column to how it is parsed, merged and shown.
pub struct Field {
    /// Column name as understood by sacct/sstat
    pub name: &'static str,
    pub parse: fn(&str) -> Value,
    pub combine: fn(Value, Value) -> Value,
    /// Included in the rendered report
    pub shown: bool,
    /// Only trustworthy from sstat while the job runs
    pub prefer_live: bool,
    pub format: fn(&Value, &Record) -> String,
    /// Report label
    pub description: &'static str,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish()
    }
}

const fn field(
    name: &'static str,
    parse: fn(&str) -> Value,
    combine: fn(Value, Value) -> Value,
    shown: bool,
    prefer_live: bool,
    format: fn(&Value, &Record) -> String,
    description: &'static str,
) -> Field {
    Field {
        name,
        parse,
        combine,
        shown,
        prefer_live,
        format,
        description,
    }
}

pub static FIELDS: &[Field] = &[
    field("JobID", parse_text, keep_first, true, false, format_value, "Job ID"),
    field("JobName", parse_text, keep_first, true, false, format_value, "Name"),
    field("User", parse_text, keep_first, true, false, format_value, "User"),
    field("Partition", parse_text, keep_first, true, false, format_value, "Partition"),
    field("NodeList", parse_text, append, true, false, format_value, "Nodes"),
    field("NNodes", parse_count, numeric_max, true, false, format_value, "Number of Nodes"),
    field("AllocCPUS", parse_count, numeric_max, true, false, format_value, "Cores"),
    field("NTasks", parse_count, numeric_max, true, false, format_value, "Number of Tasks"),
    field("State", parse_text, append, true, false, format_state, "State"),
    field("Submit", parse_stamp, keep_first, true, false, format_value, "Submit"),
    field("Start", parse_stamp, time_min, true, false, format_value, "Start"),
    field("End", parse_stamp, time_max, true, false, format_value, "End"),
    field("Timelimit", parse_limit, time_max, true, false, format_walltime, "Reserved walltime"),
    field("Elapsed", parse_seconds, numeric_max, true, false, format_walltime, "Used walltime"),
    field("TotalCPU", parse_seconds, numeric_max, true, true, format_cputime, "Used CPU time"),
    field("UserCPU", parse_seconds, numeric_max, true, false, format_cpu_share, "% User (Computation)"),
    field("SystemCPU", parse_seconds, numeric_max, true, false, format_cpu_share, "% System (I/O)"),
    field("ReqMem", parse_text, keep_first, true, false, format_reqmem, "Mem reserved"),
    field("MaxRSS", parse_bytes, numeric_max, true, true, format_max_rss, "Max Mem used"),
    field("MaxRSSNode", parse_text, keep_first, false, true, format_value, "Max Mem used node"),
    field("MaxDiskWrite", parse_bytes, numeric_max, true, true, format_max_disk_write, "Max Disk Write"),
    field("MaxDiskWriteNode", parse_text, keep_first, false, true, format_value, "Max Disk Write node"),
    field("MaxDiskRead", parse_bytes, numeric_max, true, true, format_max_disk_read, "Max Disk Read"),
    field("MaxDiskReadNode", parse_text, keep_first, false, true, format_value, "Max Disk Read node"),
];

pub fn index_of(name: &str) -> Option<usize> {
    FIELDS.iter().position(|f| f.name == name)
}

/// Columns to request from the accounting source
pub fn column_names() -> Vec<&'static str> {
    FIELDS.iter().map(|f| f.name).collect()
}

/// Columns to request from the live-stats source
pub fn live_column_names() -> Vec<&'static str> {
    FIELDS.iter().filter(|f| f.prefer_live).map(|f| f.name).collect()
}

/// Every field parsed from empty input
pub fn empty_row() -> Row {
    FIELDS.iter().map(|f| (f.parse)("")).collect()
}

/// Parse one line of accounting output; missing trailing columns are empty.
pub fn parse_row(columns: &[&str]) -> Row {
    FIELDS
        .iter()
        .enumerate()
        .map(|(i, f)| (f.parse)(columns.get(i).copied().unwrap_or("")))
        .collect()
}

/// Parse one line of live-stats output, which carries only the
/// `prefer_live` columns; every other field gets its empty value.
pub fn parse_live_row(columns: &[&str]) -> Row {
    let mut row = empty_row();
    let mut live = columns.iter().copied();
    for (slot, field) in row.iter_mut().zip(FIELDS) {
        if field.prefer_live {
            *slot = (field.parse)(live.next().unwrap_or(""));
        }
    }
    row
}

/// Split command output into rows, skipping blank lines.
pub fn parse_rows(output: &str, delimiter: &str, live: bool) -> Vec<Row> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let columns: Vec<&str> = line.split(delimiter).collect();
            if live {
                parse_live_row(&columns)
            } else {
                parse_row(&columns)
            }
        })
        .collect()
}
