// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Display formatters. Each receives the value and the whole reconciled
//! record, so a field can render from its siblings.

use super::parser::{format_byte_size, format_plain, parse_byte_size, split_tokens};
use super::types::{Record, Value};
use crate::hints::efficiency;

/// Durations whose day column is shared
const ALIGNED_DURATIONS: [&str; 3] = ["Timelimit", "Elapsed", "TotalCPU"];

pub fn format_value(value: &Value, _record: &Record) -> String {
    format_plain(value)
}

/// Drop a bare `COMPLETED` when other states are present, then append
/// the pending reason and dependencies.
pub fn format_state(value: &Value, record: &Record) -> String {
    let text = format_plain(value);
    let mut states = split_tokens(&text);
    if states.len() > 1 {
        states.retain(|s| *s != "COMPLETED");
    }

    let mut out = states.join(",");
    if !record.reason.is_empty() {
        out.push(' ');
        out.push_str(&record.reason);
    }
    if !record.dependencies.is_empty() {
        out.push_str(&format!(" ({})", record.dependencies));
    }
    out
}

/// Split `D-HH:MM:SS` into its day and clock parts.
fn split_days(text: &str) -> Option<(&str, &str)> {
    if !text.contains(':') {
        return None;
    }
    text.split_once('-')
}

fn day_width(record: &Record) -> usize {
    ALIGNED_DURATIONS
        .iter()
        .filter_map(|name| record.get(name))
        .filter_map(|v| split_days(&format_plain(v)).map(|(days, _)| days.len()))
        .max()
        .unwrap_or(0)
}

/// Duration right-aligned on a day column shared by limit, elapsed and CPU time.
pub fn format_walltime(value: &Value, record: &Record) -> String {
    let width = day_width(record);
    let text = format_plain(value);
    match split_days(&text) {
        Some((days, clock)) => format!("{:>width$}-{}", days, clock, width = width),
        None if width > 0 && text.contains(':') => format!("{}{}", " ".repeat(width + 1), text),
        None => text,
    }
}

/// CPU time with the job's efficiency appended.
pub fn format_cputime(value: &Value, record: &Record) -> String {
    let time = format_walltime(value, record);
    let cores = record.count("AllocCPUS");
    let wall = record.seconds("Elapsed");
    if cores == 0 || wall <= 0.0 {
        return time;
    }
    let cpu = record.seconds("TotalCPU");
    format!("{} (efficiency: {:5.2}%)", time, efficiency(cpu, cores, wall))
}

/// Share of the total CPU time, `--` when there is none.
pub fn format_cpu_share(value: &Value, record: &Record) -> String {
    let total = record.seconds("TotalCPU");
    let part = match value {
        Value::Seconds(s) => *s,
        _ => 0.0,
    };
    if total <= 0.0 {
        return "--".to_string();
    }
    format!("{:5.2}%", part / total * 100.0)
}

/// `4000Mc` -> `3.91G/core`, `8Gn` or `8G` -> `8.00G/node`
pub fn format_reqmem(value: &Value, _record: &Record) -> String {
    let text = format_plain(value);
    if text.is_empty() {
        return "--".to_string();
    }
    let (size, per) = match text.strip_suffix('c') {
        Some(size) => (size, "core"),
        None => (text.strip_suffix('n').unwrap_or(&text), "node"),
    };
    format!("{}/{}", format_byte_size(parse_byte_size(size)), per)
}

fn with_node(value: &Value, record: &Record, node_field: &str) -> String {
    let size = format_plain(value);
    let node = record.text(node_field);
    if node.is_empty() {
        size
    } else {
        format!("{} ({})", size, node)
    }
}

pub fn format_max_rss(value: &Value, record: &Record) -> String {
    with_node(value, record, "MaxRSSNode")
}

pub fn format_max_disk_write(value: &Value, record: &Record) -> String {
    with_node(value, record, "MaxDiskWriteNode")
}

pub fn format_max_disk_read(value: &Value, record: &Record) -> String {
    with_node(value, record, "MaxDiskReadNode")
}
