// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Derived metrics and the advisory hints computed from them.

use crate::config::Config;
use crate::record::parser::{format_byte_size, parse_byte_size};
use crate::record::Record;

/// CPU efficiency below this percentage produces a hint
const LOW_EFFICIENCY: f64 = 75.0;

/// Peak memory below this fraction of the request produces a hint
const LOW_MEMORY_FRACTION: f64 = 0.5;

/// Percentage of the requested cores kept busy over the wall time.
///
/// Zero when cores or wall time are zero.
pub fn efficiency(cpu_seconds: f64, cores: u64, wall_seconds: f64) -> f64 {
    if cores == 0 || wall_seconds <= 0.0 {
        return 0.0;
    }
    100.0 * cpu_seconds / (cores as f64 * wall_seconds)
}

/// Convert a `ReqMem` value into bytes per node.
///
/// A trailing `c` means per core and is scaled by `cores_per_node`;
/// `n` or no suffix means per node.
pub fn requested_memory(reqmem: &str, cores_per_node: f64) -> f64 {
    let reqmem = reqmem.trim();
    match reqmem.strip_suffix('c') {
        Some(size) => parse_byte_size(size) * cores_per_node,
        None => parse_byte_size(reqmem.strip_suffix('n').unwrap_or(reqmem)),
    }
}

/// How badly the requested cores were used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuVerdict {
    /// A single core spent most of its time waiting
    SingleCoreLow,
    /// Several cores requested but at most one was busy
    NotParallel,
    /// Several cores requested and only some were busy
    Underused,
}

/// Classify a job with below-threshold efficiency, `None` otherwise.
pub fn classify_cpu(efficiency: f64, cores: u64) -> Option<CpuVerdict> {
    if efficiency >= LOW_EFFICIENCY {
        return None;
    }
    if cores <= 1 {
        Some(CpuVerdict::SingleCoreLow)
    } else if efficiency <= 100.0 / cores as f64 {
        Some(CpuVerdict::NotParallel)
    } else {
        Some(CpuVerdict::Underused)
    }
}

impl CpuVerdict {
    pub fn advice(self, efficiency: f64) -> String {
        match self {
            CpuVerdict::SingleCoreLow => format!(
                "The program efficiency is low ({:.1}%). Your program spends a lot of time \
                 waiting. Check the file input and output pattern of your application.",
                efficiency
            ),
            CpuVerdict::NotParallel => format!(
                "The program efficiency is very low ({:.1}%). Your program does not seem to \
                 run in parallel. Check the documentation of the program to see how to make \
                 it use multiple cores. If it cannot, stop requesting multiple cores.",
                efficiency
            ),
            CpuVerdict::Underused => format!(
                "The program efficiency is low ({:.1}%). Your program is not using the \
                 requested cores effectively. Check whether it is configured to use all of \
                 them, and check its file input and output pattern.",
                efficiency
            ),
        }
    }
}

/// Run every hint rule against a finished job.
///
/// Returns nothing while the job has no end time, used no CPU, ran
/// shorter than the configured minimum or sits in an ignored partition.
pub fn hints(record: &Record, config: &Config) -> Vec<String> {
    let cpu = record.seconds("TotalCPU");
    let wall = record.seconds("Elapsed");

    if record.stamp("End").is_none()
        || cpu <= 0.0
        || wall < config.min_walltime
        || config.is_ignored_partition(record.text("Partition"))
    {
        return Vec::new();
    }

    let mut out = Vec::new();
    out.extend(cpu_hint(record));
    out.extend(memory_hint(record, config));
    out
}

fn cpu_hint(record: &Record) -> Option<String> {
    let cores = record.count("AllocCPUS");
    let eff = efficiency(record.seconds("TotalCPU"), cores, record.seconds("Elapsed"));
    classify_cpu(eff, cores).map(|verdict| verdict.advice(eff))
}

fn memory_hint(record: &Record, config: &Config) -> Option<String> {
    let nodes = record.count("NNodes").max(1) as f64;
    let cores_per_node = record.count("AllocCPUS") as f64 / nodes;
    let requested = requested_memory(record.text("ReqMem"), cores_per_node);
    let used = record.bytes("MaxRSS");

    // full-node jobs get the node's memory whether they asked or not
    if requested <= config.min_memory || cores_per_node >= config.node_cores as f64 {
        return None;
    }
    if used >= requested * LOW_MEMORY_FRACTION {
        return None;
    }

    Some(format!(
        "You requested much more memory ({} per node) than your program used ({}). \
         Reduce the amount of requested memory.",
        format_byte_size(requested),
        format_byte_size(used)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::schema::{index_of, parse_row, FIELDS};
    use crate::record::reconcile;

    fn finished_job(pairs: &[(&str, &str)]) -> Record {
        let mut columns = vec![""; FIELDS.len()];
        columns[index_of("End").unwrap()] = "2024-01-01T11:00:00";
        columns[index_of("Partition").unwrap()] = "regular";
        columns[index_of("NNodes").unwrap()] = "1";
        for (name, value) in pairs {
            columns[index_of(name).unwrap()] = *value;
        }
        reconcile(vec![parse_row(&columns)]).unwrap()
    }

    #[test]
    fn test_efficiency() {
        assert_eq!(efficiency(3600.0, 2, 3600.0), 50.0);
        assert_eq!(efficiency(3600.0, 0, 3600.0), 0.0);
        assert_eq!(efficiency(3600.0, 4, 0.0), 0.0);
    }

    #[test]
    fn test_requested_memory() {
        let gib = 1024f64.powi(3);
        assert_eq!(requested_memory("1Gc", 8.0), 8.0 * gib);
        assert_eq!(requested_memory("16Gn", 8.0), 16.0 * gib);
        assert_eq!(requested_memory("16G", 8.0), 16.0 * gib);
        assert_eq!(requested_memory("", 8.0), 0.0);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify_cpu(75.0, 1), None);
        assert_eq!(classify_cpu(74.9, 1), Some(CpuVerdict::SingleCoreLow));
        assert_eq!(classify_cpu(25.0, 4), Some(CpuVerdict::NotParallel));
        assert_eq!(classify_cpu(25.1, 4), Some(CpuVerdict::Underused));
    }

    #[test]
    fn test_non_parallel_job() {
        let record = finished_job(&[
            ("AllocCPUS", "4"),
            ("TotalCPU", "00:06:40"),
            ("Elapsed", "00:06:40"),
        ]);
        let found = hints(&record, &Config::default());
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("does not seem to run in parallel"));
    }

    #[test]
    fn test_single_core_low_efficiency() {
        let record = finished_job(&[
            ("AllocCPUS", "1"),
            ("TotalCPU", "00:30:00"),
            ("Elapsed", "01:00:00"),
        ]);
        let found = hints(&record, &Config::default());
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("efficiency is low (50.0%)"));
        assert!(found[0].contains("input and output pattern"));
    }

    #[test]
    fn test_efficient_job_is_silent() {
        let record = finished_job(&[
            ("AllocCPUS", "2"),
            ("TotalCPU", "01:50:00"),
            ("Elapsed", "01:00:00"),
        ]);
        assert!(hints(&record, &Config::default()).is_empty());
    }

    #[test]
    fn test_skip_conditions() {
        let config = Config::default();
        let short = finished_job(&[("AllocCPUS", "1"), ("TotalCPU", "00:00:10"), ("Elapsed", "00:01:00")]);
        assert!(hints(&short, &config).is_empty());

        let gpu = finished_job(&[
            ("AllocCPUS", "1"),
            ("TotalCPU", "00:10:00"),
            ("Elapsed", "01:00:00"),
            ("Partition", "gpu"),
        ]);
        assert!(hints(&gpu, &config).is_empty());

        let running = finished_job(&[
            ("AllocCPUS", "1"),
            ("TotalCPU", "00:10:00"),
            ("Elapsed", "01:00:00"),
            ("End", "Unknown"),
        ]);
        assert!(hints(&running, &config).is_empty());

        let idle = finished_job(&[("AllocCPUS", "1"), ("Elapsed", "01:00:00")]);
        assert!(hints(&idle, &config).is_empty());
    }

    #[test]
    fn test_memory_hint() {
        let config = Config::default();
        let wasteful = finished_job(&[
            ("AllocCPUS", "4"),
            ("TotalCPU", "04:00:00"),
            ("Elapsed", "01:00:00"),
            ("ReqMem", "4Gc"),
            ("MaxRSS", "1G"),
        ]);
        let found = hints(&wasteful, &config);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("16.00G per node"));

        let frugal = finished_job(&[
            ("AllocCPUS", "4"),
            ("TotalCPU", "04:00:00"),
            ("Elapsed", "01:00:00"),
            ("ReqMem", "1Gc"),
            ("MaxRSS", "100M"),
        ]);
        assert!(hints(&frugal, &config).is_empty());

        let full_node = finished_job(&[
            ("AllocCPUS", "24"),
            ("TotalCPU", "24:00:00"),
            ("Elapsed", "01:00:00"),
            ("ReqMem", "128Gn"),
            ("MaxRSS", "1G"),
        ]);
        assert!(hints(&full_node, &config).is_empty());
    }

    #[test]
    fn test_memory_hint_thresholds() {
        let config = Config::default();
        let busy_job = |reqmem: &'static str, max_rss: &'static str| {
            finished_job(&[
                ("AllocCPUS", "4"),
                ("TotalCPU", "04:00:00"),
                ("Elapsed", "01:00:00"),
                ("ReqMem", reqmem),
                ("MaxRSS", max_rss),
            ])
        };

        // exactly half of the request is enough
        assert!(hints(&busy_job("8Gn", "4G"), &config).is_empty());

        let found = hints(&busy_job("8Gn", "3.9G"), &config);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("8.00G per node"));

        // a request at the floor itself is never flagged
        assert!(hints(&busy_job("4Gn", "100M"), &config).is_empty());
        assert_eq!(hints(&busy_job("4100Mn", "100M"), &config).len(), 1);
    }
}
