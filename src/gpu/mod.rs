// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! GPU utilization of a job's nodes, read from a Prometheus backend.
//!
//! The aggregator never aborts the report: any backend failure comes
//! back as `Err(GpuError)` for the caller to print.

pub mod nodelist;
pub mod prometheus;
pub mod types;

pub use nodelist::expand_nodelist;
pub use prometheus::Prometheus;
pub use types::{GpuError, MetricsBackend, NodeUsage, Series};

use tracing::debug;

use crate::config::Config;

/// Average utilization per node over `[start, end]` (unix seconds).
///
/// Samples are averaged with equal weight; timestamps are not used.
pub fn gpu_usage(
    backend: &dyn MetricsBackend,
    nodelist: &str,
    start: i64,
    end: i64,
    config: &Config,
) -> Result<Vec<NodeUsage>, GpuError> {
    let mut usage = Vec::new();

    for node in expand_nodelist(nodelist) {
        let query = config.gpu_query_for(&node);
        debug!("Querying GPU utilization for {} ({} .. {})", node, start, end);
        let series = backend.range_query(&query, start, end, config.gpu_step)?;
        let average = average(&series);
        usage.push(NodeUsage { node, average });
    }

    Ok(usage)
}

/// Arithmetic mean over every sample of every series, `None` without samples
fn average(series: &[Series]) -> Option<f64> {
    let samples: Vec<f64> = series.iter().flat_map(|s| s.samples()).collect();
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}
