// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Tunables, built once at startup from the command line and environment.

use crate::record::parser::parse_byte_size;

pub const DEFAULT_MIN_WALLTIME: u64 = 180;
pub const DEFAULT_MIN_MEMORY: &str = "4G";
pub const DEFAULT_GPU_PARTITIONS: &str = "gpu,gpushort,gpumedium,gpulong";
pub const DEFAULT_NODE_CORES: u64 = 24;
pub const DEFAULT_PROMETHEUS_URL: &str = "http://localhost:9090/api/v1/query_range";
pub const DEFAULT_GPU_QUERY: &str = r#"DCGM_FI_DEV_GPU_UTIL{Hostname="{host}"}"#;
pub const DEFAULT_GPU_STEP: u64 = 60;
pub const DEFAULT_DOCS_URL: &str = "https://slurm.schedmd.com/sacct.html";

#[derive(Debug, Clone)]
pub struct Config {
    /// Jobs shorter than this (seconds) get no hints
    pub min_walltime: f64,
    /// Memory requests at or below this (bytes) get no memory hint
    pub min_memory: f64,
    /// Partitions where CPU efficiency is not a useful signal
    pub ignore_partitions: Vec<String>,
    /// Partitions whose nodes report GPU utilization
    pub gpu_partitions: Vec<String>,
    /// Cores of a full compute node
    pub node_cores: u64,
    /// Prometheus range-query endpoint
    pub prometheus_url: String,
    /// GPU utilization query, `{host}` is replaced by the node name
    pub gpu_query: String,
    /// Sampling step of the range query in seconds
    pub gpu_step: u64,
    /// Link printed below the hints
    pub docs_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_walltime: DEFAULT_MIN_WALLTIME as f64,
            min_memory: parse_byte_size(DEFAULT_MIN_MEMORY),
            ignore_partitions: split_list(DEFAULT_GPU_PARTITIONS),
            gpu_partitions: split_list(DEFAULT_GPU_PARTITIONS),
            node_cores: DEFAULT_NODE_CORES,
            prometheus_url: DEFAULT_PROMETHEUS_URL.to_string(),
            gpu_query: DEFAULT_GPU_QUERY.to_string(),
            gpu_step: DEFAULT_GPU_STEP,
            docs_url: DEFAULT_DOCS_URL.to_string(),
        }
    }
}

impl Config {
    pub fn is_ignored_partition(&self, partition: &str) -> bool {
        self.ignore_partitions.iter().any(|p| p == partition)
    }

    pub fn is_gpu_partition(&self, partition: &str) -> bool {
        self.gpu_partitions.iter().any(|p| p == partition)
    }

    /// GPU query for one node
    pub fn gpu_query_for(&self, host: &str) -> String {
        self.gpu_query.replace("{host}", host)
    }
}

/// Comma-separated list, blanks dropped
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
