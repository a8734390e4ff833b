// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Prometheus range-query wire types and the backend seam.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("Request failed: {0}")]
    Request(#[from] ureq::Error),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Metrics backend error: {0}")]
    Backend(String),
}

/// A source of time series
pub trait MetricsBackend {
    /// Run `query` over `[start, end]` (unix seconds) at `step` seconds.
    fn range_query(&self, query: &str, start: i64, end: i64, step: u64) -> Result<Vec<Series>, GpuError>;
}

/// Body of `/api/v1/query_range`
#[derive(Debug, Deserialize)]
pub struct RangeResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<RangeData>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeData {
    #[serde(default)]
    pub result: Vec<Series>,
}

/// One matrix series: `[timestamp, "value"]` pairs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub values: Vec<(f64, String)>,
}

impl Series {
    /// Finite numeric sample values
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .filter_map(|(_, v)| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

/// Average GPU utilization of one node; `None` when it reported nothing
#[derive(Debug, Clone, PartialEq)]
pub struct NodeUsage {
    pub node: String,
    pub average: Option<f64>,
}
