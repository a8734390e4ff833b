// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

use tracing::debug;

use super::types::{GpuError, MetricsBackend, RangeResponse, Series};

/// Blocking client for a Prometheus `query_range` endpoint
pub struct Prometheus {
    url: String,
}

impl Prometheus {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl MetricsBackend for Prometheus {
    fn range_query(&self, query: &str, start: i64, end: i64, step: u64) -> Result<Vec<Series>, GpuError> {
        debug!("GET {} query={}", self.url, query);
        let response = ureq::get(&self.url)
            .query("query", query)
            .query("start", start.to_string())
            .query("end", end.to_string())
            .query("step", step.to_string())
            .call()?;

        let body = response.into_body().read_to_string()?;
        parse_range_response(&body)
    }
}

/// Decode a range-query body into its series
pub fn parse_range_response(body: &str) -> Result<Vec<Series>, GpuError> {
    let parsed: RangeResponse = serde_json::from_str(body)?;
    if parsed.status != "success" {
        return Err(GpuError::Backend(
            parsed.error.unwrap_or_else(|| format!("status {}", parsed.status)),
        ));
    }
    Ok(parsed.data.map(|d| d.result).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = r#"{"status":"success","data":{"resultType":"matrix","result":[{"metric":{},"values":[[1,"3"]]}]}}"#;
        let series = parse_range_response(body).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].samples().collect::<Vec<_>>(), vec![3.0]);
    }

    #[test]
    fn test_parse_empty_result() {
        let body = r#"{"status":"success","data":{"resultType":"matrix","result":[]}}"#;
        assert!(parse_range_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_status() {
        let body = r#"{"status":"error","errorType":"bad_data","error":"invalid query"}"#;
        match parse_range_response(body) {
            Err(GpuError::Backend(msg)) => assert_eq!(msg, "invalid query"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_malformed_body() {
        assert!(matches!(parse_range_response("<html>"), Err(GpuError::Decode(_))));
    }
}
