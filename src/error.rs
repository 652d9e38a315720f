// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;

use thiserror::Error;

/// Failure of a single read against the property API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("{endpoint} did not answer within {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Transport { .. } => "transport",
            ApiError::Status { .. } => "status",
            ApiError::Decode { .. } => "decode",
            ApiError::Timeout { .. } => "timeout",
            ApiError::Config(_) => "config",
        }
    }
}

/// One endpoint that did not settle successfully during a dashboard load.
#[derive(Debug)]
pub struct FetchFailure {
    pub endpoint: &'static str,
    pub error: ApiError,
}

/// The only error the aggregation boundary reports. Transport, status and
/// decode failures are all collapsed into it; the detail rides along for
/// diagnostics.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("dashboard failed to load")]
    LoadFailed { failures: Vec<FetchFailure> },
}

impl DashboardError {
    pub fn failures(&self) -> &[FetchFailure] {
        match self {
            DashboardError::LoadFailed { failures } => failures,
        }
    }

    /// User-facing message with the failing endpoints appended.
    pub fn summary(&self) -> String {
        let names: Vec<&str> = self.failures().iter().map(|f| f.endpoint).collect();
        if names.is_empty() {
            self.to_string()
        } else {
            format!("{} ({})", self, names.join(", "))
        }
    }
}
