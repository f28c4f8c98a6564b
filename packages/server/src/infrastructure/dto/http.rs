//! HTTP response DTOs.

use serde::{Deserialize, Serialize};

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the server started
    pub uptime: f64,
}

impl HealthResponse {
    pub fn ok(uptime: f64) -> Self {
        Self {
            status: "ok".to_string(),
            uptime,
        }
    }
}
