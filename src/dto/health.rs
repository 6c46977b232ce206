use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    /// No reachable store; every data route answers 503.
    Degraded,
}

/// Payload of the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
}

impl HealthResponse {
    pub fn from_degraded(degraded: bool) -> Self {
        let status = if degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Ok
        };
        Self { status }
    }
}
