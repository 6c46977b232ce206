use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the installed store and report whether requests can be served.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.store().await {
        Some(store) => {
            if let Err(err) = store.health_check().await {
                warn!(error = %err, "storage health check failed");
                state.update_degraded(true);
            }
        }
        None => warn!("storage unavailable (degraded mode)"),
    }

    HealthResponse::from_degraded(state.is_degraded())
}
