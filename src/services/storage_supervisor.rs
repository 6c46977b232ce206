use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{storage::StorageError, table_store::TableStore},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_FAILED_CHECKS: u32 = 3;

/// Connect to the store, keep polling its health and hold the shared state in degraded mode
/// while it is unreachable.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn TableStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                state.set_store(store.clone()).await;
                info!("storage connection established; leaving degraded mode");
                delay = INITIAL_DELAY;
                watch_health(&state, store.as_ref()).await;
                warn!("exhausted storage health checks; reconnecting");
            }
            Err(err) => {
                warn!(error = %err, "storage connection attempt failed");
            }
        }

        sleep(delay).await;
        delay = (delay * 2).min(MAX_DELAY);
    }
}

/// Poll `store` until it fails [`MAX_FAILED_CHECKS`] checks in a row.
async fn watch_health(state: &SharedState, store: &dyn TableStore) {
    let mut failures = 0;
    let mut retry_delay = INITIAL_DELAY;

    while failures < MAX_FAILED_CHECKS {
        match store.health_check().await {
            Ok(()) => {
                if state.is_degraded() {
                    info!("storage healthy again; leaving degraded mode");
                    state.update_degraded(false);
                }
                failures = 0;
                retry_delay = INITIAL_DELAY;
                sleep(HEALTH_POLL_INTERVAL).await;
            }
            Err(err) => {
                if failures == 0 {
                    warn!(error = %err, "storage health check failed; entering degraded mode");
                    state.update_degraded(true);
                } else {
                    warn!(attempt = failures, error = %err, "storage health check failed");
                }
                failures += 1;
                sleep(retry_delay).await;
                retry_delay = (retry_delay * 2).min(MAX_DELAY);
            }
        }
    }
}
