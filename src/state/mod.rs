/// Per-request authenticated session.
pub mod session;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::table_store::TableStore, error::ServiceError};

/// Shared handle to [`AppState`].
pub type SharedState = Arc<AppState>;

/// Central application state: the installed storage backend and runtime configuration.
pub struct AppState {
    store: RwLock<Option<Arc<dyn TableStore>>>,
    degraded: watch::Sender<bool>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            store: RwLock::new(None),
            degraded: degraded_tx,
            config,
        })
    }

    /// Build a state with `store` already installed and healthy.
    pub fn with_store(config: AppConfig, store: Arc<dyn TableStore>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(false);
        Arc::new(Self {
            store: RwLock::new(Some(store)),
            degraded: degraded_tx,
            config,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn TableStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Current store, or [`ServiceError::Degraded`] while none is installed or it is unhealthy.
    pub async fn require_store(&self) -> Result<Arc<dyn TableStore>, ServiceError> {
        if *self.degraded.borrow() {
            return Err(ServiceError::Degraded);
        }
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn set_store(&self, store: Arc<dyn TableStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }
}
