//! Per-request session: the authenticated user and a store handle scoped to their token.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::{
    dao::table_store::TableStore,
    error::{AppError, ServiceError},
    state::SharedState,
};

/// Authenticated caller threaded explicitly into every repository and aggregator call.
#[derive(Clone)]
pub struct Session {
    user_id: Uuid,
    store: Arc<dyn TableStore>,
}

impl Session {
    /// Session for `user_id` whose requests go through `store`.
    pub fn new(user_id: Uuid, store: Arc<dyn TableStore>) -> Self {
        Self { user_id, store }
    }

    /// Authenticated user.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Store handle whose requests run as this user.
    pub fn store(&self) -> &dyn TableStore {
        self.store.as_ref()
    }

    /// Resolve `access_token` through `store`, returning `None` when the token is not valid.
    pub async fn resolve(
        store: &Arc<dyn TableStore>,
        access_token: &str,
    ) -> Result<Option<Self>, ServiceError> {
        let user = store.resolve_user(access_token).await?;
        Ok(user.map(|user_id| Session::new(user_id, store.scoped(access_token))))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<SharedState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            AppError::Unauthorized("missing bearer token in `Authorization` header".into())
        })?;

        let store = state.require_store().await?;
        Session::resolve(&store, token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid or expired session".into()))
    }
}
