use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use tracing::debug;

use crate::{
    dto::intake::{ContactRequest, InterestRequest, OkResponse},
    error::AppError,
    services::intake_service,
    state::SharedState,
};

/// Public form endpoints. No session is required.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/contact", post(contact))
        .route("/api/interest", post(interest))
}

fn payload<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        debug!(error = %rejection, "rejected form body");
        AppError::BadRequest("Invalid JSON".into())
    })
}

/// Store a contact form message.
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "intake",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message stored", body = OkResponse),
        (status = 400, description = "Invalid JSON or field", body = String, content_type = "text/plain"),
        (status = 500, description = "Store rejected the message", body = String, content_type = "text/plain")
    )
)]
pub async fn contact(
    State(state): State<SharedState>,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, AppError> {
    intake_service::submit_contact(&state, payload(body)?).await?;
    Ok(Json(OkResponse::ok()))
}

/// Register interest in a paid tier.
#[utoipa::path(
    post,
    path = "/api/interest",
    tag = "intake",
    request_body = InterestRequest,
    responses(
        (status = 200, description = "Interest stored", body = OkResponse),
        (status = 400, description = "Invalid JSON or field", body = String, content_type = "text/plain"),
        (status = 500, description = "Store rejected the signup", body = String, content_type = "text/plain")
    )
)]
pub async fn interest(
    State(state): State<SharedState>,
    body: Result<Json<InterestRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, AppError> {
    intake_service::register_interest(&state, payload(body)?).await?;
    Ok(Json(OkResponse::ok()))
}
