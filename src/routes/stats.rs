use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};

use crate::{
    dto::stats::{DashboardResponse, HistoryQuery, HistoryResponse, SummaryResponse},
    error::AppError,
    services::{export_service, stats_service},
    state::{SharedState, session::Session},
};

const CSV_FILENAME: &str = "golf-brain-strokes.csv";

/// Statistics and export endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/stats/summary", get(summary))
        .route("/stats/dashboard", get(dashboard))
        .route("/stats/history", get(history))
        .route("/stats/export.csv", get(export_csv))
}

/// Focus and stroke count of the last completed rounds.
#[utoipa::path(
    get,
    path = "/stats/summary",
    tag = "stats",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    responses((status = 200, description = "Summary of recent rounds", body = SummaryResponse))
)]
pub async fn summary(State(state): State<SharedState>, session: Session) -> Result<Json<SummaryResponse>, AppError> {
    Ok(Json(stats_service::summary(&session, state.config()).await?))
}

/// Latest round against the prior ones, per stroke type and late in the round.
#[utoipa::path(
    get,
    path = "/stats/dashboard",
    tag = "stats",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    responses((status = 200, description = "Dashboard", body = DashboardResponse))
)]
pub async fn dashboard(
    State(state): State<SharedState>,
    session: Session,
) -> Result<Json<DashboardResponse>, AppError> {
    Ok(Json(stats_service::dashboard(&session, state.config()).await?))
}

#[utoipa::path(
    get,
    path = "/stats/history",
    tag = "stats",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Completed rounds", body = HistoryResponse),
        (status = 400, description = "Unknown course filter")
    )
)]
/// Completed rounds filtered by range and course, with highlights.
pub async fn history(
    State(state): State<SharedState>,
    session: Session,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    Ok(Json(stats_service::history(&session, state.config(), query).await?))
}

/// Counted strokes of every round as CSV.
#[utoipa::path(
    get,
    path = "/stats/export.csv",
    tag = "stats",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    responses((status = 200, description = "CSV export", content_type = "text/csv", body = String))
)]
pub async fn export_csv(session: Session) -> Result<impl IntoResponse, AppError> {
    let csv = export_service::export_csv(&session).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILENAME}\""),
            ),
        ],
        csv,
    ))
}
