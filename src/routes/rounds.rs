use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::round::{
        ActiveRoundResponse, AddStrokeRequest, GoToHoleRequest, HoleView, RoundSummary,
        SetClubRequest, StartRoundRequest, StrokeView,
    },
    error::AppError,
    services::round_service,
    state::{SharedState, session::Session},
};

/// Round tracking endpoints of the signed-in user.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rounds/active", get(active_round).post(start_round))
        .route("/rounds/{id}", get(get_round).delete(delete_round))
        .route("/rounds/{id}/holes/{hole}", get(hole_view))
        .route("/rounds/{id}/holes/{hole}/commit", post(commit_hole))
        .route("/rounds/{id}/holes/{hole}/strokes", post(add_stroke))
        .route("/rounds/{id}/current-hole", post(go_to_hole))
        .route("/rounds/{id}/strokes/{stroke_id}/mental", post(toggle_mental))
        .route("/rounds/{id}/strokes/{stroke_id}/club", put(set_club))
        .route("/rounds/{id}/strokes/{stroke_id}", delete(delete_stroke))
        .route("/rounds/{id}/complete", post(complete_round))
}

/// Return the active round, if any.
#[utoipa::path(
    get,
    path = "/rounds/active",
    tag = "rounds",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    responses(
        (status = 200, description = "Active round or null", body = ActiveRoundResponse),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn active_round(session: Session) -> Result<Json<ActiveRoundResponse>, AppError> {
    let round = round_service::active_round(&session).await?;
    Ok(Json(ActiveRoundResponse { round }))
}

/// Start a round from a user course or from the home club layout.
#[utoipa::path(
    post,
    path = "/rounds/active",
    tag = "rounds",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    request_body = StartRoundRequest,
    responses(
        (status = 200, description = "Round started", body = RoundSummary),
        (status = 404, description = "Unknown course"),
        (status = 409, description = "A round is already active or no home club is set")
    )
)]
pub async fn start_round(
    State(state): State<SharedState>,
    session: Session,
    Json(payload): Json<StartRoundRequest>,
) -> Result<Json<RoundSummary>, AppError> {
    let round = round_service::start_round(&session, state.config(), payload).await?;
    Ok(Json(round))
}

#[utoipa::path(
    get,
    path = "/rounds/{id}",
    tag = "rounds",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Round identifier")
    ),
    responses(
        (status = 200, description = "Round", body = RoundSummary),
        (status = 404, description = "Unknown round")
    )
)]
/// One round of the session user.
pub async fn get_round(session: Session, Path(id): Path<Uuid>) -> Result<Json<RoundSummary>, AppError> {
    Ok(Json(round_service::get_round(&session, id).await?))
}

/// Delete a completed round with its holes and strokes.
#[utoipa::path(
    delete,
    path = "/rounds/{id}",
    tag = "rounds",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Round identifier")
    ),
    responses(
        (status = 204, description = "Round deleted"),
        (status = 409, description = "Round is still active")
    )
)]
pub async fn delete_round(session: Session, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    round_service::delete_round(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Strokes, par and commit state of one hole.
#[utoipa::path(
    get,
    path = "/rounds/{id}/holes/{hole}",
    tag = "rounds",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Round identifier"),
        ("hole" = u32, Path, description = "Hole number, starting at 1")
    ),
    responses(
        (status = 200, description = "Hole", body = HoleView),
        (status = 400, description = "Hole outside the round")
    )
)]
pub async fn hole_view(
    State(state): State<SharedState>,
    session: Session,
    Path((id, hole)): Path<(Uuid, u32)>,
) -> Result<Json<HoleView>, AppError> {
    let view = round_service::hole_view(&session, state.config(), id, hole).await?;
    Ok(Json(view))
}

/// Commit a hole so its strokes count toward statistics.
#[utoipa::path(
    post,
    path = "/rounds/{id}/holes/{hole}/commit",
    tag = "rounds",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Round identifier"),
        ("hole" = u32, Path, description = "Hole number, starting at 1")
    ),
    responses(
        (status = 204, description = "Hole committed"),
        (status = 409, description = "Round is complete")
    )
)]
pub async fn commit_hole(session: Session, Path((id, hole)): Path<(Uuid, u32)>) -> Result<StatusCode, AppError> {
    round_service::commit_hole(&session, id, hole).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a stroke at its canonical position within the hole.
#[utoipa::path(
    post,
    path = "/rounds/{id}/holes/{hole}/strokes",
    tag = "rounds",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Round identifier"),
        ("hole" = u32, Path, description = "Hole number, starting at 1")
    ),
    request_body = AddStrokeRequest,
    responses(
        (status = 200, description = "Stroke added", body = StrokeView),
        (status = 409, description = "Round is complete")
    )
)]
pub async fn add_stroke(
    session: Session,
    Path((id, hole)): Path<(Uuid, u32)>,
    Json(payload): Json<AddStrokeRequest>,
) -> Result<Json<StrokeView>, AppError> {
    Ok(Json(round_service::add_stroke(&session, id, hole, payload).await?))
}

/// Move to another hole, committing the hole being left when moving forward.
#[utoipa::path(
    post,
    path = "/rounds/{id}/current-hole",
    tag = "rounds",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Round identifier")
    ),
    request_body = GoToHoleRequest,
    responses(
        (status = 200, description = "Current hole updated", body = RoundSummary),
        (status = 400, description = "Hole outside the round"),
        (status = 409, description = "Round is complete")
    )
)]
pub async fn go_to_hole(
    session: Session,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<GoToHoleRequest>>,
) -> Result<Json<RoundSummary>, AppError> {
    let round = round_service::go_to_hole(&session, id, payload.hole_number).await?;
    Ok(Json(round))
}

#[utoipa::path(
    post,
    path = "/rounds/{id}/strokes/{stroke_id}/mental",
    tag = "rounds",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Round identifier"),
        ("stroke_id" = Uuid, Path, description = "Stroke identifier")
    ),
    responses((status = 200, description = "Mental focus flipped", body = StrokeView))
)]
/// Flip the mental focus flag of a stroke.
pub async fn toggle_mental(
    session: Session,
    Path((id, stroke_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<StrokeView>, AppError> {
    Ok(Json(round_service::toggle_mental(&session, id, stroke_id).await?))
}

#[utoipa::path(
    put,
    path = "/rounds/{id}/strokes/{stroke_id}/club",
    tag = "rounds",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Round identifier"),
        ("stroke_id" = Uuid, Path, description = "Stroke identifier")
    ),
    request_body = SetClubRequest,
    responses(
        (status = 200, description = "Club updated", body = StrokeView),
        (status = 404, description = "Unknown stroke or club")
    )
)]
/// Set or clear the club of a stroke.
pub async fn set_club(
    session: Session,
    Path((id, stroke_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SetClubRequest>,
) -> Result<Json<StrokeView>, AppError> {
    let stroke = round_service::set_club(&session, id, stroke_id, payload.club_id).await?;
    Ok(Json(stroke))
}

#[utoipa::path(
    delete,
    path = "/rounds/{id}/strokes/{stroke_id}",
    tag = "rounds",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Round identifier"),
        ("stroke_id" = Uuid, Path, description = "Stroke identifier")
    ),
    responses((status = 204, description = "Stroke deleted"))
)]
/// Delete a stroke without renumbering the hole.
pub async fn delete_stroke(
    session: Session,
    Path((id, stroke_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    round_service::delete_stroke(&session, id, stroke_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Commit the open hole and close the round.
#[utoipa::path(
    post,
    path = "/rounds/{id}/complete",
    tag = "rounds",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Round identifier")
    ),
    responses(
        (status = 200, description = "Round completed", body = RoundSummary),
        (status = 409, description = "Round already complete")
    )
)]
pub async fn complete_round(session: Session, Path(id): Path<Uuid>) -> Result<Json<RoundSummary>, AppError> {
    Ok(Json(round_service::complete_round(&session, id).await?))
}
