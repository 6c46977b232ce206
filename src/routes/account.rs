use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::account::{
        BagClubView, CourseDetail, CourseView, CreateBagClubRequest, CreateCourseRequest,
        CreateMentalElementRequest, HomeClubView, MentalElementView, ReorderRequest,
        SaveHomeClubRequest, SetBsmRequest,
    },
    error::AppError,
    services::{bag_service, course_service, mental_element_service},
    state::{SharedState, session::Session},
};

/// Account configuration: bag, mental elements, home club and courses.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/account/bag", get(list_bag).post(add_club))
        .route("/account/bag/order", put(reorder_bag))
        .route("/account/bag/{id}/bsm", put(set_bsm))
        .route("/account/bag/{id}", delete(delete_club))
        .route(
            "/account/mental-elements",
            get(list_mental_elements).post(add_mental_element),
        )
        .route("/account/mental-elements/order", put(reorder_mental_elements))
        .route("/account/mental-elements/{id}", delete(delete_mental_element))
        .route("/account/home-club", get(get_home_club).put(save_home_club))
        .route("/account/courses", get(list_courses).post(create_course))
        .route("/account/courses/{id}", get(get_course).delete(delete_course))
        .route("/account/courses/{id}/default", post(set_default_course))
}

#[utoipa::path(
    get,
    path = "/account/bag",
    tag = "account",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    responses((status = 200, description = "Clubs in bag order", body = [BagClubView]))
)]
/// List the bag in order.
pub async fn list_bag(session: Session) -> Result<Json<Vec<BagClubView>>, AppError> {
    Ok(Json(bag_service::list_clubs(&session).await?))
}

/// Append a club to the bag.
#[utoipa::path(
    post,
    path = "/account/bag",
    tag = "account",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    request_body = CreateBagClubRequest,
    responses(
        (status = 200, description = "Club added", body = BagClubView),
        (status = 400, description = "Invalid label"),
        (status = 409, description = "Club already exists")
    )
)]
pub async fn add_club(
    session: Session,
    Valid(Json(payload)): Valid<Json<CreateBagClubRequest>>,
) -> Result<Json<BagClubView>, AppError> {
    Ok(Json(bag_service::create_club(&session, payload).await?))
}

#[utoipa::path(
    put,
    path = "/account/bag/order",
    tag = "account",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Clubs in their new order", body = [BagClubView]),
        (status = 400, description = "Ids do not match the bag")
    )
)]
/// Persist a new bag order.
pub async fn reorder_bag(
    session: Session,
    Valid(Json(payload)): Valid<Json<ReorderRequest>>,
) -> Result<Json<Vec<BagClubView>>, AppError> {
    Ok(Json(bag_service::reorder_clubs(&session, payload).await?))
}

/// Replace the best stroke memory note of a club.
#[utoipa::path(
    put,
    path = "/account/bag/{id}/bsm",
    tag = "account",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Club identifier")
    ),
    request_body = SetBsmRequest,
    responses((status = 204, description = "Note saved"), (status = 404, description = "Unknown club"))
)]
pub async fn set_bsm(
    session: Session,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<SetBsmRequest>>,
) -> Result<StatusCode, AppError> {
    bag_service::set_bsm(&session, id, payload.bsm).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/account/bag/{id}",
    tag = "account",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Club identifier")
    ),
    responses((status = 204, description = "Club removed"), (status = 404, description = "Unknown club"))
)]
/// Remove a club and repack the bag.
pub async fn delete_club(session: Session, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    bag_service::delete_club(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/account/mental-elements",
    tag = "account",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    responses((status = 200, description = "Mental elements in order", body = [MentalElementView]))
)]
/// List mental elements in order.
pub async fn list_mental_elements(session: Session) -> Result<Json<Vec<MentalElementView>>, AppError> {
    Ok(Json(mental_element_service::list_elements(&session).await?))
}

#[utoipa::path(
    post,
    path = "/account/mental-elements",
    tag = "account",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    request_body = CreateMentalElementRequest,
    responses(
        (status = 200, description = "Mental element added", body = MentalElementView),
        (status = 400, description = "Invalid label"),
        (status = 409, description = "Mental element already exists")
    )
)]
/// Append a mental element.
pub async fn add_mental_element(
    session: Session,
    Valid(Json(payload)): Valid<Json<CreateMentalElementRequest>>,
) -> Result<Json<MentalElementView>, AppError> {
    Ok(Json(mental_element_service::create_element(&session, payload).await?))
}

#[utoipa::path(
    put,
    path = "/account/mental-elements/order",
    tag = "account",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Mental elements in their new order", body = [MentalElementView]),
        (status = 400, description = "Ids do not match the list")
    )
)]
/// Persist a new mental element order.
pub async fn reorder_mental_elements(
    session: Session,
    Valid(Json(payload)): Valid<Json<ReorderRequest>>,
) -> Result<Json<Vec<MentalElementView>>, AppError> {
    Ok(Json(
        mental_element_service::reorder_elements(&session, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/account/mental-elements/{id}",
    tag = "account",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Mental element identifier")
    ),
    responses((status = 204, description = "Mental element removed"))
)]
/// Remove a mental element and repack the list.
pub async fn delete_mental_element(session: Session, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    mental_element_service::delete_element(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/account/home-club",
    tag = "account",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    responses(
        (status = 200, description = "Home club layout", body = HomeClubView),
        (status = 404, description = "Home club not set")
    )
)]
/// Home club layout with padded pars.
pub async fn get_home_club(
    State(state): State<SharedState>,
    session: Session,
) -> Result<Json<HomeClubView>, AppError> {
    Ok(Json(course_service::get_home_club(&session, state.config()).await?))
}

/// Create or replace the home club layout.
#[utoipa::path(
    put,
    path = "/account/home-club",
    tag = "account",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    request_body = SaveHomeClubRequest,
    responses((status = 200, description = "Home club saved", body = HomeClubView))
)]
pub async fn save_home_club(
    State(state): State<SharedState>,
    session: Session,
    Valid(Json(payload)): Valid<Json<SaveHomeClubRequest>>,
) -> Result<Json<HomeClubView>, AppError> {
    let club = course_service::save_home_club(&session, state.config(), payload).await?;
    Ok(Json(club))
}

#[utoipa::path(
    get,
    path = "/account/courses",
    tag = "account",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    responses((status = 200, description = "Courses, default first", body = [CourseView]))
)]
/// Courses, default first.
pub async fn list_courses(session: Session) -> Result<Json<Vec<CourseView>>, AppError> {
    Ok(Json(course_service::list_courses(&session).await?))
}

#[utoipa::path(
    post,
    path = "/account/courses",
    tag = "account",
    params(("Authorization" = String, Header, description = "Bearer access token")),
    request_body = CreateCourseRequest,
    responses((status = 200, description = "Course created", body = CourseDetail))
)]
/// Create a course with its pars.
pub async fn create_course(
    State(state): State<SharedState>,
    session: Session,
    Valid(Json(payload)): Valid<Json<CreateCourseRequest>>,
) -> Result<Json<CourseDetail>, AppError> {
    let course = course_service::create_course(&session, state.config(), payload).await?;
    Ok(Json(course))
}

#[utoipa::path(
    get,
    path = "/account/courses/{id}",
    tag = "account",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Course identifier")
    ),
    responses(
        (status = 200, description = "Course with pars", body = CourseDetail),
        (status = 404, description = "Unknown course")
    )
)]
/// One course with its pars.
pub async fn get_course(
    State(state): State<SharedState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseDetail>, AppError> {
    Ok(Json(course_service::get_course(&session, state.config(), id).await?))
}

#[utoipa::path(
    delete,
    path = "/account/courses/{id}",
    tag = "account",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Course identifier")
    ),
    responses((status = 204, description = "Course deleted"))
)]
/// Delete a course with its holes.
pub async fn delete_course(session: Session, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    course_service::delete_course(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Make a course the only default.
#[utoipa::path(
    post,
    path = "/account/courses/{id}/default",
    tag = "account",
    params(
        ("Authorization" = String, Header, description = "Bearer access token"),
        ("id" = Uuid, Path, description = "Course identifier")
    ),
    responses((status = 204, description = "Default course updated"))
)]
pub async fn set_default_course(session: Session, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    course_service::set_default_course(&session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
