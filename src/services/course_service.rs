//! Home club layout and user courses.

use std::collections::HashMap;

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{
        courses::CourseRepository,
        models::{HomeClubEntity, HomeClubHoleEntity, UserCourseEntity, UserCourseHoleEntity},
    },
    domain::stroke::clamp_par,
    dto::account::{CourseDetail, CourseView, CreateCourseRequest, HomeClubView, SaveHomeClubRequest},
    error::ServiceError,
    state::session::Session,
};

/// Par of every hole `1..=holes_count`, filling holes without a stored par with `default_par`.
pub fn padded_pars(holes_count: u32, holes: impl IntoIterator<Item = (u32, u8)>, default_par: u8) -> Vec<u8> {
    let by_hole: HashMap<u32, u8> = holes.into_iter().collect();
    (1..=holes_count)
        .map(|hole_number| by_hole.get(&hole_number).copied().unwrap_or(default_par))
        .collect()
}

fn optional_name(name: Option<String>) -> Option<String> {
    name.map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Home club with pars padded to its hole count.
pub async fn get_home_club(session: &Session, config: &AppConfig) -> Result<HomeClubView, ServiceError> {
    let courses = CourseRepository::new(session);
    let club = courses
        .home_club()
        .await?
        .ok_or_else(|| ServiceError::NotFound("home club is not set".into()))?;
    let holes = courses.home_club_holes(club.id).await?;

    Ok(HomeClubView {
        pars: padded_pars(
            club.holes_count,
            holes.iter().map(|hole| (hole.hole_number, hole.par)),
            config.default_par(),
        ),
        id: club.id,
        name: club.name,
        holes_count: club.holes_count,
    })
}

/// Create or replace the home club layout.
pub async fn save_home_club(
    session: &Session,
    config: &AppConfig,
    request: SaveHomeClubRequest,
) -> Result<HomeClubView, ServiceError> {
    let courses = CourseRepository::new(session);
    let existing = courses.home_club().await?;

    let club = HomeClubEntity {
        id: existing.as_ref().map(|club| club.id).unwrap_or_else(Uuid::new_v4),
        user_id: session.user_id(),
        name: request.name.trim().to_string(),
        holes_count: request.pars.len() as u32,
    };
    let holes: Vec<HomeClubHoleEntity> = request
        .pars
        .iter()
        .zip(1u32..)
        .map(|(par, hole_number)| HomeClubHoleEntity {
            home_club_id: club.id,
            hole_number,
            par: clamp_par(*par),
        })
        .collect();

    courses
        .save_home_club(&club, &holes, existing.is_some())
        .await?;
    info!(home_club_id = %club.id, holes_count = club.holes_count, "home club saved");
    get_home_club(session, config).await
}

/// Courses with the default first.
pub async fn list_courses(session: &Session) -> Result<Vec<CourseView>, ServiceError> {
    let courses = CourseRepository::new(session).list().await?;
    Ok(courses.into_iter().map(CourseView::from).collect())
}

/// One course with pars padded to its hole count.
pub async fn get_course(session: &Session, config: &AppConfig, course_id: Uuid) -> Result<CourseDetail, ServiceError> {
    let courses = CourseRepository::new(session);
    let course = courses
        .find(course_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("course `{course_id}` not found")))?;
    let holes = courses.holes(course.id).await?;

    Ok(CourseDetail {
        pars: padded_pars(
            course.holes_count,
            holes.iter().map(|hole| (hole.hole_number, hole.par)),
            config.default_par(),
        ),
        course: CourseView::from(course),
    })
}

/// Create a course. The first course of a user becomes the default.
pub async fn create_course(
    session: &Session,
    config: &AppConfig,
    request: CreateCourseRequest,
) -> Result<CourseDetail, ServiceError> {
    let courses = CourseRepository::new(session);
    let is_default = courses.list().await?.is_empty();

    let course = UserCourseEntity {
        id: Uuid::new_v4(),
        user_id: session.user_id(),
        course_name: request.course_name.trim().to_string(),
        club_name: optional_name(request.club_name),
        holes_count: request.pars.len() as u32,
        is_default,
        created_at: OffsetDateTime::now_utc(),
    };
    let holes: Vec<UserCourseHoleEntity> = request
        .pars
        .iter()
        .zip(1u32..)
        .map(|(par, hole_number)| UserCourseHoleEntity {
            user_course_id: course.id,
            hole_number,
            par: clamp_par(*par),
        })
        .collect();

    courses.insert(&course, &holes).await?;
    info!(course_id = %course.id, holes_count = course.holes_count, is_default, "course created");
    get_course(session, config, course.id).await
}

/// Make `course_id` the only default course.
pub async fn set_default_course(session: &Session, course_id: Uuid) -> Result<(), ServiceError> {
    let courses = CourseRepository::new(session);
    if courses.find(course_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("course `{course_id}` not found")));
    }
    courses.set_default(course_id).await?;
    Ok(())
}

/// Delete an owned course and its holes.
pub async fn delete_course(session: &Session, course_id: Uuid) -> Result<(), ServiceError> {
    if !CourseRepository::new(session).delete(course_id).await? {
        return Err(ServiceError::NotFound(format!("course `{course_id}` not found")));
    }
    info!(course_id = %course_id, "course deleted");
    Ok(())
}
