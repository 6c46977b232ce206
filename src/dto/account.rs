//! DTO definitions used by the account configuration routes.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{BagClubEntity, MentalElementEntity, UserCourseEntity},
    dto::validation::{validate_club_label, validate_mental_label, validate_pars, validate_required_name},
};

#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct BagClubView {
    pub id: Uuid,
    pub label: String,
    pub sort_order: u32,
    /// Best stroke memory note.
    pub bsm: Option<String>,
}

impl From<BagClubEntity> for BagClubView {
    fn from(club: BagClubEntity) -> Self {
        Self {
            id: club.id,
            label: club.label,
            sort_order: club.sort_order,
            bsm: club.bsm,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBagClubRequest {
    #[validate(custom(function = "validate_club_label"))]
    pub label: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetBsmRequest {
    #[validate(length(max = 500))]
    pub bsm: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MentalElementView {
    pub id: Uuid,
    pub label: String,
    pub sort_order: u32,
}

impl From<MentalElementEntity> for MentalElementView {
    fn from(element: MentalElementEntity) -> Self {
        Self {
            id: element.id,
            label: element.label,
            sort_order: element.sort_order,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateMentalElementRequest {
    #[validate(custom(function = "validate_mental_label"))]
    pub label: String,
}

/// Complete desired order of a list, first item first.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ReorderRequest {
    #[validate(length(min = 1))]
    pub ordered_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HomeClubView {
    pub id: Uuid,
    pub name: String,
    pub holes_count: u32,
    /// Par of every hole, hole 1 first.
    pub pars: Vec<u8>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SaveHomeClubRequest {
    #[validate(custom(function = "validate_required_name"))]
    pub name: String,
    /// Par of every hole, hole 1 first. Values are clamped to 3..=6.
    #[validate(custom(function = "validate_pars"))]
    pub pars: Vec<u8>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseView {
    pub id: Uuid,
    pub course_name: String,
    pub club_name: Option<String>,
    pub holes_count: u32,
    pub is_default: bool,
}

impl From<UserCourseEntity> for CourseView {
    fn from(course: UserCourseEntity) -> Self {
        Self {
            id: course.id,
            course_name: course.course_name,
            club_name: course.club_name,
            holes_count: course.holes_count,
            is_default: course.is_default,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: CourseView,
    pub pars: Vec<u8>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCourseRequest {
    #[validate(custom(function = "validate_required_name"))]
    pub course_name: String,
    #[serde(default)]
    pub club_name: Option<String>,
    #[validate(custom(function = "validate_pars"))]
    pub pars: Vec<u8>,
}
