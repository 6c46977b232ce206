use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::{round::RoundStatus, stroke::StrokeType};

/// One play-through of a course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundEntity {
    /// Round identifier.
    pub id: Uuid,
    /// Owner of the round.
    pub user_id: Uuid,
    /// Home club the round was started under.
    pub home_club_id: Uuid,
    /// Course the round was seeded from; `None` for home club rounds.
    #[serde(default)]
    pub user_course_id: Option<Uuid>,
    /// Number of holes snapshotted at start.
    pub holes_count: u32,
    /// Hole the player is currently on.
    pub current_hole_number: u32,
    /// Lifecycle status.
    pub status: RoundStatus,
    #[serde(with = "time::serde::rfc3339")]
    /// When the round was started.
    pub started_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    /// Set once the round is complete.
    pub completed_at: Option<OffsetDateTime>,
}

impl RoundEntity {
    /// Rounds seeded from a user course gate statistics on per-hole commits.
    pub fn uses_course(&self) -> bool {
        self.user_course_id.is_some()
    }
}

/// Par snapshot and commit state of one hole of a round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundHoleEntity {
    /// Owning round.
    pub round_id: Uuid,
    /// 1-based hole number.
    pub hole_number: u32,
    /// Par snapshot taken at round start.
    pub par: u8,
    /// Whether strokes on this hole count toward statistics.
    pub is_committed: bool,
}

/// One recorded shot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrokeEntity {
    /// Stroke identifier.
    pub id: Uuid,
    /// Owning round.
    pub round_id: Uuid,
    /// Hole the stroke was played on.
    pub hole_number: u32,
    /// 1-based position within the hole. Gaps are allowed.
    pub seq: u32,
    /// Kind of shot.
    pub stroke_type: StrokeType,
    /// Whether the intended mental cue was executed.
    pub mental_ok: bool,
    #[serde(default)]
    /// Club used, when recorded.
    pub club_id: Option<Uuid>,
    /// Whether the stroke counts toward statistics.
    pub is_counted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Club in the user's bag.
pub struct BagClubEntity {
    /// Club identifier.
    pub id: Uuid,
    /// Owner of the bag.
    pub user_id: Uuid,
    /// Display label, unique per user.
    pub label: String,
    /// 1-based position in the bag.
    pub sort_order: u32,
    /// Free-text "best stroke memory" note.
    #[serde(default)]
    pub bsm: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Mental cue the user practices.
pub struct MentalElementEntity {
    /// Element identifier.
    pub id: Uuid,
    /// Owner of the list.
    pub user_id: Uuid,
    /// Display label, unique per user.
    pub label: String,
    /// 1-based position in the list.
    pub sort_order: u32,
}

/// Course defined by the user; at most one is the default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCourseEntity {
    /// Course identifier.
    pub id: Uuid,
    /// Owner of the course.
    pub user_id: Uuid,
    /// Course display name.
    pub course_name: String,
    #[serde(default)]
    /// Name of the club the course belongs to.
    pub club_name: Option<String>,
    /// Number of holes.
    pub holes_count: u32,
    /// Whether this is the user's default course.
    pub is_default: bool,
    #[serde(with = "time::serde::rfc3339")]
    /// Creation time, used for listing order.
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Par of one hole of a user course.
pub struct UserCourseHoleEntity {
    /// Owning course.
    pub user_course_id: Uuid,
    /// 1-based hole number.
    pub hole_number: u32,
    /// Par of the hole.
    pub par: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// The user's home club layout used for rounds without a course.
pub struct HomeClubEntity {
    /// Home club identifier.
    pub id: Uuid,
    /// Owner of the home club; one per user.
    pub user_id: Uuid,
    /// Club display name.
    pub name: String,
    /// Number of holes.
    pub holes_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Par of one hole of the home club.
pub struct HomeClubHoleEntity {
    /// Owning home club.
    pub home_club_id: Uuid,
    /// 1-based hole number.
    pub hole_number: u32,
    /// Par of the hole.
    pub par: u8,
}

/// Row written by the public contact form. The store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactMessageEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Sender name, when given.
    pub name: Option<String>,
    /// Normalized sender email.
    pub email: String,
    /// Message body.
    pub message: String,
}

/// Row written by the pricing tier interest form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterestSignupEntity {
    /// Normalized email.
    pub email: String,
    /// Requested tier, `plus` or `pro`.
    pub tier: String,
}
