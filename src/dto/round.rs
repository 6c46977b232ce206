//! DTO definitions used by the round tracking routes.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{RoundEntity, StrokeEntity},
    domain::{round::RoundStatus, stroke::StrokeType},
    dto::format_timestamp,
};

/// Round header as returned by every round route.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoundSummary {
    pub id: Uuid,
    pub status: RoundStatus,
    pub holes_count: u32,
    pub current_hole_number: u32,
    /// Course the round was seeded from; absent for home club rounds.
    pub user_course_id: Option<Uuid>,
    /// True when strokes only count once their hole is committed.
    pub commit_gated: bool,
    pub started_at: String,
    pub completed_at: Option<String>,
}

impl From<&RoundEntity> for RoundSummary {
    fn from(round: &RoundEntity) -> Self {
        Self {
            id: round.id,
            status: round.status,
            holes_count: round.holes_count,
            current_hole_number: round.current_hole_number,
            user_course_id: round.user_course_id,
            commit_gated: round.uses_course(),
            started_at: format_timestamp(round.started_at),
            completed_at: round.completed_at.map(format_timestamp),
        }
    }
}

/// Wrapper allowing the active round to be absent.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveRoundResponse {
    pub round: Option<RoundSummary>,
}

/// Payload starting a round, from a user course or from the home club layout.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StartRoundRequest {
    #[serde(default)]
    pub course_id: Option<Uuid>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StrokeView {
    pub id: Uuid,
    pub hole_number: u32,
    pub seq: u32,
    pub stroke_type: StrokeType,
    pub label: &'static str,
    pub mental_ok: bool,
    pub club_id: Option<Uuid>,
    pub is_counted: bool,
}

impl From<&StrokeEntity> for StrokeView {
    fn from(stroke: &StrokeEntity) -> Self {
        Self {
            id: stroke.id,
            hole_number: stroke.hole_number,
            seq: stroke.seq,
            stroke_type: stroke.stroke_type,
            label: stroke.stroke_type.label(),
            mental_ok: stroke.mental_ok,
            club_id: stroke.club_id,
            is_counted: stroke.is_counted,
        }
    }
}

/// Everything the scorecard shows for one hole.
#[derive(Debug, Serialize, ToSchema)]
pub struct HoleView {
    pub round: RoundSummary,
    pub hole_number: u32,
    pub par: u8,
    pub is_committed: bool,
    /// Strokes ordered by `seq`.
    pub strokes: Vec<StrokeView>,
    /// Mental focus over the counted strokes of the whole round, 0 when none are counted.
    pub round_pct: u32,
    pub round_counted: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddStrokeRequest {
    pub stroke_type: StrokeType,
    #[serde(default)]
    pub mental_ok: bool,
    #[serde(default)]
    pub club_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GoToHoleRequest {
    #[validate(range(min = 1))]
    pub hole_number: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetClubRequest {
    pub club_id: Option<Uuid>,
}
