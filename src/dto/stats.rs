use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    domain::stats::{
        LateRoundCallout, StrokeTypeBreakdown, SummaryTrend, TrendComparison,
    },
    dto::round::RoundSummary,
};

/// One completed round of the dashboard summary window.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryRound {
    pub round_id: Uuid,
    pub completed_at: String,
    /// Mental focus over counted strokes, 0 when none are counted.
    pub mental_pct: u32,
    pub stroke_count: u32,
}

/// Last completed rounds (newest first) with their direction labels.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub rounds: Vec<SummaryRound>,
    pub mental_trend: SummaryTrend,
    /// Fewer strokes over time is improving.
    pub stroke_trend: SummaryTrend,
}

/// Focus of the latest completed round against the prior ones.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct LatestRoundStats {
    pub round_id: Uuid,
    pub completed_at: Option<String>,
    pub course_name: String,
    pub counted: u32,
    #[serde(flatten)]
    pub comparison: TrendComparison,
    /// Bar heights, prior rounds oldest to newest, then the latest round.
    pub spark: Vec<u32>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub active_round: Option<RoundSummary>,
    pub latest: Option<LatestRoundStats>,
    pub breakdown: Vec<StrokeTypeBreakdown>,
    pub late_round: Option<LateRoundCallout>,
}

/// Time window of the history list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub enum HistoryRange {
    #[default]
    #[serde(rename = "30")]
    Last30Days,
    #[serde(rename = "90")]
    Last90Days,
    #[serde(rename = "all")]
    All,
}

impl HistoryRange {
    pub fn days(self) -> Option<i64> {
        match self {
            HistoryRange::Last30Days => Some(30),
            HistoryRange::Last90Days => Some(90),
            HistoryRange::All => None,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// `30`, `90` or `all`; defaults to `30`.
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub range: Option<HistoryRange>,
    /// `home` for home club rounds, a course id, or absent for every course.
    #[serde(default)]
    pub course: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryRound {
    pub round_id: Uuid,
    pub completed_at: Option<String>,
    pub user_course_id: Option<Uuid>,
    pub course_name: String,
    pub holes_count: u32,
    pub pct: Option<u32>,
    pub counted: u32,
    pub highlights: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub rounds: Vec<HistoryRound>,
}
