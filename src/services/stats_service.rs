//! Dashboard, summary and history views built from counted strokes of completed rounds.

use std::collections::HashMap;

use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{
        courses::CourseRepository,
        models::{RoundEntity, StrokeEntity},
        rounds::{CourseScope, RoundRepository},
        strokes::StrokeRepository,
    },
    domain::stats::{
        StrokeSample, Tally, breakdown, compare, highlights, late_round, sparkline, summary_trend,
    },
    dto::{
        format_timestamp,
        round::RoundSummary,
        stats::{
            DashboardResponse, HistoryQuery, HistoryResponse, HistoryRound, LatestRoundStats,
            SummaryResponse, SummaryRound,
        },
    },
    error::ServiceError,
    state::session::Session,
};

const FALLBACK_COURSE_NAME: &str = "Course";

/// Display names of the courses a round can be played on.
pub(crate) struct CourseNames {
    courses: HashMap<Uuid, String>,
    home_club: Option<String>,
}

impl CourseNames {
    pub(crate) async fn load(session: &Session) -> Result<Self, ServiceError> {
        let repo = CourseRepository::new(session);
        let courses = repo
            .list()
            .await?
            .into_iter()
            .map(|course| (course.id, course.course_name))
            .collect();
        let home_club = repo.home_club().await?.map(|club| club.name);
        Ok(Self { courses, home_club })
    }

    /// User course name, then home club name, then a generic label.
    pub(crate) fn name_of(&self, round: &RoundEntity) -> String {
        round
            .user_course_id
            .and_then(|id| self.courses.get(&id).cloned())
            .or_else(|| self.home_club.clone())
            .unwrap_or_else(|| FALLBACK_COURSE_NAME.to_string())
    }
}

fn sample(stroke: &StrokeEntity) -> StrokeSample {
    StrokeSample {
        hole_number: stroke.hole_number,
        stroke_type: stroke.stroke_type,
        mental_ok: stroke.mental_ok,
    }
}

/// Counted strokes of `rounds`, grouped per round.
async fn samples_by_round(
    session: &Session,
    rounds: &[RoundEntity],
) -> Result<HashMap<Uuid, Vec<StrokeSample>>, ServiceError> {
    let ids: Vec<Uuid> = rounds.iter().map(|round| round.id).collect();
    let strokes = StrokeRepository::new(session)
        .list_for_rounds(&ids, true)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<StrokeSample>> = HashMap::new();
    for stroke in &strokes {
        grouped.entry(stroke.round_id).or_default().push(sample(stroke));
    }
    Ok(grouped)
}

/// Focus percentage and stroke count of the last completed rounds with their direction.
pub async fn summary(session: &Session, config: &AppConfig) -> Result<SummaryResponse, ServiceError> {
    let stats = config.stats();
    let rounds = RoundRepository::new(session)
        .list_completed(None, None, stats.summary_rounds)
        .await?;
    let samples = samples_by_round(session, &rounds).await?;

    let rounds: Vec<SummaryRound> = rounds
        .iter()
        .map(|round| {
            let tally = Tally::of(samples.get(&round.id).into_iter().flatten());
            SummaryRound {
                round_id: round.id,
                completed_at: round
                    .completed_at
                    .map(format_timestamp)
                    .unwrap_or_default(),
                mental_pct: tally.pct().unwrap_or(0),
                stroke_count: tally.total,
            }
        })
        .collect();

    let deadband = i64::from(stats.summary_deadband);
    let mental: Vec<i64> = rounds.iter().map(|round| i64::from(round.mental_pct)).collect();
    let strokes: Vec<i64> = rounds.iter().map(|round| i64::from(round.stroke_count)).collect();

    Ok(SummaryResponse {
        mental_trend: summary_trend(&mental, true, deadband),
        stroke_trend: summary_trend(&strokes, false, deadband),
        rounds,
    })
}

/// Latest completed round against the prior ones, per stroke type breakdown and the late
/// round card.
pub async fn dashboard(session: &Session, config: &AppConfig) -> Result<DashboardResponse, ServiceError> {
    let stats = config.stats();
    let repo = RoundRepository::new(session);
    let active_round = repo.find_active().await?.as_ref().map(RoundSummary::from);

    let rounds = repo
        .list_completed(None, None, stats.prior_rounds + 1)
        .await?;
    let Some((latest, prior)) = rounds.split_first() else {
        return Ok(DashboardResponse {
            active_round,
            latest: None,
            breakdown: Vec::new(),
            late_round: None,
        });
    };

    let mut samples = samples_by_round(session, &rounds).await?;
    let latest_samples = samples.remove(&latest.id).unwrap_or_default();
    let prior_samples: Vec<Vec<StrokeSample>> = prior
        .iter()
        .map(|round| samples.remove(&round.id).unwrap_or_default())
        .collect();

    let latest_tally = Tally::of(&latest_samples);
    let prior_pcts: Vec<Option<u32>> = prior_samples
        .iter()
        .map(|round| Tally::of(round).pct())
        .collect();
    let mut series: Vec<Option<u32>> = prior_pcts.iter().rev().copied().collect();
    series.push(latest_tally.pct());

    let names = CourseNames::load(session).await?;
    let comparison = compare(latest_tally.pct(), &prior_pcts, stats.trend_deadband);
    debug!(
        round_id = %latest.id,
        prior = prior.len(),
        current = ?comparison.current,
        baseline = ?comparison.baseline,
        "dashboard computed"
    );

    Ok(DashboardResponse {
        active_round,
        latest: Some(LatestRoundStats {
            round_id: latest.id,
            completed_at: latest.completed_at.map(format_timestamp),
            course_name: names.name_of(latest),
            counted: latest_tally.total,
            comparison,
            spark: sparkline(&series),
        }),
        breakdown: breakdown(&latest_samples, &prior_samples, stats.trend_deadband),
        late_round: Some(late_round(&latest_samples, stats)),
    })
}

fn parse_scope(course: Option<&str>) -> Result<Option<CourseScope>, ServiceError> {
    match course.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some("home") => Ok(Some(CourseScope::Home)),
        Some(raw) => Uuid::parse_str(raw)
            .map(|id| Some(CourseScope::Course(id)))
            .map_err(|_| ServiceError::InvalidInput(format!("unknown course filter `{raw}`"))),
    }
}

/// Completed rounds in the requested window, newest first, with their highlights.
pub async fn history(
    session: &Session,
    config: &AppConfig,
    query: HistoryQuery,
) -> Result<HistoryResponse, ServiceError> {
    let stats = config.stats();
    let scope = parse_scope(query.course.as_deref())?;
    let since = query
        .range
        .unwrap_or_default()
        .days()
        .map(|days| OffsetDateTime::now_utc() - Duration::days(days));

    let rounds = RoundRepository::new(session)
        .list_completed(since, scope, stats.history_limit)
        .await?;
    let samples = samples_by_round(session, &rounds).await?;
    let names = CourseNames::load(session).await?;

    let rounds = rounds
        .iter()
        .map(|round| {
            let round_samples = samples.get(&round.id).map(Vec::as_slice).unwrap_or(&[]);
            let tally = Tally::of(round_samples);
            HistoryRound {
                round_id: round.id,
                completed_at: round.completed_at.map(format_timestamp),
                user_course_id: round.user_course_id,
                course_name: names.name_of(round),
                holes_count: round.holes_count,
                pct: tally.pct(),
                counted: tally.total,
                highlights: highlights(round_samples, stats),
            }
        })
        .collect();

    Ok(HistoryResponse { rounds })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        dao::{
            models::{HomeClubEntity, UserCourseEntity},
            table_store::memory::MemoryStore,
        },
        domain::{
            round::RoundStatus,
            stats::{CalloutKind, SummaryTrend, Trend},
            stroke::StrokeType,
        },
        dto::stats::HistoryRange,
    };

    pub(crate) fn session() -> Session {
        Session::new(Uuid::new_v4(), Arc::new(MemoryStore::new()))
    }

    /// Store a completed round whose counted strokes are given as `(hole, type, mental_ok)`.
    pub(crate) async fn completed_round(
        session: &Session,
        completed_at: OffsetDateTime,
        user_course_id: Option<Uuid>,
        strokes: &[(u32, StrokeType, bool)],
    ) -> RoundEntity {
        let round = RoundEntity {
            id: Uuid::new_v4(),
            user_id: session.user_id(),
            home_club_id: Uuid::new_v4(),
            user_course_id,
            holes_count: 18,
            current_hole_number: 18,
            status: RoundStatus::Complete,
            started_at: completed_at - Duration::hours(4),
            completed_at: Some(completed_at),
        };
        RoundRepository::new(session).insert(&round).await.unwrap();

        let mut seqs: HashMap<u32, u32> = HashMap::new();
        let strokes: Vec<StrokeEntity> = strokes
            .iter()
            .map(|(hole_number, stroke_type, mental_ok)| {
                let seq = seqs.entry(*hole_number).or_insert(0);
                *seq += 1;
                StrokeEntity {
                    id: Uuid::new_v4(),
                    round_id: round.id,
                    hole_number: *hole_number,
                    seq: *seq,
                    stroke_type: *stroke_type,
                    mental_ok: *mental_ok,
                    club_id: None,
                    is_counted: true,
                }
            })
            .collect();
        StrokeRepository::new(session)
            .insert_many(&strokes)
            .await
            .unwrap();
        round
    }

    /// 100 approach shots on hole 1, `pct` of them with mental focus.
    fn with_pct(pct: usize) -> Vec<(u32, StrokeType, bool)> {
        (0..100).map(|index| (1, StrokeType::Approach, index < pct)).collect()
    }

    fn days_ago(days: i64) -> OffsetDateTime {
        OffsetDateTime::now_utc() - Duration::days(days)
    }

    #[tokio::test]
    async fn latest_round_above_prior_average_trends_up() {
        let session = session();
        // prior rounds, oldest first
        for (age, pct) in [(6, 71), (5, 74), (4, 68), (3, 72), (2, 70)] {
            completed_round(&session, days_ago(age), None, &with_pct(pct)).await;
        }
        completed_round(&session, days_ago(1), None, &with_pct(75)).await;

        let dashboard = dashboard(&session, &AppConfig::default()).await.unwrap();
        let latest = dashboard.latest.unwrap();
        assert_eq!(latest.comparison.current, Some(75));
        assert_eq!(latest.comparison.baseline, Some(71));
        assert_eq!(latest.comparison.delta, Some(4));
        assert_eq!(latest.comparison.trend, Some(Trend::Up));
        assert_eq!(latest.course_name, FALLBACK_COURSE_NAME);
        assert_eq!(latest.spark, vec![95, 99, 91, 96, 93, 100]);

        let approach = &dashboard.breakdown[0];
        assert_eq!(approach.stroke_type, StrokeType::Approach);
        assert_eq!(approach.attempts, 600);
        assert_eq!(dashboard.breakdown.len(), 1);
    }

    #[tokio::test]
    async fn dashboard_without_completed_rounds_is_empty() {
        let dashboard = dashboard(&session(), &AppConfig::default()).await.unwrap();
        assert!(dashboard.latest.is_none());
        assert!(dashboard.late_round.is_none());
        assert!(dashboard.breakdown.is_empty());
    }

    #[tokio::test]
    async fn late_round_card_flags_a_slip() {
        let session = session();
        let mut strokes: Vec<(u32, StrokeType, bool)> =
            (1..=12).map(|hole| (hole, StrokeType::Tee, true)).collect();
        strokes.extend((13..=16).map(|hole| (hole, StrokeType::Tee, false)));
        completed_round(&session, days_ago(1), None, &strokes).await;

        let card = dashboard(&session, &AppConfig::default())
            .await
            .unwrap()
            .late_round
            .unwrap();
        assert_eq!(card.kind, CalloutKind::Focus);
        assert_eq!(card.pct, Some(0));
        assert_eq!(card.round_pct, Some(75));
    }

    #[tokio::test]
    async fn summary_uses_its_own_deadband() {
        let session = session();
        completed_round(&session, days_ago(3), None, &with_pct(70)).await;
        completed_round(&session, days_ago(1), None, &with_pct(72)).await;

        let trends = summary(&session, &AppConfig::default()).await.unwrap();
        assert_eq!(trends.rounds.len(), 2);
        assert_eq!(trends.rounds[0].mental_pct, 72);
        assert_eq!(trends.mental_trend, SummaryTrend::Improving);
        assert_eq!(trends.stroke_trend, SummaryTrend::Flat);
    }

    #[tokio::test]
    async fn summary_of_a_single_round_is_flat() {
        let player = session();
        completed_round(&player, days_ago(1), None, &with_pct(90)).await;

        let trends = summary(&player, &AppConfig::default()).await.unwrap();
        assert_eq!(trends.mental_trend, SummaryTrend::Flat);
        assert_eq!(trends.stroke_trend, SummaryTrend::Flat);
    }

    #[tokio::test]
    async fn history_filters_by_range_and_course() {
        let session = session();
        let course = UserCourseEntity {
            id: Uuid::new_v4(),
            user_id: session.user_id(),
            course_name: "Dunes".into(),
            club_name: None,
            holes_count: 18,
            is_default: true,
            created_at: days_ago(200),
        };
        CourseRepository::new(&session).insert(&course, &[]).await.unwrap();
        let home = HomeClubEntity {
            id: Uuid::new_v4(),
            user_id: session.user_id(),
            name: "Oak Hill".into(),
            holes_count: 18,
        };
        CourseRepository::new(&session)
            .save_home_club(&home, &[], false)
            .await
            .unwrap();

        let recent_course = completed_round(&session, days_ago(5), Some(course.id), &with_pct(50)).await;
        let recent_home = completed_round(&session, days_ago(10), None, &with_pct(80)).await;
        let old_home = completed_round(&session, days_ago(60), None, &with_pct(60)).await;

        let default_range = history(&session, &AppConfig::default(), HistoryQuery::default())
            .await
            .unwrap();
        let ids: Vec<Uuid> = default_range.rounds.iter().map(|round| round.round_id).collect();
        assert_eq!(ids, vec![recent_course.id, recent_home.id]);
        assert_eq!(default_range.rounds[0].course_name, "Dunes");
        assert_eq!(default_range.rounds[1].course_name, "Oak Hill");

        let home_only = history(
            &session,
            &AppConfig::default(),
            HistoryQuery {
                range: Some(HistoryRange::Last90Days),
                course: Some("home".into()),
            },
        )
        .await
        .unwrap();
        let ids: Vec<Uuid> = home_only.rounds.iter().map(|round| round.round_id).collect();
        assert_eq!(ids, vec![recent_home.id, old_home.id]);

        let err = history(
            &session,
            &AppConfig::default(),
            HistoryQuery {
                range: None,
                course: Some("nowhere".into()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn history_highlights_strong_tee_and_weak_putting() {
        let session = session();
        let mut strokes = Vec::new();
        for hole in 1..=4 {
            strokes.push((hole, StrokeType::Tee, true));
            strokes.push((hole, StrokeType::Approach, hole % 2 == 0));
            strokes.push((hole, StrokeType::Putt, false));
        }
        completed_round(&session, days_ago(1), None, &strokes).await;

        let history = history(&session, &AppConfig::default(), HistoryQuery::default())
            .await
            .unwrap();
        assert_eq!(
            history.rounds[0].highlights,
            vec!["Strong Tee focus".to_string(), "Putting focus struggled".to_string()]
        );
        assert_eq!(history.rounds[0].pct, Some(50));
    }
}
