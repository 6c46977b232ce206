//! Round/stroke engine: starting rounds, seeding strokes, per-hole ordering, commits and
//! completion. Each step is an independent store request issued in a fixed order; a failure
//! surfaces the store message and leaves earlier writes in place.

use std::collections::HashMap;

use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{
        courses::CourseRepository,
        models::{BagClubEntity, RoundEntity, RoundHoleEntity, StrokeEntity},
        ordered::OrderedRepository,
        rounds::RoundRepository,
        strokes::StrokeRepository,
    },
    domain::{
        round::{CommitGate, RoundStatus, ensure_hole, plan_move},
        sequence::{Slot, plan_insertion},
        stats::Tally,
        stroke::{pattern_for_par, seeding_par},
    },
    dto::round::{AddStrokeRequest, HoleView, RoundSummary, StartRoundRequest, StrokeView},
    error::ServiceError,
    services::course_service,
    state::session::Session,
};

const ACTIVE_ROUND_EXISTS: &str = "An active round is already in progress. Complete it first.";
const HOME_CLUB_REQUIRED: &str = "Please set your Home Club in Account before starting a round.";
const DELETE_ACTIVE_ROUND: &str = "Can\u{2019}t delete an active round. Close it first.";

fn gate_of(round: &RoundEntity) -> CommitGate {
    CommitGate::for_course(round.uses_course())
}

async fn load_round(session: &Session, round_id: Uuid) -> Result<RoundEntity, ServiceError> {
    RoundRepository::new(session)
        .find(round_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("round `{round_id}` not found")))
}

/// Active round with its status guard applied.
async fn load_active_round(session: &Session, round_id: Uuid) -> Result<RoundEntity, ServiceError> {
    let round = load_round(session, round_id).await?;
    round.status.ensure_active()?;
    Ok(round)
}

/// Commit state of a hole; holes without a snapshot fall back to the round's seeding state.
async fn hole_committed(session: &Session, round: &RoundEntity, hole_number: u32) -> Result<bool, ServiceError> {
    let hole = RoundRepository::new(session)
        .hole(round.id, hole_number)
        .await?;
    Ok(hole
        .map(|hole| hole.is_committed)
        .unwrap_or_else(|| gate_of(round).seeded_committed()))
}

/// The user's active round, if any.
pub async fn active_round(session: &Session) -> Result<Option<RoundSummary>, ServiceError> {
    let round = RoundRepository::new(session).find_active().await?;
    Ok(round.as_ref().map(RoundSummary::from))
}

/// One round of the session user.
pub async fn get_round(session: &Session, round_id: Uuid) -> Result<RoundSummary, ServiceError> {
    let round = load_round(session, round_id).await?;
    Ok(RoundSummary::from(&round))
}

/// Start a round from a user course (holes gated on commit) or from the home club layout.
pub async fn start_round(
    session: &Session,
    config: &AppConfig,
    request: StartRoundRequest,
) -> Result<RoundSummary, ServiceError> {
    let rounds = RoundRepository::new(session);
    if rounds.find_active().await?.is_some() {
        return Err(ServiceError::InvalidState(ACTIVE_ROUND_EXISTS.into()));
    }

    let courses = CourseRepository::new(session);
    let Some(home_club) = courses.home_club().await? else {
        return Err(ServiceError::InvalidState(HOME_CLUB_REQUIRED.into()));
    };

    let (user_course_id, pars) = match request.course_id {
        Some(course_id) => {
            let course = courses
                .find(course_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("course `{course_id}` not found")))?;
            let by_hole: HashMap<u32, u8> = courses
                .holes(course.id)
                .await?
                .into_iter()
                .map(|hole| (hole.hole_number, hole.par))
                .collect();
            let pars = (1..=course.holes_count)
                .map(|hole_number| seeding_par(by_hole.get(&hole_number).copied(), config.default_par()))
                .collect::<Vec<_>>();
            (Some(course.id), pars)
        }
        None => {
            let holes = courses.home_club_holes(home_club.id).await?;
            let pars = course_service::padded_pars(
                home_club.holes_count,
                holes.iter().map(|hole| (hole.hole_number, hole.par)),
                config.default_par(),
            );
            (None, pars)
        }
    };

    if pars.is_empty() {
        return Err(ServiceError::InvalidInput("a round needs at least one hole".into()));
    }

    let round = RoundEntity {
        id: Uuid::new_v4(),
        user_id: session.user_id(),
        home_club_id: home_club.id,
        user_course_id,
        holes_count: pars.len() as u32,
        current_hole_number: 1,
        status: RoundStatus::Active,
        started_at: OffsetDateTime::now_utc(),
        completed_at: None,
    };
    let gate = gate_of(&round);
    let committed = gate.seeded_committed();

    rounds.insert(&round).await?;

    let holes: Vec<RoundHoleEntity> = pars
        .iter()
        .zip(1u32..)
        .map(|(par, hole_number)| RoundHoleEntity {
            round_id: round.id,
            hole_number,
            par: *par,
            is_committed: committed,
        })
        .collect();
    rounds.insert_holes(&holes).await?;

    let strokes: Vec<StrokeEntity> = holes
        .iter()
        .flat_map(|hole| {
            pattern_for_par(hole.par)
                .iter()
                .zip(1u32..)
                .map(move |(stroke_type, seq)| StrokeEntity {
                    id: Uuid::new_v4(),
                    round_id: hole.round_id,
                    hole_number: hole.hole_number,
                    seq,
                    stroke_type: *stroke_type,
                    mental_ok: false,
                    club_id: None,
                    is_counted: committed,
                })
        })
        .collect();
    StrokeRepository::new(session).insert_many(&strokes).await?;

    info!(
        round_id = %round.id,
        holes_count = round.holes_count,
        strokes = strokes.len(),
        gated = !committed,
        "round started"
    );
    Ok(RoundSummary::from(&round))
}

/// Strokes, par and commit state of one hole plus the running round percentage.
pub async fn hole_view(
    session: &Session,
    config: &AppConfig,
    round_id: Uuid,
    hole_number: u32,
) -> Result<HoleView, ServiceError> {
    let round = load_round(session, round_id).await?;
    ensure_hole(hole_number, round.holes_count)?;

    let hole = RoundRepository::new(session)
        .hole(round.id, hole_number)
        .await?;
    let (par, is_committed) = match hole {
        Some(hole) => (hole.par, hole.is_committed),
        None => (config.default_par(), gate_of(&round).seeded_committed()),
    };

    let strokes = StrokeRepository::new(session);
    let hole_strokes = strokes.list_for_hole(round.id, hole_number).await?;
    let counted = strokes.list_for_rounds(&[round.id], true).await?;
    let mut tally = Tally::default();
    for stroke in &counted {
        tally.record(stroke.mental_ok);
    }

    Ok(HoleView {
        round: RoundSummary::from(&round),
        hole_number,
        par,
        is_committed,
        strokes: hole_strokes.iter().map(StrokeView::from).collect(),
        round_pct: tally.pct().unwrap_or(0),
        round_counted: tally.total,
    })
}

/// Insert a stroke at its canonical position, shifting later strokes up by one `seq`.
pub async fn add_stroke(
    session: &Session,
    round_id: Uuid,
    hole_number: u32,
    request: AddStrokeRequest,
) -> Result<StrokeView, ServiceError> {
    let round = load_active_round(session, round_id).await?;
    ensure_hole(hole_number, round.holes_count)?;
    if let Some(club_id) = request.club_id {
        ensure_own_club(session, club_id).await?;
    }

    let committed = hole_committed(session, &round, hole_number).await?;
    let strokes = StrokeRepository::new(session);
    let existing = strokes.list_for_hole(round.id, hole_number).await?;
    let slots: Vec<Slot> = existing
        .iter()
        .map(|stroke| Slot {
            id: stroke.id,
            seq: stroke.seq,
            stroke_type: stroke.stroke_type,
        })
        .collect();

    let plan = plan_insertion(&slots, request.stroke_type);
    for shift in &plan.shifts {
        strokes.set_seq(shift.id, shift.to).await?;
    }

    let stroke = StrokeEntity {
        id: Uuid::new_v4(),
        round_id: round.id,
        hole_number,
        seq: plan.seq,
        stroke_type: request.stroke_type,
        mental_ok: request.mental_ok,
        club_id: request.club_id,
        is_counted: gate_of(&round).counted_on_insert(committed),
    };
    strokes.insert_many(std::slice::from_ref(&stroke)).await?;

    debug!(
        round_id = %round.id,
        hole_number,
        seq = stroke.seq,
        shifted = plan.shifts.len(),
        stroke_type = stroke.stroke_type.as_str(),
        "stroke added"
    );
    Ok(StrokeView::from(&stroke))
}

async fn load_stroke(session: &Session, round_id: Uuid, stroke_id: Uuid) -> Result<StrokeEntity, ServiceError> {
    StrokeRepository::new(session)
        .find(round_id, stroke_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("stroke `{stroke_id}` not found")))
}

async fn ensure_own_club(session: &Session, club_id: Uuid) -> Result<(), ServiceError> {
    let clubs = OrderedRepository::<BagClubEntity>::new(session).list().await?;
    if clubs.iter().any(|club| club.id == club_id) {
        Ok(())
    } else {
        Err(ServiceError::NotFound(format!("club `{club_id}` not found")))
    }
}

/// Flip the mental focus flag of one stroke.
pub async fn toggle_mental(session: &Session, round_id: Uuid, stroke_id: Uuid) -> Result<StrokeView, ServiceError> {
    let round = load_active_round(session, round_id).await?;
    let mut stroke = load_stroke(session, round.id, stroke_id).await?;

    stroke.mental_ok = !stroke.mental_ok;
    StrokeRepository::new(session)
        .set_mental_ok(stroke.id, stroke.mental_ok)
        .await?;
    Ok(StrokeView::from(&stroke))
}

/// Set or clear the club of a stroke. The club must be in the user's bag.
pub async fn set_club(
    session: &Session,
    round_id: Uuid,
    stroke_id: Uuid,
    club_id: Option<Uuid>,
) -> Result<StrokeView, ServiceError> {
    let round = load_active_round(session, round_id).await?;
    let mut stroke = load_stroke(session, round.id, stroke_id).await?;
    if let Some(club_id) = club_id {
        ensure_own_club(session, club_id).await?;
    }

    stroke.club_id = club_id;
    StrokeRepository::new(session)
        .set_club(stroke.id, club_id)
        .await?;
    Ok(StrokeView::from(&stroke))
}

/// Remove a stroke. Remaining `seq` values keep their gaps.
pub async fn delete_stroke(session: &Session, round_id: Uuid, stroke_id: Uuid) -> Result<(), ServiceError> {
    let round = load_active_round(session, round_id).await?;
    if !StrokeRepository::new(session)
        .delete(round.id, stroke_id)
        .await?
    {
        return Err(ServiceError::NotFound(format!("stroke `{stroke_id}` not found")));
    }
    Ok(())
}

async fn commit(session: &Session, round_id: Uuid, hole_number: u32) -> Result<(), ServiceError> {
    RoundRepository::new(session)
        .mark_hole_committed(round_id, hole_number)
        .await?;
    StrokeRepository::new(session)
        .mark_counted(round_id, hole_number)
        .await?;
    info!(round_id = %round_id, hole_number, "hole committed");
    Ok(())
}

/// Commit a hole so its strokes count toward statistics. Commits are one-way.
pub async fn commit_hole(session: &Session, round_id: Uuid, hole_number: u32) -> Result<(), ServiceError> {
    let round = load_active_round(session, round_id).await?;
    ensure_hole(hole_number, round.holes_count)?;
    commit(session, round.id, hole_number).await
}

/// Move to another hole, committing the hole being left when moving forward past it.
pub async fn go_to_hole(session: &Session, round_id: Uuid, hole_number: u32) -> Result<RoundSummary, ServiceError> {
    let mut round = load_active_round(session, round_id).await?;
    let current_committed = hole_committed(session, &round, round.current_hole_number).await?;
    let step = plan_move(
        round.current_hole_number,
        hole_number,
        round.holes_count,
        gate_of(&round),
        current_committed,
    )?;

    if step.commit_leaving {
        commit(session, round.id, step.from).await?;
    }
    RoundRepository::new(session)
        .set_current_hole(round.id, step.to)
        .await?;

    round.current_hole_number = step.to;
    Ok(RoundSummary::from(&round))
}

/// Commit the current hole if still open, then mark the round complete.
pub async fn complete_round(session: &Session, round_id: Uuid) -> Result<RoundSummary, ServiceError> {
    let mut round = load_round(session, round_id).await?;
    let next = round.status.complete()?;

    if gate_of(&round) == CommitGate::PerHole
        && !hole_committed(session, &round, round.current_hole_number).await?
    {
        commit(session, round.id, round.current_hole_number).await?;
    }

    let completed_at = OffsetDateTime::now_utc();
    RoundRepository::new(session)
        .mark_complete(round.id, completed_at)
        .await?;

    round.status = next;
    round.completed_at = Some(completed_at);
    info!(round_id = %round.id, "round completed");
    Ok(RoundSummary::from(&round))
}

/// Delete a finished round with its strokes and hole snapshots.
pub async fn delete_round(session: &Session, round_id: Uuid) -> Result<(), ServiceError> {
    let round = load_round(session, round_id).await?;
    if round.status == RoundStatus::Active {
        return Err(ServiceError::InvalidState(DELETE_ACTIVE_ROUND.into()));
    }

    StrokeRepository::new(session)
        .delete_for_round(round.id)
        .await?;
    let rounds = RoundRepository::new(session);
    rounds.delete_holes(round.id).await?;
    rounds.delete(round.id).await?;
    info!(round_id = %round.id, "round deleted");
    Ok(())
}
