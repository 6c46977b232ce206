//! Round lifecycle (`active -> complete`) and hole navigation rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle status of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// Strokes and holes can still change.
    Active,
    /// Terminal; the round is read-only.
    Complete,
}

impl RoundStatus {
    /// Status as stored.
    pub fn as_str(self) -> &'static str {
        match self {
            RoundStatus::Active => "active",
            RoundStatus::Complete => "complete",
        }
    }

    /// Apply the complete action. `complete` is terminal.
    pub fn complete(self) -> Result<RoundStatus, RoundStateError> {
        match self {
            RoundStatus::Active => Ok(RoundStatus::Complete),
            RoundStatus::Complete => Err(RoundStateError::AlreadyComplete),
        }
    }

    /// Guard for operations that mutate strokes, holes or the current hole.
    pub fn ensure_active(self) -> Result<(), RoundStateError> {
        match self {
            RoundStatus::Active => Ok(()),
            RoundStatus::Complete => Err(RoundStateError::AlreadyComplete),
        }
    }
}

/// Rejections raised by the round lifecycle and navigation rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundStateError {
    #[error("round is already complete")]
    /// The round is complete and no longer accepts changes.
    AlreadyComplete,
    #[error("hole {hole} is outside 1..={holes_count}")]
    /// Hole number outside the round.
    HoleOutOfRange { hole: u32, holes_count: u32 },
}

/// Whether the round gates statistics on per-hole commits.
///
/// Rounds started from a user course seed their holes uncommitted; rounds started from the
/// home club defaults count every stroke immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitGate {
    /// Holes start uncommitted and count once committed.
    PerHole,
    /// Every stroke counts as soon as it is recorded.
    Ungated,
}

impl CommitGate {
    /// Gate for a round started from a user course (`true`) or the home club.
    pub fn for_course(has_user_course: bool) -> Self {
        if has_user_course {
            CommitGate::PerHole
        } else {
            CommitGate::Ungated
        }
    }

    /// Initial `is_committed` of a freshly seeded hole.
    pub fn seeded_committed(self) -> bool {
        matches!(self, CommitGate::Ungated)
    }

    /// `is_counted` of a stroke added to a hole in the given commit state.
    pub fn counted_on_insert(self, hole_committed: bool) -> bool {
        match self {
            CommitGate::PerHole => hole_committed,
            CommitGate::Ungated => true,
        }
    }
}

/// Outcome of moving from the current hole to another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleMove {
    /// Hole being left.
    pub from: u32,
    /// Hole moved to.
    pub to: u32,
    /// The hole being left has to be committed first.
    pub commit_leaving: bool,
}

/// Decide how to move between holes. Only moving forward past an open, gated hole commits it.
pub fn plan_move(
    current: u32,
    target: u32,
    holes_count: u32,
    gate: CommitGate,
    current_committed: bool,
) -> Result<HoleMove, RoundStateError> {
    if target < 1 || target > holes_count {
        return Err(RoundStateError::HoleOutOfRange {
            hole: target,
            holes_count,
        });
    }

    let commit_leaving = gate == CommitGate::PerHole && !current_committed && target > current;
    Ok(HoleMove {
        from: current,
        to: target,
        commit_leaving,
    })
}

/// Hole bounds check for reads and stroke edits.
pub fn ensure_hole(hole: u32, holes_count: u32) -> Result<(), RoundStateError> {
    if hole < 1 || hole > holes_count {
        Err(RoundStateError::HoleOutOfRange { hole, holes_count })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_is_terminal() {
        assert_eq!(RoundStatus::Active.complete(), Ok(RoundStatus::Complete));
        assert_eq!(
            RoundStatus::Complete.complete(),
            Err(RoundStateError::AlreadyComplete)
        );
        assert!(RoundStatus::Complete.ensure_active().is_err());
    }

    #[test]
    fn forward_move_commits_open_gated_hole() {
        let step = plan_move(3, 4, 18, CommitGate::PerHole, false).unwrap();
        assert!(step.commit_leaving);

        let back = plan_move(3, 2, 18, CommitGate::PerHole, false).unwrap();
        assert!(!back.commit_leaving);

        let already = plan_move(3, 4, 18, CommitGate::PerHole, true).unwrap();
        assert!(!already.commit_leaving);

        let ungated = plan_move(3, 4, 18, CommitGate::Ungated, false).unwrap();
        assert!(!ungated.commit_leaving);
    }

    #[test]
    fn move_outside_course_is_rejected() {
        assert_eq!(
            plan_move(1, 0, 9, CommitGate::Ungated, true),
            Err(RoundStateError::HoleOutOfRange {
                hole: 0,
                holes_count: 9
            })
        );
        assert!(plan_move(9, 10, 9, CommitGate::Ungated, true).is_err());
    }

    #[test]
    fn gate_decides_counting() {
        assert!(!CommitGate::PerHole.seeded_committed());
        assert!(CommitGate::Ungated.seeded_committed());
        assert!(!CommitGate::PerHole.counted_on_insert(false));
        assert!(CommitGate::PerHole.counted_on_insert(true));
        assert!(CommitGate::Ungated.counted_on_insert(false));
    }
}
