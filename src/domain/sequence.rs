//! Ordinal list maintenance: stroke insertion within a hole and dense `sort_order` repacking.

use uuid::Uuid;

use crate::domain::stroke::StrokeType;

/// Position of an existing stroke within its hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Stroke identifier.
    pub id: Uuid,
    /// Current position.
    pub seq: u32,
    /// Kind of shot, which decides where new strokes go.
    pub stroke_type: StrokeType,
}

/// One `seq` rewrite required before inserting a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqShift {
    /// Stroke to move.
    pub id: Uuid,
    /// Current `seq`.
    pub from: u32,
    /// New `seq`.
    pub to: u32,
}

/// Where a new stroke goes and which strokes move out of its way.
///
/// `shifts` is ordered from the highest `seq` down so applying them one by one never
/// produces two strokes sharing a `seq`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPlan {
    /// `seq` of the new stroke.
    pub seq: u32,
    /// Rewrites to apply first, highest `seq` first.
    pub shifts: Vec<SeqShift>,
}

/// Plan the insertion of a `stroke_type` stroke into a hole holding `existing`.
///
/// The new stroke lands just before the first stroke (by `seq`) whose type ranks after it in
/// canonical order, or at the end when there is none. `seq` gaps left by deletions are kept.
pub fn plan_insertion(existing: &[Slot], stroke_type: StrokeType) -> InsertionPlan {
    let mut sorted = existing.to_vec();
    sorted.sort_by_key(|slot| slot.seq);

    let max_seq = sorted.last().map(|slot| slot.seq).unwrap_or(0);
    let rank = stroke_type.rank();

    let target = sorted
        .iter()
        .find(|slot| slot.stroke_type.rank() > rank)
        .map(|slot| slot.seq)
        .unwrap_or(max_seq + 1);

    let shifts = sorted
        .iter()
        .rev()
        .filter(|slot| slot.seq >= target)
        .map(|slot| SeqShift {
            id: slot.id,
            from: slot.seq,
            to: slot.seq + 1,
        })
        .collect();

    InsertionPlan {
        seq: target,
        shifts,
    }
}

/// Entry of an ordinal-sorted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordinal {
    /// Item identifier.
    pub id: Uuid,
    /// Current position.
    pub sort_order: u32,
}

/// Rewrites that turn `items` (already in display order) into the dense sequence `1..=N`.
///
/// Items already holding their target value are skipped.
pub fn repack(items: &[Ordinal]) -> Vec<Ordinal> {
    items
        .iter()
        .zip(1u32..)
        .filter(|(item, expected)| item.sort_order != *expected)
        .map(|(item, expected)| Ordinal {
            id: item.id,
            sort_order: expected,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn slots(types: &[(u32, StrokeType)]) -> Vec<Slot> {
        types
            .iter()
            .map(|(seq, stroke_type)| Slot {
                id: Uuid::new_v4(),
                seq: *seq,
                stroke_type: *stroke_type,
            })
            .collect()
    }

    fn apply(existing: &[Slot], plan: &InsertionPlan) -> Vec<u32> {
        let mut seqs: Vec<u32> = existing
            .iter()
            .map(|slot| {
                plan.shifts
                    .iter()
                    .find(|shift| shift.id == slot.id)
                    .map(|shift| shift.to)
                    .unwrap_or(slot.seq)
            })
            .collect();
        seqs.push(plan.seq);
        seqs
    }

    #[test]
    fn putt_appends_after_existing_putts() {
        let existing = slots(&[
            (1, StrokeType::Tee),
            (2, StrokeType::Approach),
            (3, StrokeType::Putt),
            (4, StrokeType::Putt),
        ]);
        let plan = plan_insertion(&existing, StrokeType::Putt);
        assert_eq!(plan.seq, 5);
        assert!(plan.shifts.is_empty());
    }

    #[test]
    fn bunker_slots_before_approach_and_shifts_the_rest() {
        let existing = slots(&[
            (1, StrokeType::Tee),
            (2, StrokeType::Approach),
            (3, StrokeType::Putt),
            (4, StrokeType::Putt),
        ]);
        let plan = plan_insertion(&existing, StrokeType::FairwayBunker);

        assert_eq!(plan.seq, 2);
        let moved: Vec<(u32, u32)> = plan.shifts.iter().map(|s| (s.from, s.to)).collect();
        assert_eq!(moved, vec![(4, 5), (3, 4), (2, 3)]);
    }

    #[test]
    fn gaps_from_deletions_are_tolerated() {
        let existing = slots(&[(1, StrokeType::Tee), (4, StrokeType::Putt)]);
        let plan = plan_insertion(&existing, StrokeType::Approach);
        assert_eq!(plan.seq, 4);
        assert_eq!(plan.shifts.len(), 1);
        assert_eq!(plan.shifts[0].to, 5);
    }

    #[test]
    fn empty_hole_starts_at_one() {
        let plan = plan_insertion(&[], StrokeType::Penalty);
        assert_eq!(plan.seq, 1);
        assert!(plan.shifts.is_empty());
    }

    #[test]
    fn insertion_never_duplicates_seq() {
        let shapes: Vec<Vec<(u32, StrokeType)>> = vec![
            vec![],
            vec![(1, StrokeType::Putt)],
            vec![(1, StrokeType::Tee), (2, StrokeType::Putt), (3, StrokeType::Putt)],
            vec![(2, StrokeType::Tee), (5, StrokeType::ChipPitch), (9, StrokeType::Putt)],
            vec![
                (1, StrokeType::Tee),
                (2, StrokeType::LayUp),
                (3, StrokeType::Approach),
                (4, StrokeType::Putt),
                (5, StrokeType::Putt),
            ],
        ];

        for shape in shapes {
            let existing = slots(&shape);
            for stroke_type in StrokeType::CANONICAL {
                let plan = plan_insertion(&existing, stroke_type);
                let seqs = apply(&existing, &plan);
                let unique: HashSet<_> = seqs.iter().collect();
                assert_eq!(unique.len(), seqs.len(), "{shape:?} + {stroke_type:?}");
            }
        }
    }

    #[test]
    fn repack_rewrites_only_out_of_place_items() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let items = [
            Ordinal {
                id: ids[0],
                sort_order: 1,
            },
            Ordinal {
                id: ids[1],
                sort_order: 3,
            },
            Ordinal {
                id: ids[2],
                sort_order: 4,
            },
        ];

        let rewrites = repack(&items);
        assert_eq!(
            rewrites,
            vec![
                Ordinal {
                    id: ids[1],
                    sort_order: 2
                },
                Ordinal {
                    id: ids[2],
                    sort_order: 3
                },
            ]
        );
    }
}
