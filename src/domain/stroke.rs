//! Stroke types, their canonical order and the par-driven seeding patterns.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of shot recorded on a hole. Serialized with the names the store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum StrokeType {
    #[serde(rename = "TeeShot")]
    /// Tee shot.
    Tee,
    #[serde(rename = "Recovery")]
    /// Recovery from trouble.
    Recovery,
    #[serde(rename = "LayUp")]
    /// Lay-up.
    LayUp,
    #[serde(rename = "F-Bunker")]
    /// Fairway bunker shot.
    FairwayBunker,
    #[serde(rename = "Approach")]
    /// Approach to the green.
    Approach,
    #[serde(rename = "ChipPitch", alias = "Chip", alias = "Pitch")]
    /// Chip or pitch.
    ChipPitch,
    #[serde(rename = "G-Bunker")]
    /// Greenside bunker shot.
    GreensideBunker,
    #[serde(rename = "Penalty")]
    /// Penalty stroke.
    Penalty,
    #[serde(rename = "Other")]
    /// Anything else.
    Other,
    #[serde(rename = "Putt")]
    /// Putt.
    Putt,
}

impl StrokeType {
    /// Every stroke type in canonical order: tee shot first, putt last.
    pub const CANONICAL: [StrokeType; 10] = [
        StrokeType::Tee,
        StrokeType::Recovery,
        StrokeType::LayUp,
        StrokeType::FairwayBunker,
        StrokeType::Approach,
        StrokeType::ChipPitch,
        StrokeType::GreensideBunker,
        StrokeType::Penalty,
        StrokeType::Other,
        StrokeType::Putt,
    ];

    /// 1-based position in [`StrokeType::CANONICAL`].
    pub fn rank(self) -> u8 {
        match self {
            StrokeType::Tee => 1,
            StrokeType::Recovery => 2,
            StrokeType::LayUp => 3,
            StrokeType::FairwayBunker => 4,
            StrokeType::Approach => 5,
            StrokeType::ChipPitch => 6,
            StrokeType::GreensideBunker => 7,
            StrokeType::Penalty => 8,
            StrokeType::Other => 9,
            StrokeType::Putt => 10,
        }
    }

    /// Name the store persists for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            StrokeType::Tee => "TeeShot",
            StrokeType::Recovery => "Recovery",
            StrokeType::LayUp => "LayUp",
            StrokeType::FairwayBunker => "F-Bunker",
            StrokeType::Approach => "Approach",
            StrokeType::ChipPitch => "ChipPitch",
            StrokeType::GreensideBunker => "G-Bunker",
            StrokeType::Penalty => "Penalty",
            StrokeType::Other => "Other",
            StrokeType::Putt => "Putt",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            StrokeType::Tee => "Tee Shot",
            StrokeType::Recovery => "Recovery",
            StrokeType::LayUp => "Lay-up",
            StrokeType::FairwayBunker => "Bunker (F)",
            StrokeType::Approach => "Approach",
            StrokeType::ChipPitch => "Chip/Pitch",
            StrokeType::GreensideBunker => "Bunker (G)",
            StrokeType::Penalty => "Penalty",
            StrokeType::Other => "Other",
            StrokeType::Putt => "Putt",
        }
    }
}

const PAR_3: &[StrokeType] = &[StrokeType::Tee, StrokeType::Putt, StrokeType::Putt];
const PAR_4: &[StrokeType] = &[
    StrokeType::Tee,
    StrokeType::Approach,
    StrokeType::Putt,
    StrokeType::Putt,
];
const PAR_5: &[StrokeType] = &[
    StrokeType::Tee,
    StrokeType::LayUp,
    StrokeType::Approach,
    StrokeType::Putt,
    StrokeType::Putt,
];

/// Placeholder strokes seeded for a hole of the given par. Unknown pars get the par-4 pattern.
pub fn pattern_for_par(par: u8) -> &'static [StrokeType] {
    match par {
        3 => PAR_3,
        5 => PAR_5,
        _ => PAR_4,
    }
}

/// Par used when seeding a round from a course: anything but 3, 4 or 5 becomes `default_par`.
pub fn seeding_par(par: Option<u8>, default_par: u8) -> u8 {
    match par {
        Some(par @ 3..=5) => par,
        _ => default_par,
    }
}

/// Par accepted when editing a course or home club layout.
pub fn clamp_par(par: u8) -> u8 {
    par.clamp(3, 6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_depend_only_on_par() {
        assert_eq!(
            pattern_for_par(3),
            [StrokeType::Tee, StrokeType::Putt, StrokeType::Putt]
        );
        assert_eq!(
            pattern_for_par(5),
            [
                StrokeType::Tee,
                StrokeType::LayUp,
                StrokeType::Approach,
                StrokeType::Putt,
                StrokeType::Putt
            ]
        );
        for par in [0, 1, 2, 4, 6, 7, 255] {
            assert_eq!(
                pattern_for_par(par),
                [
                    StrokeType::Tee,
                    StrokeType::Approach,
                    StrokeType::Putt,
                    StrokeType::Putt
                ]
            );
        }
    }

    #[test]
    fn canonical_order_matches_rank() {
        for (index, stroke_type) in StrokeType::CANONICAL.iter().enumerate() {
            assert_eq!(usize::from(stroke_type.rank()), index + 1);
        }
    }

    #[test]
    fn store_names_round_trip_and_accept_legacy_chip() {
        for stroke_type in StrokeType::CANONICAL {
            let json = serde_json::to_string(&stroke_type).unwrap();
            assert_eq!(json, format!("\"{}\"", stroke_type.as_str()));
        }
        let legacy: StrokeType = serde_json::from_str("\"Chip\"").unwrap();
        assert_eq!(legacy, StrokeType::ChipPitch);
    }

    #[test]
    fn seeding_par_falls_back_for_unusual_holes() {
        assert_eq!(seeding_par(Some(3), 4), 3);
        assert_eq!(seeding_par(Some(6), 4), 4);
        assert_eq!(seeding_par(None, 4), 4);
        assert_eq!(clamp_par(2), 3);
        assert_eq!(clamp_par(9), 6);
    }
}
