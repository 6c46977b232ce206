//! Mental-focus statistics over counted strokes: percentages, trends, sparklines and callouts.

use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{config::StatsConfig, domain::stroke::StrokeType};

/// The part of a counted stroke statistics care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeSample {
    /// Hole the stroke was played on.
    pub hole_number: u32,
    /// Kind of shot.
    pub stroke_type: StrokeType,
    /// Whether the mental cue was executed.
    pub mental_ok: bool,
}

/// Running `ok / total` counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Focused strokes.
    pub ok: u32,
    /// Counted strokes.
    pub total: u32,
}

impl Tally {
    /// Count one stroke.
    pub fn record(&mut self, mental_ok: bool) {
        self.total += 1;
        if mental_ok {
            self.ok += 1;
        }
    }

    /// Tally of `samples`.
    pub fn of<'a>(samples: impl IntoIterator<Item = &'a StrokeSample>) -> Self {
        let mut tally = Tally::default();
        for sample in samples {
            tally.record(sample.mental_ok);
        }
        tally
    }

    /// Rounded focus percentage, `None` when empty.
    pub fn pct(&self) -> Option<u32> {
        percentage(self.ok, self.total)
    }
}

/// `round(100 * ok / total)`, undefined when nothing was counted.
pub fn percentage(ok: u32, total: u32) -> Option<u32> {
    if total == 0 {
        return None;
    }
    Some((f64::from(ok) * 100.0 / f64::from(total)).round() as u32)
}

/// Direction of the latest round against its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Better than the baseline.
    Up,
    /// Worse than the baseline.
    Down,
    /// Within the deadband.
    Stable,
}

/// `Up` when `delta >= deadband`, `Down` when `delta <= -deadband`, `Stable` in between.
pub fn classify(delta: i32, deadband: i32) -> Trend {
    if delta >= deadband {
        Trend::Up
    } else if delta <= -deadband {
        Trend::Down
    } else {
        Trend::Stable
    }
}

/// Direction label of the dashboard summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SummaryTrend {
    /// Moving in the good direction.
    Improving,
    /// Within the deadband or too few rounds.
    Flat,
    /// Moving in the bad direction.
    Declining,
}

/// Compare the newest value of a window against its oldest one.
///
/// `higher_is_better` is false for stroke counts, where fewer strokes means improving.
pub fn summary_trend(newest_first: &[i64], higher_is_better: bool, deadband: i64) -> SummaryTrend {
    let (Some(latest), Some(oldest)) = (newest_first.first(), newest_first.last()) else {
        return SummaryTrend::Flat;
    };
    if newest_first.len() < 2 {
        return SummaryTrend::Flat;
    }

    let delta = latest - oldest;
    if delta.abs() < deadband {
        return SummaryTrend::Flat;
    }

    let improving = if higher_is_better { delta > 0 } else { delta < 0 };
    if improving {
        SummaryTrend::Improving
    } else {
        SummaryTrend::Declining
    }
}

/// Rounded mean of the defined values, `None` when there are none.
pub fn rounded_average(values: impl IntoIterator<Item = Option<u32>>) -> Option<u32> {
    let defined: Vec<u32> = values.into_iter().flatten().collect();
    if defined.is_empty() {
        return None;
    }
    let sum: u64 = defined.iter().map(|value| u64::from(*value)).sum();
    Some((sum as f64 / defined.len() as f64).round() as u32)
}

/// Latest value against the average of prior values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TrendComparison {
    /// Latest value.
    pub current: Option<u32>,
    /// Rounded average of the defined prior values.
    pub baseline: Option<u32>,
    /// `current - baseline` when both are defined.
    pub delta: Option<i32>,
    /// Classification of `delta`.
    pub trend: Option<Trend>,
}

/// Compare `current` with the rounded average of `prior`, ignoring undefined prior values.
pub fn compare(current: Option<u32>, prior: &[Option<u32>], deadband: i32) -> TrendComparison {
    let baseline = rounded_average(prior.iter().copied());
    let delta = match (current, baseline) {
        (Some(current), Some(baseline)) => Some(current as i32 - baseline as i32),
        _ => None,
    };

    TrendComparison {
        current,
        baseline,
        delta,
        trend: delta.map(|delta| classify(delta, deadband)),
    }
}

/// Bar heights (0..=100) for a sequence of nullable percentages.
pub fn sparkline(values: &[Option<u32>]) -> Vec<u32> {
    let clean: Vec<u32> = values.iter().map(|value| value.unwrap_or(0)).collect();
    let max = clean.iter().copied().max().unwrap_or(0).max(1);
    clean
        .iter()
        .map(|value| (f64::from(*value) * 100.0 / f64::from(max)).round() as u32)
        .collect()
}

/// Tallies per stroke type, in canonical order.
pub fn tally_by_type(samples: &[StrokeSample]) -> IndexMap<StrokeType, Tally> {
    let mut tallies: IndexMap<StrokeType, Tally> = StrokeType::CANONICAL
        .iter()
        .map(|stroke_type| (*stroke_type, Tally::default()))
        .collect();
    for sample in samples {
        if let Some(tally) = tallies.get_mut(&sample.stroke_type) {
            tally.record(sample.mental_ok);
        }
    }
    tallies
}

/// Per stroke type focus for the latest round against the prior rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StrokeTypeBreakdown {
    /// Stroke type of this row.
    pub stroke_type: StrokeType,
    /// Display label.
    pub label: &'static str,
    #[serde(flatten)]
    /// Latest round against the prior rounds.
    pub comparison: TrendComparison,
    /// Bar heights, prior rounds oldest to newest, then the latest round.
    pub spark: Vec<u32>,
    /// Counted attempts across the latest and prior rounds.
    pub attempts: u32,
}

/// Breakdown for every stroke type attempted in `latest` or `prior_newest_first`.
pub fn breakdown(
    latest: &[StrokeSample],
    prior_newest_first: &[Vec<StrokeSample>],
    deadband: i32,
) -> Vec<StrokeTypeBreakdown> {
    let latest_tallies = tally_by_type(latest);
    let prior_tallies: Vec<IndexMap<StrokeType, Tally>> = prior_newest_first
        .iter()
        .map(|round| tally_by_type(round))
        .collect();

    latest_tallies
        .iter()
        .filter_map(|(stroke_type, latest_tally)| {
            let prior: Vec<Tally> = prior_tallies
                .iter()
                .map(|tallies| tallies.get(stroke_type).copied().unwrap_or_default())
                .collect();

            let attempts = latest_tally.total + prior.iter().map(|tally| tally.total).sum::<u32>();
            if attempts == 0 {
                return None;
            }

            let prior_pcts: Vec<Option<u32>> = prior.iter().map(Tally::pct).collect();
            let comparison = compare(latest_tally.pct(), &prior_pcts, deadband);

            let mut series: Vec<Option<u32>> = prior_pcts.iter().rev().copied().collect();
            series.push(latest_tally.pct());

            Some(StrokeTypeBreakdown {
                stroke_type: *stroke_type,
                label: stroke_type.label(),
                comparison,
                spark: sparkline(&series),
                attempts,
            })
        })
        .collect()
}

/// Late-round callout flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CalloutKind {
    /// Focus slips late in the round.
    Focus,
    /// No drop detected.
    Highlight,
}

/// Late-round focus compared to the whole round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LateRoundCallout {
    /// Card heading naming the hole window.
    pub title: String,
    /// Focus on the late holes, `None` when none were counted.
    pub pct: Option<u32>,
    /// Focus over the whole round.
    pub round_pct: Option<u32>,
    /// Slip or neutral.
    pub kind: CalloutKind,
    /// Card body text.
    pub copy: &'static str,
}

/// Flag a late-round slip when the late window trails the round by `late_slip_points` or more.
pub fn late_round(samples: &[StrokeSample], config: &StatsConfig) -> LateRoundCallout {
    let late = Tally::of(samples.iter().filter(|sample| config.in_late_window(sample.hole_number)));
    let whole = Tally::of(samples);

    let slipped = match (late.pct(), whole.pct()) {
        (Some(late_pct), Some(round_pct)) if late.total > 0 => {
            late_pct as i32 - round_pct as i32 <= -config.late_slip_points
        }
        _ => false,
    };

    let (kind, copy) = if slipped {
        (
            CalloutKind::Focus,
            "Focus is lower here relative to your round average.",
        )
    } else {
        (CalloutKind::Highlight, "No strong late-round drop detected.")
    };

    LateRoundCallout {
        title: format!(
            "Late Round (Holes {}\u{2013}{})",
            config.late_first_hole, config.late_last_hole
        ),
        pct: late.pct(),
        round_pct: whole.pct(),
        kind,
        copy,
    }
}

/// Deterministic, factual statements about one round for the history list.
pub fn highlights(samples: &[StrokeSample], config: &StatsConfig) -> Vec<String> {
    let mut notes = Vec::new();
    let Some(focus) = Tally::of(samples).pct() else {
        notes.push("No strong patterns detected yet.".to_string());
        return notes;
    };
    let focus = focus as i32;
    let by_type = tally_by_type(samples);

    if let Some(tee) = by_type.get(&StrokeType::Tee)
        && tee.total >= config.highlight_min_type_strokes
        && let Some(tee_pct) = tee.pct()
        && tee_pct as i32 >= focus + config.highlight_margin
    {
        notes.push("Strong Tee focus".to_string());
    }

    if let Some(putt) = by_type.get(&StrokeType::Putt)
        && putt.total >= config.highlight_min_type_strokes
        && let Some(putt_pct) = putt.pct()
        && putt_pct as i32 <= focus - config.highlight_margin
    {
        notes.push("Putting focus struggled".to_string());
    }

    let early = Tally::of(
        samples
            .iter()
            .filter(|sample| (1..=config.early_last_hole).contains(&sample.hole_number)),
    );
    let late = Tally::of(samples.iter().filter(|sample| config.in_late_window(sample.hole_number)));
    if early.total >= config.highlight_min_window_strokes
        && late.total >= config.highlight_min_window_strokes
        && let (Some(early_pct), Some(late_pct)) = (early.pct(), late.pct())
        && late_pct as i32 <= early_pct as i32 - config.highlight_dip_points
    {
        notes.push(format!(
            "Focus dip on {}\u{2013}{}",
            config.late_first_hole, config.late_last_hole
        ));
    }

    if notes.is_empty() {
        notes.push("No strong patterns detected yet.".to_string());
    }
    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(hole_number: u32, stroke_type: StrokeType, mental_ok: bool) -> StrokeSample {
        StrokeSample {
            hole_number,
            stroke_type,
            mental_ok,
        }
    }

    /// `ok` focused strokes out of `total` on every hole in `holes`.
    fn holes(holes: std::ops::RangeInclusive<u32>, ok: usize, total: usize) -> Vec<StrokeSample> {
        holes
            .flat_map(|hole| {
                (0..total).map(move |index| sample(hole, StrokeType::Approach, index < ok))
            })
            .collect()
    }

    #[test]
    fn percentage_rounds_and_is_undefined_without_strokes() {
        assert_eq!(percentage(0, 0), None);
        assert_eq!(percentage(3, 4), Some(75));
        assert_eq!(percentage(1, 3), Some(33));
        assert_eq!(percentage(2, 3), Some(67));
        assert_eq!(percentage(54, 72), Some(75));
    }

    #[test]
    fn classification_is_monotonic_in_delta() {
        assert_eq!(classify(3, 3), Trend::Up);
        assert_eq!(classify(40, 3), Trend::Up);
        assert_eq!(classify(2, 3), Trend::Stable);
        assert_eq!(classify(-2, 3), Trend::Stable);
        assert_eq!(classify(-3, 3), Trend::Down);
        assert_eq!(classify(2, 2), Trend::Up);
        assert_eq!(classify(-2, 2), Trend::Down);
    }

    #[test]
    fn latest_versus_prior_five_average() {
        let prior = [Some(70), Some(72), Some(68), Some(74), Some(71)];
        let comparison = compare(Some(75), &prior, 3);
        assert_eq!(comparison.baseline, Some(71));
        assert_eq!(comparison.delta, Some(4));
        assert_eq!(comparison.trend, Some(Trend::Up));
    }

    #[test]
    fn baseline_ignores_rounds_without_counted_strokes() {
        let comparison = compare(Some(50), &[None, Some(60), None], 3);
        assert_eq!(comparison.baseline, Some(60));
        assert_eq!(comparison.trend, Some(Trend::Down));

        let undefined = compare(Some(50), &[None, None], 3);
        assert_eq!(undefined.delta, None);
        assert_eq!(undefined.trend, None);
    }

    #[test]
    fn summary_trend_uses_window_ends_and_direction() {
        assert_eq!(summary_trend(&[80], true, 2), SummaryTrend::Flat);
        assert_eq!(summary_trend(&[], true, 2), SummaryTrend::Flat);
        assert_eq!(summary_trend(&[72, 90, 70], true, 2), SummaryTrend::Improving);
        assert_eq!(summary_trend(&[71, 70], true, 2), SummaryTrend::Flat);
        assert_eq!(summary_trend(&[60, 70], true, 2), SummaryTrend::Declining);
        assert_eq!(summary_trend(&[70, 80], false, 2), SummaryTrend::Improving);
        assert_eq!(summary_trend(&[80, 70], false, 2), SummaryTrend::Declining);
    }

    #[test]
    fn sparkline_scales_against_maximum() {
        assert_eq!(sparkline(&[Some(25), None, Some(50)]), vec![50, 0, 100]);
        assert_eq!(sparkline(&[None, None]), vec![0, 0]);
        assert_eq!(sparkline(&[Some(0), Some(1)]), vec![0, 100]);
    }

    #[test]
    fn breakdown_skips_unattempted_types_and_orders_spark() {
        let latest = vec![
            sample(1, StrokeType::Tee, true),
            sample(1, StrokeType::Putt, false),
        ];
        let prior = vec![
            vec![sample(1, StrokeType::Tee, false)],
            vec![sample(1, StrokeType::Tee, true), sample(2, StrokeType::Tee, true)],
        ];

        let rows = breakdown(&latest, &prior, 3);
        let types: Vec<StrokeType> = rows.iter().map(|row| row.stroke_type).collect();
        assert_eq!(types, vec![StrokeType::Tee, StrokeType::Putt]);

        let tee = &rows[0];
        assert_eq!(tee.comparison.current, Some(100));
        assert_eq!(tee.comparison.baseline, Some(50));
        assert_eq!(tee.comparison.trend, Some(Trend::Up));
        // oldest prior (100) , newer prior (0), latest (100)
        assert_eq!(tee.spark, vec![100, 0, 100]);
        assert_eq!(tee.attempts, 4);

        let putt = &rows[1];
        assert_eq!(putt.comparison.current, Some(0));
        assert_eq!(putt.comparison.baseline, None);
        assert_eq!(putt.comparison.trend, None);
    }

    #[test]
    fn late_round_slip_needs_ten_points() {
        let config = StatsConfig::default();
        let mut round = holes(1..=12, 4, 4);
        round.extend(holes(13..=16, 2, 4));
        let callout = late_round(&round, &config);
        assert_eq!(callout.kind, CalloutKind::Focus);
        assert_eq!(callout.pct, Some(50));

        let even = holes(1..=18, 3, 4);
        assert_eq!(late_round(&even, &config).kind, CalloutKind::Highlight);
    }

    #[test]
    fn late_round_without_late_strokes_is_neutral() {
        let config = StatsConfig::default();
        let front_nine = holes(1..=9, 1, 4);
        let callout = late_round(&front_nine, &config);
        assert_eq!(callout.kind, CalloutKind::Highlight);
        assert_eq!(callout.pct, None);
        assert_eq!(callout.round_pct, Some(25));
    }

    #[test]
    fn highlights_report_factual_patterns() {
        let config = StatsConfig::default();
        let mut round = holes(1..=6, 4, 4);
        round.extend(holes(13..=16, 1, 4));
        round.extend((1..=3).map(|hole| sample(hole, StrokeType::Tee, true)));

        let notes = highlights(&round, &config);
        assert!(notes.contains(&"Strong Tee focus".to_string()));
        assert!(notes.contains(&"Focus dip on 13\u{2013}16".to_string()));

        assert_eq!(
            highlights(&[], &config),
            vec!["No strong patterns detected yet.".to_string()]
        );
    }

    #[test]
    fn dip_note_has_its_own_threshold() {
        // early 100%, late 80%
        let mut round = holes(1..=6, 4, 4);
        round.extend(holes(13..=16, 4, 5));
        let dip = "Focus dip on 13\u{2013}16".to_string();

        let lenient_callout = StatsConfig {
            late_slip_points: 50,
            ..StatsConfig::default()
        };
        assert!(highlights(&round, &lenient_callout).contains(&dip));

        let strict_dip = StatsConfig {
            highlight_dip_points: 25,
            ..StatsConfig::default()
        };
        assert!(!highlights(&round, &strict_dip).contains(&dip));
    }
}
