//! Workout estimation
//!
//! Totals the duration, distance and calories of a workout. Each work unit is measured in its
//! own dimension; the other dimensions need a conversion, tried in this order:
//!
//! 1. the segment's own pace guidance (`@1:45`, the midpoint of `@1:45..1:50`, or a relative
//!    pace looked up in [`ReferencePaces`])
//! 2. the [`PaceModel`] of the [`EstimateContext`]
//!
//! A total is `None` as soon as one contribution to it cannot be converted.
//!
//! Rests count towards duration only. Each part of the workout counts `repeats - 1` rests: the
//! rest after its final repetition is never counted, whatever follows. `3x(2:00/1:00r)` is 8
//! minutes, not 9. Inside a group body rests are counted between iterations, and a group rest
//! takes the place of the trailing rest of the body's last part.

use crate::rwn::ast::{
    Chain, Group, Guidance, Interval, Modality, ReferenceDistance, RestUnit, Segment, WorkUnit,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Estimated totals of a workout
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub total_seconds: Option<f64>,
    pub total_meters: Option<f64>,
    pub total_calories: Option<f64>,
}

/// Conversions between work dimensions for a modality.
///
/// Every method defaults to "unknown".
pub trait PaceModel {
    /// Time needed for a unit of work
    fn seconds_for(&self, _work: &WorkUnit, _modality: Modality) -> Option<f64> {
        None
    }

    /// Distance covered in the given time
    fn meters_for(&self, _seconds: f64, _modality: Modality) -> Option<f64> {
        None
    }

    /// Calories burned in the given time
    fn calories_for(&self, _seconds: f64, _modality: Modality) -> Option<f64> {
        None
    }
}

/// Pace model driven by a fixed split (seconds per 500m) and calorie rate per modality
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitPaceModel {
    splits: BTreeMap<Modality, f64>,
    calories_per_minute: BTreeMap<Modality, f64>,
}

impl SplitPaceModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the split in seconds per 500m for a modality
    pub fn with_split(mut self, modality: Modality, seconds_per_500m: f64) -> Self {
        self.splits.insert(modality, seconds_per_500m);
        self
    }

    pub fn with_calories_per_minute(mut self, modality: Modality, calories: f64) -> Self {
        self.calories_per_minute.insert(modality, calories);
        self
    }

    pub fn split(&self, modality: Modality) -> Option<f64> {
        self.splits.get(&modality).copied().filter(|split| *split > 0.0)
    }

    pub fn calorie_rate(&self, modality: Modality) -> Option<f64> {
        self.calories_per_minute
            .get(&modality)
            .copied()
            .filter(|rate| *rate > 0.0)
    }
}

impl PaceModel for SplitPaceModel {
    fn seconds_for(&self, work: &WorkUnit, modality: Modality) -> Option<f64> {
        match work {
            WorkUnit::Duration { seconds } => Some(*seconds),
            WorkUnit::Distance { meters } => self.split(modality).map(|split| meters / 500.0 * split),
            WorkUnit::Calories { count } => self
                .calorie_rate(modality)
                .map(|rate| f64::from(*count) / rate * 60.0),
        }
    }

    fn meters_for(&self, seconds: f64, modality: Modality) -> Option<f64> {
        self.split(modality).map(|split| seconds / split * 500.0)
    }

    fn calories_for(&self, seconds: f64, modality: Modality) -> Option<f64> {
        self.calorie_rate(modality).map(|rate| seconds / 60.0 * rate)
    }
}

/// Personal paces (seconds per 500m) for the reference distances of relative guidance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferencePaces {
    paces: BTreeMap<ReferenceDistance, f64>,
}

impl ReferencePaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reference: ReferenceDistance, seconds_per_500m: f64) -> Self {
        self.insert(reference, seconds_per_500m);
        self
    }

    pub fn insert(&mut self, reference: ReferenceDistance, seconds_per_500m: f64) {
        self.paces.insert(reference, seconds_per_500m);
    }

    pub fn get(&self, reference: ReferenceDistance) -> Option<f64> {
        self.paces.get(&reference).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.paces.is_empty()
    }
}

/// What the estimator may use beyond the workout itself
#[derive(Clone, Copy, Default)]
pub struct EstimateContext<'a> {
    pub pace_model: Option<&'a dyn PaceModel>,
    pub reference_paces: Option<&'a ReferencePaces>,
}

impl<'a> EstimateContext<'a> {
    /// Pace in seconds per 500m stated by a guidance clause
    fn guidance_pace(&self, guidance: Option<&Guidance>) -> Option<f64> {
        let pace = match guidance? {
            Guidance::Pace { seconds_per_500m } => Some(*seconds_per_500m),
            Guidance::PaceRange { low, high } => Some((low + high) / 2.0),
            Guidance::RelativePace {
                reference,
                offset_seconds,
            } => self
                .reference_paces?
                .get(*reference)
                .map(|pace| pace + f64::from(*offset_seconds)),
            Guidance::Rate { .. } | Guidance::RateRange { .. } | Guidance::Zone { .. } => None,
        };
        pace.filter(|pace| *pace > 0.0)
    }

    fn work_tally(&self, work: &WorkUnit, modality: Modality, guidance: Option<&Guidance>) -> Tally {
        let pace = self.guidance_pace(guidance);
        let model = self.pace_model;

        let seconds = match work {
            WorkUnit::Duration { seconds } => Some(*seconds),
            WorkUnit::Distance { meters } => pace
                .map(|pace| meters / 500.0 * pace)
                .or_else(|| model.and_then(|model| model.seconds_for(work, modality))),
            WorkUnit::Calories { .. } => model.and_then(|model| model.seconds_for(work, modality)),
        };
        let meters = match work {
            WorkUnit::Distance { meters } => Some(*meters),
            _ => seconds.and_then(|seconds| {
                pace.map(|pace| seconds / pace * 500.0)
                    .or_else(|| model.and_then(|model| model.meters_for(seconds, modality)))
            }),
        };
        let calories = match work {
            WorkUnit::Calories { count } => Some(f64::from(*count)),
            _ => seconds.and_then(|seconds| model.and_then(|model| model.calories_for(seconds, modality))),
        };

        Tally {
            seconds,
            meters,
            calories,
        }
    }

    fn rest_seconds(&self, rest: Option<&RestUnit>, modality: Modality) -> Option<f64> {
        match rest.map(RestUnit::unit) {
            None => Some(0.0),
            Some(WorkUnit::Duration { seconds }) => Some(*seconds),
            Some(work) => self
                .pace_model
                .and_then(|model| model.seconds_for(work, modality)),
        }
    }
}

/// Running totals, `None` once a contribution is unknown
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tally {
    seconds: Option<f64>,
    meters: Option<f64>,
    calories: Option<f64>,
}

impl Tally {
    const ZERO: Tally = Tally {
        seconds: Some(0.0),
        meters: Some(0.0),
        calories: Some(0.0),
    };

    fn rest(seconds: Option<f64>) -> Self {
        Tally {
            seconds,
            ..Tally::ZERO
        }
    }

    fn plus(self, other: Tally) -> Self {
        Tally {
            seconds: add(self.seconds, other.seconds),
            meters: add(self.meters, other.meters),
            calories: add(self.calories, other.calories),
        }
    }

    fn times(self, count: u32) -> Self {
        let factor = f64::from(count);
        Tally {
            seconds: self.seconds.map(|value| value * factor),
            meters: self.meters.map(|value| value * factor),
            calories: self.calories.map(|value| value * factor),
        }
    }

    fn without_rest(self, rest: Option<f64>) -> Self {
        Tally {
            seconds: self.seconds.zip(rest).map(|(total, rest)| total - rest),
            ..self
        }
    }
}

fn add(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    a.zip(b).map(|(a, b)| a + b)
}

/// Full tally of a segment (every rest counted) and the seconds of its trailing rest
struct Measured {
    full: Tally,
    trailing_rest: Option<f64>,
}

fn measure(segment: &Segment, context: &EstimateContext) -> Measured {
    match segment {
        Segment::Steady(steady) => Measured {
            full: context.work_tally(&steady.work, steady.modality, steady.guidance.as_ref()),
            trailing_rest: Some(0.0),
        },
        Segment::Interval(interval) => measure_interval(interval, context),
        Segment::Group(group) => measure_group(group, context),
    }
}

fn measure_interval(interval: &Interval, context: &EstimateContext) -> Measured {
    let work = context.work_tally(&interval.work, interval.modality, interval.guidance.as_ref());
    let rest = context.rest_seconds(interval.rest.as_ref(), interval.modality);
    Measured {
        full: work.plus(Tally::rest(rest)).times(interval.repeats),
        trailing_rest: rest,
    }
}

fn measure_group(group: &Group, context: &EstimateContext) -> Measured {
    let body = measure_sequence(&group.body, context);
    match &group.group_rest {
        Some(rest) => {
            let modality = last_modality(&group.body);
            let rest = context.rest_seconds(Some(rest), modality);
            let iteration = body.full.without_rest(body.trailing_rest).plus(Tally::rest(rest));
            Measured {
                full: iteration.times(group.repeats),
                trailing_rest: rest,
            }
        }
        None => Measured {
            full: body.full.times(group.repeats),
            trailing_rest: body.trailing_rest,
        },
    }
}

fn measure_sequence(parts: &[Segment], context: &EstimateContext) -> Measured {
    parts.iter().fold(
        Measured {
            full: Tally::ZERO,
            trailing_rest: Some(0.0),
        },
        |sum, part| {
            let measured = measure(part, context);
            Measured {
                full: sum.full.plus(measured.full),
                trailing_rest: measured.trailing_rest,
            }
        },
    )
}

fn last_modality(parts: &[Segment]) -> Modality {
    let mut modality = Modality::default();
    for part in parts {
        part.walk(&mut |segment| {
            if let Some(found) = segment.modality() {
                modality = found;
            }
        });
    }
    modality
}

/// Estimate the totals of a workout. Never fails; unknown totals are `None`.
pub fn estimate(chain: &Chain, context: &EstimateContext) -> Estimate {
    let total = chain.parts.iter().fold(Tally::ZERO, |sum, part| {
        let measured = measure(part, context);
        sum.plus(measured.full.without_rest(measured.trailing_rest))
    });
    Estimate {
        total_seconds: total.seconds,
        total_meters: total.meters,
        total_calories: total.calories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rwn::parsing::parse_str;

    fn seconds(source: &str) -> Option<f64> {
        estimate(&parse_str(source).unwrap(), &EstimateContext::default()).total_seconds
    }

    #[test]
    fn test_trailing_rest_dropped() {
        assert_eq!(seconds("3x(2:00/1:00r)"), Some(480.0));
        assert_eq!(seconds("4x2:00/1:00r"), Some(660.0));
        assert_eq!(seconds("2:00/1:00r"), Some(120.0));
    }

    #[test]
    fn test_final_rest_dropped_per_part() {
        assert_eq!(seconds("4x2:00/1:00r + 5:00"), Some(960.0));
        assert_eq!(seconds("3x(2:00)/1:00r + 5:00"), Some(780.0));
        assert_eq!(seconds("10:00 + 3x(2:00/1:00r)"), Some(1080.0));
        assert_eq!(seconds("2x2:00/1:00r + 2x2:00/1:00r"), Some(600.0));
    }

    #[test]
    fn test_body_rests_count_between_iterations() {
        // 2 * (4 * 60 + 4 * 30) - 30
        assert_eq!(seconds("2x(4x1:00/0:30r) + 1:00"), Some(690.0 + 60.0));
    }

    #[test]
    fn test_group_rest_replaces_body_trailing_rest() {
        // each iteration: 2:00 + 1:00r + 2:00 + (5:00r instead of 1:00r)
        assert_eq!(seconds("3x(2:00/1:00r + 2:00/1:00r)/5:00r"), Some(3.0 * 600.0 - 300.0));
    }

    #[test]
    fn test_distance_needs_a_pace() {
        let chain = parse_str("4x500m/1:00r").unwrap();
        let bare = estimate(&chain, &EstimateContext::default());
        assert_eq!(bare.total_seconds, None);
        assert_eq!(bare.total_meters, Some(2000.0));
        assert_eq!(bare.total_calories, None);

        let model = SplitPaceModel::new().with_split(Modality::Row, 120.0);
        let context = EstimateContext {
            pace_model: Some(&model),
            reference_paces: None,
        };
        let estimated = estimate(&chain, &context);
        assert_eq!(estimated.total_seconds, Some(4.0 * 120.0 + 3.0 * 60.0));
    }

    #[test]
    fn test_guidance_pace_wins_over_model() {
        let model = SplitPaceModel::new().with_split(Modality::Row, 120.0);
        let context = EstimateContext {
            pace_model: Some(&model),
            reference_paces: None,
        };
        let chain = parse_str("2000m@1:45..1:55").unwrap();
        assert_eq!(estimate(&chain, &context).total_seconds, Some(4.0 * 110.0));

        let chain = parse_str("30:00@2:00").unwrap();
        assert_eq!(estimate(&chain, &context).total_meters, Some(7500.0));
    }

    #[test]
    fn test_relative_pace_uses_reference_paces() {
        let chain = parse_str("2000m@2k+10").unwrap();
        let references = ReferencePaces::new().with(ReferenceDistance::K2, 100.0);
        let context = EstimateContext {
            pace_model: None,
            reference_paces: Some(&references),
        };
        assert_eq!(estimate(&chain, &context).total_seconds, Some(440.0));
        assert_eq!(
            estimate(&chain, &EstimateContext::default()).total_seconds,
            None
        );
    }

    #[test]
    fn test_calories() {
        let model = SplitPaceModel::new()
            .with_split(Modality::Bike, 100.0)
            .with_calories_per_minute(Modality::Bike, 15.0);
        let context = EstimateContext {
            pace_model: Some(&model),
            reference_paces: None,
        };
        let chain = parse_str("Bike: 4x30cal/1:00r").unwrap();
        let estimated = estimate(&chain, &context);
        assert_eq!(estimated.total_calories, Some(120.0));
        assert_eq!(estimated.total_seconds, Some(4.0 * 120.0 + 3.0 * 60.0));
        assert_eq!(estimated.total_meters, Some(4.0 * 600.0));
    }

    #[test]
    fn test_distance_rest_counts_time_not_meters() {
        let model = SplitPaceModel::new().with_split(Modality::Row, 120.0);
        let context = EstimateContext {
            pace_model: Some(&model),
            reference_paces: None,
        };
        let chain = parse_str("3x500m/250mr + 5:00").unwrap();
        let estimated = estimate(&chain, &context);
        assert_eq!(estimated.total_meters, Some(1500.0 + 1250.0));
        assert_eq!(estimated.total_seconds, Some(3.0 * 120.0 + 2.0 * 60.0 + 300.0));
    }
}
