//! Estimation through the engine: rest rules, pace sources and unknown totals

use rstest::rstest;
use rwn::rwn::ast::{Modality, ReferenceDistance};
use rwn::rwn::estimate::{ReferencePaces, SplitPaceModel};
use rwn::{parse_workout, Engine};

fn seconds(text: &str) -> Option<f64> {
    parse_workout(text).estimate.and_then(|estimate| estimate.total_seconds)
}

fn rowing_engine() -> Engine {
    Engine::default()
        .with_pace_model(
            SplitPaceModel::new()
                .with_split(Modality::Row, 120.0)
                .with_split(Modality::Bike, 60.0)
                .with_calories_per_minute(Modality::Row, 15.0),
        )
        .with_reference_paces(
            ReferencePaces::new()
                .with(ReferenceDistance::K2, 100.0)
                .with(ReferenceDistance::K6, 110.0),
        )
}

#[rstest]
#[case::grouped_single_interval("3x(2:00/1:00r)", 480.0)]
#[case::interval("4x2:00/1:00r", 660.0)]
#[case::final_rest_dropped_before_next_part("4x2:00/1:00r + 5:00", 960.0)]
#[case::final_group_rest_dropped("3x(2:00)/1:00r + 5:00", 780.0)]
#[case::group_rest_replaces_body_rest("3x(2:00/1:00r + 2:00/1:00r)/5:00r", 1500.0)]
#[case::no_rest("2x10:00", 1200.0)]
#[case::pace_guidance("2x500m@2:00/1:00r", 300.0)]
#[case::pace_range_midpoint("1000m@1:50..2:10", 240.0)]
#[case::hours("1:00:00 + 30:00", 5400.0)]
fn test_total_seconds_without_model(#[case] text: &str, #[case] expected: f64) {
    assert_eq!(seconds(text), Some(expected), "{}", text);
}

#[test]
fn test_unknown_without_conversion() {
    let estimate = parse_workout("2000m + 10:00").estimate.unwrap();
    assert_eq!(estimate.total_seconds, None);
    assert_eq!(estimate.total_meters, None);
    assert_eq!(estimate.total_calories, None);
}

#[test]
fn test_model_fills_in_every_dimension() {
    let outcome = rowing_engine().parse_workout("[w]10:00 + 4x500m/1:00r + [c]5:00");
    let estimate = outcome.estimate.unwrap();

    // 600 + 4 * 120 + 3 * 60 + 300
    assert_eq!(estimate.total_seconds, Some(1560.0));
    // 2500 + 2000 + 1250
    assert_eq!(estimate.total_meters, Some(5750.0));
    // 15 per minute over the 1380 seconds of work
    assert_eq!(estimate.total_calories, Some(345.0));
}

#[test]
fn test_modality_selects_split() {
    let estimate = rowing_engine()
        .parse_workout("Bike: 1000m")
        .estimate
        .unwrap();
    assert_eq!(estimate.total_seconds, Some(120.0));
    // no calorie rate for bike
    assert_eq!(estimate.total_calories, None);
}

#[test]
fn test_relative_pace_uses_reference_paces() {
    let estimate = rowing_engine()
        .parse_workout("2000m@2k+10 + 6000m@6k-5")
        .estimate
        .unwrap();
    // 4 * 110 + 12 * 105
    assert_eq!(estimate.total_seconds, Some(1700.0));
}

#[test]
fn test_relative_pace_without_reference_falls_back_to_model() {
    let engine = Engine::default()
        .with_pace_model(SplitPaceModel::new().with_split(Modality::Row, 120.0));
    let estimate = engine.parse_workout("1000m@5k").estimate.unwrap();
    assert_eq!(estimate.total_seconds, Some(240.0));
}

#[test]
fn test_calorie_work() {
    let estimate = rowing_engine()
        .parse_workout("5x15cal/1:00r")
        .estimate
        .unwrap();
    // each rep is one minute of work
    assert_eq!(estimate.total_seconds, Some(540.0));
    assert_eq!(estimate.total_calories, Some(75.0));
    assert_eq!(estimate.total_meters, Some(1250.0));
}

#[test]
fn test_estimate_survives_validation_findings() {
    let outcome = parse_workout("4x2:00/200mr");
    // distance rest has no time without a pace model
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.estimate.unwrap().total_seconds, None);
}
