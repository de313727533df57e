//! Structural tests for parsed workouts
//!
//! Uses assert_workout for deep structure verification, one notation feature per test.

use rwn::rwn::ast::{BlockTag, Guidance, Modality, ReferenceDistance, RestUnit, WorkUnit, Zone};
use rwn::rwn::estimate::SplitPaceModel;
use rwn::Engine;
use rwn::rwn::parsing::parse_str;
use rwn::rwn::testing::assert_workout;

fn rest_seconds(seconds: f64) -> RestUnit {
    RestUnit(WorkUnit::Duration { seconds })
}

#[test]
fn test_repeat_binds_tighter_than_chain() {
    // 4x500m/1:00r + 2000m: the repeat only covers the interval
    let chain = parse_str("4x500m/1:00r + 2000m").unwrap();

    assert_workout(&chain)
        .part_count(2)
        .part(0, |s| {
            s.assert_interval()
                .repeats(4)
                .distance(500.0)
                .rest_seconds(60.0);
        })
        .part(1, |s| {
            s.assert_steady().distance(2000.0).untagged();
        });
}

#[test]
fn test_interval_then_steady() {
    let engine = Engine::default()
        .with_pace_model(SplitPaceModel::new().with_split(Modality::Row, 120.0));
    let outcome = engine.parse_workout("4x500m/1:00r + 5:00");
    let chain = outcome.ast.as_ref().unwrap();

    assert_workout(chain)
        .part_count(2)
        .part(0, |s| {
            s.assert_interval().repeats(4).distance(500.0).rest_seconds(60.0);
        })
        .part(1, |s| {
            s.assert_steady().duration(300.0).modality(Modality::Row);
        });
    // 4 * 120 + 3 * 60 + 300, no rest after the fourth rep
    assert_eq!(outcome.estimate.unwrap().total_seconds, Some(960.0));
}

#[test]
fn test_grouped_repeat() {
    let chain = parse_str("3x(750m/3:00r + 500m/3:00r)/5:00r").unwrap();

    assert_workout(&chain).part_count(1).part(0, |s| {
        s.assert_group()
            .repeats(3)
            .child_count(2)
            .group_rest(rest_seconds(300.0))
            .child(0, |c| {
                c.assert_interval()
                    .repeats(1)
                    .distance(750.0)
                    .rest_seconds(180.0);
            })
            .child(1, |c| {
                c.assert_interval()
                    .repeats(1)
                    .distance(500.0)
                    .rest_seconds(180.0);
            });
    });
}

#[test]
fn test_nested_groups() {
    let chain = parse_str("2x(3x(1:00/1:00r)/3:00r + 2000m)").unwrap();

    assert_workout(&chain).part(0, |s| {
        s.assert_group()
            .repeats(2)
            .no_group_rest()
            .child_count(2)
            .child(0, |c| {
                c.assert_group()
                    .repeats(3)
                    .group_rest(rest_seconds(180.0))
                    .child(0, |inner| {
                        inner.assert_interval().duration(60.0).rest_seconds(60.0);
                    });
            })
            .child(1, |c| {
                c.assert_steady().distance(2000.0);
            });
    });
}

#[test]
fn test_legacy_and_block_tags_are_equivalent() {
    let legacy = parse_str("#warmup 10:00 + 5x500m/1:00r + #cooldown 5:00").unwrap();
    let block = parse_str("[w]10:00 + 5x500m/1:00r + [c]5:00").unwrap();

    assert_eq!(legacy, block);
    assert_workout(&legacy)
        .part(0, |s| {
            s.assert_steady().tag(BlockTag::Warmup);
        })
        .part(2, |s| {
            s.assert_steady().tag(BlockTag::Cooldown);
        });
}

#[test]
fn test_modality_carries_forward() {
    let chain = parse_str("Bike: 10:00 + 4x1:00/1:00r + Row: 2000m").unwrap();

    assert_workout(&chain)
        .modalities(&[Modality::Row, Modality::Bike])
        .part(0, |s| {
            s.assert_steady().modality(Modality::Bike);
        })
        .part(1, |s| {
            s.assert_interval().modality(Modality::Bike);
        })
        .part(2, |s| {
            s.assert_steady().modality(Modality::Row);
        });
}

#[test]
fn test_modality_inside_group_stays_inside() {
    let chain = parse_str("2x(Ski: 1:00/1:00r) + 500m").unwrap();

    assert_workout(&chain)
        .part(0, |s| {
            s.assert_group().child(0, |c| {
                c.assert_interval().modality(Modality::Ski);
            });
        })
        .part(1, |s| {
            s.assert_steady().modality(Modality::Row);
        });
}

#[test]
fn test_guidance_on_every_shape() {
    let chain =
        parse_str("2000m@r20 + 4x500m@1:45/1:00r + 6000m@2k+10 + 30:00@UT2 + 1000m@r18..22")
            .unwrap();

    assert_workout(&chain)
        .part_count(5)
        .part(0, |s| {
            s.assert_steady().guidance(Guidance::Rate { spm: 20 });
        })
        .part(1, |s| {
            s.assert_interval().guidance(Guidance::Pace {
                seconds_per_500m: 105.0,
            });
        })
        .part(2, |s| {
            s.assert_steady().guidance(Guidance::RelativePace {
                reference: ReferenceDistance::K2,
                offset_seconds: 10,
            });
        })
        .part(3, |s| {
            s.assert_steady().guidance(Guidance::Zone { zone: Zone::Ut2 });
        })
        .part(4, |s| {
            s.assert_steady()
                .guidance(Guidance::RateRange { low: 18, high: 22 });
        });
}

#[test]
fn test_split_annotation() {
    let chain = parse_str("10000m [2000m]").unwrap();

    assert_workout(&chain).part(0, |s| {
        s.assert_steady()
            .distance(10000.0)
            .split(WorkUnit::Distance { meters: 2000.0 });
    });
}

#[test]
fn test_calorie_work_and_rest() {
    let chain = parse_str("5x20cal/10calr").unwrap();

    assert_workout(&chain).part(0, |s| {
        s.assert_interval()
            .repeats(5)
            .work(WorkUnit::Calories { count: 20 })
            .rest(RestUnit(WorkUnit::Calories { count: 10 }));
    });
}
