//! Testing utilities for AST assertions
//!
//! A fluent API for checking the shape and content of a parsed workout in one expression,
//! instead of nested `match` blocks:
//!
//! ```rust-example
//! use rwn::rwn::testing::assert_workout;
//!
//! let chain = parse_str("[w]10:00 + 3x(750m/3:00r + 500m/3:00r)/5:00r")?;
//! assert_workout(&chain)
//!     .part_count(2)
//!     .part(0, |s| {
//!         s.assert_steady().duration(600.0).tag(BlockTag::Warmup);
//!     })
//!     .part(1, |s| {
//!         s.assert_group()
//!             .repeats(3)
//!             .child_count(2)
//!             .group_rest(RestUnit(WorkUnit::Duration { seconds: 300.0 }))
//!             .child(0, |c| {
//!                 c.assert_interval().distance(750.0).rest_seconds(180.0);
//!             });
//!     });
//! ```
//!
//! Every failure message carries a path such as `workout:parts[1]:body[0]`, so the failing
//! node is obvious without a debugger.

use crate::rwn::ast::{
    BlockTag, Chain, Group, Guidance, Interval, Modality, RestUnit, Segment, Steady, WorkUnit,
};

pub fn assert_workout(chain: &Chain) -> WorkoutAssertion<'_> {
    WorkoutAssertion {
        chain,
        context: "workout".to_string(),
    }
}

fn summarize(parts: &[Segment]) -> String {
    parts
        .iter()
        .map(Segment::node_type)
        .collect::<Vec<_>>()
        .join(", ")
}

fn nth<'a>(parts: &'a [Segment], index: usize, context: &str) -> &'a Segment {
    assert!(
        index < parts.len(),
        "{}: Part index {} out of bounds ({} parts: [{}])",
        context,
        index,
        parts.len(),
        summarize(parts)
    );
    &parts[index]
}

pub struct WorkoutAssertion<'a> {
    chain: &'a Chain,
    context: String,
}

impl<'a> WorkoutAssertion<'a> {
    pub fn part_count(self, expected: usize) -> Self {
        let actual = self.chain.parts.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} parts, found {} parts: [{}]",
            self.context,
            expected,
            actual,
            summarize(&self.chain.parts)
        );
        self
    }

    pub fn part<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(SegmentAssertion<'a>),
    {
        let segment = nth(&self.chain.parts, index, &self.context);
        assertion(SegmentAssertion {
            segment,
            context: format!("{}:parts[{}]", self.context, index),
        });
        self
    }

    pub fn modalities(self, expected: &[Modality]) -> Self {
        assert_eq!(
            self.chain.modalities(),
            expected,
            "{}: Unexpected set of modalities",
            self.context
        );
        self
    }
}

pub struct SegmentAssertion<'a> {
    segment: &'a Segment,
    context: String,
}

impl<'a> SegmentAssertion<'a> {
    pub fn assert_steady(self) -> SteadyAssertion<'a> {
        match self.segment {
            Segment::Steady(steady) => SteadyAssertion {
                steady,
                context: self.context,
            },
            other => panic!(
                "{}: Expected Steady, found {}",
                self.context,
                other.node_type()
            ),
        }
    }

    pub fn assert_interval(self) -> IntervalAssertion<'a> {
        match self.segment {
            Segment::Interval(interval) => IntervalAssertion {
                interval,
                context: self.context,
            },
            other => panic!(
                "{}: Expected Interval, found {}",
                self.context,
                other.node_type()
            ),
        }
    }

    pub fn assert_group(self) -> GroupAssertion<'a> {
        match self.segment {
            Segment::Group(group) => GroupAssertion {
                group,
                context: self.context,
            },
            other => panic!(
                "{}: Expected Group, found {}",
                self.context,
                other.node_type()
            ),
        }
    }
}

fn check_work(actual: &WorkUnit, expected: WorkUnit, context: &str) {
    assert_eq!(*actual, expected, "{}: Unexpected work unit", context);
}

fn check_tag(actual: Option<BlockTag>, expected: Option<BlockTag>, context: &str) {
    assert_eq!(actual, expected, "{}: Unexpected tag", context);
}

fn check_modality(actual: Modality, expected: Modality, context: &str) {
    assert_eq!(actual, expected, "{}: Unexpected modality", context);
}

fn check_guidance(actual: Option<&Guidance>, expected: Option<Guidance>, context: &str) {
    assert_eq!(actual.copied(), expected, "{}: Unexpected guidance", context);
}

pub struct SteadyAssertion<'a> {
    steady: &'a Steady,
    context: String,
}

impl<'a> SteadyAssertion<'a> {
    pub fn work(self, expected: WorkUnit) -> Self {
        check_work(&self.steady.work, expected, &self.context);
        self
    }

    pub fn distance(self, meters: f64) -> Self {
        self.work(WorkUnit::Distance { meters })
    }

    pub fn duration(self, seconds: f64) -> Self {
        self.work(WorkUnit::Duration { seconds })
    }

    pub fn modality(self, expected: Modality) -> Self {
        check_modality(self.steady.modality, expected, &self.context);
        self
    }

    pub fn tag(self, expected: BlockTag) -> Self {
        check_tag(self.steady.tag, Some(expected), &self.context);
        self
    }

    pub fn untagged(self) -> Self {
        check_tag(self.steady.tag, None, &self.context);
        self
    }

    pub fn guidance(self, expected: Guidance) -> Self {
        check_guidance(self.steady.guidance.as_ref(), Some(expected), &self.context);
        self
    }

    pub fn split(self, expected: WorkUnit) -> Self {
        assert_eq!(
            self.steady.split,
            Some(expected),
            "{}: Unexpected split",
            self.context
        );
        self
    }
}

pub struct IntervalAssertion<'a> {
    interval: &'a Interval,
    context: String,
}

impl<'a> IntervalAssertion<'a> {
    pub fn repeats(self, expected: u32) -> Self {
        assert_eq!(
            self.interval.repeats, expected,
            "{}: Expected {} repeats, found {}",
            self.context, expected, self.interval.repeats
        );
        self
    }

    pub fn work(self, expected: WorkUnit) -> Self {
        check_work(&self.interval.work, expected, &self.context);
        self
    }

    pub fn distance(self, meters: f64) -> Self {
        self.work(WorkUnit::Distance { meters })
    }

    pub fn duration(self, seconds: f64) -> Self {
        self.work(WorkUnit::Duration { seconds })
    }

    pub fn rest(self, expected: RestUnit) -> Self {
        assert_eq!(
            self.interval.rest,
            Some(expected),
            "{}: Unexpected rest",
            self.context
        );
        self
    }

    pub fn rest_seconds(self, seconds: f64) -> Self {
        self.rest(RestUnit(WorkUnit::Duration { seconds }))
    }

    pub fn no_rest(self) -> Self {
        assert_eq!(self.interval.rest, None, "{}: Expected no rest", self.context);
        self
    }

    pub fn modality(self, expected: Modality) -> Self {
        check_modality(self.interval.modality, expected, &self.context);
        self
    }

    pub fn tag(self, expected: BlockTag) -> Self {
        check_tag(self.interval.tag, Some(expected), &self.context);
        self
    }

    pub fn guidance(self, expected: Guidance) -> Self {
        check_guidance(self.interval.guidance.as_ref(), Some(expected), &self.context);
        self
    }

    pub fn no_guidance(self) -> Self {
        check_guidance(self.interval.guidance.as_ref(), None, &self.context);
        self
    }
}

pub struct GroupAssertion<'a> {
    group: &'a Group,
    context: String,
}

impl<'a> GroupAssertion<'a> {
    pub fn repeats(self, expected: u32) -> Self {
        assert_eq!(
            self.group.repeats, expected,
            "{}: Expected {} repeats, found {}",
            self.context, expected, self.group.repeats
        );
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let actual = self.group.body.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} children, found {} children: [{}]",
            self.context,
            expected,
            actual,
            summarize(&self.group.body)
        );
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(SegmentAssertion<'a>),
    {
        let segment = nth(&self.group.body, index, &self.context);
        assertion(SegmentAssertion {
            segment,
            context: format!("{}:body[{}]", self.context, index),
        });
        self
    }

    pub fn group_rest(self, expected: RestUnit) -> Self {
        assert_eq!(
            self.group.group_rest,
            Some(expected),
            "{}: Unexpected group rest",
            self.context
        );
        self
    }

    pub fn no_group_rest(self) -> Self {
        assert_eq!(
            self.group.group_rest, None,
            "{}: Expected no group rest",
            self.context
        );
        self
    }

    pub fn tag(self, expected: BlockTag) -> Self {
        check_tag(self.group.tag, Some(expected), &self.context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rwn::parsing::parse_str;

    #[test]
    fn test_fluent_assertions() {
        let chain = parse_str("[w]10:00 + 3x(750m/3:00r + Bike: 500m/3:00r)/5:00r").unwrap();
        assert_workout(&chain)
            .part_count(2)
            .modalities(&[Modality::Row, Modality::Bike])
            .part(0, |s| {
                s.assert_steady().duration(600.0).tag(BlockTag::Warmup);
            })
            .part(1, |s| {
                s.assert_group()
                    .repeats(3)
                    .child_count(2)
                    .group_rest(RestUnit(WorkUnit::Duration { seconds: 300.0 }))
                    .child(0, |c| {
                        c.assert_interval().repeats(1).distance(750.0).rest_seconds(180.0);
                    })
                    .child(1, |c| {
                        c.assert_interval().modality(Modality::Bike);
                    });
            });
    }

    #[test]
    #[should_panic(expected = "workout:parts[0]: Expected Interval, found Steady")]
    fn test_wrong_node_type_reports_path() {
        let chain = parse_str("2000m").unwrap();
        assert_workout(&chain).part(0, |s| {
            s.assert_interval();
        });
    }
}
