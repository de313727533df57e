//! Semantic validation of a parsed workout
//!
//! [`validate`] walks the AST read-only and reports problems the grammar cannot express:
//! repeat counts outside the sane range, rests that do not fit their work, ranges out of
//! order, splits that do not fit their piece. Style findings (legacy tags, implicit modality)
//! come out as warnings and info, never as errors.
//!
//! The parser already rejects zero repeat counts and unordered ranges; the checks are repeated
//! here because ASTs can also be built in code.

use crate::rwn::ast::{
    Chain, Diagnostic, DiagnosticCode, Group, Interval, Segment, Steady, TagStyle, WorkUnit,
};

/// Default ceiling above which a repeat count is reported as excessive
pub const DEFAULT_REPEAT_CEILING: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    pub repeat_ceiling: u32,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            repeat_ceiling: DEFAULT_REPEAT_CEILING,
        }
    }
}

/// Validate a workout, returning diagnostics in document order per rule
pub fn validate(chain: &Chain, options: &ValidationOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for part in &chain.parts {
        validate_segment(part, options, &mut diagnostics);
    }
    check_implicit_modality(chain, &mut diagnostics);
    diagnostics
}

fn validate_segment(segment: &Segment, options: &ValidationOptions, diagnostics: &mut Vec<Diagnostic>) {
    check_legacy_tag(segment, diagnostics);
    match segment {
        Segment::Steady(steady) => {
            check_range_order(segment, diagnostics);
            check_split(steady, diagnostics);
        }
        Segment::Interval(interval) => {
            check_repeats(interval.repeats, segment, options, diagnostics);
            check_range_order(segment, diagnostics);
            check_interval_rest(interval, diagnostics);
        }
        Segment::Group(group) => {
            check_repeats(group.repeats, segment, options, diagnostics);
            check_group_rest(group, diagnostics);
            for child in &group.body {
                validate_segment(child, options, diagnostics);
            }
        }
    }
}

fn check_repeats(
    repeats: u32,
    segment: &Segment,
    options: &ValidationOptions,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let span = segment.meta().span.clone();
    if repeats == 0 {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::RepeatCountInvalid,
            span,
            "Repeat count must be a positive whole number",
        ));
    } else if repeats > options.repeat_ceiling {
        diagnostics.push(Diagnostic::warning(
            DiagnosticCode::RepeatCountExcessive,
            span,
            format!(
                "Repeat count {} is above the sanity ceiling of {}",
                repeats, options.repeat_ceiling
            ),
        ));
    }
}

/// Whether a rest of the given kind can follow the given work.
///
/// Duration rests fit anything. Distance rests fit distance and duration work (a jog or paddle
/// between timed pieces). Calorie rests only make sense between calorie pieces.
pub fn rest_fits_work(rest: &WorkUnit, work: &WorkUnit) -> bool {
    match rest {
        WorkUnit::Duration { .. } => true,
        WorkUnit::Distance { .. } => {
            matches!(work, WorkUnit::Distance { .. } | WorkUnit::Duration { .. })
        }
        WorkUnit::Calories { .. } => matches!(work, WorkUnit::Calories { .. }),
    }
}

fn incompatible_rest(rest: &WorkUnit, work: &WorkUnit, span: std::ops::Range<usize>) -> Diagnostic {
    Diagnostic::error(
        DiagnosticCode::IncompatibleRest,
        span,
        format!(
            "A {} rest cannot follow {} work",
            rest.kind_name(),
            work.kind_name()
        ),
    )
}

fn check_interval_rest(interval: &Interval, diagnostics: &mut Vec<Diagnostic>) {
    if let Some(rest) = &interval.rest {
        if !rest_fits_work(rest.unit(), &interval.work) {
            diagnostics.push(incompatible_rest(
                rest.unit(),
                &interval.work,
                interval.meta.span.clone(),
            ));
        }
    }
}

fn check_group_rest(group: &Group, diagnostics: &mut Vec<Diagnostic>) {
    let Some(rest) = &group.group_rest else {
        return;
    };
    let mut works = Vec::new();
    for child in &group.body {
        child.walk(&mut |segment| match segment {
            Segment::Steady(steady) => works.push(steady.work),
            Segment::Interval(interval) => works.push(interval.work),
            Segment::Group(_) => {}
        });
    }
    if let Some(work) = works.iter().find(|work| !rest_fits_work(rest.unit(), work)) {
        diagnostics.push(incompatible_rest(rest.unit(), work, group.meta.span.clone()));
    }
}

fn check_range_order(segment: &Segment, diagnostics: &mut Vec<Diagnostic>) {
    if let Some(guidance) = segment.guidance() {
        if !guidance.is_ordered() {
            diagnostics.push(Diagnostic::error(
                DiagnosticCode::InvalidRangeOrder,
                segment.meta().span.clone(),
                format!(
                    "Range {} must go from the lower to the higher value",
                    guidance
                ),
            ));
        }
    }
}

fn check_split(steady: &Steady, diagnostics: &mut Vec<Diagnostic>) {
    let Some(split) = &steady.split else {
        return;
    };
    let span = steady.meta.span.clone();
    if !split.same_kind(&steady.work) {
        diagnostics.push(Diagnostic::error(
            DiagnosticCode::SplitKindMismatch,
            span,
            format!(
                "Split {} is a {} but the piece is a {}",
                split,
                split.kind_name(),
                steady.work.kind_name()
            ),
        ));
    } else if split.magnitude() > steady.work.magnitude() {
        diagnostics.push(Diagnostic::warning(
            DiagnosticCode::SplitExceedsWork,
            span,
            format!("Split {} is longer than the piece {}", split, steady.work),
        ));
    }
}

fn check_legacy_tag(segment: &Segment, diagnostics: &mut Vec<Diagnostic>) {
    let meta = segment.meta();
    if meta.tag_style != Some(TagStyle::Legacy) {
        return;
    }
    if let Some(tag) = segment.tag() {
        let span = meta.tag_span.clone().unwrap_or_else(|| meta.span.clone());
        diagnostics.push(Diagnostic::info(
            DiagnosticCode::LegacyTagPresent,
            span,
            format!(
                "Legacy tag {} is written {} in canonical form",
                tag.legacy_form(),
                tag.block_form()
            ),
        ));
    }
}

/// Leaf segments without a prefix that come before the first explicit prefix
fn check_implicit_modality(chain: &Chain, diagnostics: &mut Vec<Diagnostic>) {
    let segments = chain.segments();
    let Some(first_explicit) = segments
        .iter()
        .position(|segment| segment.meta().explicit_modality)
    else {
        return;
    };

    for segment in &segments[..first_explicit] {
        if let Some(modality) = segment.modality() {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::ImplicitModality,
                segment.meta().span.clone(),
                format!(
                    "Segment has no modality prefix; assuming {}",
                    modality
                ),
            ));
        }
    }
}
