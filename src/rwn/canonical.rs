//! Canonical naming
//!
//! Renders a workout back to notation in one deterministic spelling:
//!
//! - block tags instead of legacy tags, written before anything else (`[w]Bike: 5:00`)
//! - modality prefixes only where the modality changes
//!   (in front of a group when its first segment changes it, `Bike: 2x(1:00/1:00r)`)
//! - repeat counts of one dropped (`500m/1:00r`)
//! - quantities and guidance in their standard forms (`1:45.5`, `@r18..22`, `@2k+10`)
//! - parts joined with ` + `
//!
//! Parsing the canonical text gives back a structurally equal AST, and canonicalizing that
//! again gives the same text.
//!
//! A workout that mixes modalities always states the modality of its first segment, so the
//! name never depends on the implicit `Row` default in that case.

use crate::rwn::ast::{Chain, Group, Interval, Modality, Segment, Steady};

/// Render the canonical name of a workout
pub fn canonicalize(chain: &Chain) -> String {
    let mut carried = if chain.is_mixed() {
        None
    } else {
        Some(Modality::default())
    };
    render_parts(&chain.parts, &mut carried)
}

/// Render one segment on its own, as it would appear at the start of a workout
pub fn canonicalize_segment(segment: &Segment) -> String {
    let mut carried = None;
    render_segment(segment, &mut carried)
}

fn render_parts(parts: &[Segment], carried: &mut Option<Modality>) -> String {
    parts
        .iter()
        .map(|part| render_segment(part, carried))
        .collect::<Vec<_>>()
        .join(" + ")
}

fn render_segment(segment: &Segment, carried: &mut Option<Modality>) -> String {
    let mut out = String::new();
    if let Some(tag) = segment.tag() {
        out.push_str(tag.block_form());
    }
    match segment {
        Segment::Steady(steady) => {
            push_prefix(&mut out, steady.modality, carried);
            render_steady(&mut out, steady);
        }
        Segment::Interval(interval) => {
            push_prefix(&mut out, interval.modality, carried);
            render_interval(&mut out, interval);
        }
        Segment::Group(group) => {
            // a prefix in front of the group carries on after it, prefixes inside the body do not
            if let Some(first) = first_modality(&group.body) {
                push_prefix(&mut out, first, carried);
            }
            let mut inner = *carried;
            render_group(&mut out, group, &mut inner);
        }
    }
    out
}

fn push_prefix(out: &mut String, modality: Modality, carried: &mut Option<Modality>) {
    if *carried != Some(modality) {
        out.push_str(&format!("{}: ", modality));
        *carried = Some(modality);
    }
}

/// Modality of the first leaf in document order
fn first_modality(parts: &[Segment]) -> Option<Modality> {
    let mut first = None;
    for part in parts {
        part.walk(&mut |segment| {
            if first.is_none() {
                first = segment.modality();
            }
        });
    }
    first
}

fn render_steady(out: &mut String, steady: &Steady) {
    out.push_str(&steady.work.to_string());
    if let Some(guidance) = &steady.guidance {
        out.push_str(&guidance.to_string());
    }
    if let Some(split) = &steady.split {
        out.push_str(&format!(" [{}]", split));
    }
}

fn render_interval(out: &mut String, interval: &Interval) {
    if interval.repeats != 1 {
        out.push_str(&format!("{}x", interval.repeats));
    }
    out.push_str(&interval.work.to_string());
    if let Some(guidance) = &interval.guidance {
        out.push_str(&guidance.to_string());
    }
    if let Some(rest) = &interval.rest {
        out.push_str(&format!("/{}", rest));
    }
}

fn render_group(out: &mut String, group: &Group, carried: &mut Option<Modality>) {
    if group.repeats != 1 {
        out.push_str(&format!("{}x", group.repeats));
    }
    out.push('(');
    out.push_str(&render_parts(&group.body, carried));
    out.push(')');
    if let Some(rest) = &group.group_rest {
        out.push_str(&format!("/{}", rest));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rwn::parsing::parse_str;

    fn canonical(source: &str) -> String {
        canonicalize(&parse_str(source).unwrap())
    }

    #[test]
    fn test_simple_forms() {
        assert_eq!(canonical("4X500M/1:00R"), "4x500m/1:00r");
        assert_eq!(canonical("1x2000m"), "2000m");
        assert_eq!(canonical("500m / 90:00r"), "500m/1:30:00r");
        assert_eq!(canonical("20c"), "20cal");
    }

    #[test]
    fn test_tags_become_block_tags() {
        assert_eq!(
            canonical("#warmup 10:00 + 5x500m/1:00r + #cooldown 5:00"),
            "[w]10:00 + 5x500m/1:00r + [c]5:00"
        );
    }

    #[test]
    fn test_groups() {
        assert_eq!(
            canonical("3x( 750m/3:00r + 500m/3:00r ) / 5:00r"),
            "3x(750m/3:00r + 500m/3:00r)/5:00r"
        );
        assert_eq!(canonical("(2000m + 1000m)"), "2000m + 1000m");
    }

    #[test]
    fn test_guidance_and_splits() {
        assert_eq!(canonical("4x500m@18-22spm/1:00r"), "4x500m@r18..22/1:00r");
        assert_eq!(canonical("2000m@2:05-2:10"), "2000m@2:05..2:10");
        assert_eq!(canonical("[t]2000m@2k"), "[t]2000m@2k");
        assert_eq!(canonical("10000m@ut2 [2000m]"), "10000m@UT2 [2000m]");
    }

    #[test]
    fn test_modality_prefixes() {
        assert_eq!(canonical("Row: 2000m + 1000m"), "2000m + 1000m");
        assert_eq!(
            canonical("5:00 + bike: 10:00 + 5:00 + row: 2000m"),
            "Row: 5:00 + Bike: 10:00 + 5:00 + Row: 2000m"
        );
        assert_eq!(
            canonical("[w]Bike: 5:00 + 2x(Ski: 1:00/1:00r)"),
            "[w]Bike: 5:00 + Ski: 2x(1:00/1:00r)"
        );
    }

    #[test]
    fn test_group_prefixes_only_on_change() {
        assert_eq!(
            canonical("2x(1:00) + Bike: 2x(1:00) + 2x(1:00)"),
            "Row: 2x(1:00) + Bike: 2x(1:00) + 2x(1:00)"
        );
        assert_eq!(
            canonical("Ski: 2x(Bike: 1:00) + Ski: 1:00"),
            "Bike: 2x(1:00) + Ski: 1:00"
        );
        assert_eq!(
            canonical("Bike: 3x(1:00 + Row: 1:00) + 1:00"),
            "Bike: 3x(1:00 + Row: 1:00) + 1:00"
        );
        assert_eq!(
            canonical("Ski: 2x(2x(Bike: 1:00)/1:00r + 1:00)"),
            "Bike: 2x(2x(1:00)/1:00r + Ski: 1:00)"
        );
    }

    #[test]
    fn test_idempotent() {
        for source in [
            "#warmup 10:00 + 5x500m@r24/1:00r + #cooldown 5:00",
            "Bike: 3x(1:00@UT1/1:00r + Row: 500m/2:00r)/5:00r + 10:00",
            "8x250m@1:45..1:50/90mr",
        ] {
            let first = canonical(source);
            assert_eq!(canonical(&first), first, "{}", source);
        }
    }

    #[test]
    fn test_canonicalize_segment() {
        let chain = parse_str("4x500m/1:00r").unwrap();
        assert_eq!(canonicalize_segment(&chain.parts[0]), "Row: 4x500m/1:00r");
    }
}
