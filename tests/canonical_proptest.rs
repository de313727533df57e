//! Property-based tests for canonical naming
//!
//! Workouts are generated as notation text from the grammar (tags, modality prefixes,
//! guidance, rests, splits, nested and flattened groups), in varied spelling. For every
//! generated workout:
//!
//! - parsing the canonical name gives a structurally equal AST
//! - canonicalizing is idempotent

use proptest::prelude::*;
use rwn::rwn::canonical::canonicalize;
use rwn::rwn::parsing::parse_str;

fn work() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..20000).prop_map(|meters| format!("{}m", meters)),
        (1u32..5000, 1u32..10).prop_map(|(meters, tenths)| format!("{}.{}m", meters, tenths)),
        (1u32..90, 0u32..60).prop_map(|(minutes, seconds)| format!("{}:{:02}", minutes, seconds)),
        (0u32..10, 0u32..60, 1u32..10).prop_map(|(minutes, seconds, tenths)| {
            format!("{}:{:02}.{}", minutes, seconds, tenths)
        }),
        (1u32..3, 0u32..60, 0u32..60)
            .prop_map(|(hours, minutes, seconds)| format!("{}:{:02}:{:02}", hours, minutes, seconds)),
        (1u32..300).prop_map(|count| format!("{}cal", count)),
    ]
}

fn rest() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..6, 0u32..60).prop_map(|(minutes, seconds)| format!("{}:{:02}r", minutes, seconds)),
        (1u32..1000).prop_map(|meters| format!("{}mr", meters)),
    ]
}

fn guidance() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        (16u32..40).prop_map(|rate| format!("@r{}", rate)),
        (16u32..30, 1u32..6).prop_map(|(low, width)| format!("@{}..{}spm", low, low + width)),
        (40u32..59).prop_map(|seconds| format!("@1:{:02}", seconds)),
        prop::sample::select(vec!["@2k", "@2k+5", "@6k-3", "@UT2", "@at"]).prop_map(String::from),
    ]
}

fn marks() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", "[w]", "[c]", "#test "]),
        prop::sample::select(vec!["", "", "Bike: ", "ski: ", "Row: "]),
    )
        .prop_map(|(tag, prefix)| format!("{}{}", tag, prefix))
}

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        (work(), guidance()).prop_map(|(work, guidance)| format!("{}{}", work, guidance)),
        (work(), guidance(), work())
            .prop_map(|(work, guidance, split)| format!("{}{} [{}]", work, guidance, split)),
        (2u32..10, work(), guidance())
            .prop_map(|(count, work, guidance)| format!("{}x{}{}", count, work, guidance)),
        (2u32..10, work(), guidance(), rest()).prop_map(|(count, work, guidance, rest)| {
            format!("{}x{}{}/{}", count, work, guidance, rest)
        }),
        (work(), guidance(), rest())
            .prop_map(|(work, guidance, rest)| format!("{}{} / {}", work, guidance, rest)),
    ]
}

fn decorated_leaf() -> impl Strategy<Value = String> {
    (marks(), leaf()).prop_map(|(marks, leaf)| format!("{}{}", marks, leaf))
}

/// Parenthesized parts, with or without a count. Without count, rest or tag they are flattened.
fn group(part: BoxedStrategy<String>) -> impl Strategy<Value = String> {
    (
        marks(),
        prop::option::of(2u32..6),
        prop::collection::vec(part, 1..4),
        prop::option::of(rest()),
    )
        .prop_map(|(marks, count, body, rest)| {
            let count = count.map(|count| format!("{}x", count)).unwrap_or_default();
            let rest = rest.map(|rest| format!("/{}", rest)).unwrap_or_default();
            format!("{}{}({}){}", marks, count, body.join(" + "), rest)
        })
}

fn part() -> impl Strategy<Value = String> {
    decorated_leaf().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![2 => inner.clone(), 1 => group(inner)]
    })
}

fn workout() -> impl Strategy<Value = String> {
    prop::collection::vec(part(), 1..6).prop_map(|parts| parts.join(" + "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_canonical_round_trip(text in workout()) {
        let chain = parse_str(&text).map_err(|error| {
            TestCaseError::fail(format!("{}: {}", text, error))
        })?;
        let canonical = canonicalize(&chain);
        let reparsed = parse_str(&canonical).map_err(|error| {
            TestCaseError::fail(format!("{} -> {}: {}", text, canonical, error))
        })?;

        prop_assert_eq!(&reparsed, &chain, "{} -> {}", text, canonical);
    }

    #[test]
    fn test_canonical_idempotent(text in workout()) {
        let chain = parse_str(&text).map_err(|error| {
            TestCaseError::fail(format!("{}: {}", text, error))
        })?;
        let canonical = canonicalize(&chain);
        let again = canonicalize(&parse_str(&canonical).map_err(|error| {
            TestCaseError::fail(format!("{}: {}", canonical, error))
        })?);

        prop_assert_eq!(again, canonical);
    }

    #[test]
    fn test_arbitrary_input_never_panics(text in "[0-9a-zA-Z:@+/x().\\[\\]# -]{0,40}") {
        let _ = rwn::parse_workout(&text);
    }
}
