//! Segment nodes and the workout root
//!
//! `Chain` is the root of every parsed workout. It is deliberately not a [`Segment`] variant:
//! chains cannot nest, a parenthesized chain either becomes a [`Group`] (when it has a repeat
//! count, a rest or a tag) or is flattened into its parent.

use super::guidance::Guidance;
use super::units::{RestUnit, WorkUnit};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Exercise machine or activity of a segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Modality {
    #[default]
    Row,
    Bike,
    Ski,
    Run,
    Other,
}

impl Modality {
    pub const ALL: [Modality; 5] = [
        Modality::Row,
        Modality::Bike,
        Modality::Ski,
        Modality::Run,
        Modality::Other,
    ];

    /// Case-insensitive lookup of a prefix keyword (without the colon)
    pub fn from_keyword(word: &str) -> Option<Self> {
        Modality::ALL
            .into_iter()
            .find(|modality| modality.name().eq_ignore_ascii_case(word))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Modality::Row => "Row",
            Modality::Bike => "Bike",
            Modality::Ski => "Ski",
            Modality::Run => "Run",
            Modality::Other => "Other",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Semantic role of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockTag {
    Warmup,
    Cooldown,
    Test,
}

impl BlockTag {
    /// Case-insensitive lookup of the letter inside `[w]`, `[c]`, `[t]`
    pub fn from_block_letter(letter: &str) -> Option<Self> {
        match letter.to_ascii_lowercase().as_str() {
            "w" => Some(BlockTag::Warmup),
            "c" => Some(BlockTag::Cooldown),
            "t" => Some(BlockTag::Test),
            _ => None,
        }
    }

    /// Case-insensitive lookup of the word after `#`
    pub fn from_legacy_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "warmup" => Some(BlockTag::Warmup),
            "cooldown" => Some(BlockTag::Cooldown),
            "test" => Some(BlockTag::Test),
            _ => None,
        }
    }

    pub fn block_form(&self) -> &'static str {
        match self {
            BlockTag::Warmup => "[w]",
            BlockTag::Cooldown => "[c]",
            BlockTag::Test => "[t]",
        }
    }

    pub fn legacy_form(&self) -> &'static str {
        match self {
            BlockTag::Warmup => "#warmup",
            BlockTag::Cooldown => "#cooldown",
            BlockTag::Test => "#test",
        }
    }
}

/// How a tag was written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TagStyle {
    Block,
    Legacy,
}

/// Source metadata of a node.
///
/// Always compares equal, so it never affects structural equality of the AST.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMeta {
    /// Byte range of the whole segment
    pub span: Range<usize>,
    /// Byte range and style of the tag, when the segment was tagged
    pub tag_span: Option<Range<usize>>,
    pub tag_style: Option<TagStyle>,
    /// Whether the modality was written on this segment rather than carried
    pub explicit_modality: bool,
}

impl NodeMeta {
    pub fn at(span: Range<usize>) -> Self {
        Self {
            span,
            ..Self::default()
        }
    }
}

impl PartialEq for NodeMeta {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

/// A single continuous piece: `10000m`, `30:00@UT2`, `10000m [2000m]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Steady {
    pub work: WorkUnit,
    pub guidance: Option<Guidance>,
    pub modality: Modality,
    pub tag: Option<BlockTag>,
    /// Monitor split length
    pub split: Option<WorkUnit>,
    #[serde(skip)]
    pub meta: NodeMeta,
}

/// Repeated work with optional rest: `4x500m/1:00r`, `500m/1:00r`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub repeats: u32,
    pub work: WorkUnit,
    pub rest: Option<RestUnit>,
    pub guidance: Option<Guidance>,
    pub modality: Modality,
    pub tag: Option<BlockTag>,
    #[serde(skip)]
    pub meta: NodeMeta,
}

/// Repeated sequence of segments: `3x(750m/3:00r + 500m/3:00r)/5:00r`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub repeats: u32,
    pub body: Vec<Segment>,
    pub group_rest: Option<RestUnit>,
    pub tag: Option<BlockTag>,
    #[serde(skip)]
    pub meta: NodeMeta,
}

/// One node of the workout AST
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Segment {
    Steady(Steady),
    Interval(Interval),
    Group(Group),
}

impl Segment {
    pub fn node_type(&self) -> &'static str {
        match self {
            Segment::Steady(_) => "Steady",
            Segment::Interval(_) => "Interval",
            Segment::Group(_) => "Group",
        }
    }

    pub fn meta(&self) -> &NodeMeta {
        match self {
            Segment::Steady(steady) => &steady.meta,
            Segment::Interval(interval) => &interval.meta,
            Segment::Group(group) => &group.meta,
        }
    }

    pub fn tag(&self) -> Option<BlockTag> {
        match self {
            Segment::Steady(steady) => steady.tag,
            Segment::Interval(interval) => interval.tag,
            Segment::Group(group) => group.tag,
        }
    }

    /// Modality of a leaf segment; groups have none of their own
    pub fn modality(&self) -> Option<Modality> {
        match self {
            Segment::Steady(steady) => Some(steady.modality),
            Segment::Interval(interval) => Some(interval.modality),
            Segment::Group(_) => None,
        }
    }

    pub fn guidance(&self) -> Option<&Guidance> {
        match self {
            Segment::Steady(steady) => steady.guidance.as_ref(),
            Segment::Interval(interval) => interval.guidance.as_ref(),
            Segment::Group(_) => None,
        }
    }

    pub fn as_steady(&self) -> Option<&Steady> {
        match self {
            Segment::Steady(steady) => Some(steady),
            _ => None,
        }
    }

    pub fn as_interval(&self) -> Option<&Interval> {
        match self {
            Segment::Interval(interval) => Some(interval),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Segment::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Visit this segment and every nested segment in document order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Segment)) {
        visit(self);
        if let Segment::Group(group) = self {
            for child in &group.body {
                child.walk(visit);
            }
        }
    }
}

/// The root of a parsed workout: the `+`-joined top-level sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chain {
    pub parts: Vec<Segment>,
}

impl Chain {
    pub fn new(parts: Vec<Segment>) -> Self {
        Self { parts }
    }

    /// All segments, nested ones included, in document order
    pub fn segments(&self) -> Vec<&Segment> {
        let mut all = Vec::new();
        for part in &self.parts {
            part.walk(&mut |segment| all.push(segment));
        }
        all
    }

    /// Distinct modalities used by leaf segments
    pub fn modalities(&self) -> Vec<Modality> {
        let mut found: Vec<Modality> = self
            .segments()
            .into_iter()
            .filter_map(Segment::modality)
            .collect();
        found.sort();
        found.dedup();
        found
    }

    /// Whether any leaf segment uses a modality other than the default
    pub fn is_mixed(&self) -> bool {
        self.modalities()
            .iter()
            .any(|modality| *modality != Modality::default())
    }
}
