//! AST Snapshot - a normalized intermediate representation of the workout tree
//!
//! The snapshot captures node types, one-line labels, attributes and children, so output
//! formats (treeviz, and anything added later) only deal with presentation. All serializers
//! should consume `snapshot_from_chain()` rather than walking the AST themselves.

use super::segment::{Chain, Group, Interval, Segment, Steady};
use serde::Serialize;
use std::collections::BTreeMap;

/// A snapshot of an AST node in a normalized, serializable form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstSnapshot {
    /// The type of node ("Workout", "Steady", "Interval", "Group", "Rest")
    pub node_type: String,

    /// One-line description of the node
    pub label: String,

    /// Additional attributes specific to the node type
    pub attributes: BTreeMap<String, String>,

    /// Child nodes in the tree
    pub children: Vec<AstSnapshot>,
}

impl AstSnapshot {
    pub fn new(node_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            label: label.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl ToString) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, child: AstSnapshot) -> Self {
        self.children.push(child);
        self
    }
}

/// Build a snapshot of a whole workout
pub fn snapshot_from_chain(chain: &Chain) -> AstSnapshot {
    let label = match chain.parts.len() {
        1 => "1 part".to_string(),
        n => format!("{} parts", n),
    };
    chain
        .parts
        .iter()
        .fold(AstSnapshot::new("Workout", label), |snapshot, part| {
            snapshot.with_child(snapshot_from_segment(part))
        })
}

/// Build a snapshot of a single segment (and its children)
pub fn snapshot_from_segment(segment: &Segment) -> AstSnapshot {
    let snapshot = match segment {
        Segment::Steady(steady) => steady_snapshot(steady),
        Segment::Interval(interval) => interval_snapshot(interval),
        Segment::Group(group) => group_snapshot(group),
    };
    match segment.tag() {
        Some(tag) => snapshot.with_attribute("tag", tag.block_form()),
        None => snapshot,
    }
}

fn steady_snapshot(steady: &Steady) -> AstSnapshot {
    let mut label = format!("{}: {}", steady.modality, steady.work);
    if let Some(guidance) = &steady.guidance {
        label.push_str(&format!(" {}", guidance));
    }
    if let Some(split) = &steady.split {
        label.push_str(&format!(" [{}]", split));
    }
    AstSnapshot::new("Steady", label).with_attribute("modality", steady.modality)
}

fn interval_snapshot(interval: &Interval) -> AstSnapshot {
    let mut label = format!(
        "{}: {}x{}",
        interval.modality, interval.repeats, interval.work
    );
    if let Some(guidance) = &interval.guidance {
        label.push_str(&format!(" {}", guidance));
    }
    let snapshot = AstSnapshot::new("Interval", label)
        .with_attribute("modality", interval.modality)
        .with_attribute("repeats", interval.repeats);
    match &interval.rest {
        Some(rest) => snapshot.with_child(AstSnapshot::new("Rest", rest.to_string())),
        None => snapshot,
    }
}

fn group_snapshot(group: &Group) -> AstSnapshot {
    let label = format!("{}x ({} segments)", group.repeats, group.body.len());
    let snapshot = group.body.iter().fold(
        AstSnapshot::new("Group", label).with_attribute("repeats", group.repeats),
        |snapshot, child| snapshot.with_child(snapshot_from_segment(child)),
    );
    match &group.group_rest {
        Some(rest) => snapshot.with_child(AstSnapshot::new("Rest", rest.to_string())),
        None => snapshot,
    }
}
