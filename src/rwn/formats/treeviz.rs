//! Treeviz formatter for workouts
//!
//! Treeviz is a one-line-per-node rendering of the AST. Nesting is drawn with tree connectors,
//! which makes group structure and rests easy to scan:
//!
//! ```text
//! ⧉ 3 parts
//! ├─ ≡ [w] Row: 10:00
//! ├─ ⊞ 3x (2 segments)
//! │ ├─ ↻ Row: 1x750m
//! │ │ └─ ⋯ 3:00r
//! │ ├─ ↻ Row: 1x500m
//! │ │ └─ ⋯ 3:00r
//! │ └─ ⋯ 5:00r
//! └─ ≡ [c] Row: 5:00
//! ```
//!
//! Icons
//!     Workout: ⧉
//!     Steady: ≡
//!     Interval: ↻
//!     Group: ⊞
//!     Rest: ⋯

use super::registry::{FormatError, Formatter};
use crate::rwn::ast::{snapshot_from_chain, AstSnapshot, Chain};

const MAX_LABEL: usize = 40;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Workout" => "⧉",
        "Steady" => "≡",
        "Interval" => "↻",
        "Group" => "⊞",
        "Rest" => "⋯",
        _ => "○",
    }
}

fn label_of(snapshot: &AstSnapshot) -> String {
    let label = match snapshot.attributes.get("tag") {
        Some(tag) => format!("{} {}", tag, snapshot.label),
        None => snapshot.label.clone(),
    };
    truncate(&label, MAX_LABEL)
}

fn format_snapshot(snapshot: &AstSnapshot, prefix: &str, is_last: bool) -> String {
    let connector = if is_last { "└─" } else { "├─" };
    let mut output = format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        get_icon(&snapshot.node_type),
        label_of(snapshot)
    );

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        output.push_str(&format_snapshot(child, &child_prefix, i + 1 == child_count));
    }
    output
}

/// Render a workout as treeviz text
pub fn to_treeviz_str(chain: &Chain) -> String {
    let snapshot = snapshot_from_chain(chain);
    let mut output = format!("{} {}\n", get_icon(&snapshot.node_type), label_of(&snapshot));

    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        output.push_str(&format_snapshot(child, "", i + 1 == child_count));
    }
    output
}

/// Formatter implementation for treeviz format
pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &'static str {
        "treeviz"
    }

    fn render(&self, chain: &Chain) -> Result<String, FormatError> {
        Ok(to_treeviz_str(chain))
    }

    fn description(&self) -> &'static str {
        "Visual tree representation with connectors and Unicode icons"
    }
}
