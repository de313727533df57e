//! Output format implementations for workout serialization
//!
//! This module contains the formats a parsed workout can be rendered to:
//! - canonical notation (the canonical name)
//! - treeviz, a one-line-per-node tree view
//!
//! Further formats (the CLI adds JSON and YAML) plug in through the [`FormatRegistry`].

pub mod canonical;
pub mod registry;
pub mod treeviz;

pub use canonical::CanonicalFormatter;
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
