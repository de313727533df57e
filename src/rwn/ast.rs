//! AST definitions and utilities for RWN
//!
//! This module provides the workout AST, along with the value types it is built from
//! and the diagnostic/error types every stage reports with.
//!
//! ## Modules
//!
//! - `units` - Work and rest quantities, clock parsing and formatting
//! - `guidance` - Execution intent attached to a segment (`@r20`, `@UT2`, ...)
//! - `segment` - Segment nodes, the root `Chain`, modality and block tags
//! - `diagnostics` - Structured diagnostics with stable codes
//! - `error` - Lex, parse and guidance errors
//! - `snapshot` - Format-agnostic tree snapshot consumed by serializers
//!
//! ## Equality
//!
//! Every node carries a [`NodeMeta`] with its source span and how it was written (legacy or
//! block tag, explicit or carried modality). `NodeMeta` never takes part in equality, so
//! comparing two ASTs with `==` compares structure only: `#warmup10:00` and `[w]10:00` parse to
//! equal trees.

pub mod diagnostics;
pub mod error;
pub mod guidance;
pub mod segment;
pub mod snapshot;
pub mod units;

pub use diagnostics::{
    has_errors, Diagnostic, DiagnosticCode, DiagnosticPosition, DiagnosticSeverity,
};
pub use error::{
    GuidanceError, GuidanceErrorKind, LexError, LexErrorReason, ParseError, ParseErrorKind,
    SyntaxError,
};
pub use guidance::{Guidance, ReferenceDistance, Zone};
pub use segment::{BlockTag, Chain, Group, Interval, Modality, NodeMeta, Segment, Steady, TagStyle};
pub use snapshot::{snapshot_from_chain, snapshot_from_segment, AstSnapshot};
pub use units::{format_clock, parse_clock, ClockError, RestUnit, WorkUnit};
