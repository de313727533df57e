//! Diagnostic collection types
//!
//! Every stage reports problems as [`Diagnostic`] values: lexing, parsing and guidance
//! failures are converted at the engine boundary, the validator produces them directly.
//!
//! Codes are stable identifiers, so a UI can localize messages without parsing prose. The
//! serialized form of a code is its variant name (`"ImplicitModality"`).

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DiagnosticSeverity {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "info")]
    Information,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
        }
    }
}

/// Stable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    // Engine boundary
    InputTooLong,
    // Lexing
    EmptyInput,
    UnrecognizedCharacter,
    MalformedTime,
    UnknownTag,
    UnknownModality,
    // Parsing
    UnmatchedParen,
    MissingWorkUnit,
    InvalidRepeatCount,
    MalformedRest,
    DuplicateTag,
    DuplicateModality,
    NonPositiveQuantity,
    QuantityTooLarge,
    UnexpectedToken,
    NestingTooDeep,
    // Guidance
    InvalidRangeOrder,
    UnknownZone,
    UnknownReference,
    DuplicateGuidance,
    MalformedGuidance,
    // Validation
    RepeatCountInvalid,
    RepeatCountExcessive,
    IncompatibleRest,
    ImplicitModality,
    LegacyTagPresent,
    SplitKindMismatch,
    SplitExceedsWork,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::InputTooLong => "InputTooLong",
            DiagnosticCode::EmptyInput => "EmptyInput",
            DiagnosticCode::UnrecognizedCharacter => "UnrecognizedCharacter",
            DiagnosticCode::MalformedTime => "MalformedTime",
            DiagnosticCode::UnknownTag => "UnknownTag",
            DiagnosticCode::UnknownModality => "UnknownModality",
            DiagnosticCode::UnmatchedParen => "UnmatchedParen",
            DiagnosticCode::MissingWorkUnit => "MissingWorkUnit",
            DiagnosticCode::InvalidRepeatCount => "InvalidRepeatCount",
            DiagnosticCode::MalformedRest => "MalformedRest",
            DiagnosticCode::DuplicateTag => "DuplicateTag",
            DiagnosticCode::DuplicateModality => "DuplicateModality",
            DiagnosticCode::NonPositiveQuantity => "NonPositiveQuantity",
            DiagnosticCode::QuantityTooLarge => "QuantityTooLarge",
            DiagnosticCode::UnexpectedToken => "UnexpectedToken",
            DiagnosticCode::NestingTooDeep => "NestingTooDeep",
            DiagnosticCode::InvalidRangeOrder => "InvalidRangeOrder",
            DiagnosticCode::UnknownZone => "UnknownZone",
            DiagnosticCode::UnknownReference => "UnknownReference",
            DiagnosticCode::DuplicateGuidance => "DuplicateGuidance",
            DiagnosticCode::MalformedGuidance => "MalformedGuidance",
            DiagnosticCode::RepeatCountInvalid => "RepeatCountInvalid",
            DiagnosticCode::RepeatCountExcessive => "RepeatCountExcessive",
            DiagnosticCode::IncompatibleRest => "IncompatibleRest",
            DiagnosticCode::ImplicitModality => "ImplicitModality",
            DiagnosticCode::LegacyTagPresent => "LegacyTagPresent",
            DiagnosticCode::SplitKindMismatch => "SplitKindMismatch",
            DiagnosticCode::SplitExceedsWork => "SplitExceedsWork",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Location of a diagnostic as a byte offset and length into the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct DiagnosticPosition {
    pub offset: usize,
    pub length: usize,
}

impl From<Range<usize>> for DiagnosticPosition {
    fn from(range: Range<usize>) -> Self {
        Self {
            offset: range.start,
            length: range.end.saturating_sub(range.start),
        }
    }
}

impl fmt::Display for DiagnosticPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.offset, self.offset + self.length)
    }
}

/// Structured diagnostic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: DiagnosticCode,
    pub position: DiagnosticPosition,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: DiagnosticSeverity,
        code: DiagnosticCode,
        span: Range<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code,
            position: span.into(),
            message: message.into(),
        }
    }

    pub fn error(code: DiagnosticCode, span: Range<usize>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, code, span, message)
    }

    pub fn warning(code: DiagnosticCode, span: Range<usize>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, code, span, message)
    }

    pub fn info(code: DiagnosticCode, span: Range<usize>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Information, code, span, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} at {}",
            self.severity, self.code, self.message, self.position
        )
    }
}

/// Whether any diagnostic in the list is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
