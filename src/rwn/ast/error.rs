//! Error types for lexing, parsing and guidance resolution
//!
//! None of these are fatal: the engine converts them into error diagnostics with
//! [`SyntaxError::to_diagnostic`].

use super::diagnostics::{Diagnostic, DiagnosticCode};
use super::units::ClockError;
use std::fmt;
use std::ops::Range;

/// Why the lexer rejected the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorReason {
    /// Empty or whitespace-only input
    EmptyInput,
    UnrecognizedCharacter(char),
    MalformedTime { text: String, problem: ClockError },
    /// `#intervals`, `[x]`
    UnknownTag(String),
    /// `Swim:`
    UnknownModality(String),
}

/// Lexing failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub span: Range<usize>,
    pub reason: LexErrorReason,
}

impl LexError {
    pub fn new(span: Range<usize>, reason: LexErrorReason) -> Self {
        Self { span, reason }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self.reason {
            LexErrorReason::EmptyInput => DiagnosticCode::EmptyInput,
            LexErrorReason::UnrecognizedCharacter(_) => DiagnosticCode::UnrecognizedCharacter,
            LexErrorReason::MalformedTime { .. } => DiagnosticCode::MalformedTime,
            LexErrorReason::UnknownTag(_) => DiagnosticCode::UnknownTag,
            LexErrorReason::UnknownModality(_) => DiagnosticCode::UnknownModality,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            LexErrorReason::EmptyInput => write!(f, "Empty input"),
            LexErrorReason::UnrecognizedCharacter(ch) => {
                write!(f, "Unrecognized character '{}' at offset {}", ch, self.span.start)
            }
            LexErrorReason::MalformedTime { text, problem } => {
                write!(f, "Malformed time '{}': {}", text, problem)
            }
            LexErrorReason::UnknownTag(text) => write!(f, "Unknown tag '{}'", text),
            LexErrorReason::UnknownModality(text) => write!(f, "Unknown modality '{}'", text),
        }
    }
}

impl std::error::Error for LexError {}

/// What kind of grammar rule was violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnmatchedParen,
    MissingWorkUnit,
    /// Repeat count of zero or a non-integer count
    InvalidRepeatCount,
    /// `/` not followed by a rest unit
    MalformedRest,
    DuplicateTag,
    DuplicateModality,
    /// A zero quantity (`0m`, `0:00`)
    NonPositiveQuantity,
    /// A distance too large to be represented
    QuantityTooLarge,
    UnexpectedToken,
    /// Groups nested deeper than the parser accepts
    NestingTooDeep,
}

impl ParseErrorKind {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            ParseErrorKind::UnmatchedParen => DiagnosticCode::UnmatchedParen,
            ParseErrorKind::MissingWorkUnit => DiagnosticCode::MissingWorkUnit,
            ParseErrorKind::InvalidRepeatCount => DiagnosticCode::InvalidRepeatCount,
            ParseErrorKind::MalformedRest => DiagnosticCode::MalformedRest,
            ParseErrorKind::DuplicateTag => DiagnosticCode::DuplicateTag,
            ParseErrorKind::DuplicateModality => DiagnosticCode::DuplicateModality,
            ParseErrorKind::NonPositiveQuantity => DiagnosticCode::NonPositiveQuantity,
            ParseErrorKind::QuantityTooLarge => DiagnosticCode::QuantityTooLarge,
            ParseErrorKind::UnexpectedToken => DiagnosticCode::UnexpectedToken,
            ParseErrorKind::NestingTooDeep => DiagnosticCode::NestingTooDeep,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ParseErrorKind::UnmatchedParen => "Unmatched parenthesis",
            ParseErrorKind::MissingWorkUnit => "Missing work unit",
            ParseErrorKind::InvalidRepeatCount => "Invalid repeat count",
            ParseErrorKind::MalformedRest => "Malformed rest pairing",
            ParseErrorKind::DuplicateTag => "Segment is tagged twice",
            ParseErrorKind::DuplicateModality => "Segment has two modality prefixes",
            ParseErrorKind::NonPositiveQuantity => "Quantity must be positive",
            ParseErrorKind::QuantityTooLarge => "Quantity is too large",
            ParseErrorKind::UnexpectedToken => "Unexpected token",
            ParseErrorKind::NestingTooDeep => "Groups are nested too deeply",
        }
    }
}

/// Grammar violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub span: Range<usize>,
    pub kind: ParseErrorKind,
    /// What the parser would have accepted at this point
    pub expected: Vec<String>,
    /// What it found instead
    pub found: String,
}

impl ParseError {
    pub fn new(
        kind: ParseErrorKind,
        span: Range<usize>,
        expected: &[&str],
        found: impl Into<String>,
    ) -> Self {
        Self {
            span,
            kind,
            expected: expected.iter().map(|e| e.to_string()).collect(),
            found: found.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: found {}", self.kind.describe(), self.found)?;
        if !self.expected.is_empty() {
            write!(f, ", expected {}", self.expected.join(" or "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// What went wrong while resolving a guidance clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidanceErrorKind {
    /// Range bounds not in effort order (`@2:10..2:05`)
    InvalidRangeOrder,
    UnknownZone(String),
    /// Relative pace against an unsupported reference (`@3k`)
    UnknownReference(String),
    /// A second `@` before a separator
    DuplicateGuidance,
    /// Tokens after `@` do not form any guidance shape
    Malformed { expected: Vec<String>, found: String },
}

/// Guidance resolution failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceError {
    pub span: Range<usize>,
    pub kind: GuidanceErrorKind,
}

impl GuidanceError {
    pub fn new(span: Range<usize>, kind: GuidanceErrorKind) -> Self {
        Self { span, kind }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self.kind {
            GuidanceErrorKind::InvalidRangeOrder => DiagnosticCode::InvalidRangeOrder,
            GuidanceErrorKind::UnknownZone(_) => DiagnosticCode::UnknownZone,
            GuidanceErrorKind::UnknownReference(_) => DiagnosticCode::UnknownReference,
            GuidanceErrorKind::DuplicateGuidance => DiagnosticCode::DuplicateGuidance,
            GuidanceErrorKind::Malformed { .. } => DiagnosticCode::MalformedGuidance,
        }
    }
}

impl fmt::Display for GuidanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            GuidanceErrorKind::InvalidRangeOrder => {
                write!(f, "Range must go from the lower to the higher value (faster pace first)")
            }
            GuidanceErrorKind::UnknownZone(name) => {
                write!(f, "Unknown training zone '{}' (expected UT2, UT1, AT, TR or AN)", name)
            }
            GuidanceErrorKind::UnknownReference(label) => {
                write!(f, "Unknown reference distance '{}'", label)
            }
            GuidanceErrorKind::DuplicateGuidance => {
                write!(f, "Only one guidance clause is allowed per segment")
            }
            GuidanceErrorKind::Malformed { expected, found } => {
                write!(f, "Malformed guidance: found {}", found)?;
                if !expected.is_empty() {
                    write!(f, ", expected {}", expected.join(" or "))?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for GuidanceError {}

/// Any failure that prevents an AST from forming
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    Lex(LexError),
    Parse(ParseError),
    Guidance(GuidanceError),
}

impl SyntaxError {
    pub fn span(&self) -> Range<usize> {
        match self {
            SyntaxError::Lex(error) => error.span.clone(),
            SyntaxError::Parse(error) => error.span.clone(),
            SyntaxError::Guidance(error) => error.span.clone(),
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self {
            SyntaxError::Lex(error) => error.code(),
            SyntaxError::Parse(error) => error.kind.code(),
            SyntaxError::Guidance(error) => error.code(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code(), self.span(), self.to_string())
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::Lex(error) => write!(f, "{}", error),
            SyntaxError::Parse(error) => write!(f, "{}", error),
            SyntaxError::Guidance(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for SyntaxError {}

impl From<LexError> for SyntaxError {
    fn from(error: LexError) -> Self {
        SyntaxError::Lex(error)
    }
}

impl From<ParseError> for SyntaxError {
    fn from(error: ParseError) -> Self {
        SyntaxError::Parse(error)
    }
}

impl From<GuidanceError> for SyntaxError {
    fn from(error: GuidanceError) -> Self {
        SyntaxError::Guidance(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rwn::ast::DiagnosticSeverity;

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::new(
            ParseErrorKind::MalformedRest,
            7..8,
            &["rest unit"],
            "'@'",
        );
        assert_eq!(
            error.to_string(),
            "Malformed rest pairing: found '@', expected rest unit"
        );
    }

    #[test]
    fn test_syntax_error_to_diagnostic() {
        let error: SyntaxError =
            GuidanceError::new(5..14, GuidanceErrorKind::InvalidRangeOrder).into();
        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
        assert_eq!(diagnostic.code, DiagnosticCode::InvalidRangeOrder);
        assert_eq!(diagnostic.position.offset, 5);
        assert_eq!(diagnostic.position.length, 9);
    }

    #[test]
    fn test_lex_error_codes() {
        let error = LexError::new(0..0, LexErrorReason::EmptyInput);
        assert_eq!(error.code(), DiagnosticCode::EmptyInput);
        assert_eq!(error.to_string(), "Empty input");
    }
}
