//! Token definitions for RWN
//!
//! These are the classified tokens the parser consumes. Raw tokenization happens in
//! [lexing](crate::rwn::lexing) through logos; the classification pass maps alphabetic runs,
//! bracketed tags and prefixes onto the variants below, so the parser never deals with
//! letter case or spelling variants.
//!
//! Tokens always travel together with their byte span, see [`TokenSpan`].

use crate::rwn::ast::{BlockTag, Modality, Zone};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Token paired with its byte range in the source
pub type TokenSpan = (Token, Range<usize>);

/// All token kinds of the notation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Token {
    /// Integer or decimal number, kept as written (`500`, `2.5`)
    Number(String),
    /// Clock value, kept as written (`1:00`, `1:45.5`, `1:00:00`)
    Time(String),
    /// `m`
    DistanceUnit,
    /// `cal` or `c`
    CalorieUnit,
    /// `r`, trailing a rest quantity (and introducing a stroke rate inside guidance)
    RestSuffix,
    /// `x`
    RepeatOp,
    /// `+`
    ChainOp,
    /// `/`
    PairOp,
    /// `@`
    GuidanceMarker,
    /// `[w]`, `[c]`, `[t]`
    BlockTag(BlockTag),
    /// `#warmup`, `#cooldown`, `#test`
    LegacyTag(BlockTag),
    /// `Row:`, `Bike:`, `Ski:`, `Run:`, `Other:`
    ModalityPrefix(Modality),
    LParen,
    RParen,
    /// `[`, opening a split annotation
    LBracket,
    /// `]`
    RBracket,
    /// `..` or `-`
    RangeOp,
    /// `UT2`, `UT1`, `AT`, `TR`, `AN`
    ZoneName(Zone),
    /// `spm`
    RateUnit,
    /// `k`, as in `@2k+10`
    KiloSuffix,
    /// Any other alphabetic run
    Word(String),
    Eof,
}

impl Token {
    /// Human readable kind name, used in `expected` lists of parse errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Number(_) => "number",
            Token::Time(_) => "time",
            Token::DistanceUnit => "'m'",
            Token::CalorieUnit => "'cal'",
            Token::RestSuffix => "'r'",
            Token::RepeatOp => "'x'",
            Token::ChainOp => "'+'",
            Token::PairOp => "'/'",
            Token::GuidanceMarker => "'@'",
            Token::BlockTag(_) => "block tag",
            Token::LegacyTag(_) => "legacy tag",
            Token::ModalityPrefix(_) => "modality prefix",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::LBracket => "'['",
            Token::RBracket => "']'",
            Token::RangeOp => "'..'",
            Token::ZoneName(_) => "zone",
            Token::RateUnit => "'spm'",
            Token::KiloSuffix => "'k'",
            Token::Word(_) => "word",
            Token::Eof => "end of input",
        }
    }

    /// Check if this token can start a segment
    pub fn starts_segment(&self) -> bool {
        matches!(
            self,
            Token::Number(_)
                | Token::Time(_)
                | Token::LParen
                | Token::BlockTag(_)
                | Token::LegacyTag(_)
                | Token::ModalityPrefix(_)
        )
    }

    /// Check if this token is a quantity (the numeric part of a work or rest unit)
    pub fn is_quantity(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Time(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(text) | Token::Time(text) | Token::Word(text) => write!(f, "{}", text),
            Token::DistanceUnit => write!(f, "m"),
            Token::CalorieUnit => write!(f, "cal"),
            Token::RestSuffix => write!(f, "r"),
            Token::RepeatOp => write!(f, "x"),
            Token::ChainOp => write!(f, "+"),
            Token::PairOp => write!(f, "/"),
            Token::GuidanceMarker => write!(f, "@"),
            Token::BlockTag(tag) => write!(f, "{}", tag.block_form()),
            Token::LegacyTag(tag) => write!(f, "{}", tag.legacy_form()),
            Token::ModalityPrefix(modality) => write!(f, "{}:", modality),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::RangeOp => write!(f, ".."),
            Token::ZoneName(zone) => write!(f, "{}", zone),
            Token::RateUnit => write!(f, "spm"),
            Token::KiloSuffix => write!(f, "k"),
            Token::Eof => write!(f, "<eof>"),
        }
    }
}

/// Render a token stream back to compact text, one space between tokens.
///
/// Used by the CLI `tokens` format; it is not a faithful detokenizer (whitespace and
/// original spelling of units are normalized).
pub fn tokens_to_string(tokens: &[TokenSpan]) -> String {
    tokens
        .iter()
        .filter(|(token, _)| *token != Token::Eof)
        .map(|(token, _)| token.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
