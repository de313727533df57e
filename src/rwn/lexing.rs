//! Lexer
//!
//! Tokenization runs in two passes:
//!
//!     1. Raw tokenization through logos. The raw grammar only knows shapes: numbers, clock
//!        values, alphabetic words, `Word:` prefixes, `[x]` tags, `#word` tags and punctuation.
//!     2. Classification. Raw words are matched case-insensitively against the unit suffixes,
//!        operators and zone names, tags and prefixes are resolved to their enums, and clock
//!        values are checked (seconds below 60, tenths only).
//!
//! Keeping spelling out of the logos grammar means letter case never produces a different token
//! shape, and every unknown spelling still gets a precise error.
//!
//! Whitespace is skipped. Notation glues units to their numbers (`500m`, `1:00r`), so an
//! alphabetic run can carry two suffixes: `500mr` is a distance rest and lexes as
//! `500`, `m`, `r`.

use crate::rwn::ast::{parse_clock, BlockTag, LexError, LexErrorReason, Modality, Zone};
use crate::rwn::token::{Token, TokenSpan};
use logos::Logos;
use std::ops::Range;

/// Shape-level tokens produced by logos
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[regex(r"[0-9]+(:[0-9]+)+(\.[0-9]+)?")]
    Clock,
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,
    #[regex(r"[A-Za-z]+")]
    Word,
    #[regex(r"[A-Za-z]+:")]
    Prefix,
    #[regex(r"[uU][tT][0-9]")]
    ZoneCode,
    #[regex(r"\[[A-Za-z]+\]")]
    Tag,
    #[regex(r"#[A-Za-z]+")]
    Legacy,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("+")]
    Plus,
    #[token("/")]
    Slash,
    #[token("@")]
    At,
    #[token("..")]
    DotDot,
    #[token("-")]
    Dash,
}

/// Tokenize notation text into classified tokens with byte spans.
///
/// The returned stream always ends with [`Token::Eof`] spanning `len..len`.
pub fn tokenize(source: &str) -> Result<Vec<TokenSpan>, LexError> {
    if source.trim().is_empty() {
        return Err(LexError::new(0..source.len(), LexErrorReason::EmptyInput));
    }

    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let slice = lexer.slice();
        match result {
            Ok(raw) => classify(raw, slice, span, &mut tokens)?,
            Err(()) => {
                let ch = source[span.start..].chars().next().unwrap_or('\u{fffd}');
                return Err(LexError::new(
                    span,
                    LexErrorReason::UnrecognizedCharacter(ch),
                ));
            }
        }
    }

    tokens.push((Token::Eof, source.len()..source.len()));
    Ok(tokens)
}

/// Map a raw token onto one or more classified tokens
fn classify(
    raw: RawToken,
    slice: &str,
    span: Range<usize>,
    out: &mut Vec<TokenSpan>,
) -> Result<(), LexError> {
    let token = match raw {
        RawToken::Clock => {
            parse_clock(slice).map_err(|problem| {
                LexError::new(
                    span.clone(),
                    LexErrorReason::MalformedTime {
                        text: slice.to_string(),
                        problem,
                    },
                )
            })?;
            Token::Time(slice.to_string())
        }
        RawToken::Number => Token::Number(slice.to_string()),
        RawToken::Word => {
            classify_word(slice, span, out);
            return Ok(());
        }
        RawToken::Prefix => {
            let keyword = &slice[..slice.len() - 1];
            match Modality::from_keyword(keyword) {
                Some(modality) => Token::ModalityPrefix(modality),
                None => {
                    return Err(LexError::new(
                        span,
                        LexErrorReason::UnknownModality(slice.to_string()),
                    ))
                }
            }
        }
        RawToken::ZoneCode => match Zone::from_name(slice) {
            Some(zone) => Token::ZoneName(zone),
            None => Token::Word(slice.to_string()),
        },
        RawToken::Tag => {
            let letter = &slice[1..slice.len() - 1];
            match BlockTag::from_block_letter(letter) {
                Some(tag) => Token::BlockTag(tag),
                None => {
                    return Err(LexError::new(
                        span,
                        LexErrorReason::UnknownTag(slice.to_string()),
                    ))
                }
            }
        }
        RawToken::Legacy => match BlockTag::from_legacy_word(&slice[1..]) {
            Some(tag) => Token::LegacyTag(tag),
            None => {
                return Err(LexError::new(
                    span,
                    LexErrorReason::UnknownTag(slice.to_string()),
                ))
            }
        },
        RawToken::LBracket => Token::LBracket,
        RawToken::RBracket => Token::RBracket,
        RawToken::LParen => Token::LParen,
        RawToken::RParen => Token::RParen,
        RawToken::Plus => Token::ChainOp,
        RawToken::Slash => Token::PairOp,
        RawToken::At => Token::GuidanceMarker,
        RawToken::DotDot | RawToken::Dash => Token::RangeOp,
    };
    out.push((token, span));
    Ok(())
}

/// Classify an alphabetic run, splitting glued unit + rest suffixes
fn classify_word(slice: &str, span: Range<usize>, out: &mut Vec<TokenSpan>) {
    let lower = slice.to_ascii_lowercase();
    let single = match lower.as_str() {
        "m" => Some(Token::DistanceUnit),
        "cal" | "c" => Some(Token::CalorieUnit),
        "r" => Some(Token::RestSuffix),
        "x" => Some(Token::RepeatOp),
        "spm" => Some(Token::RateUnit),
        "k" => Some(Token::KiloSuffix),
        word => Zone::from_name(word).map(Token::ZoneName),
    };
    if let Some(token) = single {
        out.push((token, span));
        return;
    }

    let unit = match lower.as_str() {
        "mr" => Some(Token::DistanceUnit),
        "calr" | "cr" => Some(Token::CalorieUnit),
        _ => None,
    };
    match unit {
        Some(unit) => {
            let split = span.end - 1;
            out.push((unit, span.start..split));
            out.push((Token::RestSuffix, split..span.end));
        }
        None => out.push((Token::Word(slice.to_string()), span)),
    }
}

/// Tokens without spans, handy in tests and debugging output
pub fn strip_spans(tokens: &[TokenSpan]) -> Vec<Token> {
    tokens.iter().map(|(token, _)| token.clone()).collect()
}
