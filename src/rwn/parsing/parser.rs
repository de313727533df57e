//! Recursive-descent parser
//!
//! Grammar:
//!
//! ```text
//! workout  := chain EOF
//! chain    := segment ( '+' segment )*
//! segment  := marks body
//! marks    := ( BLOCK_TAG | LEGACY_TAG | MODALITY_PREFIX )*     each kind at most once
//! body     := COUNT 'x' '(' chain ')' rest?                      group
//!           | '(' chain ')' rest?                                group (or flattened)
//!           | COUNT 'x' work guidance? rest?                     interval
//!           | work guidance? rest? split?                        steady (or interval with rest)
//! work     := NUMBER 'm' | NUMBER 'cal' | TIME
//! rest     := '/' work 'r'
//! split    := '[' work ']'                                       steady only
//! ```
//!
//! The active modality is threaded through explicitly. A group body starts with the modality
//! active before the group; prefixes inside the group do not leak out of it.

use crate::rwn::ast::{
    parse_clock, BlockTag, Chain, Group, Guidance, GuidanceError, GuidanceErrorKind, Interval,
    Modality, NodeMeta, ParseError, ParseErrorKind, RestUnit, Segment, Steady, SyntaxError,
    TagStyle, WorkUnit,
};
use crate::rwn::parsing::guidance::resolve_guidance;
use crate::rwn::token::{Token, TokenSpan};
use std::ops::Range;
use tracing::trace;

type ParseResult<T> = Result<T, SyntaxError>;

/// Deepest group nesting accepted; every stage after parsing recurses once per level
pub const MAX_NESTING: usize = 32;

/// Tag and modality marks written before a segment body
#[derive(Debug, Default)]
struct Marks {
    tag: Option<(BlockTag, Range<usize>, TagStyle)>,
    prefix: Option<Modality>,
}

/// Recursive-descent parser over a classified token stream
pub struct Parser<'a> {
    tokens: &'a [TokenSpan],
    pos: usize,
    depth: usize,
    eof: TokenSpan,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [TokenSpan]) -> Self {
        let end = tokens.last().map(|(_, span)| span.end).unwrap_or(0);
        Self {
            tokens,
            pos: 0,
            depth: 0,
            eof: (Token::Eof, end..end),
        }
    }

    /// Parse the whole token stream as one workout
    pub fn parse_workout(&mut self) -> ParseResult<Chain> {
        let (parts, _) = self.parse_chain(Modality::default())?;
        match self.peek() {
            Token::Eof => {
                trace!(parts = parts.len(), "parsed workout");
                Ok(Chain::new(parts))
            }
            Token::RParen => Err(self.error(ParseErrorKind::UnmatchedParen, &["'+'", "end of input"])),
            _ => Err(self.error(ParseErrorKind::UnexpectedToken, &["'+'", "end of input"])),
        }
    }

    // ----- token cursor -----

    fn current(&self) -> &TokenSpan {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek(&self) -> &Token {
        &self.current().0
    }

    fn peek_at(&self, offset: usize) -> &TokenSpan {
        self.tokens.get(self.pos + offset).unwrap_or(&self.eof)
    }

    fn span(&self) -> Range<usize> {
        self.current().1.clone()
    }

    fn advance(&mut self) -> TokenSpan {
        let token = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// End offset of the last consumed token
    fn last_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map(|(_, span)| span.end)
            .unwrap_or(0)
    }

    fn error(&self, kind: ParseErrorKind, expected: &[&str]) -> SyntaxError {
        let (token, span) = self.current();
        ParseError::new(kind, span.clone(), expected, format!("'{}'", token)).into()
    }

    // ----- grammar -----

    /// Parse `segment ('+' segment)*`, returning the parts and the modality active at the end
    fn parse_chain(&mut self, mut active: Modality) -> ParseResult<(Vec<Segment>, Modality)> {
        let mut parts = Vec::new();
        loop {
            let (segments, next) = self.parse_segment(active)?;
            parts.extend(segments);
            active = next;
            if *self.peek() == Token::ChainOp {
                self.advance();
            } else {
                return Ok((parts, active));
            }
        }
    }

    /// Parse one segment. Flattened parentheses may yield several.
    fn parse_segment(&mut self, active: Modality) -> ParseResult<(Vec<Segment>, Modality)> {
        let start = self.span().start;
        let marks = self.parse_marks()?;
        let modality = marks.prefix.unwrap_or(active);

        match self.peek().clone() {
            Token::LParen => self.parse_group(start, marks, None, modality),
            Token::Number(_) if self.peek_at(1).0 == Token::RepeatOp => {
                let repeats = self.parse_repeat_count()?;
                if *self.peek() == Token::LParen {
                    self.parse_group(start, marks, Some(repeats), modality)
                } else {
                    let segment = self.parse_leaf(start, marks, Some(repeats), modality)?;
                    Ok((vec![segment], modality))
                }
            }
            Token::Number(_) | Token::Time(_) => {
                let segment = self.parse_leaf(start, marks, None, modality)?;
                Ok((vec![segment], modality))
            }
            _ => Err(self.error(ParseErrorKind::MissingWorkUnit, &["work unit", "'('"])),
        }
    }

    fn parse_marks(&mut self) -> ParseResult<Marks> {
        let mut marks = Marks::default();
        loop {
            let (token, span) = self.current().clone();
            match token {
                Token::BlockTag(tag) | Token::LegacyTag(tag) => {
                    if marks.tag.is_some() {
                        return Err(self.error(ParseErrorKind::DuplicateTag, &["work unit"]));
                    }
                    let style = if matches!(token, Token::BlockTag(_)) {
                        TagStyle::Block
                    } else {
                        TagStyle::Legacy
                    };
                    marks.tag = Some((tag, span, style));
                }
                Token::ModalityPrefix(modality) => {
                    if marks.prefix.is_some() {
                        return Err(self.error(ParseErrorKind::DuplicateModality, &["work unit"]));
                    }
                    marks.prefix = Some(modality);
                }
                _ => return Ok(marks),
            }
            self.advance();
        }
    }

    /// Parse `COUNT 'x'`
    fn parse_repeat_count(&mut self) -> ParseResult<u32> {
        let (token, span) = self.current().clone();
        let repeats = match &token {
            Token::Number(text) => text.parse::<u32>().ok().filter(|count| *count > 0),
            _ => None,
        };
        match repeats {
            Some(count) => {
                self.advance();
                self.advance();
                Ok(count)
            }
            None => Err(ParseError::new(
                ParseErrorKind::InvalidRepeatCount,
                span,
                &["positive whole number"],
                format!("'{}'", token),
            )
            .into()),
        }
    }

    /// Parse a quantity with its unit: `500m`, `20cal`, `1:00`
    fn parse_work(&mut self) -> ParseResult<WorkUnit> {
        let (token, span) = self.current().clone();
        let work = match &token {
            Token::Time(text) => {
                self.advance();
                let seconds = parse_clock(text).map_err(|_| {
                    SyntaxError::from(ParseError::new(
                        ParseErrorKind::UnexpectedToken,
                        span.clone(),
                        &["time"],
                        format!("'{}'", text),
                    ))
                })?;
                WorkUnit::Duration { seconds }
            }
            Token::Number(text) => {
                self.advance();
                match self.peek().clone() {
                    Token::DistanceUnit => {
                        self.advance();
                        let meters = text
                            .parse::<f64>()
                            .ok()
                            .filter(|meters| meters.is_finite())
                            .ok_or_else(|| {
                                SyntaxError::from(ParseError::new(
                                    ParseErrorKind::QuantityTooLarge,
                                    span.start..self.last_end(),
                                    &["finite distance"],
                                    format!("'{}'", text),
                                ))
                            })?;
                        WorkUnit::Distance { meters }
                    }
                    Token::CalorieUnit => {
                        let count = text.parse::<u32>().map_err(|_| {
                            SyntaxError::from(ParseError::new(
                                ParseErrorKind::UnexpectedToken,
                                span.clone(),
                                &["whole number of calories"],
                                format!("'{}'", text),
                            ))
                        })?;
                        self.advance();
                        WorkUnit::Calories { count }
                    }
                    _ => {
                        return Err(self.error(ParseErrorKind::MissingWorkUnit, &["'m'", "'cal'"]))
                    }
                }
            }
            _ => return Err(self.error(ParseErrorKind::MissingWorkUnit, &["work unit"])),
        };

        if !work.is_positive() {
            return Err(ParseError::new(
                ParseErrorKind::NonPositiveQuantity,
                span.start..self.last_end(),
                &["positive quantity"],
                format!("'{}'", work),
            )
            .into());
        }
        Ok(work)
    }

    /// Parse `'/' work 'r'` when the next token is `/`
    fn parse_rest(&mut self) -> ParseResult<Option<RestUnit>> {
        if *self.peek() != Token::PairOp {
            return Ok(None);
        }
        self.advance();

        if !self.peek().is_quantity() {
            return Err(self.error(ParseErrorKind::MalformedRest, &["rest unit"]));
        }
        let work = self.parse_work()?;
        if *self.peek() != Token::RestSuffix {
            return Err(self.error(ParseErrorKind::MalformedRest, &["'r'"]));
        }
        self.advance();
        Ok(Some(RestUnit(work)))
    }

    /// Parse an `@` clause when the next token is `@`
    fn parse_guidance(&mut self) -> ParseResult<Option<Guidance>> {
        if *self.peek() != Token::GuidanceMarker {
            return Ok(None);
        }
        let start = self.pos;
        self.advance();
        loop {
            match self.peek().clone() {
                Token::PairOp | Token::RParen | Token::LBracket | Token::Eof => break,
                Token::ChainOp if !self.at_offset_sign() => break,
                _ => {
                    self.advance();
                }
            }
        }
        let guidance = resolve_guidance(&self.tokens[start..self.pos])?;
        Ok(Some(guidance))
    }

    /// Whether the `+` under the cursor is the sign of a relative pace offset (`@2k+10`)
    /// rather than a chain operator. Only a glued `k+N` with no unit after `N` qualifies.
    fn at_offset_sign(&self) -> bool {
        let (_, plus) = self.current();
        let previous = self.pos.checked_sub(1).and_then(|index| self.tokens.get(index));
        let (next, next_span) = self.peek_at(1);
        let (after, _) = self.peek_at(2);

        let glued_to_k = matches!(previous, Some((Token::KiloSuffix, span)) if span.end == plus.start);
        let glued_number = matches!(next, Token::Number(text) if !text.contains('.'))
            && next_span.start == plus.end;
        let unit_follows = matches!(
            after,
            Token::DistanceUnit
                | Token::CalorieUnit
                | Token::RestSuffix
                | Token::RepeatOp
                | Token::KiloSuffix
        );
        glued_to_k && glued_number && !unit_follows
    }

    /// Parse a steady or interval segment
    fn parse_leaf(
        &mut self,
        start: usize,
        marks: Marks,
        repeats: Option<u32>,
        modality: Modality,
    ) -> ParseResult<Segment> {
        let work = self.parse_work()?;
        let guidance = self.parse_guidance()?;
        let rest = self.parse_rest()?;
        if guidance.is_some() && *self.peek() == Token::GuidanceMarker {
            return Err(GuidanceError::new(self.span(), GuidanceErrorKind::DuplicateGuidance).into());
        }

        let is_steady = rest.is_none() && repeats.unwrap_or(1) == 1;
        let split = if *self.peek() == Token::LBracket {
            if !is_steady {
                return Err(self.error(ParseErrorKind::UnexpectedToken, &["'+'", "end of input"]));
            }
            self.advance();
            let split = self.parse_work()?;
            if *self.peek() != Token::RBracket {
                return Err(self.error(ParseErrorKind::UnexpectedToken, &["']'"]));
            }
            self.advance();
            Some(split)
        } else {
            None
        };

        let meta = self.meta(start, &marks);
        let tag = marks.tag.map(|(tag, _, _)| tag);
        let segment = if is_steady {
            Segment::Steady(Steady {
                work,
                guidance,
                modality,
                tag,
                split,
                meta,
            })
        } else {
            Segment::Interval(Interval {
                repeats: repeats.unwrap_or(1),
                work,
                rest,
                guidance,
                modality,
                tag,
                meta,
            })
        };
        trace!(kind = segment.node_type(), span = ?segment.meta().span, "parsed segment");
        Ok(segment)
    }

    /// Parse `'(' chain ')' rest?`, flattening it when it carries nothing of its own
    fn parse_group(
        &mut self,
        start: usize,
        marks: Marks,
        repeats: Option<u32>,
        modality: Modality,
    ) -> ParseResult<(Vec<Segment>, Modality)> {
        if self.depth == MAX_NESTING {
            return Err(self.error(ParseErrorKind::NestingTooDeep, &["work unit"]));
        }
        let (_, open) = self.advance();
        self.depth += 1;
        let chain = self.parse_chain(modality);
        self.depth -= 1;
        let (mut body, inner) = chain?;
        if *self.peek() != Token::RParen {
            let (token, _) = self.current();
            return Err(ParseError::new(
                ParseErrorKind::UnmatchedParen,
                open,
                &["')'"],
                format!("'{}'", token),
            )
            .into());
        }
        self.advance();
        let group_rest = self.parse_rest()?;

        let flatten = marks.tag.is_none() && group_rest.is_none() && repeats.unwrap_or(1) == 1;
        if flatten {
            if marks.prefix.is_some() {
                if let Some(first) = body.first_mut() {
                    mark_explicit(first);
                }
            }
            return Ok((body, inner));
        }

        let mut meta = self.meta(start, &marks);
        meta.explicit_modality = marks.prefix.is_some();
        let group = Segment::Group(Group {
            repeats: repeats.unwrap_or(1),
            body,
            group_rest,
            tag: marks.tag.map(|(tag, _, _)| tag),
            meta,
        });
        trace!(span = ?group.meta().span, "parsed group");
        Ok((vec![group], modality))
    }

    fn meta(&self, start: usize, marks: &Marks) -> NodeMeta {
        NodeMeta {
            span: start..self.last_end(),
            tag_span: marks.tag.as_ref().map(|(_, span, _)| span.clone()),
            tag_style: marks.tag.as_ref().map(|(_, _, style)| *style),
            explicit_modality: marks.prefix.is_some(),
        }
    }
}

fn mark_explicit(segment: &mut Segment) {
    match segment {
        Segment::Steady(steady) => steady.meta.explicit_modality = true,
        Segment::Interval(interval) => interval.meta.explicit_modality = true,
        Segment::Group(group) => group.meta.explicit_modality = true,
    }
}
