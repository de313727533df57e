//! Guidance resolver
//!
//! Resolves the tokens of one `@` clause into a [`Guidance`] value. The clause shapes are
//! recognized with chumsky combinators over the token stream; the semantic checks (range
//! order, known zones and reference distances, integer rates) run afterwards on the matched
//! shape, so each failure gets its own error kind.
//!
//! Grammar (after the `@`):
//!
//! ```text
//! rate        := 'r' NUMBER ( '..' NUMBER )?        @r20  @r18..22
//!              | NUMBER ( '..' NUMBER )? 'spm'      @20spm  @18-22spm
//! pace        := TIME ( '..' TIME )?                @1:45  @2:05..2:10
//! relative    := NUMBER 'k' ( ('+' | '-') NUMBER )? @2k  @2k+10  @2k-5
//! zone        := ZONE | WORD                        @UT2
//! ```

use crate::rwn::ast::{
    parse_clock, Guidance, GuidanceError, GuidanceErrorKind, ReferenceDistance, Zone,
};
use crate::rwn::lexing::tokenize;
use crate::rwn::token::{Token, TokenSpan};
use chumsky::{prelude::*, Stream};
use std::ops::Range;

type ParserError = Simple<TokenSpan>;

/// A token's text and span, as matched by the shape grammar
type Spanned = (String, Range<usize>);

/// The recognized shape of a clause, before semantic checks
#[derive(Debug, Clone)]
enum Shape {
    Rate(Spanned, Option<Spanned>),
    Pace(Spanned, Option<Spanned>),
    Relative {
        kilometers: Spanned,
        offset: Option<(i64, Spanned)>,
    },
    Zone(Zone),
    Word(Spanned),
}

fn number() -> impl Parser<TokenSpan, Spanned, Error = ParserError> + Clone {
    filter_map(|span, (token, range): TokenSpan| match token {
        Token::Number(text) => Ok((text, range)),
        other => Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    })
}

fn time() -> impl Parser<TokenSpan, Spanned, Error = ParserError> + Clone {
    filter_map(|span, (token, range): TokenSpan| match token {
        Token::Time(text) => Ok((text, range)),
        other => Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    })
}

fn token(expected: Token) -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    filter(move |(token, _): &TokenSpan| *token == expected).ignored()
}

/// `-` only: offsets never use the `..` spelling
fn minus() -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    filter(|(token, range): &TokenSpan| *token == Token::RangeOp && range.len() == 1).ignored()
}

fn shape_parser() -> impl Parser<TokenSpan, Shape, Error = ParserError> {
    let range_tail = |bound: BoxedParser<'static, TokenSpan, Spanned, ParserError>| {
        token(Token::RangeOp).ignore_then(bound).or_not()
    };

    let prefixed_rate = token(Token::RestSuffix)
        .ignore_then(number())
        .then(range_tail(number().boxed()))
        .map(|(low, high)| Shape::Rate(low, high));

    let suffixed_rate = number()
        .then(range_tail(number().boxed()))
        .then_ignore(token(Token::RateUnit))
        .map(|(low, high)| Shape::Rate(low, high));

    let pace = time()
        .then(range_tail(time().boxed()))
        .map(|(low, high)| Shape::Pace(low, high));

    let sign = token(Token::ChainOp).to(1).or(minus().to(-1));
    let relative = number()
        .then_ignore(token(Token::KiloSuffix))
        .then(sign.then(number()).or_not())
        .map(|(kilometers, offset)| Shape::Relative { kilometers, offset });

    let zone = filter_map(|span, (token, range): TokenSpan| match token {
        Token::ZoneName(zone) => Ok(Shape::Zone(zone)),
        Token::Word(text) => Ok(Shape::Word((text, range))),
        other => Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    });

    choice((prefixed_rate, suffixed_rate, relative, pace, zone)).then_ignore(end())
}

/// Resolve the tokens of one guidance clause.
///
/// The slice may start with the `@` marker; a second marker anywhere in the slice is a
/// [`GuidanceErrorKind::DuplicateGuidance`] error.
pub fn resolve_guidance(tokens: &[TokenSpan]) -> Result<Guidance, GuidanceError> {
    let (marker, body) = match tokens.split_first() {
        Some(((Token::GuidanceMarker, span), rest)) => (span.clone(), rest),
        _ => (0..0, tokens),
    };
    let body: Vec<TokenSpan> = body
        .iter()
        .filter(|(token, _)| *token != Token::Eof)
        .cloned()
        .collect();

    if let Some((_, span)) = body.iter().find(|(token, _)| *token == Token::GuidanceMarker) {
        return Err(GuidanceError::new(
            span.clone(),
            GuidanceErrorKind::DuplicateGuidance,
        ));
    }

    let clause = match (body.first(), body.last()) {
        (Some((_, first)), Some((_, last))) => marker.start.min(first.start)..last.end,
        _ => marker.clone(),
    };
    if body.is_empty() {
        return Err(malformed(clause, "nothing"));
    }

    let eoi = clause.end..clause.end;
    let stream = Stream::from_iter(
        eoi,
        body.iter()
            .cloned()
            .map(|(token, span)| ((token, span.clone()), span)),
    );

    let shape = shape_parser().parse(stream).map_err(|errors| {
        let first = errors.into_iter().next();
        match first.as_ref().and_then(|error| error.found().cloned()) {
            Some((token, span)) => malformed(span, format!("'{}'", token)),
            None => malformed(clause.clone(), "end of guidance"),
        }
    })?;

    resolve_shape(shape, clause)
}

/// Lex and resolve a guidance clause such as `@2:05..2:10`
pub fn resolve_guidance_str(source: &str) -> Result<Guidance, GuidanceError> {
    let tokens = tokenize(source).map_err(|error| malformed(error.span.clone(), error.to_string()))?;
    resolve_guidance(&tokens)
}

fn resolve_shape(shape: Shape, clause: Range<usize>) -> Result<Guidance, GuidanceError> {
    match shape {
        Shape::Rate(low, None) => Ok(Guidance::Rate { spm: rate(&low)? }),
        Shape::Rate(low, Some(high)) => {
            let (low, high) = (rate(&low)?, rate(&high)?);
            ordered(low < high, clause)?;
            Ok(Guidance::RateRange { low, high })
        }
        Shape::Pace(low, None) => Ok(Guidance::Pace {
            seconds_per_500m: pace(&low)?,
        }),
        Shape::Pace(low, Some(high)) => {
            let (low, high) = (pace(&low)?, pace(&high)?);
            ordered(low < high, clause)?;
            Ok(Guidance::PaceRange { low, high })
        }
        Shape::Relative { kilometers, offset } => {
            let (text, span) = &kilometers;
            let reference = text
                .parse::<u32>()
                .ok()
                .and_then(ReferenceDistance::from_kilometers)
                .ok_or_else(|| {
                    GuidanceError::new(
                        span.start..span.end + 1,
                        GuidanceErrorKind::UnknownReference(format!("{}k", text)),
                    )
                })?;
            let offset_seconds = match offset {
                None => 0,
                Some((sign, (text, span))) => {
                    let magnitude = integer(&text, &span)?;
                    i32::try_from(sign * i64::from(magnitude))
                        .map_err(|_| malformed(span, format!("'{}'", text)))?
                }
            };
            Ok(Guidance::RelativePace {
                reference,
                offset_seconds,
            })
        }
        Shape::Zone(zone) => Ok(Guidance::Zone { zone }),
        Shape::Word((text, span)) => Err(GuidanceError::new(
            span,
            GuidanceErrorKind::UnknownZone(text),
        )),
    }
}

fn ordered(is_ordered: bool, clause: Range<usize>) -> Result<(), GuidanceError> {
    if is_ordered {
        Ok(())
    } else {
        Err(GuidanceError::new(clause, GuidanceErrorKind::InvalidRangeOrder))
    }
}

fn integer(text: &str, span: &Range<usize>) -> Result<u32, GuidanceError> {
    text.parse::<u32>()
        .map_err(|_| malformed(span.clone(), format!("'{}'", text)))
}

fn rate((text, span): &Spanned) -> Result<u32, GuidanceError> {
    match integer(text, span)? {
        0 => Err(malformed(span.clone(), "'0'")),
        spm => Ok(spm),
    }
}

fn pace((text, span): &Spanned) -> Result<f64, GuidanceError> {
    parse_clock(text).map_err(|_| malformed(span.clone(), format!("'{}'", text)))
}

fn malformed(span: Range<usize>, found: impl Into<String>) -> GuidanceError {
    GuidanceError::new(
        span,
        GuidanceErrorKind::Malformed {
            expected: vec![
                "stroke rate".to_string(),
                "pace".to_string(),
                "relative pace".to_string(),
                "zone".to_string(),
            ],
            found: found.into(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(source: &str) -> Guidance {
        resolve_guidance_str(source).unwrap()
    }

    fn error_kind(source: &str) -> GuidanceErrorKind {
        resolve_guidance_str(source).unwrap_err().kind
    }

    #[test]
    fn test_rates() {
        assert_eq!(resolve("@r20"), Guidance::Rate { spm: 20 });
        assert_eq!(resolve("@24spm"), Guidance::Rate { spm: 24 });
        assert_eq!(resolve("@r18..22"), Guidance::RateRange { low: 18, high: 22 });
        assert_eq!(resolve("@18-22spm"), Guidance::RateRange { low: 18, high: 22 });
    }

    #[test]
    fn test_paces() {
        assert_eq!(
            resolve("@1:45"),
            Guidance::Pace {
                seconds_per_500m: 105.0
            }
        );
        assert_eq!(
            resolve("@2:05..2:10"),
            Guidance::PaceRange {
                low: 125.0,
                high: 130.0
            }
        );
        assert_eq!(
            resolve("@2:05-2:10"),
            Guidance::PaceRange {
                low: 125.0,
                high: 130.0
            }
        );
    }

    #[test]
    fn test_relative_paces() {
        let relative = |reference, offset_seconds| Guidance::RelativePace {
            reference,
            offset_seconds,
        };
        assert_eq!(resolve("@2k"), relative(ReferenceDistance::K2, 0));
        assert_eq!(resolve("@2k+10"), relative(ReferenceDistance::K2, 10));
        assert_eq!(resolve("@6k-5"), relative(ReferenceDistance::K6, -5));
        assert_eq!(
            error_kind("@3k+2"),
            GuidanceErrorKind::UnknownReference("3k".into())
        );
    }

    #[test]
    fn test_zones() {
        assert_eq!(resolve("@UT2"), Guidance::Zone { zone: Zone::Ut2 });
        assert_eq!(resolve("@at"), Guidance::Zone { zone: Zone::At });
        assert_eq!(error_kind("@UT3"), GuidanceErrorKind::UnknownZone("UT3".into()));
        assert_eq!(error_kind("@easy"), GuidanceErrorKind::UnknownZone("easy".into()));
    }

    #[test]
    fn test_range_order() {
        let error = resolve_guidance_str("@2:10..2:05").unwrap_err();
        assert_eq!(error.kind, GuidanceErrorKind::InvalidRangeOrder);
        assert_eq!(error.span, 0..11);
        assert_eq!(error_kind("@r22..18"), GuidanceErrorKind::InvalidRangeOrder);
        assert_eq!(error_kind("@r20..20"), GuidanceErrorKind::InvalidRangeOrder);
    }

    #[test]
    fn test_duplicate_marker() {
        assert_eq!(error_kind("@r20@UT2"), GuidanceErrorKind::DuplicateGuidance);
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(error_kind("@"), GuidanceErrorKind::Malformed { .. }));
        assert!(matches!(error_kind("@r"), GuidanceErrorKind::Malformed { .. }));
        assert!(matches!(error_kind("@r20.5"), GuidanceErrorKind::Malformed { .. }));
        assert!(matches!(error_kind("@500m"), GuidanceErrorKind::Malformed { .. }));
    }
}
