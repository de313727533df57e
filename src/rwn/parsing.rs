//! Parsing module for RWN
//!
//! This module turns a token stream into a workout [`Chain`]:
//! 1. **Lexing**: [`tokenize`](crate::rwn::lexing::tokenize) classifies the input
//! 2. **Parsing**: the recursive-descent [`parser`] builds segments, chains and groups
//! 3. **Guidance**: every `@` clause is handed to the combinator-based [`guidance`] resolver
//!
//! Parsing stops at the first error. Errors keep the byte span of the offending token, so the
//! engine can report them as positioned diagnostics.
//!
//! ## Terminology
//!
//! - **active modality**: the modality applied to segments without a prefix. It starts as
//!   `Row`, a prefix changes it for the rest of the enclosing chain.
//! - **flattening**: a parenthesized chain without repeat count, rest or tag adds nothing, its
//!   parts are spliced into the enclosing chain.

pub mod guidance;
pub mod parser;

pub use guidance::{resolve_guidance, resolve_guidance_str};
pub use parser::Parser;

use crate::rwn::ast::{Chain, SyntaxError};
use crate::rwn::lexing::tokenize;
use crate::rwn::token::TokenSpan;

/// Parse a token stream (as produced by the lexer) into a workout chain
pub fn parse(tokens: &[TokenSpan]) -> Result<Chain, SyntaxError> {
    Parser::new(tokens).parse_workout()
}

/// Lex and parse notation text
pub fn parse_str(source: &str) -> Result<Chain, SyntaxError> {
    let tokens = tokenize(source)?;
    parse(&tokens)
}
