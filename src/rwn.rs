//! Main module for rwn library functionality

pub mod ast;
pub mod canonical;
pub mod engine;
pub mod estimate;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod testing;
pub mod token;
pub mod validation;
