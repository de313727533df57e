//! # rwn
//!
//! Parser, validator, canonical namer and estimator for Rowing Workout Notation (RWN).
//!
//! RWN describes rowing (and cross training) sessions in a compact text form:
//!
//!     4x500m/1:00r
//!     [w]10:00 + 5x500m/1:00r + [c]5:00
//!     3x(750m/3:00r + 500m/3:00r)
//!
//! File Layout
//!
//! The engine is a straight pipeline, one module per stage:
//! src/rwn
//!   ├── lexing       text -> tokens (logos + classification)
//!   ├── parsing      tokens -> AST (recursive descent, guidance resolver)
//!   ├── validation   AST -> diagnostics
//!   ├── canonical    AST -> canonical name
//!   ├── estimate     AST -> duration / distance / calorie totals
//!   └── engine       the `parse_workout` entry point tying the stages together
//!
//! For the assertion helpers used across the test suites, see the [testing module](rwn::testing).

pub mod rwn;

pub use rwn::engine::{parse_workout, Engine, EngineOptions, ParseOutcome};
