//! Parse engine: the single entry point from notation text to a full outcome
//!
//! [`Engine::parse_workout`] runs every stage and never fails. Whatever goes wrong ends up as a
//! diagnostic in the returned [`ParseOutcome`]:
//!
//! 1. input length guard (`InputTooLong`, nothing else runs)
//! 2. lexing, parsing and guidance resolution (the first failure becomes one error
//!    diagnostic, and no AST is produced)
//! 3. validation, whose warnings and info never block the later stages
//! 4. canonical naming and estimation
//!
//! The engine holds only immutable configuration, so one instance can serve concurrent callers.

use crate::rwn::ast::{has_errors, Chain, Diagnostic, DiagnosticCode, SyntaxError};
use crate::rwn::canonical::canonicalize;
use crate::rwn::estimate::{estimate, Estimate, EstimateContext, PaceModel, ReferencePaces};
use crate::rwn::lexing::tokenize;
use crate::rwn::parsing::parse;
use crate::rwn::validation::{validate, ValidationOptions, DEFAULT_REPEAT_CEILING};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

/// Default maximum input length, in characters
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Longest accepted input, in characters
    pub max_input_length: usize,
    /// Repeat counts above this are reported as excessive
    pub repeat_ceiling: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            repeat_ceiling: DEFAULT_REPEAT_CEILING,
        }
    }
}

/// Everything known about one piece of notation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    pub ast: Option<Chain>,
    pub diagnostics: Vec<Diagnostic>,
    pub canonical_name: Option<String>,
    pub estimate: Option<Estimate>,
}

impl ParseOutcome {
    fn failed(diagnostic: Diagnostic) -> Self {
        Self {
            ast: None,
            diagnostics: vec![diagnostic],
            canonical_name: None,
            estimate: None,
        }
    }

    pub fn has_errors(&self) -> bool {
        has_errors(&self.diagnostics)
    }
}

/// Configured parse pipeline
#[derive(Clone, Default)]
pub struct Engine {
    options: EngineOptions,
    pace_model: Option<Arc<dyn PaceModel + Send + Sync>>,
    reference_paces: Option<ReferencePaces>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            pace_model: None,
            reference_paces: None,
        }
    }

    pub fn with_pace_model(mut self, model: impl PaceModel + Send + Sync + 'static) -> Self {
        self.pace_model = Some(Arc::new(model));
        self
    }

    pub fn with_reference_paces(mut self, paces: ReferencePaces) -> Self {
        self.reference_paces = Some(paces);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    fn estimate_context(&self) -> EstimateContext<'_> {
        EstimateContext {
            pace_model: self
                .pace_model
                .as_deref()
                .map(|model| model as &dyn PaceModel),
            reference_paces: self.reference_paces.as_ref(),
        }
    }

    /// Reject input longer than the configured maximum, counted in characters
    pub fn check_length(&self, text: &str) -> Result<(), Diagnostic> {
        let length = text.chars().count();
        if length > self.options.max_input_length {
            debug!(length, max = self.options.max_input_length, "input too long");
            return Err(Diagnostic::error(
                DiagnosticCode::InputTooLong,
                0..text.len(),
                format!(
                    "Input is {} characters long; the maximum is {}",
                    length, self.options.max_input_length
                ),
            ));
        }
        Ok(())
    }

    /// Run the whole pipeline on notation text
    pub fn parse_workout(&self, text: &str) -> ParseOutcome {
        if let Err(diagnostic) = self.check_length(text) {
            return ParseOutcome::failed(diagnostic);
        }

        let tokens = match tokenize(text) {
            Ok(tokens) => tokens,
            Err(error) => {
                debug!(%error, "lexing failed");
                return ParseOutcome::failed(SyntaxError::from(error).to_diagnostic());
            }
        };
        trace!(count = tokens.len(), "tokenized");

        let chain = match parse(&tokens) {
            Ok(chain) => chain,
            Err(error) => {
                debug!(%error, code = %error.code(), "parsing failed");
                return ParseOutcome::failed(error.to_diagnostic());
            }
        };
        debug!(parts = chain.parts.len(), "parsed");

        let validation = ValidationOptions {
            repeat_ceiling: self.options.repeat_ceiling,
        };
        let diagnostics = validate(&chain, &validation);
        debug!(count = diagnostics.len(), "validated");

        let canonical_name = canonicalize(&chain);
        let estimate = estimate(&chain, &self.estimate_context());
        debug!(name = %canonical_name, ?estimate, "finished");

        ParseOutcome {
            ast: Some(chain),
            diagnostics,
            canonical_name: Some(canonical_name),
            estimate: Some(estimate),
        }
    }
}

/// Parse with default options and no pace model
pub fn parse_workout(text: &str) -> ParseOutcome {
    Engine::default().parse_workout(text)
}
