//! Canonical notation as an output format

use super::registry::{FormatError, Formatter};
use crate::rwn::ast::Chain;
use crate::rwn::canonical::canonicalize;

/// Formatter implementation for canonical notation
pub struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn name(&self) -> &'static str {
        "canonical"
    }

    fn render(&self, chain: &Chain) -> Result<String, FormatError> {
        Ok(format!("{}\n", canonicalize(chain)))
    }

    fn description(&self) -> &'static str {
        "Canonical notation, one line"
    }
}
