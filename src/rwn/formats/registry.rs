//! Named output formats for parsed workouts
//!
//! A [`Formatter`] renders a whole [`Chain`] to text. The [`FormatRegistry`] keys formatters by
//! name in sorted order, which is also the order `--list-formats` prints them in.

use crate::rwn::ast::Chain;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No formatter is registered under the name
    UnknownFormat(String),
    /// The formatter could not render the workout
    Render { format: String, message: String },
}

impl FormatError {
    pub fn render(format: &str, message: impl fmt::Display) -> Self {
        FormatError::Render {
            format: format.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownFormat(name) => write!(f, "Unknown format '{name}'"),
            FormatError::Render { format, message } => {
                write!(f, "Cannot render workout as {format}: {message}")
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Renders a workout in one output format
pub trait Formatter: Send + Sync {
    /// Name used to select the format (`canonical`, `treeviz`)
    fn name(&self) -> &'static str;

    /// One line shown by `--list-formats`
    fn description(&self) -> &'static str;

    fn render(&self, chain: &Chain) -> Result<String, FormatError>;
}

pub struct FormatRegistry {
    formatters: BTreeMap<&'static str, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            formatters: BTreeMap::new(),
        }
    }

    /// Canonical notation and treeviz
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::CanonicalFormatter);
        registry.register(super::TreevizFormatter);
        registry
    }

    /// Add a formatter, handing back the one it replaces under the same name
    pub fn register(&mut self, formatter: impl Formatter + 'static) -> Option<Box<dyn Formatter>> {
        self.formatters.insert(formatter.name(), Box::new(formatter))
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|formatter| formatter.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Render a workout in the named format
    pub fn render(&self, chain: &Chain, name: &str) -> Result<String, FormatError> {
        self.get(name)
            .ok_or_else(|| FormatError::UnknownFormat(name.to_string()))?
            .render(chain)
    }

    /// Name and description of every format, sorted by name
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.formatters
            .values()
            .map(|formatter| (formatter.name(), formatter.description()))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
