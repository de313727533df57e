//! Shared configuration loader for the rwn tools.
//!
//! `defaults/rwn.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`RwnConfig`],
//! then turn the result into a ready [`Engine`] with [`RwnConfig::engine`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use rwn::rwn::ast::{parse_clock, Modality, ReferenceDistance};
use rwn::rwn::estimate::{ReferencePaces, SplitPaceModel};
use rwn::{Engine, EngineOptions};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/rwn.default.toml");

/// Top-level configuration consumed by rwn applications.
#[derive(Debug, Clone, Deserialize)]
pub struct RwnConfig {
    pub limits: LimitsConfig,
    pub estimate: EstimateConfig,
}

/// Input guards applied by the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_input_length: usize,
    pub repeat_ceiling: u32,
}

/// Pace data for the estimator, keyed by modality or reference distance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimateConfig {
    /// Modality name to split (`M:SS` per 500m)
    #[serde(default)]
    pub splits: BTreeMap<String, String>,
    #[serde(default)]
    pub calories_per_minute: BTreeMap<String, f64>,
    /// Reference distance label (`2k`) to pace (`M:SS` per 500m)
    #[serde(default)]
    pub reference_paces: BTreeMap<String, String>,
}

impl RwnConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            max_input_length: self.limits.max_input_length,
            repeat_ceiling: self.limits.repeat_ceiling,
        }
    }

    /// Build the split pace model described by `[estimate]`.
    pub fn pace_model(&self) -> Result<SplitPaceModel, ConfigError> {
        let mut model = SplitPaceModel::new();
        for (name, split) in &self.estimate.splits {
            model = model.with_split(modality(name)?, pace(split, "estimate.splits", name)?);
        }
        for (name, rate) in &self.estimate.calories_per_minute {
            if *rate <= 0.0 {
                return Err(ConfigError::Message(format!(
                    "estimate.calories_per_minute.{}: expected a positive rate, found {}",
                    name, rate
                )));
            }
            model = model.with_calories_per_minute(modality(name)?, *rate);
        }
        Ok(model)
    }

    /// Build the reference paces described by `[estimate.reference_paces]`.
    pub fn reference_paces(&self) -> Result<ReferencePaces, ConfigError> {
        let mut paces = ReferencePaces::new();
        for (label, value) in &self.estimate.reference_paces {
            let reference = ReferenceDistance::from_label(label).ok_or_else(|| {
                ConfigError::Message(format!(
                    "estimate.reference_paces: unknown reference distance '{}'",
                    label
                ))
            })?;
            paces.insert(reference, pace(value, "estimate.reference_paces", label)?);
        }
        Ok(paces)
    }

    /// Assemble an engine with the configured limits and pace data.
    pub fn engine(&self) -> Result<Engine, ConfigError> {
        Ok(Engine::new(self.engine_options())
            .with_pace_model(self.pace_model()?)
            .with_reference_paces(self.reference_paces()?))
    }
}

fn modality(name: &str) -> Result<Modality, ConfigError> {
    Modality::from_keyword(name)
        .ok_or_else(|| ConfigError::Message(format!("unknown modality '{}'", name)))
}

fn pace(value: &str, section: &str, key: &str) -> Result<f64, ConfigError> {
    match parse_clock(value) {
        Ok(seconds) if seconds > 0.0 => Ok(seconds),
        Ok(_) => Err(ConfigError::Message(format!(
            "{}.{}: pace must be positive",
            section, key
        ))),
        Err(error) => Err(ConfigError::Message(format!(
            "{}.{}: invalid pace '{}': {}",
            section, key, value, error
        ))),
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<RwnConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RwnConfig, ConfigError> {
    Loader::new().build()
}
