//! Editor configuration.
//!
//! # Responsibility
//! - Hold tunables shared by the editor session and the plot sampler.
//! - Load them from JSON text or the process environment.
//!
//! # Invariants
//! - A validated config always has a non-blank variable name, at least one
//!   sample step, and non-empty domain/range intervals.

use crate::plot::GraphSettings;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name of the free variable the evaluator binds by convention.
pub const DEFAULT_VARIABLE: &str = "x";
/// Number of sampling steps across the visible domain.
pub const DEFAULT_SAMPLE_STEPS: usize = 1000;
/// Environment override for `sample_steps`.
pub const SAMPLE_STEPS_ENV: &str = "MATHBLOCKS_SAMPLE_STEPS";

/// Errors from loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// JSON text could not be parsed.
    Parse(serde_json::Error),
    /// Environment override is not a positive integer.
    InvalidEnv { key: &'static str, value: String },
    /// Variable name is blank after trim.
    BlankVariable,
    /// Sampling needs at least one step.
    ZeroSampleSteps,
    /// Domain or range bounds are reversed or equal.
    EmptyInterval { axis: &'static str, min: f64, max: f64 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid editor config: {err}"),
            Self::InvalidEnv { key, value } => {
                write!(f, "{key} must be a positive integer, got `{value}`")
            }
            Self::BlankVariable => write!(f, "default variable must not be blank"),
            Self::ZeroSampleSteps => write!(f, "sample_steps must be greater than zero"),
            Self::EmptyInterval { axis, min, max } => {
                write!(f, "{axis} interval is empty: min {min} must be < max {max}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Tunables for one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Serialized for `variable` leaves that have no value.
    pub default_variable: String,
    pub sample_steps: usize,
    pub graph: GraphSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_variable: DEFAULT_VARIABLE.to_string(),
            sample_steps: DEFAULT_SAMPLE_STEPS,
            graph: GraphSettings::default(),
        }
    }
}

impl EditorConfig {
    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds defaults, then applies `MATHBLOCKS_SAMPLE_STEPS` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(SAMPLE_STEPS_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                config.sample_steps =
                    trimmed
                        .parse::<usize>()
                        .map_err(|_| ConfigError::InvalidEnv {
                            key: SAMPLE_STEPS_ENV,
                            value: trimmed.to_string(),
                        })?;
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_variable.trim().is_empty() {
            return Err(ConfigError::BlankVariable);
        }
        if self.sample_steps == 0 {
            return Err(ConfigError::ZeroSampleSteps);
        }
        let GraphSettings {
            x_min,
            x_max,
            y_min,
            y_max,
        } = self.graph;
        if !is_ordered(x_min, x_max) {
            return Err(ConfigError::EmptyInterval {
                axis: "x",
                min: x_min,
                max: x_max,
            });
        }
        if !is_ordered(y_min, y_max) {
            return Err(ConfigError::EmptyInterval {
                axis: "y",
                min: y_min,
                max: y_max,
            });
        }
        Ok(())
    }
}

/// `min < max`; NaN bounds are never ordered.
fn is_ordered(min: f64, max: f64) -> bool {
    matches!(min.partial_cmp(&max), Some(Ordering::Less))
}
