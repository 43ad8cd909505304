//! Bridge to the external numeric evaluator and curve sampling.
//!
//! # Responsibility
//! - Define the seam through which the serialized expression reaches an
//!   external compile/evaluate engine.
//! - Turn an expression into plottable samples without ever failing.
//!
//! # Invariants
//! - Evaluator failures never propagate past this module; they degrade to
//!   missing points.
//! - The free variable is bound by name on every evaluation.

pub mod sample;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use sample::{generate_points, trace_segments, Point};

static ASSIGNMENT_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^y\s*=\s*").expect("valid assignment prefix regex"));

/// Errors reported by an external expression engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Expression text was rejected by the engine's parser.
    Compile(String),
    /// Evaluation failed for one binding.
    Evaluate(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compile(message) => write!(f, "expression did not compile: {message}"),
            Self::Evaluate(message) => write!(f, "expression evaluation failed: {message}"),
        }
    }
}

impl Error for EngineError {}

/// Result type used by engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

/// A compiled expression with one free variable.
pub trait CompiledExpression {
    /// Evaluates the expression with the free variable bound to `x`.
    fn evaluate(&self, x: f64) -> EngineResult<f64>;
}

/// External compile/evaluate engine.
pub trait ExpressionEngine {
    fn compile(&self, expression: &str) -> EngineResult<Box<dyn CompiledExpression>>;
}

/// Visible domain and range of the plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
        }
    }
}

impl GraphSettings {
    /// Returns whether `y` lies inside the visible range.
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.y_min && y <= self.y_max
    }
}

/// Strips a leading `y =` assignment and surrounding whitespace.
pub fn strip_assignment_prefix(expression: &str) -> &str {
    let trimmed = expression.trim();
    match ASSIGNMENT_PREFIX_RE.find(trimmed) {
        Some(prefix) => &trimmed[prefix.end()..],
        None => trimmed,
    }
}

/// Returns whether `expression` compiles and depends on `variable`.
///
/// The dependency check is textual on the cleaned expression.
pub fn is_valid_function(
    engine: &dyn ExpressionEngine,
    expression: &str,
    variable: &str,
) -> bool {
    let cleaned = strip_assignment_prefix(expression);
    if cleaned.is_empty() {
        return false;
    }
    engine.compile(cleaned).is_ok() && cleaned.contains(variable)
}

#[cfg(test)]
mod tests {
    use super::{strip_assignment_prefix, GraphSettings};

    #[test]
    fn strip_assignment_prefix_handles_spacing() {
        assert_eq!(strip_assignment_prefix("  y = x^2 "), "x^2");
        assert_eq!(strip_assignment_prefix("y=sin(x)"), "sin(x)");
        assert_eq!(strip_assignment_prefix("x + y"), "x + y");
    }

    #[test]
    fn default_settings_span_ten_units_each_way() {
        let settings = GraphSettings::default();
        assert_eq!(settings.x_min, -10.0);
        assert_eq!(settings.y_max, 10.0);
        assert!(settings.contains_y(10.0));
        assert!(!settings.contains_y(10.5));
    }
}
