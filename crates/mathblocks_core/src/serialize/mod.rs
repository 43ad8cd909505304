//! Block tree to evaluator text.
//!
//! # Responsibility
//! - Convert a block tree into the expression syntax consumed by the external
//!   numeric evaluator.
//!
//! # Invariants
//! - Total: every tree, including incomplete ones, serializes without error.
//! - Binary operations are always fully parenthesized.
//! - Empty slots and the empty tree serialize to `""`.

pub mod preview;

use crate::config::DEFAULT_VARIABLE;
use crate::model::block::{BlockKind, BlockNode};
use std::sync::Arc;

pub use preview::{display_math, preview_markup};

/// Serializes a tree using the conventional free variable name.
pub fn to_expression(root: Option<&BlockNode>) -> String {
    to_expression_with_variable(root, DEFAULT_VARIABLE)
}

/// Serializes a tree; unset or empty `variable` leaves become `variable`.
pub fn to_expression_with_variable(root: Option<&BlockNode>, variable: &str) -> String {
    let Some(node) = root else {
        return String::new();
    };
    let slot = |index: usize| {
        to_expression_with_variable(node.child(index).map(Arc::as_ref), variable)
    };

    match node.kind {
        BlockKind::Variable => node
            .value()
            .filter(|value| !value.is_empty())
            .unwrap_or(variable)
            .to_string(),
        BlockKind::LiteralExpression => node.value().unwrap_or_default().to_string(),
        BlockKind::Add => format!("({} + {})", slot(0), slot(1)),
        BlockKind::Subtract => format!("({} - {})", slot(0), slot(1)),
        BlockKind::Multiply => format!("({} * {})", slot(0), slot(1)),
        BlockKind::Divide | BlockKind::Fraction => format!("(({}) / ({}))", slot(0), slot(1)),
        BlockKind::Power => format!("({})^({})", slot(0), slot(1)),
        // radicand, degree
        BlockKind::Root => format!("nthRoot({}, {})", slot(0), slot(1)),
        // value, base: the reverse of slot order
        BlockKind::LogBase => format!("log({}, {})", slot(1), slot(0)),
        // Both map to the natural log.
        BlockKind::Log | BlockKind::Ln => format!("log({})", slot(0)),
        BlockKind::Sin
        | BlockKind::Cos
        | BlockKind::Tan
        | BlockKind::Csc
        | BlockKind::Sec
        | BlockKind::Cot => format!("{}({})", node.kind.as_str(), slot(0)),
        BlockKind::Arcsin => format!("asin({})", slot(0)),
        BlockKind::Arccos => format!("acos({})", slot(0)),
        BlockKind::Arctan => format!("atan({})", slot(0)),
        BlockKind::Parenthesis => format!("({})", slot(0)),
    }
}
