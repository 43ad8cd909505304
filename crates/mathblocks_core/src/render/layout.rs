//! Per-kind layout rules.

use crate::model::block::{BlockKind, BlockNode};
use crate::render::{render_slot, RenderContext, VisualNode};

/// Lays out the children of an operator node.
pub(super) fn layout(node: &BlockNode, ctx: &RenderContext) -> Vec<VisualNode> {
    let slot = |index: usize| render_slot(node, index, ctx);
    match node.kind() {
        BlockKind::Add => infix(slot(0), "+", slot(1)),
        BlockKind::Subtract => infix(slot(0), "−", slot(1)),
        BlockKind::Multiply => infix(slot(0), "×", slot(1)),
        BlockKind::Divide => infix(slot(0), "÷", slot(1)),
        BlockKind::Fraction => vec![VisualNode::Stack {
            numerator: Box::new(slot(0)),
            denominator: Box::new(slot(1)),
        }],
        BlockKind::Power => vec![
            slot(0),
            VisualNode::Superscript {
                content: Box::new(slot(1)),
                small: false,
            },
        ],
        // Degree first, then the radical, then the radicand.
        BlockKind::Root => vec![
            VisualNode::Superscript {
                content: Box::new(slot(1)),
                small: true,
            },
            VisualNode::Radical,
            slot(0),
        ],
        BlockKind::LogBase => vec![
            VisualNode::Text("log"),
            VisualNode::Subscript(Box::new(slot(0))),
            VisualNode::Text("("),
            slot(1),
            VisualNode::Text(")"),
        ],
        BlockKind::Log => function("log", false, slot(0)),
        BlockKind::Ln => function("ln", false, slot(0)),
        BlockKind::Sin => function("sin", false, slot(0)),
        BlockKind::Cos => function("cos", false, slot(0)),
        BlockKind::Tan => function("tan", false, slot(0)),
        BlockKind::Csc => function("csc", false, slot(0)),
        BlockKind::Sec => function("sec", false, slot(0)),
        BlockKind::Cot => function("cot", false, slot(0)),
        BlockKind::Arcsin => function("sin", true, slot(0)),
        BlockKind::Arccos => function("cos", true, slot(0)),
        BlockKind::Arctan => function("tan", true, slot(0)),
        BlockKind::Parenthesis => delimited(slot(0)),
        // Leaves render as fields and never reach layout.
        BlockKind::Variable | BlockKind::LiteralExpression => Vec::new(),
    }
}

fn infix(left: VisualNode, glyph: &'static str, right: VisualNode) -> Vec<VisualNode> {
    vec![left, VisualNode::Operator(glyph), right]
}

fn function(label: &'static str, inverse: bool, argument: VisualNode) -> Vec<VisualNode> {
    let mut children = vec![VisualNode::Text(label)];
    if inverse {
        children.push(VisualNode::Superscript {
            content: Box::new(VisualNode::Text("-1")),
            small: false,
        });
    }
    children.extend(delimited(argument));
    children
}

fn delimited(argument: VisualNode) -> Vec<VisualNode> {
    vec![VisualNode::Text("("), argument, VisualNode::Text(")")]
}
