//! One-line plain-text printer for rendered notation.

use crate::render::{Canvas, VisualNode};

/// Placeholder glyph for empty slots and blank fields.
pub const EMPTY_SLOT_GLYPH: &str = "□";

/// Prints a visual node as one line of text.
///
/// Fractions print as `(a)/(b)`, superscripts as `^(…)`, subscripts as
/// `_(…)`.
pub fn notation(node: &VisualNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Prints the root area; empty and hidden canvases print as `""`.
pub fn canvas_notation(canvas: &Canvas) -> String {
    match canvas {
        Canvas::Empty | Canvas::Hidden => String::new(),
        Canvas::Tree(node) => notation(node),
    }
}

fn write_node(node: &VisualNode, out: &mut String) {
    match node {
        VisualNode::Block(frame) => frame
            .children
            .iter()
            .for_each(|child| write_node(child, out)),
        VisualNode::Field(field) if field.value.trim().is_empty() => out.push_str(EMPTY_SLOT_GLYPH),
        VisualNode::Field(field) => out.push_str(&field.value),
        VisualNode::Slot(slot) => match &slot.content {
            Some(content) => write_node(content, out),
            None => out.push_str(EMPTY_SLOT_GLYPH),
        },
        VisualNode::Text(text) => out.push_str(text),
        VisualNode::Operator(glyph) => {
            out.push(' ');
            out.push_str(glyph);
            out.push(' ');
        }
        VisualNode::Radical => out.push('√'),
        VisualNode::Superscript { content, .. } => write_wrapped("^(", content, out),
        VisualNode::Subscript(content) => write_wrapped("_(", content, out),
        VisualNode::Stack {
            numerator,
            denominator,
        } => {
            write_wrapped("(", numerator, out);
            out.push('/');
            write_wrapped("(", denominator, out);
        }
    }
}

fn write_wrapped(open: &str, content: &VisualNode, out: &mut String) {
    out.push_str(open);
    write_node(content, out);
    out.push(')');
}
