//! Display-math markup handed to the external typeset renderer.

use crate::model::block::BlockNode;
use crate::serialize::to_expression_with_variable;

const DISPLAY_MATH_DELIMITER: &str = "$$";

/// Wraps raw markup in display-math delimiters.
pub fn display_math(markup: &str) -> String {
    format!("{DISPLAY_MATH_DELIMITER}{markup}{DISPLAY_MATH_DELIMITER}")
}

/// Builds the `y=<expr>` preview for a tree, or `None` for the empty tree.
pub fn preview_markup(root: Option<&BlockNode>, variable: &str) -> Option<String> {
    let node = root?;
    let expression = to_expression_with_variable(Some(node), variable);
    Some(display_math(&format!("y={expression}")))
}

#[cfg(test)]
mod tests {
    use super::{display_math, preview_markup};
    use crate::model::block::{BlockKind, BlockNode};

    #[test]
    fn display_math_wraps_text() {
        assert_eq!(display_math("x^2 + 1"), "$$x^2 + 1$$");
    }

    #[test]
    fn preview_is_absent_for_empty_tree() {
        assert_eq!(preview_markup(None, "x"), None);
    }

    #[test]
    fn preview_prefixes_assignment() {
        let node = BlockNode::new(BlockKind::Sin).with_child(0, BlockNode::variable("x"));
        assert_eq!(
            preview_markup(Some(&node), "x").as_deref(),
            Some("$$y=sin(x)$$")
        );
    }
}
