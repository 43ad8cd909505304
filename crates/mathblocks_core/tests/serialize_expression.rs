use mathblocks_core::serialize::display_math;
use mathblocks_core::{preview_markup, to_expression, BlockKind, BlockNode};

fn lit(text: &str) -> BlockNode {
    BlockNode::literal(text)
}

fn unary(kind: BlockKind, argument: BlockNode) -> BlockNode {
    BlockNode::new(kind).with_child(0, argument)
}

fn binary(kind: BlockKind, left: BlockNode, right: BlockNode) -> BlockNode {
    BlockNode::new(kind)
        .with_child(0, left)
        .with_child(1, right)
}

#[test]
fn empty_tree_serializes_to_empty_string() {
    assert_eq!(to_expression(None), "");
    assert_eq!(preview_markup(None, "x"), None);
}

#[test]
fn divide_wraps_both_operands() {
    let tree = binary(BlockKind::Divide, BlockNode::variable("x"), lit("2"));
    assert_eq!(to_expression(Some(&tree)), "((x) / (2))");
}

#[test]
fn root_serializes_radicand_then_degree() {
    let tree = binary(BlockKind::Root, lit("8"), lit("3"));
    assert_eq!(to_expression(Some(&tree)), "nthRoot(8, 3)");
}

#[test]
fn log_base_serializes_value_then_base() {
    // slot 0 is the base, slot 1 the value
    let tree = binary(BlockKind::LogBase, lit("2"), lit("8"));
    assert_eq!(to_expression(Some(&tree)), "log(8, 2)");
}

#[test]
fn binary_operators_are_fully_parenthesized() {
    let cases = [
        (BlockKind::Add, "(a + b)"),
        (BlockKind::Subtract, "(a - b)"),
        (BlockKind::Multiply, "(a * b)"),
        (BlockKind::Divide, "((a) / (b))"),
        (BlockKind::Fraction, "((a) / (b))"),
        (BlockKind::Power, "(a)^(b)"),
    ];
    for (kind, expected) in cases {
        let tree = binary(kind, lit("a"), lit("b"));
        assert_eq!(to_expression(Some(&tree)), expected, "{kind}");
    }
}

#[test]
fn unary_functions_use_evaluator_names() {
    let cases = [
        (BlockKind::Log, "log(a)"),
        (BlockKind::Ln, "log(a)"),
        (BlockKind::Sin, "sin(a)"),
        (BlockKind::Cos, "cos(a)"),
        (BlockKind::Tan, "tan(a)"),
        (BlockKind::Csc, "csc(a)"),
        (BlockKind::Sec, "sec(a)"),
        (BlockKind::Cot, "cot(a)"),
        (BlockKind::Arcsin, "asin(a)"),
        (BlockKind::Arccos, "acos(a)"),
        (BlockKind::Arctan, "atan(a)"),
        (BlockKind::Parenthesis, "(a)"),
    ];
    for (kind, expected) in cases {
        let tree = unary(kind, lit("a"));
        assert_eq!(to_expression(Some(&tree)), expected, "{kind}");
    }
}

#[test]
fn empty_slots_embed_empty_strings() {
    assert_eq!(
        to_expression(Some(&BlockNode::new(BlockKind::Power))),
        "()^()"
    );
    assert_eq!(
        to_expression(Some(&BlockNode::new(BlockKind::LogBase))),
        "log(, )"
    );
    let half = binary(BlockKind::Add, lit("1"), BlockNode::new(BlockKind::Add));
    assert_eq!(to_expression(Some(&half)), "(1 + ( + ))");
}

#[test]
fn nested_tree_serializes_recursively() {
    // sin(x)^2 + sqrt[3](x - 1)
    let tree = binary(
        BlockKind::Add,
        binary(
            BlockKind::Power,
            unary(BlockKind::Sin, BlockNode::variable("x")),
            lit("2"),
        ),
        binary(
            BlockKind::Root,
            binary(BlockKind::Subtract, BlockNode::variable("x"), lit("1")),
            lit("3"),
        ),
    );
    assert_eq!(
        to_expression(Some(&tree)),
        "((sin(x))^(2) + nthRoot((x - 1), 3))"
    );
    assert_eq!(
        preview_markup(Some(&tree), "x").as_deref(),
        Some("$$y=((sin(x))^(2) + nthRoot((x - 1), 3))$$")
    );
}

#[test]
fn leaf_values_are_emitted_verbatim() {
    assert_eq!(to_expression(Some(&lit("2*pi"))), "2*pi");
    assert_eq!(to_expression(Some(&BlockNode::variable("theta"))), "theta");
    assert_eq!(
        to_expression(Some(&BlockNode::new(BlockKind::LiteralExpression))),
        ""
    );
    assert_eq!(display_math(""), "$$$$");
}
