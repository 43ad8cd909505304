//! Block node domain model.
//!
//! # Responsibility
//! - Define the closed set of block kinds and their fixed slot arity.
//! - Define the canonical node shape shared by mutation, rendering and
//!   serialization.
//!
//! # Invariants
//! - `id` is stable for the node lifetime and never reused for another node.
//! - Operator kinds always carry exactly `arity(kind)` slots.
//! - Leaf kinds never carry slots; operator kinds never carry a value.
//! - Children are shared behind `Arc` and never mutated in place.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Stable identifier for every block node.
pub type BlockId = Uuid;

/// One child position of an operator node. `None` is an empty slot.
pub type Slot = Option<Arc<BlockNode>>;

/// Closed set of block kinds.
///
/// Serialized in kebab-case (`log-base`, `literal-expression`) to match the
/// drag payload and snapshot wire naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    /// Free variable leaf, defaults to `x` when unset.
    Variable,
    /// Raw sub-expression typed by the user.
    LiteralExpression,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    /// Slot 0 is the radicand, slot 1 the degree.
    Root,
    Log,
    Ln,
    /// Slot 0 is the base, slot 1 the value.
    LogBase,
    Sin,
    Cos,
    Tan,
    Csc,
    Sec,
    Cot,
    Arcsin,
    Arccos,
    Arctan,
    Fraction,
    Parenthesis,
}

impl BlockKind {
    /// Every kind, leaf kinds first.
    pub const ALL: [BlockKind; 22] = [
        Self::Variable,
        Self::LiteralExpression,
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Power,
        Self::Root,
        Self::Log,
        Self::Ln,
        Self::LogBase,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Csc,
        Self::Sec,
        Self::Cot,
        Self::Arcsin,
        Self::Arccos,
        Self::Arctan,
        Self::Fraction,
        Self::Parenthesis,
    ];

    /// Stable wire tag used in drag payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::LiteralExpression => "literal-expression",
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Power => "power",
            Self::Root => "root",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::LogBase => "log-base",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Csc => "csc",
            Self::Sec => "sec",
            Self::Cot => "cot",
            Self::Arcsin => "arcsin",
            Self::Arccos => "arccos",
            Self::Arctan => "arctan",
            Self::Fraction => "fraction",
            Self::Parenthesis => "parenthesis",
        }
    }

    /// Number of slots a node of this kind always carries.
    pub fn arity(self) -> usize {
        match self {
            Self::Variable | Self::LiteralExpression => 0,
            Self::Add
            | Self::Subtract
            | Self::Multiply
            | Self::Divide
            | Self::Power
            | Self::Root
            | Self::LogBase
            | Self::Fraction => 2,
            Self::Log
            | Self::Ln
            | Self::Sin
            | Self::Cos
            | Self::Tan
            | Self::Csc
            | Self::Sec
            | Self::Cot
            | Self::Arcsin
            | Self::Arccos
            | Self::Arctan
            | Self::Parenthesis => 1,
        }
    }

    /// Leaf kinds hold a text value and no slots.
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Variable | Self::LiteralExpression)
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = BlockValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| BlockValidationError::UnknownKind(normalized.to_string()))
    }
}

/// Model-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockValidationError {
    /// Node id is the nil UUID.
    NilId,
    /// Kind tag is not part of the closed kind set.
    UnknownKind(String),
    /// Operator node slot count disagrees with its kind.
    ArityMismatch {
        kind: BlockKind,
        expected: usize,
        actual: usize,
    },
    /// Leaf node carries slots.
    LeafWithSlots(BlockKind),
    /// Operator node carries a text value.
    ValueOnOperator(BlockKind),
    /// The same id appears twice in one tree.
    DuplicateId(BlockId),
}

impl Display for BlockValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "block id must not be nil"),
            Self::UnknownKind(value) => write!(f, "unknown block kind: `{value}`"),
            Self::ArityMismatch {
                kind,
                expected,
                actual,
            } => write!(f, "{kind} block expects {expected} slot(s), got {actual}"),
            Self::LeafWithSlots(kind) => write!(f, "{kind} block is a leaf and cannot own slots"),
            Self::ValueOnOperator(kind) => {
                write!(f, "{kind} block is an operator and cannot hold a value")
            }
            Self::DuplicateId(id) => write!(f, "block id appears more than once: {id}"),
        }
    }
}

impl Error for BlockValidationError {}

/// One node of the expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BlockNodeRecord")]
pub struct BlockNode {
    pub(crate) id: BlockId,
    pub(crate) kind: BlockKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) slots: Vec<Slot>,
}

/// Unvalidated wire shape; converted through `BlockNode::validate`.
#[derive(Deserialize)]
struct BlockNodeRecord {
    id: BlockId,
    kind: BlockKind,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    slots: Vec<Slot>,
}

impl TryFrom<BlockNodeRecord> for BlockNode {
    type Error = BlockValidationError;

    fn try_from(record: BlockNodeRecord) -> Result<Self, Self::Error> {
        let node = Self {
            id: record.id,
            kind: record.kind,
            value: record.value,
            slots: record.slots,
        };
        node.validate()?;
        Ok(node)
    }
}

impl BlockNode {
    /// Creates a node with a fresh id and all slots empty.
    ///
    /// This is the palette template constructor. Leaf kinds start without a
    /// value.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            value: None,
            slots: vec![None; kind.arity()],
        }
    }

    /// Creates a node with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: BlockId, kind: BlockKind) -> Result<Self, BlockValidationError> {
        if id.is_nil() {
            return Err(BlockValidationError::NilId);
        }
        Ok(Self {
            id,
            kind,
            value: None,
            slots: vec![None; kind.arity()],
        })
    }

    /// Creates a leaf of `kind` holding `value`.
    ///
    /// Returns `None` when `kind` is not a leaf kind.
    pub fn leaf(kind: BlockKind, value: impl Into<String>) -> Option<Self> {
        if !kind.is_leaf() {
            return None;
        }
        let mut node = Self::new(kind);
        node.value = Some(value.into());
        Some(node)
    }

    /// Creates a `variable` leaf.
    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: BlockKind::Variable,
            value: Some(name.into()),
            slots: Vec::new(),
        }
    }

    /// Creates a `literal-expression` leaf.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: BlockKind::LiteralExpression,
            value: Some(text.into()),
            slots: Vec::new(),
        }
    }

    /// Creates a literal leaf from committed free text.
    ///
    /// Returns `None` when the trimmed text is empty.
    pub fn from_committed_text(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self::literal(trimmed))
    }

    /// Fills slot `index` of a freshly built node.
    ///
    /// Out-of-range indexes and leaf nodes are left untouched.
    pub fn with_child(mut self, index: usize, child: BlockNode) -> Self {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(Arc::new(child));
        }
        self
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Returns the occupant of slot `index`, if any.
    pub fn child(&self, index: usize) -> Option<&Arc<BlockNode>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Validates node-local invariants for this node and its subtree.
    pub fn validate(&self) -> Result<(), BlockValidationError> {
        if self.id.is_nil() {
            return Err(BlockValidationError::NilId);
        }
        if self.kind.is_leaf() {
            if !self.slots.is_empty() {
                return Err(BlockValidationError::LeafWithSlots(self.kind));
            }
        } else {
            if self.value.is_some() {
                return Err(BlockValidationError::ValueOnOperator(self.kind));
            }
            if self.slots.len() != self.kind.arity() {
                return Err(BlockValidationError::ArityMismatch {
                    kind: self.kind,
                    expected: self.kind.arity(),
                    actual: self.slots.len(),
                });
            }
        }
        self.slots
            .iter()
            .flatten()
            .try_for_each(|child| child.validate())
    }
}

/// Validates a whole tree, including id uniqueness across nodes.
pub fn validate_tree(root: &BlockNode) -> Result<(), BlockValidationError> {
    root.validate()?;
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !seen.insert(node.id) {
            return Err(BlockValidationError::DuplicateId(node.id));
        }
        stack.extend(node.slots.iter().flatten().map(Arc::as_ref));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BlockKind, BlockNode};

    #[test]
    fn kind_tags_round_trip_through_from_str() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.as_str().parse::<BlockKind>().unwrap(), kind);
        }
    }

    #[test]
    fn from_committed_text_trims_and_rejects_blank() {
        let node = BlockNode::from_committed_text("  2*x ").unwrap();
        assert_eq!(node.kind(), BlockKind::LiteralExpression);
        assert_eq!(node.value(), Some("2*x"));
        assert!(BlockNode::from_committed_text("   ").is_none());
    }

    #[test]
    fn with_child_ignores_out_of_range_slot() {
        let node = BlockNode::new(BlockKind::Sin).with_child(3, BlockNode::variable("x"));
        assert_eq!(node.slots().len(), 1);
        assert!(node.child(0).is_none());
    }
}
