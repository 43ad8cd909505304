//! Structural renderer: block tree to nested visual notation.
//!
//! # Responsibility
//! - Lay out each node kind as fractions, radicals, scripts and infix rows.
//! - Wire every rendered slot to a drop target for the session controller.
//! - Build the drag ghost shown while a tree node is being dragged.
//!
//! # Invariants
//! - Rendering is pure: the dragged id arrives through `RenderContext`.
//! - The dragged node renders as an empty slot that still accepts drops.
//! - Empty slots render as placeholders, never as errors.

mod layout;
pub mod notation;

use crate::model::block::{BlockId, BlockKind, BlockNode};
use crate::model::palette::{border_color, group_color};
use crate::session::payload::{encode_tree, DataTransfer, PayloadError};
use crate::session::DragState;
use crate::session::DropTarget;

pub use notation::{canvas_notation, notation};

/// Off-screen position where the drag ghost is mounted before use.
pub const GHOST_OFFSCREEN_ORIGIN: (i32, i32) = (-9999, -9999);

/// Render-time view of the drag session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Tree node hidden from its current position.
    pub dragged: Option<BlockId>,
}

impl RenderContext {
    pub fn from_state(state: &DragState) -> Self {
        Self {
            dragged: state.dragged_block(),
        }
    }

    fn hides(&self, id: BlockId) -> bool {
        self.dragged == Some(id)
    }
}

/// Styled, draggable container wrapping an operator node.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockFrame {
    pub block_id: BlockId,
    pub kind: BlockKind,
    pub fill: &'static str,
    pub border: String,
    pub draggable: bool,
    pub children: Vec<VisualNode>,
}

/// Editable text field bound to a leaf value.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafField {
    pub block_id: BlockId,
    pub kind: BlockKind,
    pub value: String,
    pub placeholder: &'static str,
    pub fill: &'static str,
    pub border: String,
    pub draggable: bool,
}

/// One slot of an operator node.
///
/// Both filled and empty slots accept drops; only empty slots (`content ==
/// None`) also accept a free-text commit.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    pub target: DropTarget,
    pub content: Option<Box<VisualNode>>,
}

impl SlotView {
    pub fn is_placeholder(&self) -> bool {
        self.content.is_none()
    }
}

/// Nested visual notation.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualNode {
    Block(BlockFrame),
    Field(LeafField),
    Slot(SlotView),
    /// Function label or delimiter.
    Text(&'static str),
    /// Infix operator glyph.
    Operator(&'static str),
    /// Enlarged radical sign.
    Radical,
    Superscript {
        content: Box<VisualNode>,
        /// Reduced size, used for root degrees.
        small: bool,
    },
    Subscript(Box<VisualNode>),
    /// Vertical fraction: numerator over a divider over denominator.
    Stack {
        numerator: Box<VisualNode>,
        denominator: Box<VisualNode>,
    },
}

/// Root editing area.
#[derive(Debug, Clone, PartialEq)]
pub enum Canvas {
    /// No expression yet; shows a text entry and accepts palette drops.
    Empty,
    /// The root itself is being dragged.
    Hidden,
    Tree(VisualNode),
}

/// Drag ghost cloned from a rendered block.
///
/// Mounted off-screen, used as the native drag image, and discarded by the
/// host after the drag-start tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGhost {
    pub block_id: BlockId,
    pub content: VisualNode,
    pub origin: (i32, i32),
    /// Ghost never intercepts pointer events.
    pub pointer_events: bool,
    /// Hotspot sits at the ghost's center.
    pub centered_hotspot: bool,
}

/// Everything a host needs when a tree node starts dragging.
#[derive(Debug, Clone, PartialEq)]
pub struct DragStart {
    pub transfer: DataTransfer,
    pub ghost: DragGhost,
}

/// Renders one node and its subtree.
pub fn render(node: &BlockNode, ctx: &RenderContext) -> VisualNode {
    let kind = node.kind();
    if kind.is_leaf() {
        return VisualNode::Field(LeafField {
            block_id: node.id(),
            kind,
            value: node.value().unwrap_or_default().to_string(),
            placeholder: leaf_placeholder(kind),
            fill: group_color(kind),
            border: border_color(kind),
            draggable: true,
        });
    }
    VisualNode::Block(BlockFrame {
        block_id: node.id(),
        kind,
        fill: group_color(kind),
        border: border_color(kind),
        draggable: true,
        children: layout::layout(node, ctx),
    })
}

/// Renders the root area.
pub fn render_canvas(root: Option<&BlockNode>, ctx: &RenderContext) -> Canvas {
    match root {
        None => Canvas::Empty,
        Some(node) if ctx.hides(node.id()) => Canvas::Hidden,
        Some(node) => Canvas::Tree(render(node, ctx)),
    }
}

/// Builds the drag-start transfer and ghost for a tree node.
pub fn drag_start(node: &BlockNode) -> Result<DragStart, PayloadError> {
    Ok(DragStart {
        transfer: encode_tree(node.id())?,
        ghost: DragGhost {
            block_id: node.id(),
            content: render(node, &RenderContext::default()),
            origin: GHOST_OFFSCREEN_ORIGIN,
            pointer_events: false,
            centered_hotspot: true,
        },
    })
}

fn leaf_placeholder(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Variable => "x",
        _ => "expr",
    }
}

fn render_slot(parent: &BlockNode, slot_index: usize, ctx: &RenderContext) -> VisualNode {
    let content = parent
        .child(slot_index)
        .filter(|child| !ctx.hides(child.id()))
        .map(|child| Box::new(render(child, ctx)));
    VisualNode::Slot(SlotView {
        target: DropTarget::Slot {
            parent_id: parent.id(),
            slot_index,
        },
        content,
    })
}
