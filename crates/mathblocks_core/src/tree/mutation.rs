//! Copy-on-write tree mutation engine.
//!
//! # Responsibility
//! - Produce new roots from old ones for insert, remove, set-value and move.
//! - Share every untouched branch with the input tree.
//!
//! # Invariants
//! - Inputs are never mutated; only the root-to-target path is copied.
//! - Structural no-ops (unknown id, bad slot, cycle) return the input root.
//! - No operation can produce a cycle or a slot count that disagrees with the
//!   node kind.

use crate::model::block::{BlockId, BlockNode, Slot};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Why a structural operation left the tree unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// The tree has no root yet.
    EmptyTree,
    /// Target node does not exist.
    NodeNotFound(BlockId),
    /// Destination parent does not exist.
    ParentNotFound(BlockId),
    /// Destination parent is a leaf and has no slots.
    ParentIsLeaf(BlockId),
    /// Destination slot index is outside the parent's arity.
    SlotOutOfRange {
        parent_id: BlockId,
        slot_index: usize,
        arity: usize,
    },
    /// Target exists but is not a leaf kind.
    NotALeaf(BlockId),
    /// Destination parent lies inside the dragged subtree.
    CycleRejected {
        dragged_id: BlockId,
        parent_id: BlockId,
    },
}

impl Display for NoOpReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTree => write!(f, "tree is empty"),
            Self::NodeNotFound(id) => write!(f, "block not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent block not found: {id}"),
            Self::ParentIsLeaf(id) => write!(f, "parent block has no slots: {id}"),
            Self::SlotOutOfRange {
                parent_id,
                slot_index,
                arity,
            } => write!(
                f,
                "slot {slot_index} is out of range for block {parent_id} with {arity} slot(s)"
            ),
            Self::NotALeaf(id) => write!(f, "block does not hold a value: {id}"),
            Self::CycleRejected {
                dragged_id,
                parent_id,
            } => write!(
                f,
                "move would create cycle: block {dragged_id} into its own descendant {parent_id}"
            ),
        }
    }
}

impl Error for NoOpReason {}

/// Finds the node with `id` anywhere under `root`.
pub fn find(root: Option<&Arc<BlockNode>>, id: BlockId) -> Option<&Arc<BlockNode>> {
    let node = root?;
    if node.id == id {
        return Some(node);
    }
    node.slots
        .iter()
        .find_map(|child| find(child.as_ref(), id))
}

/// Returns whether `id` is `node` itself or any of its descendants.
pub fn contains(node: &BlockNode, id: BlockId) -> bool {
    node.id == id
        || node
            .slots
            .iter()
            .flatten()
            .any(|child| contains(child, id))
}

/// Counts nodes in the tree.
pub fn node_count(root: Option<&Arc<BlockNode>>) -> usize {
    root.map_or(0, |node| {
        1 + node
            .slots
            .iter()
            .map(|child| node_count(child.as_ref()))
            .sum::<usize>()
    })
}

/// Collects node ids in depth-first, slot order.
pub fn collect_ids(root: Option<&Arc<BlockNode>>) -> Vec<BlockId> {
    let mut ids = Vec::new();
    let mut stack: Vec<&Arc<BlockNode>> = root.into_iter().collect();
    while let Some(node) = stack.pop() {
        ids.push(node.id);
        stack.extend(node.slots.iter().rev().flatten());
    }
    ids
}

/// Checks that `slot_index` of `parent_id` can receive a node.
pub fn check_slot(
    root: Option<&Arc<BlockNode>>,
    parent_id: BlockId,
    slot_index: usize,
) -> Result<(), NoOpReason> {
    let root = root.ok_or(NoOpReason::EmptyTree)?;
    let parent = find(Some(root), parent_id).ok_or(NoOpReason::ParentNotFound(parent_id))?;
    if parent.kind.is_leaf() {
        return Err(NoOpReason::ParentIsLeaf(parent_id));
    }
    if slot_index >= parent.slots.len() {
        return Err(NoOpReason::SlotOutOfRange {
            parent_id,
            slot_index,
            arity: parent.slots.len(),
        });
    }
    Ok(())
}

/// Checks that `dragged_id` can move into `(dest_parent_id, dest_slot_index)`.
pub fn check_move(
    root: Option<&Arc<BlockNode>>,
    dragged_id: BlockId,
    dest_parent_id: BlockId,
    dest_slot_index: usize,
) -> Result<(), NoOpReason> {
    let tree = root.ok_or(NoOpReason::EmptyTree)?;
    let dragged = find(Some(tree), dragged_id).ok_or(NoOpReason::NodeNotFound(dragged_id))?;
    if contains(dragged, dest_parent_id) {
        return Err(NoOpReason::CycleRejected {
            dragged_id,
            parent_id: dest_parent_id,
        });
    }
    check_slot(root, dest_parent_id, dest_slot_index)
}

/// Places `new_node` into slot `slot_index` of `parent_id`.
///
/// Any current occupant of the slot is discarded with its subtree.
pub fn insert_at(
    root: Option<&Arc<BlockNode>>,
    parent_id: BlockId,
    slot_index: usize,
    new_node: Arc<BlockNode>,
) -> Option<Arc<BlockNode>> {
    let tree = root?;
    if check_slot(root, parent_id, slot_index).is_err() {
        return Some(Arc::clone(tree));
    }
    let mut place = |parent: &Arc<BlockNode>| -> Option<Slot> {
        let mut copy = BlockNode::clone(parent);
        copy.slots[slot_index] = Some(Arc::clone(&new_node));
        Some(Some(Arc::new(copy)))
    };
    apply(tree, parent_id, &mut place)
}

/// Removes the node with `target_id` and its whole subtree.
///
/// Removing the root yields the empty tree. Absent ids are a no-op.
pub fn remove_by_id(root: Option<&Arc<BlockNode>>, target_id: BlockId) -> Option<Arc<BlockNode>> {
    let tree = root?;
    let mut detach = |_: &Arc<BlockNode>| -> Option<Slot> { Some(None) };
    apply(tree, target_id, &mut detach)
}

/// Replaces the value of the leaf `target_id`.
///
/// Operator nodes and absent ids are a no-op.
pub fn set_value(
    root: Option<&Arc<BlockNode>>,
    target_id: BlockId,
    text: &str,
) -> Option<Arc<BlockNode>> {
    let tree = root?;
    let mut assign = |target: &Arc<BlockNode>| -> Option<Slot> {
        if !target.kind.is_leaf() {
            return None;
        }
        let mut copy = BlockNode::clone(target);
        copy.value = Some(text.to_string());
        Some(Some(Arc::new(copy)))
    };
    apply(tree, target_id, &mut assign)
}

/// Moves the subtree rooted at `dragged_id` into a destination slot.
///
/// Detach and insert happen on a private intermediate tree; callers only ever
/// observe the final root. The destination occupant, if any, is discarded.
pub fn move_subtree(
    root: Option<&Arc<BlockNode>>,
    dragged_id: BlockId,
    dest_parent_id: BlockId,
    dest_slot_index: usize,
) -> Option<Arc<BlockNode>> {
    let tree = root?;
    if check_move(root, dragged_id, dest_parent_id, dest_slot_index).is_err() {
        return Some(Arc::clone(tree));
    }
    let Some(dragged) = find(root, dragged_id).map(Arc::clone) else {
        return Some(Arc::clone(tree));
    };
    // The dragged node cannot be the root here: the destination would lie
    // inside its subtree and `check_move` rejects that.
    let detached = remove_by_id(root, dragged_id);
    insert_at(detached.as_ref(), dest_parent_id, dest_slot_index, dragged)
}

/// Rebuilds the path from `node` to `target`, replacing the target slot with
/// whatever `edit` returns.
///
/// `edit` returns `None` to decline; the input root is then kept.
fn apply(
    node: &Arc<BlockNode>,
    target: BlockId,
    edit: &mut dyn FnMut(&Arc<BlockNode>) -> Option<Slot>,
) -> Option<Arc<BlockNode>> {
    match rebuild(node, target, edit) {
        Some(replacement) => replacement,
        None => Some(Arc::clone(node)),
    }
}

fn rebuild(
    node: &Arc<BlockNode>,
    target: BlockId,
    edit: &mut dyn FnMut(&Arc<BlockNode>) -> Option<Slot>,
) -> Option<Slot> {
    if node.id == target {
        return edit(node);
    }
    for (index, child) in node.slots.iter().enumerate() {
        let Some(child) = child else {
            continue;
        };
        if let Some(replacement) = rebuild(child, target, edit) {
            let mut copy = BlockNode::clone(node);
            copy.slots[index] = replacement;
            return Some(Some(Arc::new(copy)));
        }
    }
    None
}
