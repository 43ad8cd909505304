//! Drag/drop session controller.
//!
//! # Responsibility
//! - Own the editor root and the drag session state.
//! - Decode drop payloads and decide which tree mutation to apply.
//! - Commit free-text input as literal leaves.
//!
//! # Invariants
//! - This is the only place that picks a mutation; the renderer only forwards
//!   raw drop events here.
//! - Drag end always returns the session to `Idle`, whether or not a drop
//!   happened.
//! - Rejected drops and commits leave the root untouched and never fail.

use crate::config::EditorConfig;
use crate::model::block::{validate_tree, BlockId, BlockKind, BlockNode, BlockValidationError};
use crate::plot::{trace_segments, ExpressionEngine, Point};
use crate::render::{drag_start, render_canvas, Canvas, DragStart, RenderContext};
use crate::serialize::{preview_markup, to_expression_with_variable};
use crate::session::payload::{decode, encode_palette, DataTransfer, DropPayload};
use crate::tree::{self, NoOpReason};
use log::{debug, warn};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// Palette entry carrying a kind.
    Palette(BlockKind),
    /// Existing tree node carrying its id.
    Tree(BlockId),
}

/// Drag session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSource),
}

impl DragState {
    /// Id of the tree node being dragged, if any.
    pub fn dragged_block(&self) -> Option<BlockId> {
        match self {
            Self::Dragging(DragSource::Tree(id)) => Some(*id),
            _ => None,
        }
    }
}

/// Where a drop or text commit landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// The root editing area.
    Root,
    /// Slot `slot_index` of operator node `parent_id`.
    Slot {
        parent_id: BlockId,
        slot_index: usize,
    },
    /// The delete zone (the palette area).
    Delete,
}

impl Display for DropTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Slot {
                parent_id,
                slot_index,
            } => write!(f, "slot:{parent_id}:{slot_index}"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Why a drop or commit changed nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Tree-level no-op (stale id, bad slot, cycle).
    Structural(NoOpReason),
    /// Transfer could not be decoded.
    UndecodablePayload(String),
    /// Committed text was blank after trim.
    EmptyText,
    /// Text commit targeted an occupied root.
    RootOccupied,
    /// Text commit targeted an occupied slot.
    SlotOccupied,
    /// Tree payloads cannot replace the root.
    TreePayloadOnRoot,
    /// Payload is not allowed on the delete zone.
    NotDeleteEligible,
    /// Text cannot be committed to the delete zone.
    TextOnDeleteTarget,
}

impl Display for IgnoreReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structural(reason) => write!(f, "{reason}"),
            Self::UndecodablePayload(message) => write!(f, "{message}"),
            Self::EmptyText => write!(f, "text is blank"),
            Self::RootOccupied => write!(f, "root already holds an expression"),
            Self::SlotOccupied => write!(f, "slot is already filled"),
            Self::TreePayloadOnRoot => write!(f, "existing blocks cannot replace the root"),
            Self::NotDeleteEligible => write!(f, "payload cannot be deleted"),
            Self::TextOnDeleteTarget => write!(f, "text cannot be dropped on the delete zone"),
        }
    }
}

impl From<NoOpReason> for IgnoreReason {
    fn from(value: NoOpReason) -> Self {
        Self::Structural(value)
    }
}

/// Result of one user edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The root was replaced.
    Applied,
    /// Nothing visibly changed.
    Unchanged(IgnoreReason),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Block editor: one root plus one drag session.
#[derive(Debug, Clone, Default)]
pub struct EditorController {
    root: Option<Arc<BlockNode>>,
    state: DragState,
    config: EditorConfig,
    revision: u64,
}

impl EditorController {
    /// Creates an empty editor.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            root: None,
            state: DragState::Idle,
            config,
            revision: 0,
        }
    }

    /// Creates an editor seeded with an existing tree.
    ///
    /// # Errors
    /// - Returns the first model violation found in `root`.
    pub fn with_root(config: EditorConfig, root: BlockNode) -> Result<Self, BlockValidationError> {
        validate_tree(&root)?;
        let mut editor = Self::new(config);
        editor.root = Some(Arc::new(root));
        Ok(editor)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn root(&self) -> Option<&Arc<BlockNode>> {
        self.root.as_ref()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Number of applied edits; hosts re-serialize when it changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Starts a palette drag and returns the transfer to attach.
    pub fn begin_palette_drag(&mut self, kind: BlockKind) -> DataTransfer {
        self.state = DragState::Dragging(DragSource::Palette(kind));
        debug!(
            "event=drag_start module=session status=ok source=palette kind={}",
            kind
        );
        encode_palette(kind)
    }

    /// Starts dragging an existing node.
    ///
    /// Returns `None` (and stays `Idle`) when `id` is no longer in the tree or
    /// its payload cannot be encoded.
    pub fn begin_block_drag(&mut self, id: BlockId) -> Option<DragStart> {
        let Some(node) = tree::find(self.root.as_ref(), id) else {
            debug!(
                "event=drag_start module=session status=noop source=tree block_id={}",
                id
            );
            return None;
        };
        let start = match drag_start(node) {
            Ok(start) => start,
            Err(err) => {
                warn!(
                    "event=drag_start module=session status=error source=tree block_id={} error={}",
                    id, err
                );
                return None;
            }
        };
        self.state = DragState::Dragging(DragSource::Tree(id));
        debug!(
            "event=drag_start module=session status=ok source=tree block_id={}",
            id
        );
        Some(start)
    }

    /// Ends the drag session, consummated or cancelled.
    pub fn end_drag(&mut self) {
        if self.state != DragState::Idle {
            debug!("event=drag_end module=session status=ok");
        }
        self.state = DragState::Idle;
    }

    /// Resolves a drop on `target` using the transfer attached at drag start.
    pub fn handle_drop(&mut self, target: DropTarget, transfer: &DataTransfer) -> EditOutcome {
        let decoded = match decode(transfer) {
            Ok(decoded) => decoded,
            Err(err) => {
                return self.ignore(
                    "block_drop",
                    target.into(),
                    IgnoreReason::UndecodablePayload(err.to_string()),
                )
            }
        };

        match (decoded.payload, target) {
            (DropPayload::FromPalette(kind), DropTarget::Root) => {
                let next = Some(Arc::new(BlockNode::new(kind)));
                self.commit("block_drop", target.into(), next)
            }
            (
                DropPayload::FromPalette(kind),
                DropTarget::Slot {
                    parent_id,
                    slot_index,
                },
            ) => {
                if let Err(reason) = tree::check_slot(self.root.as_ref(), parent_id, slot_index) {
                    return self.ignore("block_drop", target.into(), reason.into());
                }
                let next = tree::insert_at(
                    self.root.as_ref(),
                    parent_id,
                    slot_index,
                    Arc::new(BlockNode::new(kind)),
                );
                self.commit("block_drop", target.into(), next)
            }
            (DropPayload::FromPalette(_), DropTarget::Delete) => {
                self.ignore("block_drop", target.into(), IgnoreReason::NotDeleteEligible)
            }
            (DropPayload::FromTree(_), DropTarget::Root) => {
                self.ignore("block_drop", target.into(), IgnoreReason::TreePayloadOnRoot)
            }
            (
                DropPayload::FromTree(dragged_id),
                DropTarget::Slot {
                    parent_id,
                    slot_index,
                },
            ) => {
                if let Err(reason) =
                    tree::check_move(self.root.as_ref(), dragged_id, parent_id, slot_index)
                {
                    return self.ignore("block_drop", target.into(), reason.into());
                }
                let next =
                    tree::move_subtree(self.root.as_ref(), dragged_id, parent_id, slot_index);
                self.commit("block_drop", target.into(), next)
            }
            (DropPayload::FromTree(dragged_id), DropTarget::Delete) => {
                if !decoded.delete_eligible {
                    return self.ignore(
                        "block_delete",
                        target.into(),
                        IgnoreReason::NotDeleteEligible,
                    );
                }
                if tree::find(self.root.as_ref(), dragged_id).is_none() {
                    return self.ignore(
                        "block_delete",
                        target.into(),
                        NoOpReason::NodeNotFound(dragged_id).into(),
                    );
                }
                let next = tree::remove_by_id(self.root.as_ref(), dragged_id);
                self.commit("block_delete", target.into(), next)
            }
        }
    }

    /// Commits typed text into an empty slot or the empty root.
    ///
    /// The text is trimmed; blank text is ignored.
    pub fn commit_text(&mut self, target: DropTarget, text: &str) -> EditOutcome {
        let Some(leaf) = BlockNode::from_committed_text(text) else {
            return self.ignore("text_commit", target.into(), IgnoreReason::EmptyText);
        };

        match target {
            DropTarget::Root if self.root.is_some() => {
                self.ignore("text_commit", target.into(), IgnoreReason::RootOccupied)
            }
            DropTarget::Root => self.commit("text_commit", target.into(), Some(Arc::new(leaf))),
            DropTarget::Slot {
                parent_id,
                slot_index,
            } => {
                if let Err(reason) = tree::check_slot(self.root.as_ref(), parent_id, slot_index) {
                    return self.ignore("text_commit", target.into(), reason.into());
                }
                let occupied = tree::find(self.root.as_ref(), parent_id)
                    .and_then(|parent| parent.child(slot_index))
                    .is_some();
                if occupied {
                    return self.ignore("text_commit", target.into(), IgnoreReason::SlotOccupied);
                }
                let next =
                    tree::insert_at(self.root.as_ref(), parent_id, slot_index, Arc::new(leaf));
                self.commit("text_commit", target.into(), next)
            }
            DropTarget::Delete => {
                self.ignore("text_commit", target.into(), IgnoreReason::TextOnDeleteTarget)
            }
        }
    }

    /// Rebinds the value of a leaf field, keystroke by keystroke.
    pub fn set_value(&mut self, id: BlockId, text: &str) -> EditOutcome {
        let subject = EditSubject::Block(id);
        let is_leaf = tree::find(self.root.as_ref(), id).map(|node| node.kind().is_leaf());
        match is_leaf {
            None => self.ignore("value_change", subject, NoOpReason::NodeNotFound(id).into()),
            Some(false) => self.ignore("value_change", subject, NoOpReason::NotALeaf(id).into()),
            Some(true) => {
                let next = tree::set_value(self.root.as_ref(), id, text);
                self.commit("value_change", subject, next)
            }
        }
    }

    /// Discards the whole tree.
    pub fn clear(&mut self) -> EditOutcome {
        if self.root.is_none() {
            return self.ignore("clear", DropTarget::Root.into(), NoOpReason::EmptyTree.into());
        }
        self.commit("clear", DropTarget::Root.into(), None)
    }

    /// Tree as shown during the current session, with the dragged node hidden.
    pub fn visible_root(&self) -> Option<Arc<BlockNode>> {
        match self.state.dragged_block() {
            Some(id) => tree::remove_by_id(self.root.as_ref(), id),
            None => self.root.clone(),
        }
    }

    /// Renders the root area for the current session.
    pub fn render(&self) -> Canvas {
        render_canvas(
            self.root.as_deref(),
            &RenderContext::from_state(&self.state),
        )
    }

    /// Evaluator text for the full tree (the dragged node included).
    pub fn expression(&self) -> String {
        to_expression_with_variable(self.root.as_deref(), &self.config.default_variable)
    }

    /// Display-math preview for the typeset renderer.
    pub fn preview(&self) -> Option<String> {
        preview_markup(self.root.as_deref(), &self.config.default_variable)
    }

    /// Samples the current expression over the configured graph window.
    ///
    /// Empty when the engine rejects the expression.
    pub fn trace(&self, engine: &dyn ExpressionEngine) -> Vec<Vec<Point>> {
        trace_segments(
            engine,
            &self.expression(),
            &self.config.graph,
            self.config.sample_steps,
        )
    }

    fn commit(
        &mut self,
        event: &'static str,
        subject: EditSubject,
        next: Option<Arc<BlockNode>>,
    ) -> EditOutcome {
        self.root = next;
        self.revision += 1;
        debug!(
            "event={} module=session status=ok {} revision={} nodes={}",
            event,
            subject,
            self.revision,
            tree::node_count(self.root.as_ref())
        );
        EditOutcome::Applied
    }

    fn ignore(
        &self,
        event: &'static str,
        subject: EditSubject,
        reason: IgnoreReason,
    ) -> EditOutcome {
        debug!(
            "event={} module=session status=noop {} reason={}",
            event, subject, reason
        );
        EditOutcome::Unchanged(reason)
    }
}

/// What an edit acted on, as it appears in session log lines.
#[derive(Debug, Clone, Copy)]
enum EditSubject {
    Target(DropTarget),
    Block(BlockId),
}

impl From<DropTarget> for EditSubject {
    fn from(value: DropTarget) -> Self {
        Self::Target(value)
    }
}

impl Display for EditSubject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target(target) => write!(f, "target={target}"),
            Self::Block(id) => write!(f, "block_id={id}"),
        }
    }
}
