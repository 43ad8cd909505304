//! Drag/drop editing session.
//!
//! # Responsibility
//! - Track the drag session and translate host drag events into tree edits.
//! - Encode and decode the string-keyed drag payload channel.
//!
//! # Invariants
//! - Raw payload strings are decoded once, at the drop boundary.
//! - Session state is owned by one controller, never by global state.

pub mod controller;
pub mod payload;

pub use controller::{
    DragSource, DragState, DropTarget, EditOutcome, EditorController, IgnoreReason,
};
pub use payload::{DataTransfer, DecodedDrop, DropPayload, PayloadError};
