//! Pure operations over immutable block trees.
//!
//! # Responsibility
//! - Provide the only code paths that build a new tree from an old one.
//! - Provide lookup helpers used by the session controller and renderer.
//!
//! # Invariants
//! - The empty tree is represented as `None`.
//! - Every operation is total over well-formed trees and never panics.

pub mod mutation;

pub use mutation::{
    check_move, check_slot, collect_ids, contains, find, insert_at, move_subtree, node_count,
    remove_by_id, set_value, NoOpReason,
};
