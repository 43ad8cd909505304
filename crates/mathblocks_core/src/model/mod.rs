//! Block tree domain model.
//!
//! # Responsibility
//! - Define the canonical node shape used by every editor component.
//! - Define the palette catalog of insertable kinds.
//!
//! # Invariants
//! - Every node is identified by a stable `BlockId` that is never reused.
//! - Slot count is fixed by kind at creation and never changes.

pub mod block;
pub mod palette;
