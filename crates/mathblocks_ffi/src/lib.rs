//! Flutter-facing bindings for the MathBlocks editor core.

pub mod api;
