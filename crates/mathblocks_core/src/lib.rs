//! Core domain logic for the MathBlocks expression editor.
//! This crate is the single source of truth for block-tree invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod plot;
pub mod render;
pub mod serialize;
pub mod session;
pub mod tree;

pub use config::{ConfigError, EditorConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::block::{validate_tree, BlockId, BlockKind, BlockNode, BlockValidationError, Slot};
pub use model::palette::{palette_groups, PaletteGroup};
pub use plot::{
    generate_points, is_valid_function, trace_segments, CompiledExpression, EngineError,
    ExpressionEngine, GraphSettings, Point,
};
pub use render::{canvas_notation, notation, Canvas, DragStart, RenderContext, VisualNode};
pub use serialize::{preview_markup, to_expression, to_expression_with_variable};
pub use session::{
    DataTransfer, DragSource, DragState, DropTarget, EditOutcome, EditorController, IgnoreReason,
};
pub use tree::NoOpReason;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
