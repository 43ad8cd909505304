//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the block editor to Dart via FRB as sync, use-case-level calls.
//! - Translate host strings (ids, kind tags, transfer entries) into typed core
//!   values at this boundary.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One process-wide editor; calls serialize through its lock and a poisoned
//!   lock is recovered.
//! - Rejected edits are reported in envelopes, never as errors.

use log::warn;
use mathblocks_core::model::palette::border_color;
use mathblocks_core::{
    canvas_notation, core_version as core_version_inner, init_logging as init_logging_inner,
    palette_groups, ping as ping_inner, BlockId, BlockKind, DataTransfer, DropTarget,
    EditOutcome, EditorConfig, EditorController,
};
use once_cell::sync::Lazy;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

static EDITOR: Lazy<Mutex<EditorController>> = Lazy::new(|| Mutex::new(new_editor()));

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One draggable palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Group heading shown above the entry.
    pub group: String,
    /// Kind tag to pass back on drag start.
    pub kind: String,
    /// `#rrggbb` fill.
    pub color: String,
    /// `#rrggbb` darkened border.
    pub border: String,
}

/// One key/value pair of the drag transfer channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEntry {
    pub key: String,
    pub value: String,
}

/// Drop or commit destination as sent by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDropTarget {
    /// One of `root|slot|delete`.
    pub kind: String,
    /// Parent block ID for `slot` targets.
    pub parent_id: Option<String>,
    /// Slot index for `slot` targets.
    pub slot_index: Option<u32>,
}

/// Drag-start response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragStartResponse {
    /// Whether a drag session started.
    pub ok: bool,
    /// Entries to attach to the native drag transfer.
    pub entries: Vec<TransferEntry>,
    /// Plain-text notation for the drag ghost, empty for palette drags.
    pub ghost_notation: String,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

impl DragStartResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entries: Vec::new(),
            ghost_notation: String::new(),
            message: message.into(),
        }
    }
}

/// Generic edit response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorActionResponse {
    /// Whether the tree changed.
    pub ok: bool,
    /// Editor revision after the call.
    pub revision: u64,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Full editor view for one UI frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSnapshot {
    /// Tree as JSON, `None` when empty.
    pub tree_json: Option<String>,
    /// Evaluator text of the full tree.
    pub expression: String,
    /// `$$y=...$$` preview, `None` when empty.
    pub preview: Option<String>,
    /// One-line notation with the dragged node hidden.
    pub notation: String,
    /// ID of the tree node being dragged, if any.
    pub dragging_id: Option<String>,
    pub revision: u64,
}

/// Lists palette entries in display order.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn palette_entries() -> Vec<PaletteEntry> {
    palette_groups()
        .iter()
        .flat_map(|group| {
            group.kinds.iter().map(move |kind| PaletteEntry {
                group: group.label.to_string(),
                kind: kind.as_str().to_string(),
                color: group.color.to_string(),
                border: border_color(*kind),
            })
        })
        .collect()
}

/// Starts dragging a palette entry.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; unknown or leaf kind tags return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_drag_start_palette(kind: String) -> DragStartResponse {
    let kind = match kind.parse::<BlockKind>() {
        Ok(kind) if !kind.is_leaf() => kind,
        Ok(kind) => {
            return DragStartResponse::failure(format!(
                "editor_drag_start_palette failed: {kind} is not a palette kind"
            ))
        }
        Err(err) => {
            return DragStartResponse::failure(format!("editor_drag_start_palette failed: {err}"))
        }
    };
    let transfer = lock_editor().begin_palette_drag(kind);
    DragStartResponse {
        ok: true,
        entries: to_transfer_entries(&transfer),
        ghost_notation: String::new(),
        message: "Drag started.".to_string(),
    }
}

/// Starts dragging an existing block.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; malformed or stale IDs return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_drag_start_block(block_id: String) -> DragStartResponse {
    let id = match parse_block_id(&block_id) {
        Ok(id) => id,
        Err(message) => {
            return DragStartResponse::failure(format!("editor_drag_start_block failed: {message}"))
        }
    };
    match lock_editor().begin_block_drag(id) {
        Some(start) => DragStartResponse {
            ok: true,
            entries: to_transfer_entries(&start.transfer),
            ghost_notation: mathblocks_core::notation(&start.ghost.content),
            message: "Drag started.".to_string(),
        },
        None => DragStartResponse::failure(format!(
            "editor_drag_start_block failed: block not found: {id}"
        )),
    }
}

/// Ends the current drag session, dropped or cancelled.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; safe to call when no drag is active.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_drag_end() {
    lock_editor().end_drag();
}

/// Resolves a drop using the transfer entries read from the native event.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; ignored drops return `ok=false` with the reason.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_drop(target: EditorDropTarget, entries: Vec<TransferEntry>) -> EditorActionResponse {
    let target = match parse_drop_target(&target) {
        Ok(target) => target,
        Err(message) => return failure_response("editor_drop", message),
    };
    let mut transfer = DataTransfer::new();
    for entry in entries {
        transfer.set(entry.key, entry.value);
    }
    let mut editor = lock_editor();
    let outcome = editor.handle_drop(target, &transfer);
    to_action_response(&editor, outcome, "Block dropped.")
}

/// Commits typed text into an empty slot or the empty root.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; blank text and occupied targets return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_commit_text(target: EditorDropTarget, text: String) -> EditorActionResponse {
    let target = match parse_drop_target(&target) {
        Ok(target) => target,
        Err(message) => return failure_response("editor_commit_text", message),
    };
    let mut editor = lock_editor();
    let outcome = editor.commit_text(target, &text);
    to_action_response(&editor, outcome, "Text committed.")
}

/// Rebinds the value of a leaf field.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; operator or stale IDs return `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_set_value(block_id: String, text: String) -> EditorActionResponse {
    let id = match parse_block_id(&block_id) {
        Ok(id) => id,
        Err(message) => return failure_response("editor_set_value", message),
    };
    let mut editor = lock_editor();
    let outcome = editor.set_value(id, &text);
    to_action_response(&editor, outcome, "Value updated.")
}

/// Discards the whole tree.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics; clearing an empty editor returns `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_clear() -> EditorActionResponse {
    let mut editor = lock_editor();
    let outcome = editor.clear();
    to_action_response(&editor, outcome, "Editor cleared.")
}

/// Returns the current editor view.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn editor_snapshot() -> EditorSnapshot {
    let editor = lock_editor();
    let tree_json = editor
        .root()
        .and_then(|root| match serde_json::to_string(root.as_ref()) {
            Ok(json) => Some(json),
            Err(err) => {
                warn!(
                    "event=snapshot_encode module=ffi status=error error={}",
                    err
                );
                None
            }
        });
    EditorSnapshot {
        tree_json,
        expression: editor.expression(),
        preview: editor.preview(),
        notation: canvas_notation(&editor.render()),
        dragging_id: editor.state().dragged_block().map(|id| id.to_string()),
        revision: editor.revision(),
    }
}

fn new_editor() -> EditorController {
    let config = match EditorConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            warn!(
                "event=config_load module=ffi status=error fallback=default error={}",
                err
            );
            EditorConfig::default()
        }
    };
    EditorController::new(config)
}

fn lock_editor() -> MutexGuard<'static, EditorController> {
    EDITOR.lock().unwrap_or_else(PoisonError::into_inner)
}

fn parse_block_id(raw: &str) -> Result<BlockId, String> {
    let id = Uuid::parse_str(raw.trim()).map_err(|err| format!("invalid block id: {err}"))?;
    if id.is_nil() {
        return Err("invalid block id: nil".to_string());
    }
    Ok(id)
}

fn parse_drop_target(target: &EditorDropTarget) -> Result<DropTarget, String> {
    match target.kind.trim().to_ascii_lowercase().as_str() {
        "root" => Ok(DropTarget::Root),
        "delete" => Ok(DropTarget::Delete),
        "slot" => {
            let parent_id = target
                .parent_id
                .as_deref()
                .ok_or_else(|| "slot target requires parent_id".to_string())
                .and_then(parse_block_id)?;
            let slot_index = target
                .slot_index
                .ok_or_else(|| "slot target requires slot_index".to_string())?;
            Ok(DropTarget::Slot {
                parent_id,
                slot_index: slot_index as usize,
            })
        }
        other => Err(format!(
            "unsupported drop target `{other}`; expected root|slot|delete"
        )),
    }
}

fn to_transfer_entries(transfer: &DataTransfer) -> Vec<TransferEntry> {
    transfer
        .entries()
        .map(|(key, value)| TransferEntry {
            key: key.to_string(),
            value: value.to_string(),
        })
        .collect()
}

fn to_action_response(
    editor: &EditorController,
    outcome: EditOutcome,
    success_message: &str,
) -> EditorActionResponse {
    match outcome {
        EditOutcome::Applied => EditorActionResponse {
            ok: true,
            revision: editor.revision(),
            message: success_message.to_string(),
        },
        EditOutcome::Unchanged(reason) => EditorActionResponse {
            ok: false,
            revision: editor.revision(),
            message: format!("Ignored: {reason}"),
        },
    }
}

fn failure_response(operation: &str, message: String) -> EditorActionResponse {
    EditorActionResponse {
        ok: false,
        revision: lock_editor().revision(),
        message: format!("{operation} failed: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, editor_clear, editor_commit_text, editor_drag_end,
        editor_drag_start_block, editor_drag_start_palette, editor_drop, editor_set_value,
        editor_snapshot, init_logging, palette_entries, ping, EditorDropTarget,
    };
    use std::sync::Mutex;

    // The editor is process-wide; editor tests must not interleave.
    static EDITOR_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn root_target() -> EditorDropTarget {
        EditorDropTarget {
            kind: "root".to_string(),
            parent_id: None,
            slot_index: None,
        }
    }

    fn slot_target(parent_id: &str, slot_index: u32) -> EditorDropTarget {
        EditorDropTarget {
            kind: "slot".to_string(),
            parent_id: Some(parent_id.to_string()),
            slot_index: Some(slot_index),
        }
    }

    fn root_id() -> String {
        let snapshot = editor_snapshot();
        let tree: serde_json::Value =
            serde_json::from_str(snapshot.tree_json.as_deref().unwrap()).unwrap();
        tree["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn palette_entries_cover_operator_kinds() {
        let entries = palette_entries();
        assert_eq!(entries.len(), 20);
        assert_eq!(entries[0].group, "Operators");
        assert_eq!(entries[0].kind, "add");
        assert_eq!(entries[0].border, "#d39700");
        assert!(entries.iter().all(|entry| entry.kind != "variable"));
    }

    #[test]
    fn palette_drag_rejects_leaf_and_unknown_kinds() {
        assert!(!editor_drag_start_palette("variable".to_string()).ok);
        assert!(!editor_drag_start_palette("matrix".to_string()).ok);
    }

    #[test]
    fn drop_commit_and_snapshot_flow() {
        let _guard = EDITOR_TEST_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        editor_clear();

        let start = editor_drag_start_palette("divide".to_string());
        assert!(start.ok, "{}", start.message);
        let dropped = editor_drop(root_target(), start.entries);
        editor_drag_end();
        assert!(dropped.ok, "{}", dropped.message);

        let root = root_id();
        assert!(editor_commit_text(slot_target(&root, 0), "x".to_string()).ok);
        assert!(editor_commit_text(slot_target(&root, 1), "2".to_string()).ok);

        let snapshot = editor_snapshot();
        assert_eq!(snapshot.expression, "((x) / (2))");
        assert_eq!(snapshot.preview.as_deref(), Some("$$y=((x) / (2))$$"));
        assert_eq!(snapshot.notation, "x ÷ 2");
        assert_eq!(snapshot.dragging_id, None);

        let occupied = editor_commit_text(slot_target(&root, 0), "y".to_string());
        assert!(!occupied.ok);
        assert!(occupied.message.starts_with("Ignored:"));
        assert_eq!(occupied.revision, snapshot.revision);
    }

    #[test]
    fn block_drag_to_delete_zone_removes_tree() {
        let _guard = EDITOR_TEST_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        editor_clear();
        assert!(editor_commit_text(root_target(), "3*x".to_string()).ok);
        let root = root_id();

        let start = editor_drag_start_block(root.clone());
        assert!(start.ok, "{}", start.message);
        assert_eq!(start.ghost_notation, "3*x");
        assert_eq!(editor_snapshot().dragging_id.as_deref(), Some(root.as_str()));

        let delete = EditorDropTarget {
            kind: "delete".to_string(),
            parent_id: None,
            slot_index: None,
        };
        assert!(editor_drop(delete, start.entries).ok);
        editor_drag_end();

        let snapshot = editor_snapshot();
        assert_eq!(snapshot.tree_json, None);
        assert_eq!(snapshot.expression, "");
        assert_eq!(snapshot.dragging_id, None);
    }

    #[test]
    fn malformed_ids_and_targets_are_reported() {
        let _guard = EDITOR_TEST_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        assert!(!editor_drag_start_block("not-a-uuid".to_string()).ok);
        assert!(!editor_set_value("not-a-uuid".to_string(), "1".to_string()).ok);

        let missing_index = EditorDropTarget {
            kind: "slot".to_string(),
            parent_id: Some(uuid::Uuid::new_v4().to_string()),
            slot_index: None,
        };
        let response = editor_drop(missing_index, Vec::new());
        assert!(!response.ok);
        assert!(response.message.contains("slot_index"));

        let unknown = EditorDropTarget {
            kind: "sidebar".to_string(),
            parent_id: None,
            slot_index: None,
        };
        assert!(editor_commit_text(unknown, "1".to_string())
            .message
            .contains("unsupported drop target"));
    }
}
