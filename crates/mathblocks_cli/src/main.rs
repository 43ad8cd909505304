//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `mathblocks_core` linkage.
//! - Build a demo tree through the editor session and print its views.
//! - Keep output deterministic for quick local sanity checks.

use mathblocks_core::{
    canvas_notation, core_version, ping, BlockKind, DropTarget, EditorConfig, EditorController,
};

fn main() {
    println!("mathblocks_core ping={}", ping());
    println!("mathblocks_core version={}", core_version());

    let mut editor = EditorController::new(EditorConfig::default());
    build_demo(&mut editor);

    println!("notation={}", canvas_notation(&editor.render()));
    println!("expression={}", editor.expression());
    println!("preview={}", editor.preview().unwrap_or_default());
}

/// Builds `((x)^(2) + sin(x))` the way a user would: palette drops, then
/// typed text into the empty slots.
fn build_demo(editor: &mut EditorController) {
    drop_palette(editor, BlockKind::Add, DropTarget::Root);
    let Some(root_id) = editor.root().map(|root| root.id()) else {
        return;
    };

    drop_palette(editor, BlockKind::Power, slot(root_id, 0));
    drop_palette(editor, BlockKind::Sin, slot(root_id, 1));

    let Some(root) = editor.root().cloned() else {
        return;
    };
    if let Some(power) = root.child(0) {
        editor.commit_text(slot(power.id(), 0), "x");
        editor.commit_text(slot(power.id(), 1), "2");
    }
    if let Some(sin) = root.child(1) {
        editor.commit_text(slot(sin.id(), 0), "x");
    }
}

fn drop_palette(editor: &mut EditorController, kind: BlockKind, target: DropTarget) {
    let transfer = editor.begin_palette_drag(kind);
    editor.handle_drop(target, &transfer);
    editor.end_drag();
}

fn slot(parent_id: mathblocks_core::BlockId, slot_index: usize) -> DropTarget {
    DropTarget::Slot {
        parent_id,
        slot_index,
    }
}
