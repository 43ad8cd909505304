//! Drag payload wire codec.
//!
//! # Responsibility
//! - Encode drag-start payloads into the string-keyed transfer channel.
//! - Decode a transfer once, at the drop boundary, into a tagged payload.
//!
//! # Invariants
//! - Palette payloads win over tree payloads when both keys are present.
//! - Palette tags only resolve to kinds offered by the palette.

use crate::model::block::{BlockId, BlockKind};
use crate::model::palette::lookup_palette_kind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Transfer key naming the palette kind being dragged.
pub const KEY_BLOCK_TYPE: &str = "block-type";
/// Transfer key carrying `{"id": "<uuid>"}` for tree-origin drags.
pub const KEY_BLOCK_TREE: &str = "block-tree";
/// Transfer key marking a tree-origin drag as delete-eligible.
pub const KEY_DELETE_BLOCK: &str = "delete-block";

const DELETE_FLAG_VALUE: &str = "true";

/// String-keyed drag transfer, as set at drag start and read at drop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataTransfer {
    entries: BTreeMap<String, String>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the value for `key`; blank values read as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// JSON object stored under `block-tree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct TreeRef {
    id: BlockId,
}

/// Decoded drag payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPayload {
    /// Palette drag carrying a kind to instantiate.
    FromPalette(BlockKind),
    /// Tree drag carrying the id of an existing node.
    FromTree(BlockId),
}

/// Decoded transfer: payload plus delete eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedDrop {
    pub payload: DropPayload,
    pub delete_eligible: bool,
}

/// Payload decode failures.
#[derive(Debug)]
pub enum PayloadError {
    /// Neither payload key is present.
    Empty,
    /// Palette tag does not name an insertable kind.
    UnknownKind(String),
    /// `block-tree` value is not a valid `{id}` object, or could not be
    /// written as one.
    MalformedTreeRef(serde_json::Error),
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "drag payload is empty"),
            Self::UnknownKind(tag) => write!(f, "palette kind is not insertable: `{tag}`"),
            Self::MalformedTreeRef(err) => write!(f, "malformed block-tree payload: {err}"),
        }
    }
}

impl Error for PayloadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedTreeRef(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PayloadError {
    fn from(value: serde_json::Error) -> Self {
        Self::MalformedTreeRef(value)
    }
}

/// Builds the transfer set when a palette entry starts dragging.
pub fn encode_palette(kind: BlockKind) -> DataTransfer {
    let mut transfer = DataTransfer::new();
    transfer.set(KEY_BLOCK_TYPE, kind.as_str());
    transfer
}

/// Builds the transfer set when an existing tree node starts dragging.
pub fn encode_tree(id: BlockId) -> Result<DataTransfer, PayloadError> {
    let mut transfer = DataTransfer::new();
    transfer.set(KEY_BLOCK_TREE, serde_json::to_string(&TreeRef { id })?);
    transfer.set(KEY_DELETE_BLOCK, DELETE_FLAG_VALUE);
    Ok(transfer)
}

/// Decodes a transfer into a tagged payload.
pub fn decode(transfer: &DataTransfer) -> Result<DecodedDrop, PayloadError> {
    let delete_eligible = transfer.get(KEY_DELETE_BLOCK).is_some();

    if let Some(tag) = transfer.get(KEY_BLOCK_TYPE) {
        let kind =
            lookup_palette_kind(tag).ok_or_else(|| PayloadError::UnknownKind(tag.to_string()))?;
        return Ok(DecodedDrop {
            payload: DropPayload::FromPalette(kind),
            delete_eligible: false,
        });
    }

    if let Some(raw) = transfer.get(KEY_BLOCK_TREE) {
        let tree_ref: TreeRef = serde_json::from_str(raw)?;
        return Ok(DecodedDrop {
            payload: DropPayload::FromTree(tree_ref.id),
            delete_eligible,
        });
    }

    Err(PayloadError::Empty)
}

#[cfg(test)]
mod tests {
    use super::{
        decode, encode_palette, encode_tree, DataTransfer, DropPayload, PayloadError,
        KEY_BLOCK_TREE, KEY_BLOCK_TYPE, KEY_DELETE_BLOCK,
    };
    use crate::model::block::{BlockKind, BlockNode};

    #[test]
    fn palette_payload_decodes_to_kind() {
        let decoded = decode(&encode_palette(BlockKind::Fraction)).unwrap();
        assert_eq!(decoded.payload, DropPayload::FromPalette(BlockKind::Fraction));
        assert!(!decoded.delete_eligible);
    }

    #[test]
    fn tree_payload_carries_id_and_delete_flag() {
        let node = BlockNode::new(BlockKind::Power);
        let transfer = encode_tree(node.id()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(transfer.get(KEY_BLOCK_TREE).unwrap()).unwrap();
        assert_eq!(raw["id"], node.id().to_string());
        assert_eq!(transfer.get(KEY_DELETE_BLOCK), Some("true"));

        assert_eq!(
            transfer.get(KEY_BLOCK_TREE),
            Some(format!("{{\"id\":\"{}\"}}", node.id()).as_str())
        );

        let decoded = decode(&transfer).unwrap();
        assert_eq!(decoded.payload, DropPayload::FromTree(node.id()));
        assert!(decoded.delete_eligible);
    }

    #[test]
    fn palette_key_takes_precedence() {
        let node = BlockNode::new(BlockKind::Power);
        let mut transfer = encode_tree(node.id()).unwrap();
        transfer.set(KEY_BLOCK_TYPE, "sin");
        let decoded = decode(&transfer).unwrap();
        assert_eq!(decoded.payload, DropPayload::FromPalette(BlockKind::Sin));
    }

    #[test]
    fn decode_rejects_empty_unknown_and_malformed() {
        assert!(matches!(
            decode(&DataTransfer::new()),
            Err(PayloadError::Empty)
        ));

        let mut unknown = DataTransfer::new();
        unknown.set(KEY_BLOCK_TYPE, "variable");
        assert!(matches!(
            decode(&unknown),
            Err(PayloadError::UnknownKind(tag)) if tag == "variable"
        ));

        let mut malformed = DataTransfer::new();
        malformed.set(KEY_BLOCK_TREE, "{\"id\": 42}");
        assert!(matches!(
            decode(&malformed),
            Err(PayloadError::MalformedTreeRef(_))
        ));
    }
}
