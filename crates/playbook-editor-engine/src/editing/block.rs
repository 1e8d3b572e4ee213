use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a block. Assigned at creation, unique within a
/// document, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(pub Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier for an image attached to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Rendering affordance of a block. Kinds shape the chrome around the
/// editable region (bullet, number, checkbox…), never the content structure:
/// a block is always a single paragraph of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    #[default]
    Text,
    UnorderedListItem,
    OrderedListItem,
    Checkbox,
    Radio,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::UnorderedListItem => "unordered-list-item",
            BlockKind::OrderedListItem => "ordered-list-item",
            BlockKind::Checkbox => "checkbox",
            BlockKind::Radio => "radio",
        }
    }

    /// Whether the kind carries a checked state.
    pub fn is_checkable(&self) -> bool {
        matches!(self, BlockKind::Checkbox | BlockKind::Radio)
    }
}

/// Reference to an image attached to a block. Attachments have a lifecycle of
/// their own, independent from the block's text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub id: ImageId,
    pub url: String,
}

impl ImageRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: ImageId::new(),
            url: url.into(),
        }
    }
}

/// The atomic editable unit of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub content: String,
    pub kind: BlockKind,
    /// Meaningful only for checkbox/radio kinds; `None` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageRef>,
}

impl Block {
    /// A plain text block with fresh identity.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: BlockId::new(),
            content: content.into(),
            kind: BlockKind::Text,
            checked: None,
            images: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new("")
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
