use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editing::block::{Block, BlockId, BlockKind, ImageId, ImageRef};

/// Identifier of a document in the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A trigger prefix detected at the head of freshly typed content, pending
/// application one tick later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetypeTrigger {
    pub kind: BlockKind,
    pub prefix: &'static str,
}

// Leading tokens that convert a plain text block as a side effect of typing.
const TRIGGERS: &[(&str, BlockKind)] = &[
    ("- ", BlockKind::UnorderedListItem),
    ("1. ", BlockKind::OrderedListItem),
    ("[] ", BlockKind::Checkbox),
    ("() ", BlockKind::Radio),
];

pub(crate) fn detect_trigger(content: &str) -> Option<RetypeTrigger> {
    TRIGGERS
        .iter()
        .find(|(prefix, _)| content.starts_with(prefix))
        .map(|(prefix, kind)| RetypeTrigger { kind: *kind, prefix })
}

/// An ordered sequence of blocks plus a title.
///
/// The document is the sole owner of its ordering: block records are stored
/// by id and referenced from exactly one document. All mutating operations
/// keep the core invariant that at least one block always exists, and they
/// signal refused work through their return value instead of an error.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    title: String,
    order: Vec<BlockId>,
    blocks: HashMap<BlockId, Block>,
}

impl Document {
    /// A new document seeded with one empty, plain text block.
    pub fn new(title: impl Into<String>) -> Self {
        Self::from_records(DocumentId::new(), title, vec![Block::empty()])
    }

    /// Build a document from fetched block records, in order. An empty record
    /// set is seeded with one empty block so the invariant holds from the
    /// start.
    pub fn from_records(
        id: DocumentId,
        title: impl Into<String>,
        records: Vec<Block>,
    ) -> Self {
        let records = if records.is_empty() {
            vec![Block::empty()]
        } else {
            records
        };
        let order: Vec<BlockId> = records.iter().map(|block| block.id).collect();
        let blocks = records.into_iter().map(|block| (block.id, block)).collect();
        Self {
            id,
            title: title.into(),
            order,
            blocks,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Never true: a document always holds at least one block.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Block ids in document order.
    pub fn order(&self) -> &[BlockId] {
        &self.order
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.order.iter().filter_map(|id| self.blocks.get(id))
    }

    pub fn first_block_id(&self) -> BlockId {
        self.order[0]
    }

    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.order.iter().position(|other| *other == id)
    }

    pub fn previous_block(&self, id: BlockId) -> Option<BlockId> {
        let index = self.index_of(id)?;
        index.checked_sub(1).map(|prev| self.order[prev])
    }

    pub fn next_block(&self, id: BlockId) -> Option<BlockId> {
        let index = self.index_of(id)?;
        self.order.get(index + 1).copied()
    }

    /// Insert a fresh empty text block immediately after `after`, or at the
    /// end when `after` is unknown. Returns the new block's id.
    pub fn insert_after(&mut self, after: BlockId) -> BlockId {
        let block = Block::empty();
        let id = block.id;
        let index = match self.index_of(after) {
            Some(index) => index + 1,
            None => self.order.len(),
        };
        self.order.insert(index, block.id);
        self.blocks.insert(block.id, block);
        id
    }

    /// Remove a block and report where focus should land: the block
    /// immediately before it, or the new first block when there is none.
    /// Returns `None` (no-op) for the last remaining block or an unknown id.
    pub fn remove(&mut self, id: BlockId) -> Option<BlockId> {
        if self.order.len() <= 1 {
            return None;
        }
        let index = self.index_of(id)?;
        self.order.remove(index);
        self.blocks.remove(&id);
        let focus = match index.checked_sub(1) {
            Some(previous) => self.order[previous],
            None => self.order[0],
        };
        Some(focus)
    }

    /// Replace a block's content. Identity and position never change here.
    ///
    /// When the block is plain text and the new content leads with a trigger
    /// token (`"- "`, `"1. "`, `"[] "`, `"() "`), the matching retype is
    /// detected and returned for the caller to apply one deferred tick later
    /// — applying it inside the in-flight input event would fight the
    /// host's own editing.
    pub fn update_content(&mut self, id: BlockId, content: &str) -> Option<RetypeTrigger> {
        let block = self.blocks.get_mut(&id)?;
        block.content = content.to_string();
        if block.kind == BlockKind::Text {
            detect_trigger(content)
        } else {
            None
        }
    }

    /// Apply a previously detected trigger: strip the prefix exactly once and
    /// switch the kind. Skipped when the content no longer carries the
    /// prefix (the user kept editing during the deferred tick) or the block
    /// is no longer plain text.
    pub fn apply_retype(&mut self, id: BlockId, trigger: RetypeTrigger) -> bool {
        let Some(block) = self.blocks.get_mut(&id) else {
            return false;
        };
        if block.kind != BlockKind::Text || !block.content.starts_with(trigger.prefix) {
            return false;
        }
        block.content = block.content[trigger.prefix.len()..].to_string();
        block.kind = trigger.kind;
        block.checked = trigger.kind.is_checkable().then_some(false);
        true
    }

    /// Revert a typed block to plain text, content untouched. The undo path
    /// for an accidental trigger retype.
    pub fn retype_to_text(&mut self, id: BlockId) -> bool {
        let Some(block) = self.blocks.get_mut(&id) else {
            return false;
        };
        if block.kind == BlockKind::Text {
            return false;
        }
        block.kind = BlockKind::Text;
        block.checked = None;
        true
    }

    /// Set the checked state of a checkbox/radio block. No-op for other
    /// kinds.
    pub fn set_checked(&mut self, id: BlockId, checked: bool) -> bool {
        let Some(block) = self.blocks.get_mut(&id) else {
            return false;
        };
        if !block.kind.is_checkable() {
            return false;
        }
        block.checked = Some(checked);
        true
    }

    pub fn attach_images(&mut self, id: BlockId, images: Vec<ImageRef>) -> bool {
        let Some(block) = self.blocks.get_mut(&id) else {
            return false;
        };
        block.images.extend(images);
        true
    }

    pub fn remove_image(&mut self, id: BlockId, image: ImageId) -> bool {
        let Some(block) = self.blocks.get_mut(&id) else {
            return false;
        };
        let before = block.images.len();
        block.images.retain(|attached| attached.id != image);
        block.images.len() != before
    }
}
