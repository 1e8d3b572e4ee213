use anyhow::Context;

use crate::editing::block::{BlockId, ImageId, ImageRef};
use crate::editing::document::{Document, DocumentId, RetypeTrigger};
use crate::editing::navigation::{KeyAction, KeyDispatch, KeyEvent, resolve_key};
use crate::geometry::{
    CaretPosition, TextLayout, place_caret_at, position_from_selection, visual_line_rects,
};
use crate::persist::{BlockRepository, ImageRepository, RepositoryError};

/// Caret restoration payload carried across a focus change.
///
/// `LastLine` exists because the target line of an upward hop can only be
/// resolved against the destination block's layout, which is not measurable
/// until after the next render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingCaret {
    At(CaretPosition),
    LastLine { column: usize },
}

/// Render-dependent work parked until the host's next paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingEffect {
    Retype {
        block: BlockId,
        trigger: RetypeTrigger,
    },
    RestoreCaret {
        target: PendingCaret,
    },
}

/// FIFO of pending effects. Caret restorations collapse to the newest one;
/// retypes collapse per block.
#[derive(Debug, Default)]
struct EffectQueue {
    queue: Vec<PendingEffect>,
}

impl EffectQueue {
    fn schedule_retype(&mut self, block: BlockId, trigger: RetypeTrigger) {
        self.queue
            .retain(|effect| !matches!(effect, PendingEffect::Retype { block: queued, .. } if *queued == block));
        self.queue.push(PendingEffect::Retype { block, trigger });
    }

    fn schedule_caret(&mut self, target: PendingCaret) {
        self.queue
            .retain(|effect| !matches!(effect, PendingEffect::RestoreCaret { .. }));
        self.queue.push(PendingEffect::RestoreCaret { target });
    }

    fn drain(&mut self) -> Vec<PendingEffect> {
        std::mem::take(&mut self.queue)
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// The persistence call a [`SyncFailure`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    CreateBlock,
    UpdateBlock,
    DeleteBlock,
    ReorderBlocks,
    AttachImage,
    RemoveImage,
}

/// A mutation the backend rejected. Local state stays optimistic; the host
/// drains these for user-visible reporting and decides whether to retry.
#[derive(Debug, thiserror::Error)]
#[error("{operation:?} was not persisted: {error}")]
pub struct SyncFailure {
    pub operation: SyncOperation,
    #[source]
    pub error: RepositoryError,
}

/// One editing session over a document: block store, focus signal, saved
/// caret, pending effects and the persistence collaborator.
///
/// The host shell forwards its DOM-ish events ([`on_key_down`],
/// [`on_focus`], [`on_content_change`], [`save_caret_position`]) and calls
/// [`flush_effects`] with the focused region's layout once per render, after
/// the content mutation it just applied is actually laid out.
///
/// [`on_key_down`]: EditorSession::on_key_down
/// [`on_focus`]: EditorSession::on_focus
/// [`on_content_change`]: EditorSession::on_content_change
/// [`save_caret_position`]: EditorSession::save_caret_position
/// [`flush_effects`]: EditorSession::flush_effects
pub struct EditorSession<S> {
    document: Document,
    storage: S,
    focused: Option<BlockId>,
    saved_caret: CaretPosition,
    effects: EffectQueue,
    sync_failures: Vec<SyncFailure>,
}

impl<S> EditorSession<S>
where
    S: BlockRepository + ImageRepository,
{
    pub fn new(document: Document, storage: S) -> Self {
        let focused = Some(document.first_block_id());
        Self {
            document,
            storage,
            focused,
            saved_caret: CaretPosition::default(),
            effects: EffectQueue::default(),
            sync_failures: Vec::new(),
        }
    }

    /// Fetch a document's blocks from storage and open a session over them.
    pub fn load(
        document_id: DocumentId,
        title: impl Into<String>,
        storage: S,
    ) -> anyhow::Result<Self> {
        let records = storage
            .fetch_blocks(document_id)
            .context("fetching blocks for document")?;
        let document = Document::from_records(document_id, title, records);
        Ok(Self::new(document, storage))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn focused_block(&self) -> Option<BlockId> {
        self.focused
    }

    /// Caret position saved on the last horizontal move or navigation hop;
    /// the column vertical navigation tries to preserve.
    pub fn saved_caret(&self) -> CaretPosition {
        self.saved_caret
    }

    pub fn has_pending_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    /// Persistence failures accumulated since the last drain.
    pub fn drain_sync_failures(&mut self) -> Vec<SyncFailure> {
        std::mem::take(&mut self.sync_failures)
    }

    /// Dispatch a key press on the focused block. `layout` is the live
    /// geometry of that block's editable region. Returns whether the host
    /// must suppress the native editing behavior.
    pub fn on_key_down(
        &mut self,
        event: &KeyEvent,
        block_id: BlockId,
        layout: &dyn TextLayout,
    ) -> KeyDispatch {
        let Some(block) = self.document.block(block_id) else {
            return KeyDispatch::PassThrough;
        };
        let (action, dispatch) = resolve_key(event, block, layout);
        match action {
            KeyAction::InsertSiblingBelow => {
                let new_id = self.document.insert_after(block_id);
                log::debug!("inserted block {new_id} after {block_id}");
                self.persist_create(new_id);
                self.persist_order();
                self.focused = Some(new_id);
                self.effects
                    .schedule_caret(PendingCaret::At(CaretPosition::default()));
            }
            KeyAction::RetypeToText => {
                if self.document.retype_to_text(block_id) {
                    self.persist_update(block_id);
                }
            }
            KeyAction::RemoveBlock => {
                if let Some(focus) = self.document.remove(block_id) {
                    log::debug!("removed block {block_id}, focusing {focus}");
                    let result = self.storage.delete_block(self.document.id(), block_id);
                    self.record_failure(SyncOperation::DeleteBlock, result);
                    self.focused = Some(focus);
                }
            }
            KeyAction::FocusPrevious { position } => {
                self.saved_caret = position;
                if let Some(previous) = self.document.previous_block(block_id) {
                    self.focused = Some(previous);
                    self.effects.schedule_caret(PendingCaret::LastLine {
                        column: position.column,
                    });
                }
            }
            KeyAction::FocusNext { position } => {
                self.saved_caret = position;
                if let Some(next) = self.document.next_block(block_id) {
                    self.focused = Some(next);
                    self.effects
                        .schedule_caret(PendingCaret::At(CaretPosition::new(0, position.column)));
                }
            }
            KeyAction::SaveCaret { position } => {
                self.saved_caret = position;
            }
            KeyAction::None => {}
        }
        dispatch
    }

    /// A block's region took focus through the host (mouse, tab order).
    pub fn on_focus(&mut self, block_id: BlockId) {
        if self.document.block(block_id).is_some() {
            self.focused = Some(block_id);
        }
    }

    /// The host's editable region reported new content for a block.
    ///
    /// The raw content (trigger prefix included) is stored and persisted
    /// immediately; a detected retype is parked on the effect queue for the
    /// next flush.
    pub fn on_content_change(&mut self, block_id: BlockId, content: &str) {
        if self.document.block(block_id).is_none() {
            return;
        }
        let trigger = self.document.update_content(block_id, content);
        self.persist_update(block_id);
        if let Some(trigger) = trigger {
            self.effects.schedule_retype(block_id, trigger);
        }
    }

    /// Recompute and remember the caret position, e.g. on mouse-up or after
    /// a native horizontal arrow move.
    pub fn save_caret_position(&mut self, layout: &dyn TextLayout) -> CaretPosition {
        self.saved_caret = position_from_selection(layout);
        self.saved_caret
    }

    /// Run the render-dependent half of recent mutations.
    ///
    /// `layout` is the region of the *currently* focused block, freshly
    /// rendered — restorations scheduled against a block that lost focus in
    /// the meantime simply apply here instead (last-write-wins). With no
    /// layout available, retypes still run and restorations are dropped.
    pub fn flush_effects(&mut self, mut layout: Option<&mut dyn TextLayout>) {
        if let Some(region) = layout.as_deref_mut() {
            region.focus();
        }
        for effect in self.effects.drain() {
            match effect {
                PendingEffect::Retype { block, trigger } => {
                    if self.document.apply_retype(block, trigger) {
                        log::debug!("retyped block {block} to {:?}", trigger.kind);
                        self.persist_update(block);
                    }
                }
                PendingEffect::RestoreCaret { target } => {
                    let Some(region) = layout.as_deref_mut() else {
                        continue;
                    };
                    let position = match target {
                        PendingCaret::At(position) => position,
                        PendingCaret::LastLine { column } => {
                            let line = visual_line_rects(&*region).len().saturating_sub(1);
                            CaretPosition::new(line, column)
                        }
                    };
                    log::trace!("restoring caret at {position:?}");
                    place_caret_at(region, position);
                }
            }
        }
    }

    /// Toggle a checkbox/radio block and persist the change.
    pub fn set_checked(&mut self, block_id: BlockId, checked: bool) -> bool {
        if self.document.set_checked(block_id, checked) {
            self.persist_update(block_id);
            true
        } else {
            false
        }
    }

    /// Attach images to a block (e.g. pasted into its region).
    pub fn attach_images(&mut self, block_id: BlockId, images: Vec<ImageRef>) -> bool {
        if !self.document.attach_images(block_id, images.clone()) {
            return false;
        }
        for image in &images {
            let result = self.storage.attach_image(block_id, image);
            self.record_failure(SyncOperation::AttachImage, result);
        }
        true
    }

    pub fn remove_image(&mut self, block_id: BlockId, image: ImageId) -> bool {
        if !self.document.remove_image(block_id, image) {
            return false;
        }
        let result = self.storage.remove_image(block_id, image);
        self.record_failure(SyncOperation::RemoveImage, result);
        true
    }

    /// Remove the image currently shown by the block's gallery, by index.
    pub fn remove_visible_image(&mut self, block_id: BlockId, index: usize) -> bool {
        let Some(image) = self
            .document
            .block(block_id)
            .and_then(|block| block.images.get(index))
            .map(|image| image.id)
        else {
            return false;
        };
        self.remove_image(block_id, image)
    }

    fn persist_create(&mut self, block_id: BlockId) {
        let Some(record) = self.document.block(block_id).cloned() else {
            return;
        };
        let result = self.storage.create_block(self.document.id(), &record);
        self.record_failure(SyncOperation::CreateBlock, result);
    }

    fn persist_update(&mut self, block_id: BlockId) {
        let Some(record) = self.document.block(block_id).cloned() else {
            return;
        };
        let result = self.storage.update_block(&record);
        self.record_failure(SyncOperation::UpdateBlock, result);
    }

    fn persist_order(&mut self) {
        let order = self.document.order().to_vec();
        let result = self.storage.reorder_blocks(self.document.id(), &order);
        self.record_failure(SyncOperation::ReorderBlocks, result);
    }

    fn record_failure(&mut self, operation: SyncOperation, result: Result<(), RepositoryError>) {
        if let Err(error) = result {
            log::warn!("persistence {operation:?} failed: {error}");
            self.sync_failures.push(SyncFailure { operation, error });
        }
    }
}
