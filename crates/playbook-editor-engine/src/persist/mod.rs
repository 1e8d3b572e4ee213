//! Collaborator interfaces to the backing document store.
//!
//! The engine mutates its local model first and forwards every change here,
//! fire-and-forget: a rejected mutation is surfaced to the host through the
//! session's sync-failure list, never retried or rolled back by the engine.

mod memory;

pub use memory::MemoryRepository;

use crate::editing::block::{Block, BlockId, ImageId, ImageRef};
use crate::editing::document::DocumentId;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),
    #[error("block not found: {0}")]
    BlockNotFound(BlockId),
    #[error("storage backend rejected the mutation: {0}")]
    Backend(String),
}

/// Block persistence collaborator.
///
/// `create_block` may append server-side; the subsequent
/// [`reorder_blocks`](BlockRepository::reorder_blocks) call communicates the
/// authoritative ordering.
pub trait BlockRepository {
    fn fetch_blocks(&self, document: DocumentId) -> Result<Vec<Block>, RepositoryError>;

    fn create_block(
        &mut self,
        document: DocumentId,
        block: &Block,
    ) -> Result<(), RepositoryError>;

    fn update_block(&mut self, block: &Block) -> Result<(), RepositoryError>;

    fn delete_block(
        &mut self,
        document: DocumentId,
        block: BlockId,
    ) -> Result<(), RepositoryError>;

    fn reorder_blocks(
        &mut self,
        document: DocumentId,
        order: &[BlockId],
    ) -> Result<(), RepositoryError>;
}

/// Image attachment collaborator, keyed by block id.
pub trait ImageRepository {
    fn attach_image(&mut self, block: BlockId, image: &ImageRef) -> Result<(), RepositoryError>;
    fn remove_image(&mut self, block: BlockId, image: ImageId) -> Result<(), RepositoryError>;
}
