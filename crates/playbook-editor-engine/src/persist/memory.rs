use std::collections::HashMap;

use super::{BlockRepository, ImageRepository, RepositoryError};
use crate::editing::block::{Block, BlockId, ImageId, ImageRef};
use crate::editing::document::DocumentId;

/// In-memory implementation of both persistence collaborators.
///
/// The reference backend for tests and headless sessions. `set_failing`
/// makes every subsequent call fail, which is how the failure-surfacing path
/// is exercised.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    documents: HashMap<DocumentId, Vec<Block>>,
    failing: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a document's blocks, as if fetched from a real backend.
    pub fn with_document(mut self, document: DocumentId, blocks: Vec<Block>) -> Self {
        self.documents.insert(document, blocks);
        self
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn blocks(&self, document: DocumentId) -> Option<&[Block]> {
        self.documents.get(&document).map(Vec::as_slice)
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.failing {
            Err(RepositoryError::Backend("storage offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn block_mut(&mut self, block: BlockId) -> Result<&mut Block, RepositoryError> {
        self.documents
            .values_mut()
            .flatten()
            .find(|candidate| candidate.id == block)
            .ok_or(RepositoryError::BlockNotFound(block))
    }
}

impl BlockRepository for MemoryRepository {
    fn fetch_blocks(&self, document: DocumentId) -> Result<Vec<Block>, RepositoryError> {
        self.check_available()?;
        self.documents
            .get(&document)
            .cloned()
            .ok_or(RepositoryError::DocumentNotFound(document))
    }

    fn create_block(
        &mut self,
        document: DocumentId,
        block: &Block,
    ) -> Result<(), RepositoryError> {
        self.check_available()?;
        self.documents.entry(document).or_default().push(block.clone());
        Ok(())
    }

    fn update_block(&mut self, block: &Block) -> Result<(), RepositoryError> {
        self.check_available()?;
        *self.block_mut(block.id)? = block.clone();
        Ok(())
    }

    fn delete_block(
        &mut self,
        document: DocumentId,
        block: BlockId,
    ) -> Result<(), RepositoryError> {
        self.check_available()?;
        let blocks = self
            .documents
            .get_mut(&document)
            .ok_or(RepositoryError::DocumentNotFound(document))?;
        let before = blocks.len();
        blocks.retain(|candidate| candidate.id != block);
        if blocks.len() == before {
            return Err(RepositoryError::BlockNotFound(block));
        }
        Ok(())
    }

    fn reorder_blocks(
        &mut self,
        document: DocumentId,
        order: &[BlockId],
    ) -> Result<(), RepositoryError> {
        self.check_available()?;
        let blocks = self
            .documents
            .get_mut(&document)
            .ok_or(RepositoryError::DocumentNotFound(document))?;
        blocks.sort_by_key(|block| {
            order
                .iter()
                .position(|id| *id == block.id)
                .unwrap_or(usize::MAX)
        });
        Ok(())
    }
}

impl ImageRepository for MemoryRepository {
    fn attach_image(&mut self, block: BlockId, image: &ImageRef) -> Result<(), RepositoryError> {
        self.check_available()?;
        self.block_mut(block)?.images.push(image.clone());
        Ok(())
    }

    fn remove_image(&mut self, block: BlockId, image: ImageId) -> Result<(), RepositoryError> {
        self.check_available()?;
        let record = self.block_mut(block)?;
        let before = record.images.len();
        record.images.retain(|attached| attached.id != image);
        if record.images.len() == before {
            return Err(RepositoryError::BlockNotFound(block));
        }
        Ok(())
    }
}
