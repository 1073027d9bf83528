//! Error types for page and block state.

use crate::ids::BlockId;
use crate::pages::PageNumber;
use crate::tree::TreeError;
use thiserror::Error;

/// Errors raised by the page builder state layer.
#[derive(Debug, Error)]
pub enum FolioError {
    /// A block type tag that is not part of the toolbar enumeration.
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),
    /// No materialized container exists for the page.
    #[error("No page container for page {0}")]
    MissingPageContainer(PageNumber),
    /// The page number is not registered.
    #[error("Page {0} does not exist")]
    UnknownPage(PageNumber),
    /// No block with this identifier exists.
    #[error("Unknown block: {0}")]
    UnknownBlock(BlockId),
    /// The only remaining page cannot be removed.
    #[error("Cannot remove the last remaining page")]
    LastPage,
    /// Registry, position store and visual tree disagree.
    #[error("Inconsistent state: {0}")]
    Inconsistent(String),
    #[error("Visual tree error: {0}")]
    Tree(#[from] TreeError),
}

/// Result type for state operations.
pub type FolioResult<T> = Result<T, FolioError>;
