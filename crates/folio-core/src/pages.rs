//! Page registry: which pages exist and which blocks belong to each.

use crate::error::{FolioError, FolioResult};
use crate::ids::BlockId;
use serde::{Deserialize, Serialize};

/// 1-based sequential page number.
pub type PageNumber = u32;

/// Ordered page membership.
///
/// Pages are dense: page `n` exists for every `1 <= n <= page_count()`.
/// The page count is kept explicitly rather than derived from rendered
/// page containers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageRegistry {
    /// Block ids per page, index 0 is page 1.
    pages: Vec<Vec<BlockId>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new page and return its number.
    pub fn add_page(&mut self) -> PageNumber {
        self.pages.push(Vec::new());
        self.page_count()
    }

    /// Number of existing pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Check whether a page exists.
    pub fn contains(&self, page: PageNumber) -> bool {
        page >= 1 && page <= self.page_count()
    }

    /// All page numbers in order.
    pub fn pages(&self) -> impl Iterator<Item = PageNumber> {
        1..=self.page_count()
    }

    fn index(&self, page: PageNumber) -> Option<usize> {
        self.contains(page).then(|| (page - 1) as usize)
    }

    /// Register a block under a page.
    pub fn add_item_to_page(&mut self, page: PageNumber, id: BlockId) -> FolioResult<()> {
        let index = self
            .index(page)
            .ok_or(FolioError::MissingPageContainer(page))?;
        let blocks = &mut self.pages[index];
        if !blocks.contains(&id) {
            blocks.push(id);
        }
        Ok(())
    }

    /// Unregister a block. Returns true if it was listed under the page.
    pub fn remove_item(&mut self, page: PageNumber, id: &BlockId) -> bool {
        let Some(index) = self.index(page) else {
            return false;
        };
        let blocks = &mut self.pages[index];
        let before = blocks.len();
        blocks.retain(|existing| existing != id);
        blocks.len() != before
    }

    /// Remove the highest-numbered page, returning its number and blocks.
    pub fn remove_last_page(&mut self) -> Option<(PageNumber, Vec<BlockId>)> {
        let page = self.page_count();
        self.pages.pop().map(|blocks| (page, blocks))
    }

    /// Blocks registered under a page, in insertion order.
    pub fn blocks(&self, page: PageNumber) -> &[BlockId] {
        match self.index(page) {
            Some(index) => &self.pages[index],
            None => &[],
        }
    }

    /// Find the page a block belongs to.
    pub fn page_of(&self, id: &BlockId) -> Option<PageNumber> {
        self.pages
            .iter()
            .position(|blocks| blocks.contains(id))
            .map(|index| index as PageNumber + 1)
    }
}
