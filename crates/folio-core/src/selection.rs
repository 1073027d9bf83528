//! Current page pointer and the page selector model.

use crate::error::{FolioError, FolioResult};
use crate::pages::{PageNumber, PageRegistry};
use serde::{Deserialize, Serialize};

/// One entry of the page selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOption {
    pub value: PageNumber,
    pub label: String,
}

/// Tracks which page new blocks are added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSelection {
    current: PageNumber,
}

impl Default for PageSelection {
    fn default() -> Self {
        Self { current: 1 }
    }
}

impl PageSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_page(&self) -> PageNumber {
        self.current
    }

    /// Point at an existing page. Unknown pages leave the pointer unchanged.
    pub fn set_current_page(&mut self, page: PageNumber, registry: &PageRegistry) -> FolioResult<()> {
        if !registry.contains(page) {
            log::warn!(
                "Rejected page selection {} ({} pages exist)",
                page,
                registry.page_count()
            );
            return Err(FolioError::UnknownPage(page));
        }
        log::debug!("Current page {} -> {}", self.current, page);
        self.current = page;
        Ok(())
    }

    /// Pull the pointer back onto the last page if that page was removed.
    pub fn clamp_to(&mut self, registry: &PageRegistry) {
        let count = registry.page_count().max(1);
        if self.current > count {
            self.current = count;
        }
    }

    /// Selector entries, one per existing page.
    pub fn page_options(registry: &PageRegistry) -> Vec<PageOption> {
        registry
            .pages()
            .map(|page| PageOption {
                value: page,
                label: page.to_string(),
            })
            .collect()
    }
}
