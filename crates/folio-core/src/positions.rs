//! Position store: page number -> block id -> cumulative offset.

use crate::ids::BlockId;
use crate::pages::PageNumber;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Two-level map of block offsets, keyed by home page and block id.
///
/// Offsets start at zero and only ever accumulate relative drag deltas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionStore {
    pages: BTreeMap<PageNumber, HashMap<BlockId, Vec2>>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the (empty) entry map for a page.
    pub fn add_page(&mut self, page: PageNumber) {
        self.pages.entry(page).or_default();
    }

    /// Drop a page and every offset stored under it.
    pub fn remove_page(&mut self, page: PageNumber) -> Option<HashMap<BlockId, Vec2>> {
        self.pages.remove(&page)
    }

    /// Offset of a block, or zero if it has never been stored.
    pub fn get(&self, page: PageNumber, id: &BlockId) -> Vec2 {
        self.pages
            .get(&page)
            .and_then(|entries| entries.get(id))
            .copied()
            .unwrap_or(Vec2::ZERO)
    }

    /// Overwrite the offset of a block.
    pub fn set(&mut self, page: PageNumber, id: BlockId, offset: Vec2) {
        self.pages.entry(page).or_default().insert(id, offset);
    }

    /// Remove a block's offset.
    pub fn remove(&mut self, page: PageNumber, id: &BlockId) -> Option<Vec2> {
        self.pages.get_mut(&page).and_then(|entries| entries.remove(id))
    }

    /// Add a relative delta to the stored offset and return the new absolute offset.
    pub fn translate(&mut self, page: PageNumber, id: &BlockId, delta: Vec2) -> Vec2 {
        let offset = self
            .pages
            .entry(page)
            .or_default()
            .entry(id.clone())
            .or_insert(Vec2::ZERO);
        *offset += delta;
        *offset
    }

    /// Check whether a block has an entry under the page.
    pub fn contains(&self, page: PageNumber, id: &BlockId) -> bool {
        self.pages
            .get(&page)
            .is_some_and(|entries| entries.contains_key(id))
    }

    /// Block ids stored under a page (unordered).
    pub fn ids(&self, page: PageNumber) -> impl Iterator<Item = &BlockId> {
        self.pages.get(&page).into_iter().flat_map(|entries| entries.keys())
    }

    /// Pages that have an entry map, ascending.
    pub fn pages(&self) -> impl Iterator<Item = PageNumber> + '_ {
        self.pages.keys().copied()
    }

    /// Total number of stored offsets.
    pub fn len(&self) -> usize {
        self.pages.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_defaults_to_zero() {
        let store = PositionStore::new();
        assert_eq!(store.get(1, &BlockId::new("block_x")), Vec2::ZERO);
        assert_eq!(store.get(7, &BlockId::new("block_x")), Vec2::ZERO);
    }

    #[test]
    fn test_translate_accumulates() {
        let mut store = PositionStore::new();
        let id = BlockId::new("block_a");
        store.set(1, id.clone(), Vec2::ZERO);

        store.translate(1, &id, Vec2::new(10.0, -5.0));
        let offset = store.translate(1, &id, Vec2::new(5.0, 5.0));

        assert_eq!(offset, Vec2::new(15.0, 0.0));
        assert_eq!(store.get(1, &id), Vec2::new(15.0, 0.0));
    }

    #[test]
    fn test_translate_interleaved_blocks_do_not_interfere() {
        let mut store = PositionStore::new();
        let a = BlockId::new("block_a");
        let b = BlockId::new("block_b");
        let deltas = [(3.0, 1.0), (-7.5, 2.0), (15.0, -30.0), (0.5, 0.25)];

        for &(dx, dy) in &deltas {
            store.translate(1, &a, Vec2::new(dx, dy));
            store.translate(2, &b, Vec2::new(-dy, dx));
        }

        let sum_x: f64 = deltas.iter().map(|d| d.0).sum();
        let sum_y: f64 = deltas.iter().map(|d| d.1).sum();
        assert_eq!(store.get(1, &a), Vec2::new(sum_x, sum_y));
        assert_eq!(store.get(2, &b), Vec2::new(-sum_y, sum_x));
    }

    #[test]
    fn test_remove() {
        let mut store = PositionStore::new();
        let id = BlockId::new("block_a");
        store.set(1, id.clone(), Vec2::new(1.0, 2.0));

        assert_eq!(store.remove(1, &id), Some(Vec2::new(1.0, 2.0)));
        assert!(!store.contains(1, &id));
        assert!(store.is_empty());
        assert_eq!(store.remove(1, &id), None);
    }

    #[test]
    fn test_remove_page_drops_entries() {
        let mut store = PositionStore::new();
        store.add_page(1);
        store.add_page(2);
        store.set(2, BlockId::new("block_a"), Vec2::ZERO);

        let removed = store.remove_page(2).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(store.pages().collect::<Vec<_>>(), vec![1]);
    }
}
