//! Canvas: owns the visual tree and every piece of page builder state.

use crate::composer::{compose_block, Block};
use crate::error::{FolioError, FolioResult};
use crate::ids::{BlockId, IdGenerator, RandomIds};
use crate::interaction::{self, DragEngine, DragMoveEvent, DragOptions};
use crate::items::BlockKind;
use crate::layout::{page_layout, PageMetrics};
use crate::link::LinkTarget;
use crate::pages::{PageNumber, PageRegistry};
use crate::positions::PositionStore;
use crate::selection::{PageOption, PageSelection};
use crate::tree::{MemoryTree, NodeId, VisualTree};
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Id of the element that holds every page container.
pub const ROOT_ID: &str = "appPDF";
/// Class of a page container.
pub const PAGE_CLASS: &str = "page_a4";

/// Canvas configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    pub page: PageMetrics,
    /// Options every new block is made draggable with.
    pub drag: DragOptions,
}

/// Serializable view of one block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSnapshot {
    pub id: BlockId,
    pub kind: BlockKind,
    pub offset: Vec2,
}

/// Serializable view of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub page: PageNumber,
    pub blocks: Vec<BlockSnapshot>,
}

/// Serializable view of the canvas state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSnapshot {
    pub current_page: PageNumber,
    pub link_target: Option<BlockId>,
    pub pages: Vec<PageSnapshot>,
}

/// The page builder state.
///
/// All mutation goes through the canvas so the page registry, position
/// store and visual tree stay in agreement:
/// - every registered block has exactly one offset entry, under its home page
/// - every registered page has exactly one page container in the tree
/// - a block's home page never changes
pub struct Canvas<T: VisualTree = MemoryTree> {
    tree: T,
    root: NodeId,
    ids: Box<dyn IdGenerator>,
    positions: PositionStore,
    pages: PageRegistry,
    selection: PageSelection,
    link: LinkTarget,
    blocks: HashMap<BlockId, Block>,
    /// Block ids in creation order.
    order: Vec<BlockId>,
    config: CanvasConfig,
}

impl Canvas<MemoryTree> {
    /// Create an empty canvas backed by an in-memory tree, with random ids.
    pub fn new(config: CanvasConfig) -> FolioResult<Self> {
        Self::with_ids(RandomIds, config)
    }

    /// Create an empty in-memory canvas with a custom id generator.
    pub fn with_ids(ids: impl IdGenerator + 'static, config: CanvasConfig) -> FolioResult<Self> {
        Self::with_tree(MemoryTree::new(), Box::new(ids), config)
    }
}

impl<T: VisualTree> Canvas<T> {
    /// Create a canvas on top of an existing visual tree. The page root is
    /// appended to the tree's document element.
    pub fn with_tree(mut tree: T, ids: Box<dyn IdGenerator>, config: CanvasConfig) -> FolioResult<Self> {
        let root = tree.create_element("div");
        tree.set_attribute(root, "id", ROOT_ID)?;
        let document = tree.document();
        tree.append_child(document, root)?;

        Ok(Self {
            tree,
            root,
            ids,
            positions: PositionStore::new(),
            pages: PageRegistry::new(),
            selection: PageSelection::new(),
            link: LinkTarget::new(),
            blocks: HashMap::new(),
            order: Vec::new(),
            config,
        })
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// The element holding the page containers.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    pub fn pages(&self) -> &PageRegistry {
        &self.pages
    }

    pub fn link(&self) -> &LinkTarget {
        &self.link
    }

    // --- Pages ---

    /// Append a page and its container. Returns the new page number.
    pub fn add_page(&mut self) -> FolioResult<PageNumber> {
        let page = self.pages.page_count() + 1;
        let container = self.tree.create_element("div");
        self.tree.add_class(container, PAGE_CLASS)?;
        self.tree
            .set_attribute(container, "data-page-count", &page.to_string())?;
        self.tree.append_child(self.root, container)?;

        let added = self.pages.add_page();
        debug_assert_eq!(added, page);
        self.positions.add_page(page);
        log::info!("Added page {}", page);
        Ok(page)
    }

    /// Number of registered pages.
    pub fn page_count(&self) -> u32 {
        self.pages.page_count()
    }

    /// Number of page containers present in the visual tree.
    pub fn materialized_page_count(&self) -> FolioResult<u32> {
        let containers = self
            .tree
            .find_all_in(Some(self.root), &format!("div.{}", PAGE_CLASS))?;
        Ok(containers.len() as u32)
    }

    /// Container element of a page.
    pub fn page_container(&self, page: PageNumber) -> FolioResult<NodeId> {
        let selector = format!("div.{}[data-page-count=\"{}\"]", PAGE_CLASS, page);
        self.tree
            .find_first_in(Some(self.root), &selector)?
            .ok_or(FolioError::MissingPageContainer(page))
    }

    pub fn current_page(&self) -> PageNumber {
        self.selection.current_page()
    }

    /// Choose the page new blocks are added to.
    pub fn set_current_page(&mut self, page: PageNumber) -> FolioResult<()> {
        self.selection.set_current_page(page, &self.pages)
    }

    /// Page selector entries.
    pub fn page_options(&self) -> Vec<PageOption> {
        PageSelection::page_options(&self.pages)
    }

    // --- Blocks ---

    /// Add a block of `kind` to the current page.
    ///
    /// The block starts at offset zero. Nothing is mutated if the current
    /// page has no container.
    pub fn add_block<E: DragEngine + ?Sized>(&mut self, kind: BlockKind, drag: &mut E) -> FolioResult<Block> {
        let page = self.selection.current_page();
        let container = self.page_container(page)?;

        let block = compose_block(
            &mut self.tree,
            self.ids.as_mut(),
            drag,
            kind,
            page,
            self.config.drag,
        )?;
        self.tree.append_child(container, block.node)?;
        self.pages.add_item_to_page(page, block.id.clone())?;
        self.positions.set(page, block.id.clone(), Vec2::ZERO);
        self.order.push(block.id.clone());
        self.blocks.insert(block.id.clone(), block.clone());

        log::info!("Added {} block {} to page {}", kind, block.id, page);
        Ok(block)
    }

    /// Add a block from its type tag (as used by the toolbar markup).
    pub fn add_block_tag<E: DragEngine + ?Sized>(&mut self, tag: &str, drag: &mut E) -> FolioResult<Block> {
        let kind = tag.parse::<BlockKind>().inspect_err(|_| {
            log::warn!("Rejected unknown block type {:?}", tag);
        })?;
        self.add_block(kind, drag)
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// All blocks in creation order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.order.iter().filter_map(|id| self.blocks.get(id))
    }

    /// Blocks of a page in insertion order.
    pub fn blocks_on(&self, page: PageNumber) -> Vec<&Block> {
        self.pages
            .blocks(page)
            .iter()
            .filter_map(|id| self.blocks.get(id))
            .collect()
    }

    /// Stored offset of a block.
    pub fn offset(&self, id: &BlockId) -> Option<Vec2> {
        self.blocks
            .get(id)
            .map(|block| self.positions.get(block.page, id))
    }

    // --- Dragging ---

    /// Apply one drag move event. Returns the block's new offset.
    pub fn apply_drag_move(&mut self, event: &DragMoveEvent) -> FolioResult<Vec2> {
        interaction::apply_drag_move(&mut self.tree, &mut self.positions, event)
    }

    /// Apply every move event the engine has emitted since the last pump.
    /// Events for unknown blocks are skipped. Returns the number applied.
    pub fn pump_drag_events<E: DragEngine + ?Sized>(&mut self, engine: &mut E) -> usize {
        let mut applied = 0;
        for event in engine.drain_moves() {
            match self.apply_drag_move(&event) {
                Ok(_) => applied += 1,
                Err(err) => log::warn!("Dropped drag move for {}: {}", event.target, err),
            }
        }
        applied
    }

    /// Range of offsets that keeps a block inside its page.
    pub fn drag_bounds(&self, id: &BlockId) -> FolioResult<Rect> {
        let block = self
            .blocks
            .get(id)
            .ok_or_else(|| FolioError::UnknownBlock(id.clone()))?;
        let container = self.page_container(block.page)?;
        page_layout(&self.tree, container, &self.config.page)
            .into_iter()
            .find(|placed| placed.node == block.node)
            .map(|placed| placed.offset_bounds(&self.config.page))
            .ok_or_else(|| FolioError::Inconsistent(format!("{} is not laid out on page {}", id, block.page)))
    }

    // --- Links ---

    /// Route a click on any canvas element to the link context.
    pub fn click(&mut self, node: NodeId) {
        self.link.handle_click(&self.tree, node);
    }

    /// Set the URL of the selected link. `Ok(false)` if no link is selected.
    pub fn submit_link_url(&mut self, url: &str) -> FolioResult<bool> {
        self.link.update_url(&mut self.tree, url)
    }

    // --- Deletion ---

    /// Remove a block from the tree, registry, position store and engine.
    pub fn remove_block<E: DragEngine + ?Sized>(&mut self, id: &BlockId, drag: &mut E) -> FolioResult<Block> {
        let node = self
            .blocks
            .get(id)
            .map(|block| block.node)
            .ok_or_else(|| FolioError::UnknownBlock(id.clone()))?;
        self.tree.remove(node)?;

        let block = self
            .blocks
            .remove(id)
            .ok_or_else(|| FolioError::UnknownBlock(id.clone()))?;
        self.forget(&block, drag);
        self.pages.remove_item(block.page, id);
        log::info!("Removed block {} from page {}", id, block.page);
        Ok(block)
    }

    /// Remove the highest-numbered page with all of its blocks.
    /// The only remaining page cannot be removed.
    pub fn remove_last_page<E: DragEngine + ?Sized>(&mut self, drag: &mut E) -> FolioResult<PageNumber> {
        let page = self.pages.page_count();
        if page <= 1 {
            return Err(FolioError::LastPage);
        }
        let container = self.page_container(page)?;
        self.tree.remove(container)?;

        if let Some((_, ids)) = self.pages.remove_last_page() {
            for id in ids {
                if let Some(block) = self.blocks.remove(&id) {
                    self.forget(&block, drag);
                }
            }
        }
        self.positions.remove_page(page);
        self.selection.clamp_to(&self.pages);
        log::info!("Removed page {}", page);
        Ok(page)
    }

    fn forget<E: DragEngine + ?Sized>(&mut self, block: &Block, drag: &mut E) {
        self.positions.remove(block.page, &block.id);
        self.order.retain(|existing| existing != &block.id);
        drag.release(block.drag);
        if self.link.target() == Some(&block.id) {
            self.link.clear_target();
        }
    }

    // --- Consistency ---

    /// Verify that registry, position store and visual tree agree.
    pub fn check_consistency(&self) -> FolioResult<()> {
        let materialized = self.materialized_page_count()?;
        if materialized != self.pages.page_count() {
            return Err(FolioError::Inconsistent(format!(
                "{} pages registered but {} containers in the tree",
                self.pages.page_count(),
                materialized
            )));
        }

        if let Some(page) = self.positions.pages().find(|&page| !self.pages.contains(page)) {
            return Err(FolioError::Inconsistent(format!(
                "Position store has entries for unregistered page {}",
                page
            )));
        }

        let mut registered = 0;
        for page in self.pages.pages() {
            let listed: BTreeSet<&BlockId> = self.pages.blocks(page).iter().collect();
            let stored: BTreeSet<&BlockId> = self.positions.ids(page).collect();
            if listed != stored {
                return Err(FolioError::Inconsistent(format!(
                    "Page {} lists {} blocks but stores {} offsets",
                    page,
                    listed.len(),
                    stored.len()
                )));
            }

            let container = self.page_container(page)?;
            for id in listed {
                let block = self
                    .blocks
                    .get(id)
                    .ok_or_else(|| FolioError::Inconsistent(format!("{} is registered but unknown", id)))?;
                if block.page != page {
                    return Err(FolioError::Inconsistent(format!(
                        "{} is listed on page {} but belongs to page {}",
                        id, page, block.page
                    )));
                }
                if self.tree.parent(block.node) != Some(container) {
                    return Err(FolioError::Inconsistent(format!(
                        "{} is not inside the container of page {}",
                        id, page
                    )));
                }
                registered += 1;
            }
        }

        if registered != self.blocks.len() {
            return Err(FolioError::Inconsistent(format!(
                "{} blocks known but {} registered on pages",
                self.blocks.len(),
                registered
            )));
        }
        Ok(())
    }

    // --- Serialization ---

    pub fn snapshot(&self) -> CanvasSnapshot {
        let pages = self
            .pages
            .pages()
            .map(|page| PageSnapshot {
                page,
                blocks: self
                    .blocks_on(page)
                    .into_iter()
                    .map(|block| BlockSnapshot {
                        id: block.id.clone(),
                        kind: block.kind,
                        offset: self.positions.get(page, &block.id),
                    })
                    .collect(),
            })
            .collect();
        CanvasSnapshot {
            current_page: self.current_page(),
            link_target: self.link.target().cloned(),
            pages,
        }
    }

    /// Serialize the canvas state to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::interaction::SimulatedDragEngine;
    use kurbo::Point;

    fn canvas(pages: u32) -> Canvas {
        let mut canvas = Canvas::with_ids(SequentialIds::new(), CanvasConfig::default()).unwrap();
        for _ in 0..pages {
            canvas.add_page().unwrap();
        }
        canvas
    }

    fn anchor_of(canvas: &Canvas, block: &Block) -> NodeId {
        canvas.tree().children(block.node)[0]
    }

    #[test]
    fn test_add_pages() {
        let canvas = canvas(4);
        assert_eq!(canvas.page_count(), 4);
        assert_eq!(canvas.materialized_page_count().unwrap(), 4);
        assert!(canvas.pages().contains(canvas.current_page()));
        for page in 1..=4 {
            canvas.page_container(page).unwrap();
        }
        canvas.check_consistency().unwrap();
    }

    #[test]
    fn test_new_block_starts_at_origin() {
        let mut canvas = canvas(1);
        let mut drag = SimulatedDragEngine::new();
        let block = canvas.add_block(BlockKind::BodyText, &mut drag).unwrap();

        assert_eq!(canvas.positions().get(1, &block.id), Vec2::ZERO);
        assert!(canvas.positions().contains(1, &block.id));
        assert_eq!(canvas.pages().blocks(1), &[block.id.clone()]);
        assert_eq!(
            canvas.tree().parent(block.node),
            Some(canvas.page_container(1).unwrap())
        );
        canvas.check_consistency().unwrap();
    }

    #[test]
    fn test_drag_scenario() {
        let mut canvas = canvas(1);
        let mut drag = SimulatedDragEngine::new();
        let block = canvas.add_block_tag("bodyText", &mut drag).unwrap();

        canvas
            .apply_drag_move(&DragMoveEvent::new(block.id.clone(), 10.0, -5.0))
            .unwrap();
        canvas
            .apply_drag_move(&DragMoveEvent::new(block.id.clone(), 5.0, 5.0))
            .unwrap();

        assert_eq!(canvas.offset(&block.id), Some(Vec2::new(15.0, 0.0)));
        assert_eq!(
            canvas.tree().style(block.node, "transform"),
            Some("translate(15px, 0px)")
        );
    }

    #[test]
    fn test_interleaved_drags_accumulate_per_block() {
        let mut canvas = canvas(2);
        let mut drag = SimulatedDragEngine::new();
        let a = canvas.add_block(BlockKind::BodyText, &mut drag).unwrap();
        canvas.set_current_page(2).unwrap();
        let b = canvas.add_block(BlockKind::ShortLine, &mut drag).unwrap();

        let moves = [
            (&a, 3.0, 1.0),
            (&b, -2.0, 7.0),
            (&a, 4.0, -6.0),
            (&b, 10.0, 0.5),
            (&a, -1.0, 2.0),
        ];
        for (block, dx, dy) in moves {
            canvas
                .apply_drag_move(&DragMoveEvent::new(block.id.clone(), dx, dy))
                .unwrap();
        }

        assert_eq!(canvas.offset(&a.id), Some(Vec2::new(6.0, -3.0)));
        assert_eq!(canvas.offset(&b.id), Some(Vec2::new(8.0, 7.5)));
        assert_eq!(canvas.positions().get(1, &a.id), Vec2::new(6.0, -3.0));
        assert_eq!(canvas.positions().get(2, &b.id), Vec2::new(8.0, 7.5));
        canvas.check_consistency().unwrap();
    }

    #[test]
    fn test_block_lands_on_selected_page() {
        let mut canvas = canvas(2);
        let mut drag = SimulatedDragEngine::new();
        canvas.set_current_page(2).unwrap();
        let block = canvas.add_block(BlockKind::PrimaryHeading, &mut drag).unwrap();

        assert_eq!(block.page, 2);
        assert!(canvas.positions().contains(2, &block.id));
        assert!(!canvas.positions().contains(1, &block.id));
        assert!(canvas.pages().blocks(1).is_empty());
        assert_eq!(canvas.pages().blocks(2), &[block.id.clone()]);
        assert_eq!(
            canvas.tree().attribute(block.node, "data-page").as_deref(),
            Some("2")
        );
        canvas.check_consistency().unwrap();
    }

    #[test]
    fn test_unknown_tag_mutates_nothing() {
        let mut canvas = canvas(1);
        let mut drag = SimulatedDragEngine::new();
        let nodes_before = canvas.tree().len();

        let err = canvas.add_block_tag("marquee", &mut drag).unwrap_err();
        assert!(matches!(err, FolioError::UnknownBlockType(_)));
        assert_eq!(canvas.tree().len(), nodes_before);
        assert!(canvas.positions().is_empty());
        assert_eq!(canvas.blocks().count(), 0);

        // The id sequence is untouched as well.
        let block = canvas.add_block(BlockKind::BodyText, &mut drag).unwrap();
        assert_eq!(block.id.as_str(), "block_1");
    }

    #[test]
    fn test_add_block_without_page_container() {
        let mut canvas = canvas(0);
        let mut drag = SimulatedDragEngine::new();
        let err = canvas.add_block(BlockKind::BodyText, &mut drag).unwrap_err();
        assert!(matches!(err, FolioError::MissingPageContainer(1)));
        assert!(canvas.positions().is_empty());
        assert!(!drag.is_draggable(&BlockId::new("block_1")));
    }

    #[test]
    fn test_selecting_unknown_page_fails() {
        let mut canvas = canvas(2);
        let err = canvas.set_current_page(5).unwrap_err();
        assert!(matches!(err, FolioError::UnknownPage(5)));
        assert_eq!(canvas.current_page(), 1);
        assert_eq!(canvas.page_options().len(), 2);
    }

    #[test]
    fn test_link_scenario() {
        let mut canvas = canvas(1);
        let mut drag = SimulatedDragEngine::new();
        let link = canvas.add_block(BlockKind::Link, &mut drag).unwrap();
        let text = canvas.add_block(BlockKind::BodyText, &mut drag).unwrap();
        let anchor = anchor_of(&canvas, &link);

        canvas.click(anchor);
        assert_eq!(canvas.link().target(), Some(&link.id));
        assert!(canvas.link().panel_visible());

        assert!(canvas.submit_link_url("https://example.com").unwrap());
        assert_eq!(
            canvas.tree().attribute(anchor, "href").as_deref(),
            Some("https://example.com")
        );

        canvas.click(anchor_of(&canvas, &text));
        assert_eq!(canvas.link().target(), None);
        assert!(!canvas.link().panel_visible());

        assert!(!canvas.submit_link_url("https://other.example").unwrap());
        assert_eq!(
            canvas.tree().attribute(anchor, "href").as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_engine_drag_within_page() {
        let mut canvas = canvas(1);
        let mut drag = SimulatedDragEngine::new();
        let block = canvas.add_block(BlockKind::BodyText, &mut drag).unwrap();
        let bounds = canvas.drag_bounds(&block.id).unwrap();
        assert!(bounds.contains(Point::ORIGIN));

        let start = canvas.offset(&block.id).unwrap();
        drag.begin(&block.id, Point::new(100.0, 100.0), start, Some(bounds));
        drag.move_to(Point::new(130.0, 160.0));
        drag.move_to(Point::new(5000.0, 160.0));
        drag.end();
        assert!(canvas.pump_drag_events(&mut drag) > 0);

        let offset = canvas.offset(&block.id).unwrap();
        assert_eq!(offset, Vec2::new(bounds.x1, 60.0));
    }

    #[test]
    fn test_engine_drag_after_direct_move_stays_within_page() {
        let mut canvas = canvas(1);
        let mut drag = SimulatedDragEngine::new();
        let block = canvas.add_block(BlockKind::BodyText, &mut drag).unwrap();
        let bounds = canvas.drag_bounds(&block.id).unwrap();

        canvas
            .apply_drag_move(&DragMoveEvent::new(block.id.clone(), bounds.x1 - 6.0, 0.0))
            .unwrap();

        let start = canvas.offset(&block.id).unwrap();
        assert!(drag.begin(&block.id, Point::ORIGIN, start, Some(bounds)));
        drag.move_to(Point::new(30.0, 0.0));
        drag.end();
        canvas.pump_drag_events(&mut drag);

        let offset = canvas.offset(&block.id).unwrap();
        assert!(bounds.contains(offset.to_point()), "{offset:?} left {bounds:?}");
        assert_eq!(offset.x, bounds.x1);
    }

    #[test]
    fn test_remove_block() {
        let mut canvas = canvas(1);
        let mut drag = SimulatedDragEngine::new();
        let link = canvas.add_block(BlockKind::Link, &mut drag).unwrap();
        let other = canvas.add_block(BlockKind::BodyText, &mut drag).unwrap();
        canvas.click(anchor_of(&canvas, &link));

        canvas.remove_block(&link.id, &mut drag).unwrap();
        assert!(canvas.block(&link.id).is_none());
        assert!(!canvas.positions().contains(1, &link.id));
        assert_eq!(canvas.pages().blocks(1), &[other.id.clone()]);
        assert!(canvas.tree().find_first("#block_1").unwrap().is_none());
        assert!(!drag.is_draggable(&link.id));
        assert_eq!(canvas.link().target(), None);
        canvas.check_consistency().unwrap();

        let err = canvas.remove_block(&link.id, &mut drag).unwrap_err();
        assert!(matches!(err, FolioError::UnknownBlock(_)));
    }

    #[test]
    fn test_remove_last_page() {
        let mut canvas = canvas(2);
        let mut drag = SimulatedDragEngine::new();
        canvas.add_block(BlockKind::BodyText, &mut drag).unwrap();
        canvas.set_current_page(2).unwrap();
        let doomed = canvas.add_block(BlockKind::BodyText, &mut drag).unwrap();

        assert_eq!(canvas.remove_last_page(&mut drag).unwrap(), 2);
        assert_eq!(canvas.page_count(), 1);
        assert_eq!(canvas.current_page(), 1);
        assert!(canvas.block(&doomed.id).is_none());
        assert!(!drag.is_draggable(&doomed.id));
        canvas.check_consistency().unwrap();

        let err = canvas.remove_last_page(&mut drag).unwrap_err();
        assert!(matches!(err, FolioError::LastPage));
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn test_consistency_detects_missing_container() {
        let mut canvas = canvas(2);
        let container = canvas.page_container(2).unwrap();
        canvas.tree.remove(container).unwrap();

        let err = canvas.check_consistency().unwrap_err();
        assert!(matches!(err, FolioError::Inconsistent(_)));
    }

    #[test]
    fn test_snapshot() {
        let mut canvas = canvas(2);
        let mut drag = SimulatedDragEngine::new();
        let block = canvas.add_block(BlockKind::HorizontalLine, &mut drag).unwrap();
        canvas
            .apply_drag_move(&DragMoveEvent::new(block.id.clone(), 30.0, 15.0))
            .unwrap();

        let snapshot = canvas.snapshot();
        assert_eq!(snapshot.pages.len(), 2);
        assert_eq!(snapshot.pages[0].blocks[0].offset, Vec2::new(30.0, 15.0));
        assert!(snapshot.pages[1].blocks.is_empty());

        let json: serde_json::Value = serde_json::from_str(&canvas.to_json().unwrap()).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["pages"][0]["blocks"][0]["kind"], "horizontalLine");
        assert_eq!(json["pages"][0]["blocks"][0]["id"], "block_1");
    }
}
