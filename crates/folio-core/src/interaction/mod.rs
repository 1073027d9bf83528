//! Interaction adapter: connects a drag engine to the position store.
//!
//! Snapping, inertia and restriction belong to the [`DragEngine`]. This
//! module only defines the options handed to the engine and the state policy
//! applied to every move event it emits: read the stored offset, add the
//! delta, write it back and translate the block.

mod simulated;

pub use simulated::SimulatedDragEngine;

use crate::error::{FolioError, FolioResult};
use crate::ids::BlockId;
use crate::layout::format_translate;
use crate::pages::PageNumber;
use crate::positions::PositionStore;
use crate::snap::{SnapRange, GRID_SIZE};
use crate::tree::{NodeId, VisualTree};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Element a dragged block is kept inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Restriction {
    /// The block's parent (its page).
    #[default]
    Parent,
    Unrestricted,
}

/// Drag behaviour requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DragOptions {
    pub snap_grid: f64,
    pub snap_range: SnapRange,
    pub restrict_to: Restriction,
    /// Apply the restriction only when the gesture ends.
    pub restrict_end_only: bool,
    /// Release continues the motion with decaying velocity.
    pub inertia: bool,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            snap_grid: GRID_SIZE,
            snap_range: SnapRange::Infinite,
            restrict_to: Restriction::Parent,
            restrict_end_only: true,
            inertia: true,
        }
    }
}

/// Subscription handle returned when a node is made draggable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DragHandle(pub u64);

/// Incremental movement of a dragged block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragMoveEvent {
    pub target: BlockId,
    pub delta: Vec2,
}

impl DragMoveEvent {
    pub fn new(target: BlockId, dx: f64, dy: f64) -> Self {
        Self {
            target,
            delta: Vec2::new(dx, dy),
        }
    }
}

/// External drag engine boundary.
pub trait DragEngine {
    /// Make a node draggable; subsequent gestures on it emit move events.
    fn make_draggable(&mut self, node: NodeId, id: &BlockId, options: DragOptions) -> DragHandle;

    /// Stop tracking a node. Returns false if the handle was unknown.
    fn release(&mut self, handle: DragHandle) -> bool;

    /// Take the move events emitted since the last call, in order.
    fn drain_moves(&mut self) -> Vec<DragMoveEvent>;
}

/// Home page recorded on a block container. Missing or unreadable values
/// fall back to page 1.
pub fn home_page<T: VisualTree + ?Sized>(tree: &T, node: NodeId) -> PageNumber {
    tree.attribute(node, "data-page")
        .and_then(|page| page.trim().parse().ok())
        .unwrap_or(1)
}

/// Apply one move event: accumulate the delta in the position store and
/// translate the block container. Returns the new absolute offset.
pub fn apply_drag_move<T: VisualTree + ?Sized>(
    tree: &mut T,
    store: &mut PositionStore,
    event: &DragMoveEvent,
) -> FolioResult<Vec2> {
    let node = tree
        .find_first(&format!("#{}", event.target))?
        .ok_or_else(|| FolioError::UnknownBlock(event.target.clone()))?;
    let page = home_page(tree, node);

    let offset = store.translate(page, &event.target, event.delta);
    let transform = format_translate(offset);
    tree.set_style(node, "transform", &transform)?;
    tree.set_style(node, "-webkit-transform", &transform)?;

    log::debug!(
        "Moved {} on page {} by ({}, {}) to ({}, {})",
        event.target,
        page,
        event.delta.x,
        event.delta.y,
        offset.x,
        offset.y
    );
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MemoryTree;

    fn block(tree: &mut MemoryTree, id: &str, page: Option<&str>) -> NodeId {
        let node = tree.create_element("div");
        tree.set_attribute(node, "id", id).unwrap();
        if let Some(page) = page {
            tree.set_attribute(node, "data-page", page).unwrap();
        }
        tree.append_child(tree.document(), node).unwrap();
        node
    }

    #[test]
    fn test_apply_drag_move_accumulates_and_translates() {
        let mut tree = MemoryTree::new();
        let mut store = PositionStore::new();
        let node = block(&mut tree, "block_1", Some("2"));
        let id = BlockId::new("block_1");

        apply_drag_move(&mut tree, &mut store, &DragMoveEvent::new(id.clone(), 10.0, -5.0)).unwrap();
        let offset =
            apply_drag_move(&mut tree, &mut store, &DragMoveEvent::new(id.clone(), 5.0, 5.0)).unwrap();

        assert_eq!(offset, Vec2::new(15.0, 0.0));
        assert_eq!(store.get(2, &id), Vec2::new(15.0, 0.0));
        assert_eq!(tree.style(node, "transform"), Some("translate(15px, 0px)"));
        assert_eq!(tree.style(node, "-webkit-transform"), Some("translate(15px, 0px)"));
    }

    #[test]
    fn test_missing_page_attribute_defaults_to_first_page() {
        let mut tree = MemoryTree::new();
        let mut store = PositionStore::new();
        block(&mut tree, "block_1", None);
        block(&mut tree, "block_2", Some("not-a-number"));

        for id in ["block_1", "block_2"] {
            apply_drag_move(&mut tree, &mut store, &DragMoveEvent::new(id.into(), 3.0, 4.0)).unwrap();
            assert_eq!(store.get(1, &BlockId::new(id)), Vec2::new(3.0, 4.0));
        }
    }

    #[test]
    fn test_unknown_target() {
        let mut tree = MemoryTree::new();
        let mut store = PositionStore::new();
        let err = apply_drag_move(
            &mut tree,
            &mut store,
            &DragMoveEvent::new(BlockId::new("block_missing"), 1.0, 1.0),
        )
        .unwrap_err();
        assert!(matches!(err, FolioError::UnknownBlock(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_default_options() {
        let options = DragOptions::default();
        assert_eq!(options.snap_grid, 15.0);
        assert_eq!(options.snap_range, SnapRange::Infinite);
        assert_eq!(options.restrict_to, Restriction::Parent);
        assert!(options.restrict_end_only);
        assert!(options.inertia);
    }
}
