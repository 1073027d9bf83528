//! Block composition: wraps a content fragment into a draggable block.

use crate::error::FolioResult;
use crate::ids::{BlockId, IdGenerator};
use crate::interaction::{DragEngine, DragHandle, DragOptions};
use crate::items::{create_fragment, BlockKind};
use crate::pages::PageNumber;
use crate::tree::{NodeId, VisualTree};
use serde::Serialize;

/// Class carried by every block container.
pub const BLOCK_CLASS: &str = "block";

/// A composed block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Page the block was created on. Blocks never change page.
    pub page: PageNumber,
    /// The `div.block` container.
    #[serde(skip)]
    pub node: NodeId,
    #[serde(skip)]
    pub drag: DragHandle,
}

/// Build a block container holding the fragment for `kind`.
///
/// The container is tagged with its id, home page and block type, and is
/// registered with the drag engine. It is left detached; attaching it to a
/// page is up to the caller.
pub fn compose_block<T, E>(
    tree: &mut T,
    ids: &mut dyn IdGenerator,
    drag: &mut E,
    kind: BlockKind,
    page: PageNumber,
    options: DragOptions,
) -> FolioResult<Block>
where
    T: VisualTree + ?Sized,
    E: DragEngine + ?Sized,
{
    let id = ids.next_id();
    let content = create_fragment(kind).materialize(tree)?;

    let node = tree.create_element("div");
    tree.add_class(node, BLOCK_CLASS)?;
    tree.set_attribute(node, "id", id.as_str())?;
    tree.set_attribute(node, "data-page", &page.to_string())?;
    tree.set_attribute(node, "data-block-type", kind.tag())?;
    tree.append_child(node, content)?;

    let handle = drag.make_draggable(node, &id, options);
    log::debug!("Composed {} block {} for page {}", kind, id, page);

    Ok(Block {
        id,
        kind,
        page,
        node,
        drag: handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::interaction::SimulatedDragEngine;
    use crate::tree::MemoryTree;

    #[test]
    fn test_compose_block() {
        let mut tree = MemoryTree::new();
        let mut ids = SequentialIds::new();
        let mut drag = SimulatedDragEngine::new();

        let block = compose_block(
            &mut tree,
            &mut ids,
            &mut drag,
            BlockKind::Link,
            2,
            DragOptions::default(),
        )
        .unwrap();

        assert_eq!(block.id.as_str(), "block_1");
        assert_eq!(block.page, 2);
        assert!(tree.has_class(block.node, BLOCK_CLASS));
        assert_eq!(tree.attribute(block.node, "id").as_deref(), Some("block_1"));
        assert_eq!(tree.attribute(block.node, "data-page").as_deref(), Some("2"));
        assert_eq!(
            tree.attribute(block.node, "data-block-type").as_deref(),
            Some("link")
        );
        assert!(drag.is_draggable(&block.id));

        let children = tree.children(block.node);
        assert_eq!(children.len(), 1);
        assert_eq!(tree.tag(children[0]), Some("a"));
    }

    #[test]
    fn test_composed_block_is_detached() {
        let mut tree = MemoryTree::new();
        let block = compose_block(
            &mut tree,
            &mut SequentialIds::new(),
            &mut SimulatedDragEngine::new(),
            BlockKind::BodyText,
            1,
            DragOptions::default(),
        )
        .unwrap();

        assert!(!tree.is_attached(block.node));
        assert!(tree.find_first("#block_1").unwrap().is_none());
    }
}
