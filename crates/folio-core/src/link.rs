//! Link target context: which link block the URL panel edits.

use crate::error::{FolioError, FolioResult};
use crate::ids::BlockId;
use crate::tree::{NodeId, VisualTree};
use serde::{Deserialize, Serialize};

/// Link selection shared between the canvas and the URL panel.
///
/// `target == None` means no link is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTarget {
    target: Option<BlockId>,
    panel_visible: bool,
}

impl LinkTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&BlockId> {
        self.target.as_ref()
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Select a link block and open the URL panel.
    pub fn set_target(&mut self, id: BlockId) {
        log::debug!("Link target set to {}", id);
        self.target = Some(id);
        self.panel_visible = true;
    }

    /// Clear the selection and hide the URL panel.
    pub fn clear_target(&mut self) {
        if let Some(previous) = self.target.take() {
            log::debug!("Link target {} cleared", previous);
        }
        self.panel_visible = false;
    }

    /// React to a click anywhere on the canvas.
    ///
    /// Only a click on an anchor element itself selects a link; its parent
    /// block container becomes the target. Any other click clears the
    /// selection.
    pub fn handle_click<T: VisualTree + ?Sized>(&mut self, tree: &T, node: NodeId) {
        let block = (tree.tag(node) == Some("a"))
            .then(|| tree.parent(node))
            .flatten()
            .and_then(|parent| tree.attribute(parent, "id"));
        match block {
            Some(id) => self.set_target(BlockId::new(id)),
            None => self.clear_target(),
        }
    }

    /// Write `url` as the `href` of the selected link.
    ///
    /// Returns `Ok(false)` when no link is selected.
    pub fn update_url<T: VisualTree + ?Sized>(&self, tree: &mut T, url: &str) -> FolioResult<bool> {
        let Some(target) = &self.target else {
            log::debug!("Ignoring link URL: no link selected");
            return Ok(false);
        };
        let anchor = tree
            .find_first(&format!("#{} > a", target))?
            .ok_or_else(|| FolioError::UnknownBlock(target.clone()))?;
        tree.set_attribute(anchor, "href", url)?;
        log::info!("Link {} now points to {}", target, url);
        Ok(true)
    }
}
