//! User-facing action and toolbar model.

use folio_core::{BlockKind, PageNumber};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Actions that can be triggered from the UI.
///
/// Blocks are referenced by their creation index within the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum UiAction {
    /// Add a block from its toolbar type tag to the current page.
    AddBlock { kind: String },
    AddPage,
    /// Change the page new blocks are added to.
    SelectPage { page: PageNumber },
    /// Drag a block along a pointer path and release it.
    Drag { block: usize, path: Vec<Point> },
    /// Drag a block along a pointer path and abort the gesture.
    CancelDrag { block: usize, path: Vec<Point> },
    /// Click a block (its anchor when `link` is set) or, without a block,
    /// the empty page area.
    Click {
        #[serde(default)]
        block: Option<usize>,
        #[serde(default)]
        link: bool,
    },
    /// Submit the URL panel.
    SetLinkUrl { url: String },
    /// Export every page as a PDF.
    Download,
}

/// One toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolbarItem {
    pub kind: BlockKind,
    pub tag: &'static str,
    pub label: &'static str,
}

/// Toolbar buttons in display order.
pub fn toolbar() -> Vec<ToolbarItem> {
    BlockKind::all()
        .iter()
        .map(|&kind| ToolbarItem {
            kind,
            tag: kind.tag(),
            label: kind.label(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolbar_lists_every_kind() {
        let items = toolbar();
        assert_eq!(items.len(), BlockKind::all().len());
        for item in &items {
            assert_eq!(item.tag.parse::<BlockKind>().unwrap(), item.kind);
            assert!(!item.label.is_empty());
        }
    }

    #[test]
    fn test_action_json() {
        let actions: Vec<UiAction> = serde_json::from_str(
            r#"[
                {"action": "addPage"},
                {"action": "addBlock", "kind": "bodyText"},
                {"action": "drag", "block": 0, "path": [{"x": 0, "y": 0}, {"x": 15, "y": 30}]},
                {"action": "click", "block": 0, "link": true},
                {"action": "click"},
                {"action": "setLinkUrl", "url": "https://example.com"},
                {"action": "download"}
            ]"#,
        )
        .unwrap();

        assert_eq!(actions[0], UiAction::AddPage);
        assert_eq!(
            actions[2],
            UiAction::Drag {
                block: 0,
                path: vec![Point::new(0.0, 0.0), Point::new(15.0, 30.0)],
            }
        );
        assert_eq!(
            actions[3],
            UiAction::Click {
                block: Some(0),
                link: true
            }
        );
        assert_eq!(
            actions[4],
            UiAction::Click {
                block: None,
                link: false
            }
        );
        assert_eq!(actions[6], UiAction::Download);
    }
}
