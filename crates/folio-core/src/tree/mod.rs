//! Visual tree abstraction.
//!
//! The page builder composes blocks into an element tree owned by the host
//! rendering environment. The state layer only needs a handful of
//! construction and query primitives, captured by [`VisualTree`].

mod memory;
mod selector;

pub use memory::MemoryTree;
pub use selector::{Combinator, Compound, Selector};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Handle to an element in a visual tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

/// Visual tree errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),
    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("Cannot append {child:?} inside its own subtree")]
    Cycle { child: NodeId },
}

/// Result type for visual tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Element tree construction and query primitives.
///
/// Implementations can wrap a browser DOM, a retained UI tree, or the
/// in-memory [`MemoryTree`] used for headless operation.
///
/// The `style` attribute is exposed both as a raw attribute and through the
/// per-property [`set_style`](VisualTree::set_style) / [`style`](VisualTree::style)
/// accessors.
pub trait VisualTree {
    /// The document element that attached nodes descend from.
    fn document(&self) -> NodeId;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Set an attribute, replacing any previous value.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> TreeResult<()>;

    /// Read an attribute.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Add a class (no-op if already present).
    fn add_class(&mut self, node: NodeId, class: &str) -> TreeResult<()>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Replace the text content of an element.
    fn set_text(&mut self, node: NodeId, text: &str) -> TreeResult<()>;

    fn text(&self, node: NodeId) -> Option<&str>;

    /// Set a single inline style property.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> TreeResult<()>;

    /// Read a single inline style property.
    fn style(&self, node: NodeId, property: &str) -> Option<&str>;

    /// Append `child` as the last child of `parent`, detaching it first.
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()>;

    /// Detach a node (and its subtree) from its parent.
    fn remove(&mut self, node: NodeId) -> TreeResult<()>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> &[NodeId];

    /// Lowercase tag name.
    fn tag(&self, node: NodeId) -> Option<&str>;

    /// All elements under `scope` (or the document) matching a selector,
    /// in document order.
    fn find_all_in(&self, scope: Option<NodeId>, selector: &str) -> TreeResult<Vec<NodeId>>;

    /// First element under `scope` (or the document) matching a selector.
    fn find_first_in(&self, scope: Option<NodeId>, selector: &str) -> TreeResult<Option<NodeId>> {
        Ok(self.find_all_in(scope, selector)?.into_iter().next())
    }

    fn find_first(&self, selector: &str) -> TreeResult<Option<NodeId>> {
        self.find_first_in(None, selector)
    }

    fn find_all(&self, selector: &str) -> TreeResult<Vec<NodeId>> {
        self.find_all_in(None, selector)
    }
}

/// Parse an inline style string into `(property, value)` declarations.
pub fn parse_declarations(css: &str) -> Vec<(String, String)> {
    css.split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            (!property.is_empty() && !value.is_empty())
                .then(|| (property, value.to_string()))
        })
        .collect()
}

/// Serialize declarations back into an inline style string.
pub fn format_declarations(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(property, value)| format!("{}:{};", property, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declarations() {
        let parsed = parse_declarations("font-size:36px;font-weight:500; ;Color : red;broken");
        assert_eq!(
            parsed,
            vec![
                ("font-size".to_string(), "36px".to_string()),
                ("font-weight".to_string(), "500".to_string()),
                ("color".to_string(), "red".to_string()),
            ]
        );
    }

    #[test]
    fn test_format_declarations() {
        let css = format_declarations(&[
            ("width".to_string(), "2px".to_string()),
            ("height".to_string(), "950px".to_string()),
        ]);
        assert_eq!(css, "width:2px;height:950px;");
    }
}
