//! In-memory visual tree for headless operation and tests.

use super::selector::Selector;
use super::{format_declarations, parse_declarations, NodeId, TreeError, TreeResult, VisualTree};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: Vec::new(),
            style: Vec::new(),
            text: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Arena-backed element tree.
///
/// Nodes are never freed; removed nodes stay in the arena but are no longer
/// reachable from the document, so queries do not see them.
#[derive(Debug, Clone)]
pub struct MemoryTree {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTree {
    /// Create a tree containing only the document (`body`) element.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("body")],
            document: NodeId(0),
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(TreeError::NodeNotFound(id))
    }

    fn check(&self, id: NodeId) -> TreeResult<()> {
        self.node(id).map(|_| ()).ok_or(TreeError::NodeNotFound(id))
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node(node).and_then(|n| n.parent) {
            if let Ok(parent) = self.node_mut(parent) {
                parent.children.retain(|&child| child != node);
            }
        }
        if let Ok(node) = self.node_mut(node) {
            node.parent = None;
        }
    }

    /// Descendants of `scope` in document order (excluding `scope`).
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        result
    }

    /// Whether a node is reachable from the document element.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.is_ancestor_or_self(self.document, node)
    }

    /// Number of nodes ever created (attached or not).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl VisualTree for MemoryTree {
    fn document(&self) -> NodeId {
        self.document
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> TreeResult<()> {
        let node = self.node_mut(node)?;
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "style" => node.style = parse_declarations(value),
            "class" => {
                node.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => match node.attributes.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => node.attributes.push((name, value.to_string())),
            },
        }
        Ok(())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let node = self.node(node)?;
        match name.to_ascii_lowercase().as_str() {
            "style" if node.style.is_empty() => None,
            "style" => Some(format_declarations(&node.style)),
            "class" if node.classes.is_empty() => None,
            "class" => Some(node.classes.join(" ")),
            lowered => node
                .attributes
                .iter()
                .find(|(existing, _)| existing == lowered)
                .map(|(_, value)| value.clone()),
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> TreeResult<()> {
        let node = self.node_mut(node)?;
        if !node.classes.iter().any(|existing| existing == class) {
            node.classes.push(class.to_string());
        }
        Ok(())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node)
            .is_some_and(|n| n.classes.iter().any(|existing| existing == class))
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> TreeResult<()> {
        self.node_mut(node)?.text = Some(text.to_string());
        Ok(())
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.text.as_deref()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> TreeResult<()> {
        let node = self.node_mut(node)?;
        let property = property.trim().to_ascii_lowercase();
        match node.style.iter_mut().find(|(existing, _)| *existing == property) {
            Some((_, existing)) => *existing = value.to_string(),
            None => node.style.push((property, value.to_string())),
        }
        Ok(())
    }

    fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node)?
            .style
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(property))
            .map(|(_, value)| value.as_str())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.check(parent)?;
        self.check(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::Cycle { child });
        }
        self.detach(child);
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> TreeResult<()> {
        self.check(node)?;
        self.detach(node);
        Ok(())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    fn find_all_in(&self, scope: Option<NodeId>, selector: &str) -> TreeResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        let scope = scope.unwrap_or(self.document);
        self.check(scope)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|&node| selector.matches(self, node))
            .collect())
    }
}
