//! DOM tree and page model for the CreamTint repaint engine.
//!
//! This crate provides an arena-based DOM tree following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), plus the [`Page`]
//! wrapper that carries the host-provided data the repaint pipeline reads:
//! computed style strings and rendered box metrics per node.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow checker
//! issues. Node ids are never reused, so an id held by the engine after its
//! node becomes unreachable stays valid but inert - the property the
//! engine's processed-set relies on.

use std::collections::HashMap;

/// The page model built on top of the tree.
pub mod page;

pub use page::{BoxMetrics, ComputedStyle, Page};

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// NodeId provides O(1) access to any node in the tree without borrowing
/// issues, and doubles as the element identity the repaint engine tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// This node stores indices for parent/child relationships. Child order is
/// insertion order, which is what document order reduces to for a tree built
/// by appends.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "When an element is created, its local name is always given."
///
/// NOTE: We only store tag_name (local name) and attrs. The repaint engine
/// never writes attributes; attrs exist so loaders can carry ids through for
/// reporting.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data for a tag with no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    pub fn id(&self) -> Option<&String> {
        self.attrs.get("id")
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
///
/// All nodes live in a contiguous vector, using indices for relationships:
/// - O(1) access to any node by NodeId
/// - No borrowing issues (indices instead of references)
/// - Ids are allocated monotonically and never reused
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by NodeId.
    /// The Document node is always at index 0 (NodeId::ROOT).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
        };
        DomTree {
            nodes: vec![document],
        }
    }

    /// Get the root document node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get element data if this node is an element.
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Whether the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.as_element(id).is_some()
    }

    /// Get text content if this node is a text node.
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.is_element(id))
            .copied()
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Iterate over all descendants of `id` (excluding `id` itself) in
    /// tree order - depth-first, pre-order, the order `querySelectorAll`
    /// enumerates matches in.
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        DescendantIterator { tree: self, stack }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over descendants of a node in tree order.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DescendantIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        for &child in self.tree.children(id).iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_child_links_parent() {
        let mut tree = DomTree::new();
        let html = tree.alloc(NodeType::Element(ElementData::new("html")));
        tree.append_child(NodeId::ROOT, html);

        assert_eq!(tree.parent(html), Some(NodeId::ROOT));
        assert_eq!(tree.children(NodeId::ROOT), &[html]);
        assert_eq!(tree.document_element(), Some(html));
    }

    #[test]
    fn descendants_are_in_tree_order() {
        // html
        //   body
        //     div#a
        //       span
        //     div#b
        let mut tree = DomTree::new();
        let html = tree.alloc(NodeType::Element(ElementData::new("html")));
        tree.append_child(NodeId::ROOT, html);
        let body = tree.alloc(NodeType::Element(ElementData::new("body")));
        tree.append_child(html, body);
        let a = tree.alloc(NodeType::Element(ElementData::new("div")));
        tree.append_child(body, a);
        let span = tree.alloc(NodeType::Element(ElementData::new("span")));
        tree.append_child(a, span);
        let b = tree.alloc(NodeType::Element(ElementData::new("div")));
        tree.append_child(body, b);

        let order: Vec<NodeId> = tree.descendants(html).collect();
        assert_eq!(order, vec![body, a, span, b]);
    }

    #[test]
    fn descendants_skip_the_start_node_and_include_text() {
        let mut tree = DomTree::new();
        let html = tree.alloc(NodeType::Element(ElementData::new("html")));
        tree.append_child(NodeId::ROOT, html);
        let text = tree.alloc(NodeType::Text("hi".to_string()));
        tree.append_child(html, text);

        let order: Vec<NodeId> = tree.descendants(html).collect();
        assert_eq!(order, vec![text]);
        assert_eq!(tree.as_text(text), Some("hi"));
        assert!(!tree.is_element(text));
    }
}
