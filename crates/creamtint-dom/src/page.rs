//! Page model: the host-facing view of a document.
//!
//! A real host supplies three things the repaint pipeline consumes: used
//! style values per element
//! ([CSSOM § 6.3 getComputedStyle](https://www.w3.org/TR/cssom-1/#dom-window-getcomputedstyle)),
//! rendered geometry
//! ([CSSOM View § 6.1 getBoundingClientRect](https://www.w3.org/TR/cssom-view-1/#dom-element-getboundingclientrect)),
//! and writable inline style
//! ([CSSOM § 6.6 the style attribute](https://www.w3.org/TR/cssom-1/#the-elementcssinlinestyle-mixin)).
//! [`Page`] bundles those three per-node tables around a [`DomTree`] so the
//! engine (and a deterministic test harness) can stand in for the host.

use std::collections::HashMap;

use crate::{DomTree, ElementData, NodeId, NodeType};

/// Used style values for one node, as a host's style computation would
/// report them - already-resolved strings, not declarations.
///
/// Only the two properties the repaint pipeline reads are carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedStyle {
    /// Used `background-color` value (e.g. `rgb(255, 255, 255)`).
    pub background_color: String,
    /// Used `color` value.
    pub color: String,
}

impl Default for ComputedStyle {
    /// Defaults match what browsers serialize for an unstyled element:
    /// a fully transparent background and black text.
    fn default() -> Self {
        Self {
            background_color: "rgba(0, 0, 0, 0)".to_string(),
            color: "rgb(0, 0, 0)".to_string(),
        }
    }
}

/// Rendered geometry for one node.
///
/// [CSSOM View § 6.1](https://www.w3.org/TR/cssom-view-1/#dom-element-getboundingclientrect)
/// "return a DOMRect object describing the smallest rectangle that includes
/// the element" - only the extent matters here, so position is not carried.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxMetrics {
    /// Rendered width in px.
    pub width: f64,
    /// Rendered height in px.
    pub height: f64,
}

impl BoxMetrics {
    /// Create metrics from a width/height pair.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A document plus the host-provided data the repaint pipeline reads, and
/// the inline overrides it writes.
///
/// Inline overrides feed back into the computed accessors, mirroring a real
/// host where a written `style` attribute becomes the new used value.
#[derive(Debug, Default)]
pub struct Page {
    tree: DomTree,
    styles: HashMap<NodeId, ComputedStyle>,
    metrics: HashMap<NodeId, BoxMetrics>,
    inline_background: HashMap<NodeId, String>,
    inline_color: HashMap<NodeId, String>,
}

impl Page {
    /// Create an empty page (a lone Document node).
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: DomTree::new(),
            styles: HashMap::new(),
            metrics: HashMap::new(),
            inline_background: HashMap::new(),
            inline_color: HashMap::new(),
        }
    }

    /// The underlying DOM tree.
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The document element, if the page has one.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree.document_element()
    }

    /// Append an element with its host-reported style and geometry.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        data: ElementData,
        style: ComputedStyle,
        metrics: BoxMetrics,
    ) -> NodeId {
        let id = self.tree.alloc(NodeType::Element(data));
        self.tree.append_child(parent, id);
        let _ = self.styles.insert(id, style);
        let _ = self.metrics.insert(id, metrics);
        id
    }

    /// Append a text node.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.tree.alloc(NodeType::Text(text.into()));
        self.tree.append_child(parent, id);
        id
    }

    /// Append a comment node.
    pub fn append_comment(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.tree.alloc(NodeType::Comment(text.into()));
        self.tree.append_child(parent, id);
        id
    }

    /// Whether the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.tree.is_element(id)
    }

    /// Element data for a node, if it is an element.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.as_element(id)
    }

    /// The element's local name, if the node is an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag_name.as_str())
    }

    /// Used `background-color` for a node. An inline override, once written,
    /// is the used value.
    pub fn computed_background_color(&self, id: NodeId) -> Option<&str> {
        self.inline_background
            .get(&id)
            .or_else(|| self.styles.get(&id).map(|s| &s.background_color))
            .map(String::as_str)
    }

    /// Used `color` for a node. An inline override, once written, is the
    /// used value.
    pub fn computed_color(&self, id: NodeId) -> Option<&str> {
        self.inline_color
            .get(&id)
            .or_else(|| self.styles.get(&id).map(|s| &s.color))
            .map(String::as_str)
    }

    /// Rendered geometry for a node. `None` for nodes the host never laid
    /// out (the engine treats that as zero-size).
    pub fn box_metrics(&self, id: NodeId) -> Option<BoxMetrics> {
        self.metrics.get(&id).copied()
    }

    /// Write the inline `background-color` property.
    pub fn set_inline_background_color(&mut self, id: NodeId, value: String) {
        let _ = self.inline_background.insert(id, value);
    }

    /// Write the inline `color` property.
    pub fn set_inline_color(&mut self, id: NodeId, value: String) {
        let _ = self.inline_color.insert(id, value);
    }

    /// The inline `background-color` written to a node, if any.
    pub fn inline_background_color(&self, id: NodeId) -> Option<&str> {
        self.inline_background.get(&id).map(String::as_str)
    }

    /// The inline `color` written to a node, if any.
    pub fn inline_color(&self, id: NodeId) -> Option<&str> {
        self.inline_color.get(&id).map(String::as_str)
    }

    /// Element descendants of `id` (excluding `id`), in tree order - the
    /// `querySelectorAll("*")` enumeration the traversal phases walk.
    pub fn element_descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.tree.descendants(id).filter(|&d| self.tree.is_element(d))
    }
}
