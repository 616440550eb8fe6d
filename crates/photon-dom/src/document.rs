//! Arena-backed document tree.

use photon_core::{Host, HostError, MarkupError};

use crate::markup::{escape_attribute, is_void_element, parse_fragment, Fragment};
use crate::node::{ElementData, NodeData, NodeId, NodeKind};
use crate::style::{parse_style, serialize_style};

/// Tag of the synthetic root element.
const ROOT_TAG: &str = "body";

/// An in-memory element tree.
///
/// Nodes live in an arena. Replacing an element's children releases the old
/// subtree and its slots are reused, so handles to replaced nodes must not be
/// kept across a replacement.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        let root = NodeData::new(NodeKind::Element(ElementData::new(ROOT_TAG)));
        Self {
            nodes: vec![root],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    /// Create a document whose root holds the parsed `markup`.
    pub fn parse(markup: &str) -> Result<Self, MarkupError> {
        let mut doc = Self::new();
        let fragments = parse_fragment(markup)?;
        let root = doc.root;
        doc.append_fragments(root, fragments);
        Ok(doc)
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Slots allocated in the arena, released ones included.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes reachable from the root.
    pub fn live_len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// First element matching `selector` (`#id`, `.class` or `tag`).
    pub fn select(&self, selector: &str) -> Result<NodeId, HostError> {
        self.select_all(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| HostError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    /// All elements matching `selector`, in document order.
    pub fn select_all(&self, selector: &str) -> Result<Vec<NodeId>, MarkupError> {
        let selector = selector.trim();
        let valid = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };

        let matcher: Box<dyn Fn(&ElementData) -> bool + '_> =
            if let Some(id) = selector.strip_prefix('#').filter(|s| valid(s)) {
                Box::new(move |e: &ElementData| e.attribute("id") == Some(id))
            } else if let Some(class) = selector.strip_prefix('.').filter(|s| valid(s)) {
                Box::new(move |e: &ElementData| e.has_class(class))
            } else if valid(selector) {
                let tag = selector.to_ascii_lowercase();
                Box::new(move |e: &ElementData| e.tag == tag)
            } else {
                return Err(MarkupError::UnsupportedSelector {
                    selector: selector.to_string(),
                });
            };

        Ok(self
            .descendants(self.root)
            .into_iter()
            .filter(|id| self.element(*id).map_or(false, |e| matcher(e)))
            .collect())
    }

    /// Element nodes in the subtree of `node`, `node` included, pre-order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let data = &self.nodes[id.0];
            if data.element().is_some() {
                out.push(id);
            }
            stack.extend(data.children.iter().rev().copied());
        }
        out
    }

    /// Element data for `node`, if it is an element.
    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.nodes.get(node.0).and_then(|n| n.element())
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(node.0).and_then(|n| n.element_mut())
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(node.0).map(|n| &n.kind)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Child elements of `node`, skipping text and comments.
    pub fn child_elements(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_some())
            .collect()
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let data = &self.nodes[node.0];
        if let NodeKind::Text(text) = &data.kind {
            out.push_str(text);
        }
        for child in &data.children {
            self.collect_text(*child, out);
        }
    }

    /// Serialized markup of the node's children.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in &self.nodes[node.0].children {
            self.write_node(*child, &mut out);
        }
        out
    }

    /// Serialized markup of the node itself.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        let data = &self.nodes[node.0];
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if is_void_element(&element.tag) {
                    return;
                }
                for child in &data.children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }

    /// Replace the children of `node` with parsed `markup`.
    pub fn replace_children(&mut self, node: NodeId, markup: &str) -> Result<(), MarkupError> {
        let fragments = parse_fragment(markup)?;
        let old = std::mem::take(&mut self.nodes[node.0].children);
        for child in old {
            self.release(child);
        }
        self.append_fragments(node, fragments);
        Ok(())
    }

    /// Return `node` and its subtree to the free list.
    fn release(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let data = &mut self.nodes[id.0];
            stack.append(&mut data.children);
            data.parent = None;
            data.kind = NodeKind::Text(String::new());
            self.free.push(id);
        }
    }

    fn append_fragments(&mut self, parent: NodeId, fragments: Vec<Fragment>) {
        for fragment in fragments {
            let (kind, children) = match fragment {
                Fragment::Text(text) => (NodeKind::Text(text), Vec::new()),
                Fragment::Comment(text) => (NodeKind::Comment(text), Vec::new()),
                Fragment::Element {
                    tag,
                    attributes,
                    children,
                } => {
                    let element = ElementData {
                        tag,
                        attributes: attributes.into_iter().collect(),
                        value: None,
                    };
                    (NodeKind::Element(element), children)
                }
            };
            let id = self.push_node(parent, kind);
            self.append_fragments(id, children);
        }
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let mut data = NodeData::new(kind);
        data.parent = Some(parent);
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = data;
                id
            }
            None => {
                self.nodes.push(data);
                NodeId(self.nodes.len() - 1)
            }
        };
        self.nodes[parent.0].children.push(id);
        id
    }

    fn write_style(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        let mut properties = element
            .attribute("style")
            .map(parse_style)
            .unwrap_or_default();
        if value.is_empty() {
            properties.shift_remove(name);
        } else {
            properties.insert(name.to_ascii_lowercase(), value.to_string());
        }
        if properties.is_empty() {
            element.attributes.shift_remove("style");
        } else {
            element
                .attributes
                .insert("style".to_string(), serialize_style(&properties));
        }
    }
}

impl Host for MemoryDocument {
    type Node = NodeId;

    fn query_class(&self, root: &NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(*root)
            .into_iter()
            .filter(|id| self.element(*id).map_or(false, |e| e.has_class(class)))
            .collect()
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == *ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn inner_html(&self, node: &NodeId) -> String {
        MemoryDocument::inner_html(self, *node)
    }

    fn set_inner_html(&mut self, node: &NodeId, markup: &str) -> Result<(), HostError> {
        self.replace_children(*node, markup)?;
        Ok(())
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.element(*node)
            .and_then(|e| e.attribute(name))
            .map(str::to_string)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(*node) {
            element
                .attributes
                .insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        if let Some(element) = self.element_mut(*node) {
            element.attributes.shift_remove(&name.to_ascii_lowercase());
        }
    }

    fn value(&self, node: &NodeId) -> Option<String> {
        let element = self.element(*node)?;
        element
            .value
            .clone()
            .or_else(|| element.attribute("value").map(str::to_string))
    }

    fn set_value(&mut self, node: &NodeId, value: &str) {
        if let Some(element) = self.element_mut(*node) {
            element.value = Some(value.to_string());
        }
    }

    fn class_list(&self, node: &NodeId) -> Vec<String> {
        self.element(*node)
            .map(|e| e.classes().iter().map(|c| c.to_string()).collect())
            .unwrap_or_default()
    }

    fn set_class_list(&mut self, node: &NodeId, classes: &[String]) {
        if let Some(element) = self.element_mut(*node) {
            if classes.is_empty() {
                element.attributes.shift_remove("class");
            } else {
                element
                    .attributes
                    .insert("class".to_string(), classes.join(" "));
            }
        }
    }

    fn style_property(&self, node: &NodeId, name: &str) -> Option<String> {
        let style = self.element(*node)?.attribute("style")?;
        parse_style(style).shift_remove(&name.to_ascii_lowercase())
    }

    fn set_style_property(&mut self, node: &NodeId, name: &str, value: &str) {
        self.write_style(*node, name, value);
    }
}
