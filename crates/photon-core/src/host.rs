//! The document environment contract.
//!
//! The binding engine never touches a document directly. Everything goes
//! through a [`Host`], which a browser adapter or an in-memory document
//! implements. Nodes are opaque handles owned by the host.

use std::fmt::Debug;

use crate::errors::HostError;

/// Primitive document operations the binding engine relies on.
pub trait Host {
    /// Handle to an element in the host document.
    type Node: Clone + PartialEq + Debug;

    /// Elements carrying `class` within the subtree of `root`, root included,
    /// in document order.
    fn query_class(&self, root: &Self::Node, class: &str) -> Vec<Self::Node>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    /// Serialized markup of the node's children.
    fn inner_html(&self, node: &Self::Node) -> String;

    /// Replace the node's children with parsed `markup`.
    fn set_inner_html(&mut self, node: &Self::Node, markup: &str) -> Result<(), HostError>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    /// Current editable value of a form element.
    fn value(&self, node: &Self::Node) -> Option<String>;

    fn set_value(&mut self, node: &Self::Node, value: &str);

    fn class_list(&self, node: &Self::Node) -> Vec<String>;

    /// Replace the class list with exactly `classes`.
    fn set_class_list(&mut self, node: &Self::Node, classes: &[String]);

    /// Inline style property, by its CSS (kebab-case) name.
    fn style_property(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_style_property(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Set the node's resource reference.
    fn set_source(&mut self, node: &Self::Node, url: &str) {
        self.set_attribute(node, crate::vocab::SOURCE_TARGET_ATTR, url);
    }

    /// Add `class` unless already present.
    fn add_class(&mut self, node: &Self::Node, class: &str) {
        let mut classes = self.class_list(node);
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            self.set_class_list(node, &classes);
        }
    }

    /// Remove every occurrence of `class`.
    fn remove_class(&mut self, node: &Self::Node, class: &str) {
        let classes = self.class_list(node);
        if classes.iter().any(|c| c == class) {
            let kept: Vec<String> = classes.into_iter().filter(|c| c != class).collect();
            self.set_class_list(node, &kept);
        }
    }
}

/// Convert a camelCase style property name to its CSS form (`fontSize` -> `font-size`).
/// Names that already contain a dash are returned unchanged.
pub fn css_property_name(name: &str) -> String {
    if name.contains('-') {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
