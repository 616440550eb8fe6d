//! Marker and binding vocabulary written into documents.
//!
//! Every binding is an element carrying a marker class plus a data attribute
//! naming the bound identifier (or, for attribute bindings, a JSON map of
//! attribute name to identifier).

use std::fmt;

/// Class carried by every content marker.
pub const STATE_CLASS: &str = "pr-state";
/// Attribute holding a content marker's identifier.
pub const IDENTIFIER_ATTR: &str = "data-pr-identifier";
/// Attribute holding a sequence item's zero-based index.
pub const ITEM_INDEX_ATTR: &str = "data-pr-id";
/// Suffix appended to the identifier to form a sequence item class.
pub const ITEM_CLASS_SUFFIX: &str = "-item";

pub const VALUE_CLASS: &str = "pr-value";
pub const VALUE_ATTR: &str = "data-pr-value-state";
pub const CLASS_CLASS: &str = "pr-class";
pub const CLASS_ATTR: &str = "data-pr-class-state";
pub const STYLE_CLASS: &str = "pr-style";
pub const STYLE_ATTR: &str = "data-pr-style-state";
pub const ATTR_CLASS: &str = "pr-attr";
pub const ATTR_ATTR: &str = "data-pr-attr-states";
pub const SRC_CLASS: &str = "pr-src";
pub const SRC_ATTR: &str = "data-pr-src-state";

/// Prefix of the class marking a component root (`pr-comp-{id}`).
pub const COMPONENT_CLASS_PREFIX: &str = "pr-comp-";
/// Attribute carrying a component root's id.
pub const COMPONENT_ID_ATTR: &str = "data-pr-comp-id";

/// Attribute written by the source binding.
pub const SOURCE_TARGET_ATTR: &str = "src";

/// The kinds of binding an element can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingKind {
    /// A content marker produced from a placeholder.
    Content,
    /// Form input value.
    Value,
    /// CSS class list.
    Class,
    /// Inline style properties.
    Style,
    /// Arbitrary attributes from a JSON attribute map.
    Attribute,
    /// Resource reference (`src`).
    Source,
}

impl BindingKind {
    /// All kinds, content first, then typed bindings in refresh order.
    pub const ALL: [BindingKind; 6] = [
        BindingKind::Content,
        BindingKind::Value,
        BindingKind::Class,
        BindingKind::Style,
        BindingKind::Attribute,
        BindingKind::Source,
    ];

    /// Typed bindings in the order a refresh pass applies them.
    pub const TYPED: [BindingKind; 5] = [
        BindingKind::Value,
        BindingKind::Class,
        BindingKind::Style,
        BindingKind::Attribute,
        BindingKind::Source,
    ];

    /// Marker class identifying elements of this kind.
    pub fn marker_class(self) -> &'static str {
        match self {
            BindingKind::Content => STATE_CLASS,
            BindingKind::Value => VALUE_CLASS,
            BindingKind::Class => CLASS_CLASS,
            BindingKind::Style => STYLE_CLASS,
            BindingKind::Attribute => ATTR_CLASS,
            BindingKind::Source => SRC_CLASS,
        }
    }

    /// Data attribute naming the bound identifier(s).
    pub fn data_attribute(self) -> &'static str {
        match self {
            BindingKind::Content => IDENTIFIER_ATTR,
            BindingKind::Value => VALUE_ATTR,
            BindingKind::Class => CLASS_ATTR,
            BindingKind::Style => STYLE_ATTR,
            BindingKind::Attribute => ATTR_ATTR,
            BindingKind::Source => SRC_ATTR,
        }
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BindingKind::Content => "content",
            BindingKind::Value => "value",
            BindingKind::Class => "class",
            BindingKind::Style => "style",
            BindingKind::Attribute => "attribute",
            BindingKind::Source => "source",
        };
        f.write_str(name)
    }
}

/// Class marking the root of component `id`.
pub fn component_class(id: crate::ComponentId) -> String {
    format!("{COMPONENT_CLASS_PREFIX}{id}")
}

/// Class carried by each item rendered for a sequence bound to `identifier`.
pub fn item_class(identifier: &str) -> String {
    format!("{identifier}{ITEM_CLASS_SUFFIX}")
}
