//! In-memory document host for Photon.
//!
//! [`MemoryDocument`] is a small element tree with just enough HTML to run
//! the binding engine outside a browser: fragment parsing, serialization,
//! class/style/attribute/value primitives and simple selectors. It implements
//! [`photon_core::Host`], so tests, benchmarks and server-side rendering can
//! drive components against it.

mod document;
mod markup;
mod node;
mod style;

pub use document::MemoryDocument;
pub use markup::{parse_fragment, Fragment, is_void_element};
pub use node::{ElementData, NodeId, NodeKind};
pub use style::{parse_style, serialize_style};

/// Parse `markup` into a document whose root holds the parsed nodes.
pub fn parse(markup: &str) -> Result<MemoryDocument, photon_core::MarkupError> {
    MemoryDocument::parse(markup)
}
