//! Component-scoped binding index.

use indexmap::IndexMap;
use photon_core::{BindingKind, Host};

/// Binding elements found inside one component root, per kind, in document order.
///
/// The index is rebuilt on every pass, so markup added or removed between
/// passes is picked up. Queries never leave the component's subtree.
#[derive(Debug, Clone)]
pub struct BindingIndex<N> {
    nodes: IndexMap<BindingKind, Vec<N>>,
}

impl<N> Default for BindingIndex<N> {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
        }
    }
}

impl<N: Clone> BindingIndex<N> {
    /// Collect every binding element under `root`.
    pub fn scan<H>(host: &H, root: &N) -> Self
    where
        H: Host<Node = N>,
    {
        let nodes = BindingKind::ALL
            .iter()
            .map(|kind| (*kind, host.query_class(root, kind.marker_class())))
            .collect();
        Self { nodes }
    }

    /// Elements bound with `kind`.
    pub fn nodes(&self, kind: BindingKind) -> &[N] {
        self.nodes.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, kind: BindingKind) -> usize {
        self.nodes(kind).len()
    }

    /// Total number of indexed elements.
    pub fn len(&self) -> usize {
        self.nodes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
