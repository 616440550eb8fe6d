//! Application-wide state store.

use photon_core::{StateMap, Value};
use tracing::trace;

/// A state map shared across components, owned by whoever constructs it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateStore {
    state: StateMap,
}

impl StateStore {
    pub fn new(initial: StateMap) -> Self {
        Self { state: initial }
    }

    /// Merge `partial` into the store.
    pub fn set_state(&mut self, partial: StateMap) {
        trace!(keys = partial.len(), "store update");
        self.state.merge(partial);
    }

    pub fn get(&self, identifier: &str) -> Option<&Value> {
        self.state.get(identifier)
    }

    pub fn state(&self) -> &StateMap {
        &self.state
    }
}
