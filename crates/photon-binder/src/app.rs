//! Application: state store plus the registered components.

use indexmap::IndexMap;
use photon_core::{BindError, ComponentId, Host, StateMap, Value};
use tracing::debug;

use crate::component::Component;
use crate::options::BindOptions;
use crate::store::StateStore;

/// Owns the application state store and every registered component.
///
/// Component ids are handed out from a monotonic counter and never reused.
pub struct App<H: Host> {
    store: StateStore,
    options: BindOptions,
    components: IndexMap<ComponentId, Component<H>>,
    next_id: u32,
}

impl<H: Host> App<H> {
    pub fn new(initial: StateMap) -> Self {
        Self::with_options(initial, BindOptions::default())
    }

    pub fn with_options(initial: StateMap, options: BindOptions) -> Self {
        Self {
            store: StateStore::new(initial),
            options,
            components: IndexMap::new(),
            next_id: 0,
        }
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    /// Options for components registered from now on.
    pub fn set_options(&mut self, options: BindOptions) {
        self.options = options;
    }

    /// Register a component on `root`.
    ///
    /// Fails when `root` is inside, or contains, an existing component root.
    pub fn add_component(&mut self, host: &mut H, root: H::Node) -> Result<ComponentId, BindError> {
        let id = ComponentId(self.next_id);
        for existing in self.components.values() {
            let other = existing.root();
            if host.contains(other, &root) || host.contains(&root, other) {
                return Err(BindError::OverlappingRoot {
                    component: id,
                    existing: existing.id(),
                });
            }
        }

        self.next_id += 1;
        let component = Component::register(host, id, root, self.options.clone());
        self.components.insert(id, component);
        debug!(component = %id, total = self.components.len(), "component added");
        Ok(id)
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component<H>> {
        self.components.get(&id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component<H>> {
        self.components.get_mut(&id)
    }

    pub fn try_component_mut(&mut self, id: ComponentId) -> Result<&mut Component<H>, BindError> {
        self.components
            .get_mut(&id)
            .ok_or(BindError::UnknownComponent { component: id })
    }

    /// Components in registration order.
    pub fn components(&self) -> impl Iterator<Item = &Component<H>> {
        self.components.values()
    }

    /// Detach and forget a component.
    pub fn detach(&mut self, host: &mut H, id: ComponentId) -> Result<(), BindError> {
        let component = self
            .components
            .shift_remove(&id)
            .ok_or(BindError::UnknownComponent { component: id })?;
        component.detach(host);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    /// Merge into the application store. Components are not refreshed.
    pub fn set_state(&mut self, partial: StateMap) {
        self.store.set_state(partial);
    }

    pub fn get_state(&self, identifier: &str) -> Option<&Value> {
        self.store.get(identifier)
    }
}

impl<H: Host> std::fmt::Debug for App<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("store", &self.store)
            .field("options", &self.options)
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .finish()
    }
}
