//! State binding for Photon components.
//!
//! This crate handles:
//! - Preparation: rewriting `${{identifier}}` placeholders into content markers
//! - Refresh passes: re-deriving every marker and typed binding from state
//! - Typed overrides per identifier
//! - The explicit application state store and component list
//!
//! ## Example
//!
//! ```ignore
//! use photon_binder::{App, StateMap};
//!
//! let mut app = App::new(StateMap::new());
//! let id = app.add_component(&mut host, root)?;
//! let component = app.try_component_mut(id)?;
//! component.set_state(&mut host, StateMap::new().with("count", 0));
//! component.prepare(&mut host)?;
//! component.set_state(&mut host, StateMap::new().with("count", 5));
//! ```

mod app;
mod component;
mod index;
mod options;
mod overrides;
mod refresh;
mod registry;
mod render;
mod report;
mod store;

pub use app::App;
pub use component::{ClickEvent, Component, Phase};
pub use index::BindingIndex;
pub use options::BindOptions;
pub use overrides::{resolve, OverrideMap, Signature, Transform};
pub use refresh::{
    refresh_attributes, refresh_classes, refresh_content, refresh_sources, refresh_styles,
    refresh_values, BindContext,
};
pub use registry::{prepare_states, prepare_states_with, Prepared};
pub use render::{content_markup, marker_markup, sequence_markup};
pub use report::{BindingFailure, RefreshReport};
pub use store::StateStore;

pub use photon_core::{
    BindError, BindingKind, ComponentId, Host, HostError, PhotonError, StateMap, Value, ValueKind,
};
