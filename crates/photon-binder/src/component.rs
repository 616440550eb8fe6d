//! Component state controller.

use std::fmt;

use photon_core::{
    component_class, BindError, BindingKind, ComponentId, Host, PhotonError, StateMap,
    COMPONENT_ID_ATTR, STATE_CLASS,
};
use tracing::{debug, info, trace};

use crate::index::BindingIndex;
use crate::options::BindOptions;
use crate::overrides::{OverrideMap, Transform};
use crate::refresh::{
    refresh_attributes, refresh_classes, refresh_content, refresh_sources, refresh_styles,
    refresh_values, BindContext,
};
use crate::registry::{empty_markers, prepare_states_with};
use crate::report::RefreshReport;

/// Lifecycle of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Registered; placeholders not yet rewritten.
    Unprepared,
    /// Prepared; every state change triggers a refresh pass.
    Live,
}

/// A click inside a component root.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent<N> {
    pub component: ComponentId,
    /// Element that received the click.
    pub target: N,
}

type ClickHandler<N> = Box<dyn FnMut(&ClickEvent<N>, &StateMap) -> Option<StateMap>>;

/// One binding scope: a root element, its state and its overrides.
pub struct Component<H: Host> {
    id: ComponentId,
    root: H::Node,
    state: StateMap,
    overrides: OverrideMap,
    options: BindOptions,
    phase: Phase,
    index: BindingIndex<H::Node>,
    on_click: Option<ClickHandler<H::Node>>,
}

impl<H: Host> Component<H> {
    /// Register a component on `root`, marking the root with the component's
    /// class and id attribute.
    pub fn register(host: &mut H, id: ComponentId, root: H::Node, options: BindOptions) -> Self {
        host.add_class(&root, &component_class(id));
        host.set_attribute(&root, COMPONENT_ID_ATTR, &id.to_string());
        debug!(component = %id, "component registered");

        Self {
            id,
            root,
            state: StateMap::new(),
            overrides: OverrideMap::new(),
            options,
            phase: Phase::Unprepared,
            index: BindingIndex::default(),
            on_click: None,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn root(&self) -> &H::Node {
        &self.root
    }

    pub fn state(&self) -> &StateMap {
        &self.state
    }

    pub fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_live(&self) -> bool {
        self.phase == Phase::Live
    }

    /// Binding elements found by the last pass.
    pub fn bindings(&self) -> &BindingIndex<H::Node> {
        &self.index
    }

    /// Rewrite the root's placeholders into markers and apply every typed binding.
    ///
    /// This is the single `Unprepared -> Live` transition.
    pub fn prepare(&mut self, host: &mut H) -> Result<RefreshReport, PhotonError> {
        if self.is_live() {
            return Err(BindError::AlreadyLive { component: self.id }.into());
        }

        let markup = host.inner_html(&self.root);
        let prepared = prepare_states_with(&markup, &self.state, &self.overrides, &self.options);

        let mut report = RefreshReport::new();
        match host.set_inner_html(&self.root, &prepared.markup) {
            Ok(()) => {
                report.applied += prepared.markers.len() - prepared.failures.len();
                report.failures.extend(prepared.failures);
            }
            Err(error) => {
                // The host rejected some marker's content. Install empty
                // markers and fill them one by one.
                debug!(component = %self.id, %error, "filling markers individually");
                host.set_inner_html(&self.root, &empty_markers(&markup, &self.options))?;
                let markers = host.query_class(&self.root, STATE_CLASS);
                let ctx = BindContext::new(&self.state, &self.overrides, &self.options);
                refresh_content(host, &markers, &ctx, &mut report);
            }
        }
        self.phase = Phase::Live;

        self.index = BindingIndex::scan(&*host, &self.root);
        report.absorb(self.apply_typed(host));

        debug!(
            component = %self.id,
            markers = prepared.markers.len(),
            unterminated = prepared.unterminated.len(),
            bindings = self.index.len(),
            "component live"
        );
        Ok(report)
    }

    /// Merge `partial` into the state and run one refresh pass.
    ///
    /// Before preparation the merge happens without a pass; preparation
    /// renders the merged state.
    pub fn set_state(&mut self, host: &mut H, partial: StateMap) -> RefreshReport {
        self.state.merge(partial);
        if self.is_live() {
            self.refresh(host)
        } else {
            RefreshReport::new()
        }
    }

    /// Re-derive and re-apply every marker and binding in the root subtree.
    ///
    /// Content markers are settled first; typed bindings are located after,
    /// so bindings produced by marker content are included.
    pub fn refresh(&mut self, host: &mut H) -> RefreshReport {
        let mut report = RefreshReport::new();
        if !self.is_live() {
            trace!(component = %self.id, "refresh skipped, component not prepared");
            return report;
        }

        let markers = host.query_class(&self.root, STATE_CLASS);
        let ctx = BindContext::new(&self.state, &self.overrides, &self.options);
        refresh_content(host, &markers, &ctx, &mut report);

        self.index = BindingIndex::scan(&*host, &self.root);
        report.absorb(self.apply_typed(host));

        trace!(
            component = %self.id,
            applied = report.applied,
            failed = report.failures.len(),
            "refresh pass"
        );
        report
    }

    /// Value, class, style, attribute and source refreshers, in that order.
    fn apply_typed(&self, host: &mut H) -> RefreshReport {
        let mut report = RefreshReport::new();
        let ctx = BindContext::new(&self.state, &self.overrides, &self.options);
        refresh_values(host, self.index.nodes(BindingKind::Value), &ctx, &mut report);
        refresh_classes(host, self.index.nodes(BindingKind::Class), &ctx, &mut report);
        refresh_styles(host, self.index.nodes(BindingKind::Style), &ctx, &mut report);
        refresh_attributes(host, self.index.nodes(BindingKind::Attribute), &ctx, &mut report);
        refresh_sources(host, self.index.nodes(BindingKind::Source), &ctx, &mut report);
        report
    }

    /// Install or replace the override for `identifier`.
    ///
    /// The declared input kind is checked against the current state value.
    /// Takes effect on the next pass.
    pub fn register_override(
        &mut self,
        identifier: impl Into<String>,
        transform: Transform,
    ) -> Result<(), BindError> {
        let identifier = identifier.into();
        transform
            .signature()
            .check_input(&identifier, self.state.get(&identifier))?;
        trace!(component = %self.id, identifier = %identifier, "override registered");
        self.overrides.insert(identifier, transform);
        Ok(())
    }

    pub fn remove_override(&mut self, identifier: &str) -> Option<Transform> {
        self.overrides.remove(identifier)
    }

    /// Diagnostic table of the state map.
    pub fn print_state(&self) -> String {
        let width = self
            .state
            .keys()
            .map(str::len)
            .chain(std::iter::once("identifier".len()))
            .max()
            .unwrap_or(0);

        let mut table = format!("{:<width$} | value\n", "identifier");
        for (identifier, value) in self.state.iter() {
            info!(component = %self.id, identifier = %identifier, value = %value, "state");
            table.push_str(&format!("{identifier:<width$} | {value}\n"));
        }
        table
    }

    /// Install the click handler. It may return a partial state to apply.
    pub fn on_click<F>(&mut self, handler: F)
    where
        F: FnMut(&ClickEvent<H::Node>, &StateMap) -> Option<StateMap> + 'static,
    {
        self.on_click = Some(Box::new(handler));
    }

    /// Dispatch a click on `target`. Returns the pass triggered by the handler, if any.
    pub fn click(&mut self, host: &mut H, target: H::Node) -> Option<RefreshReport> {
        let mut handler = self.on_click.take()?;
        let event = ClickEvent {
            component: self.id,
            target,
        };
        let partial = handler(&event, &self.state);
        self.on_click = Some(handler);
        partial.map(|partial| self.set_state(host, partial))
    }

    /// Remove the root's component class and id attribute.
    pub fn detach(self, host: &mut H) {
        host.remove_class(&self.root, &component_class(self.id));
        host.remove_attribute(&self.root, COMPONENT_ID_ATTR);
        debug!(component = %self.id, "component detached");
    }
}

impl<H: Host> fmt::Debug for Component<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}
